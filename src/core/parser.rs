//! Parser for one schedule line: `NAME=DDhh:mm-hh:mm,DDhh:mm-hh:mm,...`.
//!
//! Every frame is read at fixed offsets: a two-letter day code at 0..2,
//! then `hh` at 2..4, `mm` at 5..7, `hh` at 8..10 and `mm` at 11..13. The
//! separator bytes are not inspected and anything after offset 13 is ignored.
//! Each time is `hh * 60 + mm`. A field may carry a sign; a negative time is
//! a wrong-time error.

use crate::core::schedule::add_timeframe;
use crate::core::timeframe::{day_index, parse_day_code};
use crate::domain::model::Timeframe;
use crate::utils::error::{EtlError, Result};

pub const FRAME_WIDTH: usize = 13;

/// 解析單行排班資料，同一行內重疊的時段會即時合併
pub fn read_schedule(line: &str) -> Result<(String, Vec<Timeframe>)> {
    let (name, schedule) = line
        .split_once('=')
        .ok_or_else(|| EtlError::corrupted(line))?;

    let mut frames = Vec::new();
    for raw in schedule.trim_end().split(',') {
        let frame = parse_frame(raw).map_err(|e| e.with_line_text(line))?;
        add_timeframe(&mut frames, frame);
    }

    tracing::debug!("Parsed {} timeframe(s) for {}", frames.len(), name);
    Ok((name.to_string(), frames))
}

/// Parse a single `DDhh:mm-hh:mm` frame.
pub fn parse_frame(raw: &str) -> Result<Timeframe> {
    let bytes = raw.as_bytes();
    if bytes.len() < FRAME_WIDTH {
        return Err(EtlError::corrupted(raw));
    }

    let day = raw
        .get(0..2)
        .and_then(parse_day_code)
        .ok_or_else(|| EtlError::corrupted(raw))?;

    let start = clock_minutes(&bytes[2..4], &bytes[5..7]).ok_or_else(|| EtlError::corrupted(raw))?;
    let finish =
        clock_minutes(&bytes[8..10], &bytes[11..13]).ok_or_else(|| EtlError::corrupted(raw))?;

    // 負值代表時間錯誤，不是資料損壞
    let start = u16::try_from(start).map_err(|_| EtlError::wrong_time(raw))?;
    let finish = u16::try_from(finish).map_err(|_| EtlError::wrong_time(raw))?;

    Timeframe::new(day_index(day), start, finish).map_err(|e| e.with_line_text(raw))
}

fn clock_minutes(hours: &[u8], minutes: &[u8]) -> Option<i32> {
    Some(clock_field(hours)? * 60 + clock_field(minutes)?)
}

/// A two-byte numeric field, optionally signed (`07`, `-1`, `+5`).
fn clock_field(field: &[u8]) -> Option<i32> {
    std::str::from_utf8(field).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(day: u8, start: u16, finish: u16) -> Timeframe {
        Timeframe { day, start, finish }
    }

    #[test]
    fn test_read_single_frame() {
        let (name, frames) = read_schedule("A=MO10:00-12:00").unwrap();
        assert_eq!(name, "A");
        assert_eq!(frames, vec![frame(0, 600, 720)]);
    }

    #[test]
    fn test_read_full_line_keeps_order() {
        let (name, frames) = read_schedule(
            "RENE=MO10:00-12:00,TU10:00-12:00,TH01:00-03:00,SA14:00-18:00,SU20:00-21:00",
        )
        .unwrap();
        assert_eq!(name, "RENE");
        assert_eq!(
            frames,
            vec![
                frame(0, 600, 720),
                frame(1, 600, 720),
                frame(3, 60, 180),
                frame(5, 840, 1080),
                frame(6, 1200, 1260),
            ]
        );
    }

    #[test]
    fn test_overlapping_frames_in_one_line_are_merged() {
        let (_, frames) =
            read_schedule("RENE=MO10:00-12:22,MO12:00-13:00,TU10:00-12:00").unwrap();
        assert_eq!(frames, vec![frame(0, 600, 780), frame(1, 600, 720)]);
    }

    #[test]
    fn test_midnight_bounds_accepted() {
        let (_, frames) = read_schedule("X=WE00:00-24:00").unwrap();
        assert_eq!(frames, vec![frame(2, 0, 1440)]);
    }

    #[test]
    fn test_inverted_range_is_wrong_time() {
        let err = read_schedule("X=MO12:00-10:00").unwrap_err();
        match err {
            EtlError::WrongTime { line_number, line } => {
                assert_eq!(line_number, None);
                assert_eq!(line, "X=MO12:00-10:00");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_past_midnight_is_wrong_time() {
        assert!(matches!(
            read_schedule("X=MO10:00-24:01"),
            Err(EtlError::WrongTime { .. })
        ));
        assert!(matches!(
            read_schedule("X=MO25:00-26:00"),
            Err(EtlError::WrongTime { .. })
        ));
    }

    #[test]
    fn test_missing_separator_is_corrupted() {
        let err = read_schedule("abracadabra").unwrap_err();
        assert!(matches!(err, EtlError::CorruptedData { ref line, .. } if line == "abracadabra"));
    }

    #[test]
    fn test_bad_day_code_is_corrupted() {
        assert!(matches!(
            read_schedule("X=XX10:00-12:00"),
            Err(EtlError::CorruptedData { .. })
        ));
    }

    #[test]
    fn test_non_numeric_time_is_corrupted() {
        assert!(matches!(
            read_schedule("X=MO1a:00-12:00"),
            Err(EtlError::CorruptedData { .. })
        ));
        assert!(matches!(
            read_schedule("X=MO10:00-12:x0"),
            Err(EtlError::CorruptedData { .. })
        ));
    }

    #[test]
    fn test_negative_time_is_wrong_time() {
        match read_schedule("X=MO-1:00-12:00").unwrap_err() {
            EtlError::WrongTime { line_number, line } => {
                assert_eq!(line_number, None);
                assert_eq!(line, "X=MO-1:00-12:00");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(matches!(
            read_schedule("X=MO00:00--1:00"),
            Err(EtlError::WrongTime { .. })
        ));
    }

    #[test]
    fn test_signed_fields_are_read_as_numbers() {
        let (_, frames) = read_schedule("X=MO+1:00-02:00").unwrap();
        assert_eq!(frames, vec![frame(0, 60, 120)]);
    }

    #[test]
    fn test_short_frame_is_corrupted() {
        assert!(matches!(read_schedule("X="), Err(EtlError::CorruptedData { .. })));
        assert!(matches!(
            read_schedule("X=MO10:00-12:0"),
            Err(EtlError::CorruptedData { .. })
        ));
        assert!(matches!(
            read_schedule("X=MO10:00-12:00,"),
            Err(EtlError::CorruptedData { .. })
        ));
    }

    #[test]
    fn test_bytes_past_frame_width_are_ignored() {
        let (_, frames) = read_schedule("X=MO10:00-12:00TH14:00-15:30").unwrap();
        assert_eq!(frames, vec![frame(0, 600, 720)]);
    }

    #[test]
    fn test_separator_bytes_are_not_checked() {
        let (_, frames) = read_schedule("X=MO10.00/12.00").unwrap();
        assert_eq!(frames, vec![frame(0, 600, 720)]);
    }

    #[test]
    fn test_glued_frames_in_full_line() {
        let (name, frames) = read_schedule(
            "ASTRID=MO10:00-12:00,TH12:00-14:00TH14:00-15:30,SU20:00-21:00,TH12:30-15:00",
        )
        .unwrap();
        assert_eq!(name, "ASTRID");
        assert_eq!(
            frames,
            vec![frame(0, 600, 720), frame(3, 720, 900), frame(6, 1200, 1260)]
        );
    }

    #[test]
    fn test_multibyte_input_does_not_panic() {
        assert!(matches!(
            read_schedule("X=é10:00-12:00"),
            Err(EtlError::CorruptedData { .. })
        ));
        assert!(matches!(
            read_schedule("X=€0:00-12:00"),
            Err(EtlError::CorruptedData { .. })
        ));
    }

    #[test]
    fn test_trailing_whitespace_is_tolerated() {
        let (_, frames) = read_schedule("A=MO10:00-12:00  ").unwrap();
        assert_eq!(frames, vec![frame(0, 600, 720)]);
    }
}
