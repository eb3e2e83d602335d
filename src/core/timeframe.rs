//! Timeframe model and the "meet" predicate.
//!
//! Two windows meet when they overlap or touch on the same day, or when one
//! ends exactly at midnight (`24:00`) and the other starts at `00:00` on the
//! following day. Only a day difference of exactly one counts as "following";
//! Sunday (6) to Monday (0) is not treated as adjacent.

use std::fmt;

use chrono::Weekday;

use crate::domain::model::Timeframe;
use crate::utils::error::{EtlError, Result};

/// 一天的分鐘數，同時代表當天結束的午夜
pub const MINUTES_PER_DAY: u16 = 1440;

/// Anything that can be read as a `(day, start, finish)` window.
pub trait TimeWindow {
    fn day(&self) -> u8;
    fn start(&self) -> u16;
    fn finish(&self) -> u16;
}

impl TimeWindow for Timeframe {
    fn day(&self) -> u8 {
        self.day
    }

    fn start(&self) -> u16 {
        self.start
    }

    fn finish(&self) -> u16 {
        self.finish
    }
}

impl TimeWindow for (u8, u16, u16) {
    fn day(&self) -> u8 {
        self.0
    }

    fn start(&self) -> u16 {
        self.1
    }

    fn finish(&self) -> u16 {
        self.2
    }
}

impl<T: TimeWindow + ?Sized> TimeWindow for &T {
    fn day(&self) -> u8 {
        (**self).day()
    }

    fn start(&self) -> u16 {
        (**self).start()
    }

    fn finish(&self) -> u16 {
        (**self).finish()
    }
}

impl Timeframe {
    /// 建立時段並檢查 `start <= finish <= 1440`
    pub fn new(day: u8, start: u16, finish: u16) -> Result<Self> {
        if day > 6 {
            return Err(EtlError::corrupted(format!("day index {}", day)));
        }
        if start > MINUTES_PER_DAY || finish > MINUTES_PER_DAY || start > finish {
            return Err(EtlError::wrong_time(""));
        }
        Ok(Self { day, start, finish })
    }

    pub fn weekday(&self) -> Option<Weekday> {
        weekday_from_index(self.day)
    }

    pub fn is_full_day(&self) -> bool {
        self.start == 0 && self.finish == MINUTES_PER_DAY
    }
}

impl TryFrom<(u8, u16, u16)> for Timeframe {
    type Error = EtlError;

    fn try_from((day, start, finish): (u8, u16, u16)) -> Result<Self> {
        Self::new(day, start, finish)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.weekday().map(day_code).unwrap_or("??");
        write!(
            f,
            "{}{:02}:{:02}-{:02}:{:02}",
            code,
            self.start / 60,
            self.start % 60,
            self.finish / 60,
            self.finish % 60
        )
    }
}

/// Two-letter day code (`MO`..`SU`) to weekday.
pub fn parse_day_code(code: &str) -> Option<Weekday> {
    match code {
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        "SU" => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn day_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// 0 = Monday … 6 = Sunday.
pub fn day_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_monday() as u8
}

pub fn weekday_from_index(day: u8) -> Option<Weekday> {
    match day {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Same-day overlap of the closed ranges `[start, finish]`.
pub fn meet_in_day<A: TimeWindow, B: TimeWindow>(a: &A, b: &B) -> bool {
    if a.day() != b.day() {
        return false;
    }
    if a.finish() < b.start() {
        return false;
    }
    if b.finish() < a.start() {
        return false;
    }
    true
}

/// Same-day overlap, or a window ending at 24:00 followed by one starting at
/// 00:00 the next day.
pub fn meet<A: TimeWindow, B: TimeWindow>(a: &A, b: &B) -> bool {
    if crosses_midnight(a, b) || crosses_midnight(b, a) {
        return true;
    }
    meet_in_day(a, b)
}

fn crosses_midnight<A: TimeWindow, B: TimeWindow>(earlier: &A, later: &B) -> bool {
    later.day() >= earlier.day()
        && later.day() - earlier.day() == 1
        && earlier.finish() == MINUTES_PER_DAY
        && later.start() == 0
}
