use std::iter::FusedIterator;

use crate::core::schedule::ScheduleRegistry;
use crate::core::timeframe::meet;
use crate::domain::model::{PairCoincidence, Timeframe};
use crate::utils::error::Result;

/// 計算兩人之間互相重疊 (含跨午夜相接) 的時段組合數
pub fn count_coincidences(first: &[Timeframe], second: &[Timeframe]) -> usize {
    first
        .iter()
        .map(|a| second.iter().filter(|b| meet(a, *b)).count())
        .sum()
}

/// Lazily yields one result per unordered pair of registered names, in
/// first-seen order: `(0, 1), (0, 2), ..., (1, 2), ...`.
#[derive(Debug, Clone)]
pub struct Coincidences<'a> {
    registry: &'a ScheduleRegistry,
    i: usize,
    j: usize,
}

impl<'a> Coincidences<'a> {
    pub fn new(registry: &'a ScheduleRegistry) -> Self {
        Self { registry, i: 0, j: 1 }
    }

    fn remaining(&self) -> usize {
        let n = self.registry.len();
        if self.i + 1 >= n {
            return 0;
        }
        // 目前這一列剩餘的組合，加上之後各列的組合
        let rest_of_row = n - self.j;
        let after = n - self.i - 1;
        rest_of_row + after * (after - 1) / 2
    }
}

impl Iterator for Coincidences<'_> {
    type Item = PairCoincidence;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.registry.len();
        if self.j >= n {
            self.i += 1;
            self.j = self.i + 1;
        }
        if self.i + 1 >= n {
            return None;
        }

        let (first, first_frames) = self.registry.entry(self.i)?;
        let (second, second_frames) = self.registry.entry(self.j)?;
        self.j += 1;

        Some(PairCoincidence {
            first: first.to_string(),
            second: second.to_string(),
            coincidences: count_coincidences(first_frames, second_frames),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Coincidences<'_> {}

impl FusedIterator for Coincidences<'_> {}

impl ScheduleRegistry {
    pub fn coincidences(&self) -> Coincidences<'_> {
        Coincidences::new(self)
    }
}

/// Build the registry from `lines` and collect every pair result.
pub fn run<I, S>(lines: I) -> Result<Vec<PairCoincidence>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let registry = ScheduleRegistry::from_lines(lines)?;
    Ok(registry.coincidences().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;

    fn assert_pairs(results: &[PairCoincidence], expected: &[(&str, &str, usize)]) {
        assert_eq!(results.len(), expected.len(), "{:?}", results);
        for (a, b, count) in expected {
            let found = results
                .iter()
                .find(|r| r.is_pair(a, b))
                .unwrap_or_else(|| panic!("missing pair {}-{} in {:?}", a, b, results));
            assert_eq!(found.coincidences, *count, "pair {}-{}", a, b);
        }
    }

    #[test]
    fn test_run_on_correct_data() {
        let results = run([
            "RENE=MO10:00-12:00,TU10:00-12:00,TH01:00-03:00,SA14:00-18:00,SU20:00-21:00",
            "ASTRID=MO10:00-12:00,TH12:00-14:00,SU20:00-21:00",
            "ANDRES=MO10:00-12:00,TH12:00-14:00,SU20:00-21:00",
        ])
        .unwrap();

        assert_pairs(
            &results,
            &[("RENE", "ASTRID", 2), ("RENE", "ANDRES", 2), ("ANDRES", "ASTRID", 3)],
        );
    }

    #[test]
    fn test_run_with_touching_frames() {
        let results = run([
            "RENE=MO10:15-12:00,TU10:00-12:00,TH13:00-13:15,SA14:00-18:00,SU20:00-21:00",
            "ASTRID=MO10:00-12:00,TH12:00-14:00,SU20:00-21:00",
        ])
        .unwrap();

        assert_pairs(&results, &[("RENE", "ASTRID", 3)]);
    }

    #[test]
    fn test_run_without_coincidences() {
        let results = run([
            "RENE=MO10:15-12:00,TU10:00-12:00,TH13:15-14:00,SA14:00-18:00,SU20:00-21:00",
            "ASTRID=MO12:15-13:00,TH12:00-13:00,SU21:01-22:21",
            "ANDRES=TU08:00-09:00,TH08:00-09:00,FR20:00-21:00",
        ])
        .unwrap();

        assert_pairs(
            &results,
            &[("RENE", "ASTRID", 0), ("RENE", "ANDRES", 0), ("ASTRID", "ANDRES", 0)],
        );
    }

    #[test]
    fn test_run_with_midnight_crossing() {
        let results = run([
            "RENE=MO10:00-12:00,TU10:00-12:00,TH00:00-03:00,SA14:00-18:00,SU20:00-21:00",
            "ASTRID=MO10:00-12:00,TH12:00-14:00,SU20:00-21:00",
            "ANDRES=MO10:00-12:00,TH12:00-14:00,SU20:00-21:00",
            "DIEGO=MO08:00-09:00,WE10:00-24:00,FR01:00-03:00,SA14:00-18:00,SU20:00-21:00",
        ])
        .unwrap();

        assert_pairs(
            &results,
            &[
                ("RENE", "ASTRID", 2),
                ("RENE", "ANDRES", 2),
                ("ANDRES", "ASTRID", 3),
                ("DIEGO", "ASTRID", 1),
                ("DIEGO", "RENE", 3),
                ("DIEGO", "ANDRES", 1),
            ],
        );
    }

    #[test]
    fn test_single_person_yields_nothing() {
        let results = run(["RENE=MO10:15-12:00,TU10:00-12:00"]).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(run(Vec::<&str>::new()).unwrap().is_empty());
    }

    #[test]
    fn test_broken_input_fails_whole_batch() {
        let err = run([
            "RENE=MO10:00-12:00,TU10:00-12:00",
            "abracadabra",
            "ANDRES=MO10:00-12:00",
        ])
        .unwrap_err();
        assert!(matches!(err, EtlError::CorruptedData { line_number: Some(2), .. }));
    }

    #[test]
    fn test_emission_order_and_size_hint() {
        let registry = ScheduleRegistry::from_lines([
            "A=MO10:00-12:00",
            "B=MO11:00-13:00",
            "C=TU10:00-12:00",
            "D=MO00:00-24:00",
        ])
        .unwrap();

        let mut pairs = registry.coincidences();
        assert_eq!(pairs.len(), 6);
        let first = pairs.next().unwrap();
        assert_eq!((first.first.as_str(), first.second.as_str()), ("A", "B"));
        assert_eq!(pairs.len(), 5);

        let order: Vec<(String, String)> = registry
            .coincidences()
            .map(|p| (p.first, p.second))
            .collect();
        let expected = [("A", "B"), ("A", "C"), ("A", "D"), ("B", "C"), ("B", "D"), ("C", "D")];
        assert_eq!(
            order,
            expected
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_count_includes_midnight_rule() {
        let monday_night = [Timeframe { day: 0, start: 1300, finish: 1440 }];
        let tuesday_morning = [Timeframe { day: 1, start: 0, finish: 60 }];
        assert_eq!(count_coincidences(&monday_night, &tuesday_morning), 1);
        assert_eq!(count_coincidences(&tuesday_morning, &monday_night), 1);
    }
}
