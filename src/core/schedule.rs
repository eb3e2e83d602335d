use std::collections::HashMap;

use crate::core::parser::read_schedule;
use crate::core::timeframe::meet_in_day;
use crate::domain::model::Timeframe;
use crate::utils::error::Result;

/// 將新時段併入清單：與第一個同日重疊 (或相接) 的時段合併，否則附加到尾端。
///
/// Only the first meeting entry is widened. If the widened entry now also
/// overlaps a later entry, the two stay separate.
pub fn add_timeframe(frames: &mut Vec<Timeframe>, timeframe: Timeframe) {
    if let Some(existing) = frames.iter_mut().find(|f| meet_in_day(&**f, &timeframe)) {
        *existing = Timeframe {
            day: existing.day,
            start: existing.start.min(timeframe.start),
            finish: existing.finish.max(timeframe.finish),
        };
        return;
    }
    frames.push(timeframe);
}

/// Name → merged timeframes, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleRegistry {
    entries: Vec<(String, Vec<Timeframe>)>,
    index: HashMap<String, usize>,
}

impl ScheduleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from raw lines, numbering them from 1.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_numbered_lines(lines.into_iter().enumerate().map(|(i, line)| (i + 1, line)))
    }

    /// Build a registry from lines that already carry their 1-based number.
    /// Stops at the first invalid line.
    pub fn from_numbered_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, S)>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for (line_number, line) in lines {
            let line = line.as_ref();
            let (name, frames) =
                read_schedule(line).map_err(|e| e.at_line(line_number, line))?;
            registry.add_schedule(name, frames);
        }
        Ok(registry)
    }

    /// 新名稱直接存入；已存在的名稱逐一合併新時段
    pub fn add_schedule(&mut self, name: String, timeframes: Vec<Timeframe>) {
        match self.index.get(&name) {
            Some(&position) => {
                let frames = &mut self.entries[position].1;
                for frame in timeframes {
                    add_timeframe(frames, frame);
                }
                tracing::debug!("Merged repeated schedule for {}", name);
            }
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, timeframes));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&[Timeframe]> {
        self.index
            .get(name)
            .map(|&position| self.entries[position].1.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(name, _)| name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Timeframe])> {
        self.entries
            .iter()
            .map(|(name, frames)| (name.as_str(), frames.as_slice()))
    }

    pub(crate) fn entry(&self, position: usize) -> Option<(&str, &[Timeframe])> {
        self.entries
            .get(position)
            .map(|(name, frames)| (name.as_str(), frames.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read every line into a registry, failing on the first invalid one.
pub fn read_schedules<I, S>(lines: I) -> Result<ScheduleRegistry>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ScheduleRegistry::from_lines(lines)
}
