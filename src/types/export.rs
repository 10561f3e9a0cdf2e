//! Structured export of every timer in a registry.

use std::fmt::{Formatter, Result as FmtResult};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::stats::TimerStats;

/// Timer name to [`TimerStats`], in registry order.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsExport {
    entries: Vec<(String, TimerStats)>,
}

impl MetricsExport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Append without the duplicate check; callers guarantee unique names.
    pub(crate) fn push(&mut self, name: String, stats: TimerStats) {
        self.entries.push((name, stats));
    }

    /// Append an entry; a repeated name replaces the earlier stats in place.
    pub fn insert(&mut self, name: impl Into<String>, stats: TimerStats) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = stats,
            None => self.entries.push((name, stats)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TimerStats> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, stats)| stats)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimerStats)> {
        self.entries.iter().map(|(name, stats)| (name.as_str(), stats))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for MetricsExport {
    type Item = (String, TimerStats);
    type IntoIter = std::vec::IntoIter<(String, TimerStats)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, TimerStats)> for MetricsExport {
    fn from_iter<I: IntoIterator<Item = (String, TimerStats)>>(iter: I) -> Self {
        let mut export = MetricsExport::new();
        for (name, stats) in iter {
            export.insert(name, stats);
        }
        export
    }
}

impl Serialize for MetricsExport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, stats) in &self.entries {
            map.serialize_entry(name, stats)?;
        }
        map.end()
    }
}

struct ExportVisitor;

impl<'de> Visitor<'de> for ExportVisitor {
    type Value = MetricsExport;

    fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("a map of timer names to timer stats")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut export = MetricsExport::new();
        while let Some((name, stats)) = access.next_entry::<String, TimerStats>()? {
            export.insert(name, stats);
        }
        Ok(export)
    }
}

impl<'de> Deserialize<'de> for MetricsExport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ExportVisitor)
    }
}
