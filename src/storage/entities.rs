use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::time::date_key_ser;

/// Notes for a single day keyed by slot label (`HH:mm`).
pub type SlotEntries = BTreeMap<String, String>;

/// The progress saved for one calendar day.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct DayEntry {
    #[serde(with = "date_key_ser")]
    pub date: NaiveDate,
    pub entries: SlotEntries,
}

/// Every [DayEntry] kept under the progress key. Stored as a plain JSON array, in the order days
/// were last saved.
#[derive(PartialEq, Eq, Debug, Default, Serialize, Deserialize, Clone)]
#[serde(transparent)]
pub struct PersistedCollection(Vec<DayEntry>);

impl PersistedCollection {
    pub fn new(days: Vec<DayEntry>) -> Self {
        Self(days)
    }

    pub fn days(&self) -> &[DayEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Notes saved for `date`, or an empty mapping if the day was never saved.
    pub fn entries_for(&self, date: NaiveDate) -> SlotEntries {
        self.0
            .iter()
            .find(|day| day.date == date)
            .map(|day| day.entries.clone())
            .unwrap_or_default()
    }

    /// Drops whatever was stored for `date` and appends the new notes at the end.
    pub fn with_day(mut self, date: NaiveDate, entries: SlotEntries) -> Self {
        self.0.retain(|day| day.date != date);
        self.0.push(DayEntry { date, entries });
        self
    }

    /// Dates that have saved progress, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates = self.0.iter().map(|day| day.date).collect::<Vec<_>>();
        dates.sort();
        dates.dedup();
        dates
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;

    use super::{DayEntry, PersistedCollection, SlotEntries};

    fn entries(values: &[(&str, &str)]) -> SlotEntries {
        values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_storage_layout() -> Result<()> {
        let collection = PersistedCollection::new(vec![DayEntry {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            entries: entries(&[("09:00", "standup"), ("10:00", "review")]),
        }]);

        let json = serde_json::to_value(&collection)?;
        assert_eq!(
            json,
            serde_json::json!([
                { "date": "2024-06-01", "entries": { "09:00": "standup", "10:00": "review" } }
            ])
        );

        let parsed: PersistedCollection = serde_json::from_value(json)?;
        assert_eq!(parsed, collection);
        Ok(())
    }

    #[test]
    fn test_rejects_bad_shapes() {
        for raw in [
            r#"{"date": "2024-06-01", "entries": {}}"#,
            r#"[{"date": "June 1st", "entries": {}}]"#,
            r#"[{"date": "2024-06-01"}]"#,
            r#"[{"date": "2024-06-01", "entries": {"09:00": 3}}]"#,
            "not json",
        ] {
            assert!(
                serde_json::from_str::<PersistedCollection>(raw).is_err(),
                "{raw} should not parse"
            );
        }
    }

    #[test]
    fn test_with_day_replaces() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let other = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();

        let collection = PersistedCollection::default()
            .with_day(date, entries(&[("09:00", "a")]))
            .with_day(other, entries(&[("11:00", "c")]))
            .with_day(date, entries(&[("10:00", "b")]));

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.entries_for(date), entries(&[("10:00", "b")]));
        assert_eq!(collection.days().last().map(|d| d.date), Some(date));
        assert_eq!(collection.dates(), vec![date, other]);
    }

    #[test]
    fn test_missing_day_is_empty() {
        let collection = PersistedCollection::default();
        assert!(collection
            .entries_for(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .is_empty());
    }
}
