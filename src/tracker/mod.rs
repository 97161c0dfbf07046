//! Explicit application state for the tracker. [state::reduce] is the only place state changes;
//! [Tracker] turns user actions into events and performs the storage I/O they require.

pub mod notice;
pub mod state;

use chrono::NaiveDate;
use notice::Notice;
use state::{reduce, TrackerEvent, TrackerState};
use tracing::{debug, error, instrument};

use crate::{
    error::TrackerResult,
    slots::TimeSlot,
    storage::{entry_store::EntryStore, kv_store::KeyValueStore},
};

/// Actions a front end can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerAction {
    SelectDate(NaiveDate),
    SelectStart(TimeSlot),
    SelectEnd(TimeSlot),
    EditSlot { slot: TimeSlot, text: String },
    Save,
}

/// Owns the tracker state and the store it's persisted to.
pub struct Tracker<S> {
    store: EntryStore<S>,
    state: TrackerState,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Loads persisted progress once and selects `date`.
    pub async fn open(store: EntryStore<S>, date: NaiveDate) -> TrackerResult<Self> {
        let collection = store.load().await?;
        let state = reduce(TrackerState::new(date), TrackerEvent::Loaded(collection));
        Ok(Self { store, state })
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Runs an action to completion. Only [TrackerAction::Save] produces a notice. A failed save
    /// leaves the state as it was and returns the error.
    #[instrument(skip(self))]
    pub async fn dispatch(&mut self, action: TrackerAction) -> TrackerResult<Option<Notice>> {
        let event = match action {
            TrackerAction::SelectDate(date) => TrackerEvent::DateSelected(date),
            TrackerAction::SelectStart(start) => TrackerEvent::StartSelected(start),
            TrackerAction::SelectEnd(end) => TrackerEvent::EndSelected(end),
            TrackerAction::EditSlot { slot, text } => TrackerEvent::SlotEdited { slot, text },
            TrackerAction::Save => {
                let saved = self
                    .store
                    .save(
                        &self.state.collection,
                        self.state.date,
                        self.state.entries.clone(),
                    )
                    .await
                    .inspect_err(|e| error!("Failed to save progress {e:?}"))?;
                self.apply(TrackerEvent::Saved(saved));
                return Ok(Some(Notice::saved()));
            }
        };
        self.apply(event);
        Ok(None)
    }

    fn apply(&mut self, event: TrackerEvent) {
        debug!("Applying {event:?}");
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use anyhow::Result;
    use chrono::NaiveDate;

    use crate::{
        error::TrackerError,
        slots::TimeSlot,
        storage::{
            entry_store::{CorruptDataPolicy, EntryStore, PROGRESS_KEY},
            kv_store::{KeyValueStore, MemoryKeyValueStore, MockKeyValueStore},
        },
        utils::logging::TEST_LOGGING,
    };

    use super::{notice::NoticeKind, Tracker, TrackerAction};

    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2018, 7, 4).unwrap();

    fn slot(label: &str) -> TimeSlot {
        label.parse().unwrap()
    }

    fn edit(label: &str, text: &str) -> TrackerAction {
        TrackerAction::EditSlot {
            slot: slot(label),
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn test_edit_save_reopen() -> Result<()> {
        *TEST_LOGGING;
        let backing = MemoryKeyValueStore::new();

        let mut tracker =
            Tracker::open(EntryStore::new(&backing, CorruptDataPolicy::Fail), TEST_DATE).await?;
        tracker.dispatch(edit("09:00", "inbox zero")).await?;
        tracker.dispatch(edit("13:00", "lunch")).await?;
        let notice = tracker.dispatch(TrackerAction::Save).await?;
        assert_eq!(notice.map(|n| n.kind), Some(NoticeKind::Success));

        let reopened =
            Tracker::open(EntryStore::new(&backing, CorruptDataPolicy::Fail), TEST_DATE).await?;
        let rows = reopened.state().rows();
        assert_eq!(rows[0], (slot("09:00"), "inbox zero"));
        assert_eq!(rows[4], (slot("13:00"), "lunch"));
        Ok(())
    }

    #[tokio::test]
    async fn test_saves_each_day() -> Result<()> {
        let backing = MemoryKeyValueStore::new();
        let mut tracker =
            Tracker::open(EntryStore::new(&backing, CorruptDataPolicy::Fail), TEST_DATE).await?;

        tracker.dispatch(edit("09:00", "a")).await?;
        tracker.dispatch(TrackerAction::Save).await?;

        let other = NaiveDate::from_ymd_opt(2018, 7, 5).unwrap();
        tracker.dispatch(TrackerAction::SelectDate(other)).await?;
        tracker.dispatch(edit("10:00", "b")).await?;
        tracker.dispatch(TrackerAction::Save).await?;

        let stored = backing.get(PROGRESS_KEY).await?.unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&stored)?;
        assert_eq!(
            value,
            serde_json::json!([
                { "date": "2018-07-04", "entries": { "09:00": "a" } },
                { "date": "2018-07-05", "entries": { "10:00": "b" } }
            ])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_save_keeps_state() -> Result<()> {
        let mut backing = MockKeyValueStore::new();
        backing.expect_get().returning(|_| Ok(None));
        backing.expect_set().returning(|key, _| {
            Err(TrackerError::storage(
                key,
                io::Error::new(io::ErrorKind::StorageFull, "quota exceeded"),
            ))
        });

        let mut tracker =
            Tracker::open(EntryStore::new(backing, CorruptDataPolicy::Fail), TEST_DATE).await?;
        tracker.dispatch(edit("09:00", "unsaved")).await?;
        let before = tracker.state().clone();

        let result = tracker.dispatch(TrackerAction::Save).await;
        assert!(matches!(result, Err(TrackerError::Storage { .. })));
        assert_eq!(tracker.state(), &before);
        assert!(tracker.state().collection.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_open_fails_on_corrupt_data() -> Result<()> {
        let backing = MemoryKeyValueStore::new();
        backing.set(PROGRESS_KEY, "[{\"date\": 12}]").await?;

        let result =
            Tracker::open(EntryStore::new(&backing, CorruptDataPolicy::Fail), TEST_DATE).await;
        assert!(matches!(result, Err(TrackerError::Deserialization { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_range_selection() -> Result<()> {
        let mut tracker = Tracker::open(
            EntryStore::new(MemoryKeyValueStore::new(), CorruptDataPolicy::Fail),
            TEST_DATE,
        )
        .await?;

        tracker
            .dispatch(TrackerAction::SelectEnd(slot("08:00")))
            .await?;
        assert!(tracker.state().slots.is_empty());

        tracker
            .dispatch(TrackerAction::SelectStart(slot("06:00")))
            .await?;
        assert_eq!(tracker.state().slots.len(), 3);
        Ok(())
    }
}
