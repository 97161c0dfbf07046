use chrono::NaiveDate;

use crate::{
    slots::TimeSlot,
    storage::entities::{PersistedCollection, SlotEntries},
};

pub const DEFAULT_START: TimeSlot = TimeSlot::on_the_hour(9);
pub const DEFAULT_END: TimeSlot = TimeSlot::on_the_hour(17);

/// Everything a front end needs to render the tracker. `slots` and `entries` are derived and only
/// ever recomputed by [reduce].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerState {
    pub date: NaiveDate,
    pub start: TimeSlot,
    pub end: TimeSlot,
    /// Visible slots for `start..=end`.
    pub slots: Vec<TimeSlot>,
    /// Edit buffer for `date`. Only written to storage on save.
    pub entries: SlotEntries,
    pub collection: PersistedCollection,
}

impl TrackerState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            start: DEFAULT_START,
            end: DEFAULT_END,
            slots: TimeSlot::range(DEFAULT_START, DEFAULT_END),
            entries: SlotEntries::new(),
            collection: PersistedCollection::default(),
        }
    }

    /// Visible slots paired with their current text.
    pub fn rows(&self) -> Vec<(TimeSlot, &str)> {
        self.slots
            .iter()
            .map(|slot| {
                let text = self
                    .entries
                    .get(&slot.to_string())
                    .map(String::as_str)
                    .unwrap_or("");
                (*slot, text)
            })
            .collect()
    }
}

impl Default for TrackerState {
    /// Starts at the epoch date, front ends are expected to select a real one.
    fn default() -> Self {
        Self::new(NaiveDate::default())
    }
}

/// Something that happened to the tracker. Storage results arrive as events too, so [reduce]
/// never performs I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    Loaded(PersistedCollection),
    DateSelected(NaiveDate),
    StartSelected(TimeSlot),
    EndSelected(TimeSlot),
    SlotEdited { slot: TimeSlot, text: String },
    Saved(PersistedCollection),
}

/// Applies an event and recomputes derived state.
pub fn reduce(mut state: TrackerState, event: TrackerEvent) -> TrackerState {
    match event {
        TrackerEvent::Loaded(collection) | TrackerEvent::Saved(collection) => {
            state.entries = collection.entries_for(state.date);
            state.collection = collection;
        }
        TrackerEvent::DateSelected(date) => {
            // Unsaved edits for the previous date are dropped.
            state.date = date;
            state.entries = state.collection.entries_for(date);
        }
        TrackerEvent::StartSelected(start) => {
            state.start = start;
            state.slots = TimeSlot::range(state.start, state.end);
        }
        TrackerEvent::EndSelected(end) => {
            state.end = end;
            state.slots = TimeSlot::range(state.start, state.end);
        }
        TrackerEvent::SlotEdited { slot, text } => {
            state.entries.insert(slot.to_string(), text);
        }
    }
    state
}
