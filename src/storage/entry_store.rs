use std::fmt::Display;

use chrono::NaiveDate;
use clap::ValueEnum;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{TrackerError, TrackerResult},
    utils::time::date_to_key,
};

use super::{
    entities::{PersistedCollection, SlotEntries},
    kv_store::KeyValueStore,
};

/// The single key every day of progress is stored under.
pub const PROGRESS_KEY: &str = "progressEntries";

/// What [EntryStore::load] does when the stored collection can't be parsed.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum CorruptDataPolicy {
    /// Surface [TrackerError::Deserialization] to the caller.
    #[default]
    Fail,
    /// Log a warning and start from an empty collection. The corrupt value is overwritten by the
    /// next save.
    Reset,
}

impl Display for CorruptDataPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorruptDataPolicy::Fail => write!(f, "fail"),
            CorruptDataPolicy::Reset => write!(f, "reset"),
        }
    }
}

/// Maps calendar dates to their slot notes on top of a [KeyValueStore]. The whole collection is
/// read once and rewritten on every save.
pub struct EntryStore<S> {
    store: S,
    policy: CorruptDataPolicy,
}

impl<S: KeyValueStore> EntryStore<S> {
    pub fn new(store: S, policy: CorruptDataPolicy) -> Self {
        Self { store, policy }
    }

    /// Reads the persisted collection. Nothing stored yet, or a blank value, means an empty
    /// collection.
    #[instrument(skip(self))]
    pub async fn load(&self) -> TrackerResult<PersistedCollection> {
        let stored = self.store.get(PROGRESS_KEY).await?;
        let Some(raw) = stored.filter(|raw| !raw.trim().is_empty()) else {
            debug!("Nothing stored under {PROGRESS_KEY}");
            return Ok(PersistedCollection::default());
        };

        match serde_json::from_str::<PersistedCollection>(&raw) {
            Ok(collection) => {
                debug!("Loaded {} days of progress", collection.len());
                Ok(collection)
            }
            Err(e) => match self.policy {
                CorruptDataPolicy::Fail => Err(TrackerError::Deserialization {
                    key: PROGRESS_KEY.to_owned(),
                    source: e,
                }),
                CorruptDataPolicy::Reset => {
                    warn!("Stored progress is corrupt, starting empty: {e}");
                    Ok(PersistedCollection::default())
                }
            },
        }
    }

    /// Replaces the notes for `date`, persists the whole collection and returns it. The passed
    /// collection is left untouched, so a failed write changes nothing.
    #[instrument(skip_all, fields(date = %date_to_key(date)))]
    pub async fn save(
        &self,
        collection: &PersistedCollection,
        date: NaiveDate,
        entries: SlotEntries,
    ) -> TrackerResult<PersistedCollection> {
        let updated = collection.clone().with_day(date, entries);
        let raw = serde_json::to_string(&updated)
            .map_err(|e| TrackerError::storage(PROGRESS_KEY, e.into()))?;
        self.store.set(PROGRESS_KEY, &raw).await?;
        info!("Saved progress, {} days stored", updated.len());
        Ok(updated)
    }
}
