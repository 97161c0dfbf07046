//!  Storage is organized through [entry_store::EntryStore] on top of a
//!  [kv_store::KeyValueStore].
//!  The basic idea is:
//!   - There is one fixed key holding every day of progress as a JSON array.
//!   - A day is replaced wholesale when saved, never merged.
//!   - The whole array is rewritten on every save.

pub mod entities;
pub mod entry_store;
pub mod kv_store;
