//! Wire-level data for the Kosa rules engine.
//!
//! Everything here is plain, serializable data: identifiers, the closed set of
//! domain enums, the [`Event`] log entries, the [`ActionOption`] commands and
//! the [`GameRecord`] save file. The engine itself lives in `kosa-core`.

mod command;
mod event;
mod ids;
mod record;
mod types;
mod units;
pub mod wire;

pub use crate::command::*;
pub use crate::event::*;
pub use crate::ids::*;
pub use crate::record::*;
pub use crate::types::*;
pub use crate::units::*;
pub use crate::wire::{
    deserialize_events, deserialize_events_json, deserialize_option_json, deserialize_record,
    deserialize_record_json, hash_bytes_fnv1a64, log_hash, serialize_events,
    serialize_events_json, serialize_option_json, serialize_record, serialize_record_json,
    WireError,
};
