use rmp_serde::{decode, encode};
use thiserror::Error;

use crate::{ActionOption, Event, GameRecord};

#[derive(Debug, Error)]
pub enum WireError {
    #[error("encode error: {0}")]
    Encode(#[from] encode::Error),
    #[error("decode error: {0}")]
    Decode(#[from] decode::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

// MessagePack keeps field names so tagged enums decode the same way as JSON.

pub fn serialize_events(events: &[Event]) -> Result<Vec<u8>, WireError> {
    Ok(encode::to_vec_named(events)?)
}

pub fn deserialize_events(bytes: &[u8]) -> Result<Vec<Event>, WireError> {
    Ok(decode::from_slice(bytes)?)
}

pub fn serialize_record(record: &GameRecord) -> Result<Vec<u8>, WireError> {
    Ok(encode::to_vec_named(record)?)
}

pub fn deserialize_record(bytes: &[u8]) -> Result<GameRecord, WireError> {
    Ok(decode::from_slice(bytes)?)
}

pub fn serialize_events_json(events: &[Event]) -> Result<String, WireError> {
    Ok(serde_json::to_string(events)?)
}

pub fn deserialize_events_json(json: &str) -> Result<Vec<Event>, WireError> {
    Ok(serde_json::from_str(json)?)
}

pub fn serialize_record_json(record: &GameRecord) -> Result<String, WireError> {
    Ok(serde_json::to_string_pretty(record)?)
}

pub fn deserialize_record_json(json: &str) -> Result<GameRecord, WireError> {
    Ok(serde_json::from_str(json)?)
}

pub fn serialize_option_json(option: &ActionOption) -> Result<String, WireError> {
    Ok(serde_json::to_string(option)?)
}

pub fn deserialize_option_json(json: &str) -> Result<ActionOption, WireError> {
    Ok(serde_json::from_str(json)?)
}

/// Stable digest of an event log, for comparing two copies of the same session.
pub fn log_hash(events: &[Event]) -> Result<u64, WireError> {
    let bytes = serialize_events(events)?;
    Ok(hash_bytes_fnv1a64(&bytes))
}

/// Deterministic, stable 64-bit hash for raw bytes (FNV-1a).
pub fn hash_bytes_fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    let mut hash = OFFSET_BASIS;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
