//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! JSON uses camelCase keys to match the mobile client.

use serde::{Deserialize, Deserializer};

pub mod note;
pub mod notebook;

/// Deserialize a present field into `Some(value)`, keeping `null` as
/// `Some(None)`. Paired with `#[serde(default)]`, an absent field stays
/// `None`, so callers can tell "leave unchanged" from "clear".
pub(crate) fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
