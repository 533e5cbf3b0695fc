//! Serde helpers for partial-update payloads.
//!
//! JSON distinguishes three states for an object key: absent, present as
//! `null`, and present with a value. Plain `Option<T>` collapses the first
//! two, so update DTOs use `Option<Option<T>>` together with [`present`].

use serde::{Deserialize, Deserializer};

/// Deserialize a key that was present in the payload.
///
/// Combine with `#[serde(default)]` so a missing key stays `None`:
///
/// ```ignore
/// #[serde(default, deserialize_with = "present")]
/// pub name: Option<Option<String>>,
/// ```
///
/// - absent -> `None`
/// - `null` -> `Some(None)`
/// - value  -> `Some(Some(value))`
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
