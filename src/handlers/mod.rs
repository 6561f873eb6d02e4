pub mod auth;
pub mod events;
pub mod musicians;
pub mod songs;

use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes "absent" (outer None) from
/// "explicitly null" (Some(None)). Use with #[serde(default)].
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}
