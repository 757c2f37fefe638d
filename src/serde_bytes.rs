//! Serde helpers for byte fields
//!
//! Keeps the on-disk JSON shapes readable: binary fields serialize as
//! base64 strings.

use serde::{Deserialize, Deserializer, Serializer};

/// Serialize/deserialize Vec<u8> as a base64 string
pub mod base64vec {
    use super::*;
    use base64::Engine;

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(s.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
