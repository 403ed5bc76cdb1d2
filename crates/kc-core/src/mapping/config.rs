use std::collections::BTreeMap;

use super::MAX_KEY_LEN;

#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("JSON parse error: {0}")]
    Parse(String),
    #[error("mapping table is empty")]
    Empty,
    #[error("empty key")]
    EmptyKey,
    #[error("key longer than {MAX_KEY_LEN} chars: {0}")]
    KeyTooLong(String),
    #[error("empty value for key: {0}")]
    EmptyValue(String),
}

/// Parse a flat JSON object into a sorted `BTreeMap<key, replacement>`.
pub fn parse_mapping_json(json: &str) -> Result<BTreeMap<String, String>, MappingError> {
    let map: BTreeMap<String, String> =
        serde_json::from_str(json).map_err(|e| MappingError::Parse(e.to_string()))?;
    validate(&map)?;
    Ok(map)
}

pub(super) fn validate(map: &BTreeMap<String, String>) -> Result<(), MappingError> {
    if map.is_empty() {
        return Err(MappingError::Empty);
    }

    for (key, value) in map {
        if key.is_empty() {
            return Err(MappingError::EmptyKey);
        }
        if key.chars().count() > MAX_KEY_LEN {
            return Err(MappingError::KeyTooLong(key.clone()));
        }
        if value.is_empty() {
            return Err(MappingError::EmptyValue(key.clone()));
        }
    }

    Ok(())
}
