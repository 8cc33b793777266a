//! Decode unit sources into message fragments

use crate::error::ExtractorError;
use serde_json::Value;
use sift_domain::WorkUnit;

/// Field of a fragment object that carries its text
pub const MESSAGE_FIELD: &str = "message";

/// Decode the unit source into its fragment texts, in order
///
/// The source must be a JSON array of objects, each with a string
/// `message` field. Other fields are ignored.
pub fn parse_fragments(unit: &WorkUnit) -> Result<Vec<String>, ExtractorError> {
    let json: Value = serde_json::from_str(&unit.source)
        .map_err(|e| ExtractorError::malformed(&unit.id, format!("JSON parse error: {}", e)))?;

    let items = json
        .as_array()
        .ok_or_else(|| ExtractorError::malformed(&unit.id, "Expected JSON array of fragments"))?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            item.as_object()
                .and_then(|obj| obj.get(MESSAGE_FIELD))
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    ExtractorError::malformed(
                        &unit.id,
                        format!("Fragment {} has no string '{}' field", idx, MESSAGE_FIELD),
                    )
                })
        })
        .collect()
}

/// Join the unit's fragment texts in order with no separator
pub fn extract_text(unit: &WorkUnit) -> Result<String, ExtractorError> {
    Ok(parse_fragments(unit)?.concat())
}
