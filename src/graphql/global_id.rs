//! Relay global IDs: `base64("TypeName:pk")`.

use async_graphql::{Result, ID};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::graphql::errors::StructuredError;

pub fn to_global_id(type_name: &str, pk: i32) -> ID {
    ID(STANDARD.encode(format!("{}:{}", type_name, pk)))
}

/// Splits a global ID into its type name and primary key.
pub fn from_global_id(id: &str) -> Option<(String, i32)> {
    let decoded = STANDARD.decode(id.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (type_name, pk) = decoded.split_once(':')?;
    if type_name.is_empty() {
        return None;
    }
    let pk = pk.parse().ok()?;
    Some((type_name.to_string(), pk))
}

/// Decodes `id` for the input field `field`, which must point at `expected` nodes.
pub fn decode_id(id: &ID, expected: &str, field: &str) -> Result<i32> {
    match from_global_id(id.as_str()) {
        Some((type_name, pk)) if type_name == expected => Ok(pk),
        Some((type_name, _)) => Err(StructuredError::validation(
            field,
            format!("expected a {} id, got a {} id", expected, type_name),
        )),
        None => Err(StructuredError::validation(
            field,
            format!("'{}' is not a valid global id", id.as_str()),
        )),
    }
}

pub fn decode_optional_id(id: Option<&ID>, expected: &str, field: &str) -> Result<Option<i32>> {
    id.map(|id| decode_id(id, expected, field)).transpose()
}

pub fn decode_ids(ids: &[ID], expected: &str, field: &str) -> Result<Vec<i32>> {
    ids.iter().map(|id| decode_id(id, expected, field)).collect()
}
