// Typed repositories, one per backend resource.
//
// Each repository composes a `ResourceClient` bound to its path prefix and a
// `SortService` for the reorder path. Listing calls return rows already in
// display order.

mod cafes;
mod categories;
mod menu;
mod products;

use std::collections::HashSet;

use serde_json::Value;

use crate::error::Error;

pub use cafes::CafeRepository;
pub use categories::CategoryRepository;
pub use menu::MenuRepository;
pub use products::ProductRepository;

/// Reject id lists the backend could not apply as one consistent order.
///
/// A reorder must name every sibling exactly once; an empty, non-positive or
/// duplicated list is refused before any network call.
pub(crate) fn validate_order(field: &str, ids: &[i64]) -> Result<(), Error> {
    if ids.is_empty() {
        return Err(Error::validation(field, "reorder needs at least one id"));
    }
    if let Some(bad) = ids.iter().find(|id| **id <= 0) {
        return Err(Error::validation(field, format!("invalid id {bad}")));
    }
    let mut seen = HashSet::with_capacity(ids.len());
    if let Some(dup) = ids.iter().find(|id| !seen.insert(**id)) {
        return Err(Error::validation(field, format!("duplicate id {dup}")));
    }
    Ok(())
}

/// Read the boolean success indicator returned by a sort endpoint.
///
/// Accepts a bare boolean, an envelope (`{ success, data }`), or an empty body.
pub(crate) fn reorder_succeeded(value: &Value) -> Result<bool, Error> {
    match value {
        Value::Bool(ok) => Ok(*ok),
        Value::Null => Ok(true),
        Value::Object(map) => {
            let success = map.get("success").and_then(Value::as_bool).unwrap_or(true);
            if !success {
                return Err(Error::Http {
                    status: 200,
                    message: map
                        .get("error")
                        .and_then(Value::as_str)
                        .unwrap_or("sort order update rejected")
                        .to_owned(),
                    details: map.get("details").cloned(),
                });
            }
            Ok(map.get("data").and_then(Value::as_bool).unwrap_or(true))
        }
        other => Err(Error::Deserialization {
            message: "unexpected sort order response".into(),
            body: other.to_string(),
        }),
    }
}
