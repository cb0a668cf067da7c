// Identifier parsing for path and CLI input.

use crate::error::Error;

/// Parse a positive integer identifier.
///
/// Rejects anything that is not a base-10 integer greater than zero, so a
/// malformed id never reaches the backend.
pub fn parse_numeric_id(raw: &str) -> Result<i64, Error> {
    let trimmed = raw.trim();
    let id: i64 = trimmed
        .parse()
        .map_err(|_| Error::validation("id", format!("'{raw}' is not a numeric id")))?;

    if id <= 0 {
        return Err(Error::validation(
            "id",
            format!("'{raw}' must be greater than zero"),
        ));
    }

    Ok(id)
}
