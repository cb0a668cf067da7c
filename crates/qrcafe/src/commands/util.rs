//! Shared helpers for command handlers.

use std::io::IsTerminal;

use qrcafe_core::{CommandResult, CoreError, move_item, parse_id};

use crate::cli::ReorderArgs;
use crate::error::CliError;
use crate::output;

/// Parse a positional or flag id, naming the flag on failure.
pub fn id(raw: &str, field: &str) -> Result<i64, CliError> {
    parse_id(raw).map_err(|e| match e {
        CoreError::Validation { message, .. } => CliError::Validation {
            field: field.into(),
            reason: message,
        },
        other => other.into(),
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// The id sequence a reorder should persist.
///
/// `--ids` is taken as-is. `--move ID --to POS` is applied to `current`
/// (the siblings in display order) with `move_item`.
pub fn reorder_ids(current: &[i64], args: &ReorderArgs) -> Result<Vec<i64>, CliError> {
    if let Some(ref ids) = args.ids {
        return Ok(ids.clone());
    }

    let (Some(move_id), Some(to)) = (args.move_id, args.to) else {
        return Err(CliError::Validation {
            field: "ids".into(),
            reason: "pass --ids or --move with --to".into(),
        });
    };

    let from = current
        .iter()
        .position(|id| *id == move_id)
        .ok_or_else(|| CliError::Validation {
            field: "move".into(),
            reason: format!("{move_id} is not in this list"),
        })?;

    Ok(move_item(current, from, to))
}

/// Surface a failed listing cache invalidation as a warning.
pub fn warn_cache(result: &CommandResult, quiet: bool) {
    if let Some(warning) = result.cache_warning() {
        output::print_status(&format!("warning: {warning}"), quiet);
    }
}

/// `value` or an empty cell.
pub fn or_blank(value: Option<&str>) -> String {
    value.unwrap_or_default().to_owned()
}
