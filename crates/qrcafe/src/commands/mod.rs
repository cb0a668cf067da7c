//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod cafes;
pub mod categories;
pub mod config_cmd;
pub mod menu;
pub mod products;
pub mod util;

use qrcafe_core::AppContext;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Cafes(args) => cafes::handle(ctx, args, global).await,
        Command::Categories(args) => categories::handle(ctx, args, global).await,
        Command::Products(args) => products::handle(ctx, args, global).await,
        Command::Menu(args) => menu::handle(ctx, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
