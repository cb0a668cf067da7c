//! Cafe command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use qrcafe_core::{
    AppContext, Cafe, Command as CoreCommand, CommandResult, CreateCafeRequest, UpdateCafeRequest,
};

use crate::cli::{CafesArgs, CafesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CafeRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Order")]
    sort_order: i32,
}

impl From<&Cafe> for CafeRow {
    fn from(c: &Cafe) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            slug: c.slug.clone(),
            currency: c.currency.clone(),
            sort_order: c.sort_order,
        }
    }
}

fn detail(c: &Cafe, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", output::heading(&c.name, color));
    let _ = writeln!(out, "  ID:          {}", c.id);
    let _ = writeln!(out, "  Slug:        {}", c.slug);
    let _ = writeln!(out, "  Currency:    {}", c.currency);
    let _ = writeln!(out, "  Order:       {}", c.sort_order);
    let _ = writeln!(out, "  Description: {}", util::or_blank(c.description.as_deref()));
    let _ = writeln!(out, "  Logo:        {}", util::or_blank(c.logo_url.as_deref()));
    if let Some(created) = c.created_at {
        let _ = write!(
            out,
            "  Created:     {}",
            output::muted(&created.to_rfc3339(), color)
        );
    }
    out.trim_end().to_owned()
}

fn render_cafe(cafe: &Cafe, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        cafe,
        |c| detail(c, color),
        |c| c.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn written_cafe(result: CommandResult) -> Result<Cafe, CliError> {
    match result {
        CommandResult::Cafe { cafe, .. } => Ok(cafe),
        other => Err(CliError::Internal {
            message: format!("unexpected result for a cafe write: {other:?}"),
        }),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &AppContext, args: CafesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        CafesCommand::List => {
            let spinner = output::spinner("Loading cafes", global.quiet);
            let cafes = ctx.cafes().await;
            spinner.finish_and_clear();
            let cafes = cafes?;

            let out = output::render_list(
                global.output,
                cafes.as_slice(),
                |c| CafeRow::from(c),
                |c| c.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CafesCommand::Get { id } => {
            let cafe_id = util::id(&id, "id")?;
            let cafe = ctx
                .cafe(cafe_id)
                .await
                .map_err(|e| CliError::scoped(e, "cafe", &id, "cafes list"))?;
            render_cafe(&cafe, global)
        }

        CafesCommand::Create {
            name,
            slug,
            description,
            logo_url,
            currency,
        } => {
            let result = ctx
                .execute(CoreCommand::CreateCafe(CreateCafeRequest {
                    name,
                    slug,
                    description,
                    logo_url,
                    currency,
                }))
                .await?;
            util::warn_cache(&result, global.quiet);
            render_cafe(&written_cafe(result)?, global)
        }

        CafesCommand::Update {
            id,
            name,
            slug,
            description,
            logo_url,
            currency,
        } => {
            let cafe_id = util::id(&id, "id")?;
            let update = UpdateCafeRequest {
                name,
                slug,
                description,
                logo_url,
                currency,
            };
            let result = ctx
                .execute(CoreCommand::UpdateCafe {
                    id: cafe_id,
                    update,
                })
                .await
                .map_err(|e| CliError::scoped(e, "cafe", &id, "cafes list"))?;
            util::warn_cache(&result, global.quiet);
            render_cafe(&written_cafe(result)?, global)
        }

        CafesCommand::Delete { id } => {
            let cafe_id = util::id(&id, "id")?;
            if !util::confirm(
                &format!("Delete cafe {cafe_id} with all its categories and products?"),
                global.yes,
            )? {
                return Ok(());
            }
            let result = ctx
                .execute(CoreCommand::DeleteCafe { id: cafe_id })
                .await
                .map_err(|e| CliError::scoped(e, "cafe", &id, "cafes list"))?;
            util::warn_cache(&result, global.quiet);
            output::print_status(&format!("Cafe {cafe_id} deleted"), global.quiet);
            Ok(())
        }

        CafesCommand::Reorder(order) => {
            let current: Vec<i64> = ctx.cafes().await?.iter().map(|c| c.id).collect();
            let cafe_ids = util::reorder_ids(&current, &order)?;
            let result = ctx
                .execute(CoreCommand::ReorderCafes { cafe_ids })
                .await?;
            util::warn_cache(&result, global.quiet);
            output::print_status("Cafe order saved", global.quiet);
            Ok(())
        }
    }
}
