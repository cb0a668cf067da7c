//! Category command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use qrcafe_core::{
    AppContext, Category, Command as CoreCommand, CommandResult, CreateCategoryRequest,
    UpdateCategoryRequest,
};

use crate::cli::{CategoriesArgs, CategoriesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

const LIST_COMMAND: &str = "categories list --cafe <CAFE_ID>";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Order")]
    sort_order: i32,
}

impl From<&Category> for CategoryRow {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            description: util::or_blank(c.description.as_deref()),
            sort_order: c.sort_order,
        }
    }
}

fn detail(c: &Category, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", output::heading(&c.name, color));
    let _ = writeln!(out, "  ID:          {}", c.id);
    let _ = writeln!(out, "  Cafe:        {}", c.cafe_id);
    let _ = writeln!(out, "  Order:       {}", c.sort_order);
    let _ = write!(out, "  Description: {}", util::or_blank(c.description.as_deref()));
    out
}

fn render_category(category: &Category, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        category,
        |c| detail(c, color),
        |c| c.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn written_category(result: CommandResult) -> Result<Category, CliError> {
    match result {
        CommandResult::Category(category) => Ok(category),
        other => Err(CliError::Internal {
            message: format!("unexpected result for a category write: {other:?}"),
        }),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: CategoriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CategoriesCommand::List { cafe } => {
            let cafe_id = util::id(&cafe, "cafe")?;
            let spinner = output::spinner("Loading categories", global.quiet);
            let categories = ctx.categories(cafe_id).await;
            spinner.finish_and_clear();
            let categories = categories.map_err(|e| CliError::scoped(e, "cafe", &cafe, "cafes list"))?;

            let out = output::render_list(
                global.output,
                categories.as_slice(),
                |c| CategoryRow::from(c),
                |c| c.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CategoriesCommand::Get { id } => {
            let category_id = util::id(&id, "id")?;
            let category = ctx
                .category(category_id)
                .await
                .map_err(|e| CliError::scoped(e, "category", &id, LIST_COMMAND))?;
            render_category(&category, global)
        }

        CategoriesCommand::Create {
            cafe,
            name,
            description,
        } => {
            let cafe_id = util::id(&cafe, "cafe")?;
            let result = ctx
                .execute(CoreCommand::CreateCategory(CreateCategoryRequest {
                    cafe_id,
                    name,
                    description,
                }))
                .await?;
            render_category(&written_category(result)?, global)
        }

        CategoriesCommand::Update {
            id,
            name,
            description,
        } => {
            let category_id = util::id(&id, "id")?;
            let result = ctx
                .execute(CoreCommand::UpdateCategory {
                    id: category_id,
                    update: UpdateCategoryRequest { name, description },
                })
                .await
                .map_err(|e| CliError::scoped(e, "category", &id, LIST_COMMAND))?;
            render_category(&written_category(result)?, global)
        }

        CategoriesCommand::Delete { id } => {
            let category_id = util::id(&id, "id")?;
            if !util::confirm(
                &format!("Delete category {category_id} and its products?"),
                global.yes,
            )? {
                return Ok(());
            }
            ctx.execute(CoreCommand::DeleteCategory { id: category_id })
                .await
                .map_err(|e| CliError::scoped(e, "category", &id, LIST_COMMAND))?;
            output::print_status(&format!("Category {category_id} deleted"), global.quiet);
            Ok(())
        }

        CategoriesCommand::Reorder { cafe, order } => {
            let cafe_id = util::id(&cafe, "cafe")?;
            let current: Vec<i64> = ctx.categories(cafe_id).await?.iter().map(|c| c.id).collect();
            let category_ids = util::reorder_ids(&current, &order)?;
            ctx.execute(CoreCommand::ReorderCategories {
                cafe_id,
                category_ids,
            })
            .await?;
            output::print_status("Category order saved", global.quiet);
            Ok(())
        }
    }
}
