//! Public menu handler: what a guest sees after scanning the QR code.

use std::fmt::Write as _;

use tabled::Tabled;

use qrcafe_core::{AppContext, Product, PublicMenu, format_price};

use crate::cli::{GlobalOpts, MenuArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct MenuItemRow {
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl MenuItemRow {
    fn new(p: &Product, currency: &str) -> Self {
        Self {
            name: p.name.clone(),
            price: format_price(p.price, currency),
            description: p.description.clone().unwrap_or_default(),
        }
    }
}

fn render_menu(menu: &PublicMenu, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", output::heading(&menu.cafe.name, color));
    if let Some(ref description) = menu.cafe.description {
        let _ = writeln!(out, "{}", output::muted(description, color));
    }

    if menu.sections.is_empty() {
        let _ = write!(out, "\n{}", output::muted("(no items yet)", color));
        return out;
    }

    for section in &menu.sections {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", output::heading(&section.category.name, color));
        let rows: Vec<MenuItemRow> = section
            .products
            .iter()
            .map(|p| MenuItemRow::new(p, &menu.cafe.currency))
            .collect();
        let _ = writeln!(out, "{}", output::render_table(&rows));
    }
    out.trim_end().to_owned()
}

pub async fn handle(ctx: &AppContext, args: MenuArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let spinner = output::spinner("Loading menu", global.quiet);
    let menu = ctx.public_menu(&args.slug).await;
    spinner.finish_and_clear();
    let menu = menu.map_err(|e| CliError::scoped(e, "menu", &args.slug, "cafes list"))?;

    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        menu.as_ref(),
        |m| render_menu(m, color),
        |m| {
            m.sections
                .iter()
                .flat_map(|s| s.products.iter().map(|p| p.id.to_string()))
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
