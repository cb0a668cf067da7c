//! Product command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use qrcafe_core::{
    AppContext, Command as CoreCommand, CommandResult, CreateProductRequest, Price, Product,
    UpdateProductRequest, format_price,
};

use crate::cli::{GlobalOpts, OutputFormat, ProductsArgs, ProductsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const LIST_COMMAND: &str = "products list --category <CATEGORY_ID>";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Available")]
    available: &'static str,
    #[tabled(rename = "Order")]
    sort_order: i32,
}

impl ProductRow {
    fn new(p: &Product, currency: Option<&str>) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            price: show_price(p.price, currency),
            available: if p.is_available { "yes" } else { "no" },
            sort_order: p.sort_order,
        }
    }
}

fn show_price(price: Price, currency: Option<&str>) -> String {
    match currency {
        Some(code) => format_price(price, code),
        None => price.to_string(),
    }
}

fn detail(p: &Product, currency: Option<&str>, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", output::heading(&p.name, color));
    let _ = writeln!(out, "  ID:          {}", p.id);
    let _ = writeln!(out, "  Category:    {}", p.category_id);
    let _ = writeln!(out, "  Price:       {}", show_price(p.price, currency));
    let _ = writeln!(out, "  Available:   {}", if p.is_available { "yes" } else { "no" });
    let _ = writeln!(out, "  Order:       {}", p.sort_order);
    let _ = writeln!(out, "  Description: {}", util::or_blank(p.description.as_deref()));
    let _ = write!(out, "  Image:       {}", util::or_blank(p.image_url.as_deref()));
    out
}

/// Currency of the cafe owning `category_id`, for table output only.
/// Best effort: a failed lookup falls back to bare amounts.
async fn currency_of(ctx: &AppContext, category_id: i64, format: OutputFormat) -> Option<String> {
    if format != OutputFormat::Table {
        return None;
    }
    let category = ctx.category(category_id).await.ok()?;
    let cafe = ctx.cafe(category.cafe_id).await.ok()?;
    Some(cafe.currency.clone())
}

async fn render_product(
    ctx: &AppContext,
    product: &Product,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let currency = currency_of(ctx, product.category_id, global.output).await;
    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        product,
        |p| detail(p, currency.as_deref(), color),
        |p| p.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn written_product(result: CommandResult) -> Result<Product, CliError> {
    match result {
        CommandResult::Product(product) => Ok(product),
        other => Err(CliError::Internal {
            message: format!("unexpected result for a product write: {other:?}"),
        }),
    }
}

fn parse_price(raw: &str) -> Result<Price, CliError> {
    Price::parse(raw).ok_or_else(|| CliError::Validation {
        field: "price".into(),
        reason: format!("'{raw}' is not an amount like 3.50"),
    })
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    ctx: &AppContext,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProductsCommand::List { category } => {
            let category_id = util::id(&category, "category")?;
            let spinner = output::spinner("Loading products", global.quiet);
            let products = ctx.products(category_id).await;
            spinner.finish_and_clear();
            let products = products.map_err(|e| {
                CliError::scoped(e, "category", &category, "categories list --cafe <CAFE_ID>")
            })?;

            let currency = currency_of(ctx, category_id, global.output).await;
            let out = output::render_list(
                global.output,
                products.as_slice(),
                |p| ProductRow::new(p, currency.as_deref()),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Get { id } => {
            let product_id = util::id(&id, "id")?;
            let product = ctx
                .product(product_id)
                .await
                .map_err(|e| CliError::scoped(e, "product", &id, LIST_COMMAND))?;
            render_product(ctx, &product, global).await
        }

        ProductsCommand::Create {
            category,
            name,
            price,
            description,
            image_url,
            unavailable,
        } => {
            let category_id = util::id(&category, "category")?;
            let request = CreateProductRequest {
                category_id,
                name,
                price: parse_price(&price)?,
                description,
                image_url,
                is_available: !unavailable,
            };
            let result = ctx.execute(CoreCommand::CreateProduct(request)).await?;
            render_product(ctx, &written_product(result)?, global).await
        }

        ProductsCommand::Update {
            id,
            name,
            price,
            description,
            image_url,
            available,
        } => {
            let product_id = util::id(&id, "id")?;
            let update = UpdateProductRequest {
                name,
                price: price.as_deref().map(parse_price).transpose()?,
                description,
                image_url,
                is_available: available,
            };
            let result = ctx
                .execute(CoreCommand::UpdateProduct {
                    id: product_id,
                    update,
                })
                .await
                .map_err(|e| CliError::scoped(e, "product", &id, LIST_COMMAND))?;
            render_product(ctx, &written_product(result)?, global).await
        }

        ProductsCommand::Delete { id } => {
            let product_id = util::id(&id, "id")?;
            if !util::confirm(&format!("Delete product {product_id}?"), global.yes)? {
                return Ok(());
            }
            ctx.execute(CoreCommand::DeleteProduct { id: product_id })
                .await
                .map_err(|e| CliError::scoped(e, "product", &id, LIST_COMMAND))?;
            output::print_status(&format!("Product {product_id} deleted"), global.quiet);
            Ok(())
        }

        ProductsCommand::Reorder { category, order } => {
            let category_id = util::id(&category, "category")?;
            let current: Vec<i64> = ctx
                .products(category_id)
                .await?
                .iter()
                .map(|p| p.id)
                .collect();
            let product_ids = util::reorder_ids(&current, &order)?;
            ctx.execute(CoreCommand::ReorderProducts {
                category_id,
                product_ids,
            })
            .await?;
            output::print_status("Product order saved", global.quiet);
            Ok(())
        }
    }
}
