// ── Display helpers ──

use crate::model::Price;

/// URL-safe slug for a cafe name (`"Blue Door Café"` → `"blue-door-cafe"`).
pub fn slugify(name: &str) -> String {
    slug::slugify(name)
}

/// Render a price with its currency: a symbol for common codes, the ISO code
/// as suffix otherwise.
pub fn format_price(price: Price, currency: &str) -> String {
    let code = currency.trim().to_ascii_uppercase();
    let symbol = match code.as_str() {
        "USD" | "CAD" | "AUD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "TRY" => Some("₺"),
        "INR" => Some("₹"),
        _ => None,
    };

    match symbol {
        Some(symbol) if price.is_negative() => {
            format!("-{symbol}{}", Price::from_minor(-price.minor()))
        }
        Some(symbol) => format!("{symbol}{price}"),
        None if code.is_empty() => price.to_string(),
        None => format!("{price} {code}"),
    }
}
