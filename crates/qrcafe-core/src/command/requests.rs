// ── Typed request structs for Command payloads ──
//
// Each request validates itself and turns into the matching wire body.
// Update bodies never carry `sort_order`; only the reorder commands move
// things.

use qrcafe_api::{
    CafeCreate, CafeUpdate, CategoryCreate, CategoryUpdate, ProductCreate, ProductUpdate,
};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::format::slugify;
use crate::model::Price;

// ── Cafe ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCafeRequest {
    pub name: String,
    /// Derived from `name` when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl CreateCafeRequest {
    pub(crate) fn into_body(self, owner_id: i64) -> Result<CafeCreate, CoreError> {
        let name = required_name(&self.name)?;
        let slug = match self.slug {
            Some(slug) => checked_slug(&slug)?,
            None => checked_slug(&slugify(&name))?,
        };
        Ok(CafeCreate {
            owner_id,
            name,
            slug,
            description: self.description,
            logo_url: self.logo_url,
            currency: self.currency.map(|c| c.trim().to_ascii_uppercase()),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCafeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl UpdateCafeRequest {
    pub(crate) fn into_body(self, id: i64) -> Result<CafeUpdate, CoreError> {
        Ok(CafeUpdate {
            id,
            name: self.name.as_deref().map(required_name).transpose()?,
            slug: self.slug.as_deref().map(checked_slug).transpose()?,
            description: self.description,
            logo_url: self.logo_url,
            currency: self.currency.map(|c| c.trim().to_ascii_uppercase()),
        })
    }
}

// ── Category ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub cafe_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateCategoryRequest {
    pub(crate) fn into_body(self) -> Result<CategoryCreate, CoreError> {
        Ok(CategoryCreate {
            cafe_id: self.cafe_id,
            name: required_name(&self.name)?,
            description: self.description,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateCategoryRequest {
    pub(crate) fn into_body(self, id: i64) -> Result<CategoryUpdate, CoreError> {
        Ok(CategoryUpdate {
            id,
            name: self.name.as_deref().map(required_name).transpose()?,
            description: self.description,
        })
    }
}

// ── Product ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub category_id: i64,
    pub name: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_available: bool,
}

impl CreateProductRequest {
    pub(crate) fn into_body(self) -> Result<ProductCreate, CoreError> {
        Ok(ProductCreate {
            category_id: self.category_id,
            name: required_name(&self.name)?,
            price: checked_price(self.price)?,
            description: self.description,
            image_url: self.image_url,
            is_available: Some(self.is_available),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

impl UpdateProductRequest {
    pub(crate) fn into_body(self, id: i64) -> Result<ProductUpdate, CoreError> {
        Ok(ProductUpdate {
            id,
            name: self.name.as_deref().map(required_name).transpose()?,
            price: self.price.map(checked_price).transpose()?,
            description: self.description,
            image_url: self.image_url,
            is_available: self.is_available,
        })
    }
}

// ── Field checks ───────────────────────────────────────────────────

fn required_name(raw: &str) -> Result<String, CoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CoreError::validation("name", "must not be empty"));
    }
    Ok(name.to_owned())
}

fn checked_slug(raw: &str) -> Result<String, CoreError> {
    let slug = raw.trim();
    let valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        return Err(CoreError::validation(
            "slug",
            format!("'{raw}' must be lowercase letters, digits and dashes"),
        ));
    }
    Ok(slug.to_owned())
}

fn checked_price(price: Price) -> Result<f64, CoreError> {
    if price.is_negative() {
        return Err(CoreError::validation("price", "must not be negative"));
    }
    Ok(price.to_decimal())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cafe_slug_derived_from_name() {
        let body = CreateCafeRequest {
            name: "  Blue Door Café ".into(),
            currency: Some("eur".into()),
            ..CreateCafeRequest::default()
        }
        .into_body(5)
        .unwrap();
        assert_eq!(body.name, "Blue Door Café");
        assert_eq!(body.slug, "blue-door-cafe");
        assert_eq!(body.currency.as_deref(), Some("EUR"));
        assert_eq!(body.owner_id, 5);
    }

    #[test]
    fn bad_slug_rejected() {
        let err = CreateCafeRequest {
            name: "Blue Door".into(),
            slug: Some("Blue Door".into()),
            ..CreateCafeRequest::default()
        }
        .into_body(5)
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "slug"));
    }

    #[test]
    fn empty_names_rejected() {
        assert!(
            CreateCategoryRequest {
                cafe_id: 1,
                name: "   ".into(),
                description: None,
            }
            .into_body()
            .is_err()
        );
        assert!(
            UpdateProductRequest {
                name: Some(String::new()),
                ..UpdateProductRequest::default()
            }
            .into_body(3)
            .is_err()
        );
    }

    #[test]
    fn product_price_goes_out_as_decimal() {
        let body = CreateProductRequest {
            category_id: 4,
            name: "Latte".into(),
            price: Price::from_minor(350),
            description: None,
            image_url: None,
            is_available: true,
        }
        .into_body()
        .unwrap();
        assert!((body.price - 3.5).abs() < f64::EPSILON);

        let err = UpdateProductRequest {
            price: Some(Price::from_minor(-1)),
            ..UpdateProductRequest::default()
        }
        .into_body(9)
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "price"));
    }
}
