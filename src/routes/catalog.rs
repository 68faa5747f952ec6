//! Catalog routes
//!
//! Read-only view of the compiled-in item catalog.

use axum::Json;
use serde::Serialize;

use crate::auth::RequireAuth;
use crate::catalog::{self, CatalogItem};

#[derive(Debug, Serialize)]
pub struct CatalogItemResponse {
    pub name: &'static str,
    pub description: &'static str,
    /// Decimal string, consistent with every other currency field
    pub unit_price: String,
    pub unit: &'static str,
    pub icon: &'static str,
}

impl From<&'static CatalogItem> for CatalogItemResponse {
    fn from(item: &'static CatalogItem) -> Self {
        Self {
            name: item.name,
            description: item.description,
            unit_price: item.unit_price().to_string(),
            unit: item.unit,
            icon: item.icon,
        }
    }
}

/// GET /api/catalog-items
pub async fn list_catalog_items(_auth: RequireAuth) -> Json<Vec<CatalogItemResponse>> {
    Json(catalog::CATALOG.iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_prices_are_decimal_strings() {
        let items: Vec<CatalogItemResponse> =
            catalog::CATALOG.iter().map(Into::into).collect();
        let handrails = items.iter().find(|i| i.name == "Handrails").unwrap();
        assert_eq!(handrails.unit_price, "25.00");
    }
}
