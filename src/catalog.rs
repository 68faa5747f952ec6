//! Fixed catalog of iron work items
//!
//! Process-wide, read-only reference data. Each entry supplies the default
//! unit price used when a named line item is added to an estimate. There is
//! no mutation path; catalog management is out of scope.

use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy)]
pub struct CatalogItem {
    pub name: &'static str,
    pub description: &'static str,
    /// Unit price in cents, so the table can live in a `const`
    pub unit_price_cents: i64,
    pub unit: &'static str,
    pub icon: &'static str,
}

impl CatalogItem {
    pub fn unit_price(&self) -> Decimal {
        Decimal::new(self.unit_price_cents, 2)
    }
}

pub const CATALOG: &[CatalogItem] = &[
    CatalogItem {
        name: "Flights of Stairs",
        description: "Standard flight with handrails",
        unit_price_cents: 45_000,
        unit: "each",
        icon: "fas fa-stairs",
    },
    CatalogItem {
        name: "Handrails",
        description: "Per linear foot",
        unit_price_cents: 2_500,
        unit: "ft",
        icon: "fas fa-minus",
    },
    CatalogItem {
        name: "Structural Beams",
        description: "Per linear foot",
        unit_price_cents: 8_500,
        unit: "ft",
        icon: "fas fa-grip-lines",
    },
    CatalogItem {
        name: "Balcony Railings",
        description: "Per linear foot",
        unit_price_cents: 3_500,
        unit: "ft",
        icon: "fas fa-home",
    },
    CatalogItem {
        name: "Fire Escapes",
        description: "Standard platform with ladder",
        unit_price_cents: 75_000,
        unit: "each",
        icon: "fas fa-fire-extinguisher",
    },
    CatalogItem {
        name: "Security Gates",
        description: "Standard size with hardware",
        unit_price_cents: 32_000,
        unit: "each",
        icon: "fas fa-door-open",
    },
];

/// Look up a catalog entry by exact name
pub fn find(name: &str) -> Option<&'static CatalogItem> {
    CATALOG.iter().find(|item| item.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_default_unit_price() {
        let handrails = find("Handrails").unwrap();
        assert_eq!(handrails.unit_price().to_string(), "25.00");
        assert_eq!(handrails.unit, "ft");
    }

    #[test]
    fn lookup_is_exact_match() {
        assert!(find("handrails").is_none());
        assert!(find("Fire Escapes").is_some());
    }

    #[test]
    fn catalog_has_six_priced_entries() {
        assert_eq!(CATALOG.len(), 6);
        assert!(CATALOG.iter().all(|item| item.unit_price_cents > 0));
    }
}
