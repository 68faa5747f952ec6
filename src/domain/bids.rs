use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Saved bid entity
///
/// The five monetary fields are cached at write time by the estimation
/// engine and are never recomputed from the bid's items. Currency travels
/// as decimal strings on the wire to avoid float round-trip loss.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub user_id: Uuid,
    pub client_name: String,
    pub project_location: String,
    /// Calendar date, string-encoded (YYYY-MM-DD)
    pub date: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub materials: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub labor: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub overhead: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// One priced quantity row belonging to a bid
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BidItem {
    pub id: i64,
    pub bid_id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

/// Insert payload for a bid, produced by the estimation engine
#[derive(Debug, Clone)]
pub struct NewBid {
    pub user_id: Uuid,
    pub client_name: String,
    pub project_location: String,
    pub date: String,
    pub subtotal: Decimal,
    pub materials: Decimal,
    pub labor: Decimal,
    pub overhead: Decimal,
    pub total: Decimal,
}

/// Insert payload for one line item; `bid_id` is assigned at write time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBidItem {
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: Decimal,
    pub total: Decimal,
}

/// Partial update for a bid
///
/// Every field is absent-capable; fields omitted from the request body are
/// left untouched by the store. The caller is responsible for keeping the
/// monetary fields internally consistent when it patches them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BidPatch {
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub project_location: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub subtotal: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub materials: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub labor: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub overhead: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub total: Option<Decimal>,
}

impl BidPatch {
    pub fn is_empty(&self) -> bool {
        self.client_name.is_none()
            && self.project_location.is_none()
            && self.date.is_none()
            && self.subtotal.is_none()
            && self.materials.is_none()
            && self.labor.is_none()
            && self.overhead.is_none()
            && self.total.is_none()
    }
}

/// Identity fields of an estimate being saved
#[derive(Debug, Clone, Deserialize)]
pub struct BidDraft {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub project_location: String,
    /// Defaults to today (UTC) when left blank
    #[serde(default)]
    pub date: String,
}

/// Raw labor inputs as entered on the form
///
/// All values are strings on purpose: a partially-filled form must still
/// produce a running total, so parsing degrades to zero instead of failing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LaborInput {
    #[serde(default)]
    pub worker_count: String,
    #[serde(default)]
    pub hourly_rate: String,
    #[serde(default)]
    pub hours_worked: String,
    #[serde(default)]
    pub crane_hours: String,
    #[serde(default)]
    pub crane_rate: String,
}

/// One line item as submitted, before catalog resolution
#[derive(Debug, Clone, Deserialize)]
pub struct ItemInput {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    /// Omitted for catalog items; required for custom ones
    #[serde(default)]
    pub unit_price: Option<String>,
}

/// Named grouping of line items; presentation-only, never persisted
#[derive(Debug, Clone, Deserialize)]
pub struct SectionInput {
    pub name: String,
    #[serde(default)]
    pub items: Vec<ItemInput>,
}

/// POST /api/bids request body
#[derive(Debug, Clone, Deserialize)]
pub struct SaveBidRequest {
    pub bid: BidDraft,
    #[serde(default)]
    pub sections: Vec<SectionInput>,
    #[serde(default)]
    pub labor: LaborInput,
    #[serde(default)]
    pub overhead_percentage: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bid_patch_keeps_omitted_fields_absent() {
        let patch: BidPatch = serde_json::from_str(r#"{"client_name":"Acme"}"#).unwrap();
        assert_eq!(patch.client_name.as_deref(), Some("Acme"));
        assert!(patch.project_location.is_none());
        assert!(patch.total.is_none());
        assert!(!patch.is_empty());
    }

    #[test]
    fn bid_patch_parses_currency_strings() {
        let patch: BidPatch =
            serde_json::from_str(r#"{"subtotal":"1810.00","total":"2027.20"}"#).unwrap();
        assert_eq!(patch.subtotal.unwrap().to_string(), "1810.00");
        assert_eq!(patch.total.unwrap().to_string(), "2027.20");
    }

    #[test]
    fn empty_patch_is_detected() {
        let patch: BidPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn bid_serializes_currency_as_strings() {
        let bid = Bid {
            id: 7,
            user_id: Uuid::nil(),
            client_name: "Acme".into(),
            project_location: "Brooklyn".into(),
            date: "2026-08-26".into(),
            subtotal: Decimal::new(181_000, 2),
            materials: Decimal::new(100_000, 2),
            labor: Decimal::new(81_000, 2),
            overhead: Decimal::new(21_720, 2),
            total: Decimal::new(202_720, 2),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&bid).unwrap();
        assert_eq!(json["total"], "2027.20");
        assert_eq!(json["materials"], "1000.00");
    }

    #[test]
    fn save_request_tolerates_missing_optional_parts() {
        let req: SaveBidRequest = serde_json::from_str(
            r#"{"bid":{"client_name":"Acme","project_location":"Brooklyn"}}"#,
        )
        .unwrap();
        assert!(req.sections.is_empty());
        assert_eq!(req.labor.worker_count, "");
        assert_eq!(req.overhead_percentage, "");
        assert_eq!(req.bid.date, "");
    }
}
