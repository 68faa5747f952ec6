//! Estimation engine
//!
//! Pure computation from line-item selections and labor parameters to a
//! bid's monetary breakdown. No I/O. Numeric strings coming off a form are
//! coerced best-effort: anything unparseable counts as zero so a running
//! total can always be shown. Validation happens only at save time, and only
//! for the identity fields and item resolution.
//!
//! Every currency value is finalized with round-half-up at two decimal
//! places. The subtotal and grand total are derived from already-rounded
//! components, so `subtotal == materials + labor` and
//! `total == subtotal + overhead` hold exactly in everything this module
//! hands to the store.

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog;
use crate::domain::{LaborInput, NewBid, NewBidItem, SaveBidRequest, SectionInput};
use crate::error::{ApiError, FieldError};

/// Save-time validation failure with per-field detail
#[derive(Debug, Error)]
#[error("bid input failed validation")]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl From<ValidationFailure> for ApiError {
    fn from(failure: ValidationFailure) -> Self {
        ApiError::Validation(failure.errors)
    }
}

/// Best-effort numeric coercion: empty or malformed input is zero
pub fn parse_amount(raw: &str) -> Decimal {
    raw.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

/// Finalize a currency value: round half-up, fixed two-digit scale
pub fn round_currency(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// One resolved line item with its derived total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: Decimal,
    pub total: Decimal,
}

/// A named group of line items, resolved against the catalog
#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    pub items: Vec<LineItem>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Add or replace the item with this name (last write wins); a section
    /// holds at most one entry per item name
    pub fn set_item(&mut self, name: &str, unit_price: Decimal, quantity: Decimal) {
        let total = round_currency(unit_price * quantity);
        if let Some(existing) = self.items.iter_mut().find(|item| item.name == name) {
            existing.unit_price = unit_price;
            existing.quantity = quantity;
            existing.total = total;
        } else {
            self.items.push(LineItem {
                name: name.to_string(),
                unit_price,
                quantity,
                total,
            });
        }
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.total).sum()
    }
}

/// Resolve submitted sections against the catalog
///
/// A named catalog item inherits its default unit price; a custom item must
/// carry an explicit one. All field problems are collected before failing so
/// the client sees every error at once.
pub fn resolve_sections(inputs: &[SectionInput]) -> Result<Vec<Section>, ValidationFailure> {
    let mut errors = Vec::new();
    let mut sections = Vec::with_capacity(inputs.len());

    for (section_idx, input) in inputs.iter().enumerate() {
        let mut section = Section::new(input.name.trim());
        for (item_idx, item) in input.items.iter().enumerate() {
            let path = format!("sections[{section_idx}].items[{item_idx}]");
            if item.name.trim().is_empty() {
                errors.push(FieldError::new(format!("{path}.name"), "Item name is required"));
                continue;
            }

            let unit_price = match &item.unit_price {
                Some(raw) => parse_amount(raw),
                None => match catalog::find(item.name.trim()) {
                    Some(entry) => entry.unit_price(),
                    None => {
                        errors.push(FieldError::new(
                            format!("{path}.unit_price"),
                            format!("\"{}\" is not a catalog item; a unit price is required", item.name),
                        ));
                        continue;
                    }
                },
            };
            let quantity = parse_amount(&item.quantity);

            if unit_price < Decimal::ZERO {
                errors.push(FieldError::new(
                    format!("{path}.unit_price"),
                    "Unit price must not be negative",
                ));
                continue;
            }
            if quantity < Decimal::ZERO {
                errors.push(FieldError::new(
                    format!("{path}.quantity"),
                    "Quantity must not be negative",
                ));
                continue;
            }

            section.set_item(item.name.trim(), unit_price, quantity);
        }
        sections.push(section);
    }

    if errors.is_empty() {
        Ok(sections)
    } else {
        Err(ValidationFailure { errors })
    }
}

/// Sum of `unit_price × quantity` over every item across every section
pub fn materials_total(sections: &[Section]) -> Decimal {
    sections.iter().map(Section::total).sum()
}

/// `workers × hourly_rate × hours + crane_hours × crane_rate`
///
/// Missing inputs contribute zero, never an error.
pub fn labor_total(labor: &LaborInput) -> Decimal {
    parse_amount(&labor.worker_count)
        * parse_amount(&labor.hourly_rate)
        * parse_amount(&labor.hours_worked)
        + parse_amount(&labor.crane_hours) * parse_amount(&labor.crane_rate)
}

/// Percentage markup over materials plus labor; unset percentage is zero
pub fn overhead_total(materials: Decimal, labor: Decimal, percentage: &str) -> Decimal {
    (materials + labor) * parse_amount(percentage) / Decimal::ONE_HUNDRED
}

/// The five derived monetary fields of a bid, all at two-digit scale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown {
    pub materials: Decimal,
    pub labor: Decimal,
    pub overhead: Decimal,
    pub subtotal: Decimal,
    pub total: Decimal,
}

/// Finalize the breakdown from possibly higher-precision intermediates
///
/// The three components are rounded first; subtotal and total are sums of
/// the rounded figures, so the stored invariants survive the rounding step.
pub fn breakdown(materials: Decimal, labor: Decimal, overhead: Decimal) -> Breakdown {
    let materials = round_currency(materials);
    let labor = round_currency(labor);
    let overhead = round_currency(overhead);
    let subtotal = materials + labor;
    let total = subtotal + overhead;
    Breakdown {
        materials,
        labor,
        overhead,
        subtotal,
        total,
    }
}

/// Validate a save request and flatten it into store payloads
///
/// Items are re-derived at flattening time; cached client totals are never
/// trusted. Section grouping is dropped here: the store keeps a flat item
/// collection tagged with the owning bid.
pub fn to_save_payload(
    user_id: Uuid,
    request: &SaveBidRequest,
) -> Result<(NewBid, Vec<NewBidItem>), ValidationFailure> {
    let mut errors = Vec::new();

    if request.bid.client_name.trim().is_empty() {
        errors.push(FieldError::new("bid.client_name", "Client name is required"));
    }
    if request.bid.project_location.trim().is_empty() {
        errors.push(FieldError::new(
            "bid.project_location",
            "Project location is required",
        ));
    }

    let sections = match resolve_sections(&request.sections) {
        Ok(sections) => sections,
        Err(mut failure) => {
            errors.append(&mut failure.errors);
            Vec::new()
        }
    };

    if !errors.is_empty() {
        return Err(ValidationFailure { errors });
    }

    let materials = materials_total(&sections);
    let labor = labor_total(&request.labor);
    let overhead = overhead_total(materials, labor, &request.overhead_percentage);
    let summary = breakdown(materials, labor, overhead);

    let date = if request.bid.date.trim().is_empty() {
        Utc::now().format("%Y-%m-%d").to_string()
    } else {
        request.bid.date.trim().to_string()
    };

    let bid = NewBid {
        user_id,
        client_name: request.bid.client_name.trim().to_string(),
        project_location: request.bid.project_location.trim().to_string(),
        date,
        subtotal: summary.subtotal,
        materials: summary.materials,
        labor: summary.labor,
        overhead: summary.overhead,
        total: summary.total,
    };

    let items = sections
        .iter()
        .flat_map(|section| section.items.iter())
        .map(|item| NewBidItem {
            name: item.name.clone(),
            unit_price: round_currency(item.unit_price),
            quantity: round_currency(item.quantity),
            total: round_currency(item.unit_price * item.quantity),
        })
        .collect();

    Ok((bid, items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BidDraft, ItemInput};
    use rstest::rstest;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn labor(
        workers: &str,
        rate: &str,
        hours: &str,
        crane_hours: &str,
        crane_rate: &str,
    ) -> LaborInput {
        LaborInput {
            worker_count: workers.into(),
            hourly_rate: rate.into(),
            hours_worked: hours.into(),
            crane_hours: crane_hours.into(),
            crane_rate: crane_rate.into(),
        }
    }

    #[rstest]
    #[case("", "0")]
    #[case("   ", "0")]
    #[case("not a number", "0")]
    #[case("50.5", "50.5")]
    #[case(" 12.25 ", "12.25")]
    #[case("-3", "-3")]
    fn parse_amount_degrades_to_zero(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(parse_amount(raw), dec(expected));
    }

    #[rstest]
    #[case("0", "0", "0", "0", "0", "0")]
    #[case("2", "50", "8", "0", "0", "800")]
    #[case("2", "50", "8", "3", "100", "1100")]
    #[case("", "", "", "", "", "0")]
    #[case("3", "45", "6", "", "", "810")]
    fn labor_formula(
        #[case] workers: &str,
        #[case] rate: &str,
        #[case] hours: &str,
        #[case] crane_hours: &str,
        #[case] crane_rate: &str,
        #[case] expected: &str,
    ) {
        let total = labor_total(&labor(workers, rate, hours, crane_hours, crane_rate));
        assert_eq!(total, dec(expected));
    }

    #[rstest]
    #[case("1000", "500", "0", "0")]
    #[case("1000", "500", "", "0")]
    #[case("1000", "0", "10", "100")]
    #[case("1000", "810", "12", "217.20")]
    fn overhead_is_percentage_of_subtotal(
        #[case] materials: &str,
        #[case] labor: &str,
        #[case] pct: &str,
        #[case] expected: &str,
    ) {
        let overhead = overhead_total(dec(materials), dec(labor), pct);
        assert_eq!(round_currency(overhead), round_currency(dec(expected)));
    }

    #[test]
    fn materials_sum_across_sections() {
        let mut north = Section::new("North Stair");
        north.set_item("Handrails", dec("25"), dec("10"));
        north.set_item("Structural Beams", dec("85"), dec("2"));
        let mut south = Section::new("South Stair");
        south.set_item("Handrails", dec("25"), dec("4"));

        assert_eq!(materials_total(&[north, south]), dec("520.00"));
    }

    #[test]
    fn repeated_item_name_replaces_in_place() {
        let mut section = Section::new("Main");
        section.set_item("Handrails", dec("25"), dec("10"));
        section.set_item("Handrails", dec("25"), dec("40"));

        assert_eq!(section.items.len(), 1);
        assert_eq!(section.items[0].quantity, dec("40"));
        assert_eq!(section.items[0].total, dec("1000.00"));
    }

    #[test]
    fn breakdown_invariants_survive_rounding() {
        // Components that each need rounding on their own
        let summary = breakdown(dec("10.005"), dec("0.015"), dec("1.002"));
        assert_eq!(summary.materials, dec("10.01"));
        assert_eq!(summary.labor, dec("0.02"));
        assert_eq!(summary.overhead, dec("1.00"));
        assert_eq!(summary.subtotal, summary.materials + summary.labor);
        assert_eq!(summary.total, summary.subtotal + summary.overhead);
    }

    #[test]
    fn round_currency_is_half_up_at_two_places() {
        assert_eq!(round_currency(dec("2.345")).to_string(), "2.35");
        assert_eq!(round_currency(dec("2.344")).to_string(), "2.34");
        assert_eq!(round_currency(dec("1000")).to_string(), "1000.00");
    }

    fn handrails_request() -> SaveBidRequest {
        SaveBidRequest {
            bid: BidDraft {
                client_name: "Acme Property".into(),
                project_location: "Brooklyn, NY".into(),
                date: "2026-08-26".into(),
            },
            sections: vec![SectionInput {
                name: "Main".into(),
                items: vec![ItemInput {
                    name: "Handrails".into(),
                    quantity: "40".into(),
                    unit_price: None,
                }],
            }],
            labor: labor("3", "45", "6", "", ""),
            overhead_percentage: "12".into(),
        }
    }

    #[test]
    fn handrails_scenario_end_to_end() {
        let (bid, items) = to_save_payload(Uuid::nil(), &handrails_request()).unwrap();

        assert_eq!(bid.materials.to_string(), "1000.00");
        assert_eq!(bid.labor.to_string(), "810.00");
        assert_eq!(bid.overhead.to_string(), "217.20");
        assert_eq!(bid.subtotal.to_string(), "1810.00");
        assert_eq!(bid.total.to_string(), "2027.20");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Handrails");
        assert_eq!(items[0].unit_price.to_string(), "25.00");
        assert_eq!(items[0].total.to_string(), "1000.00");
    }

    #[test]
    fn payload_rederives_item_totals_from_inputs() {
        let mut request = handrails_request();
        // Custom item with an explicit price alongside the catalog one
        request.sections[0].items.push(ItemInput {
            name: "Custom Bracket".into(),
            quantity: "3".into(),
            unit_price: Some("19.99".into()),
        });

        let (bid, items) = to_save_payload(Uuid::nil(), &request).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].total.to_string(), "59.97");
        assert_eq!(bid.materials.to_string(), "1059.97");
        assert_eq!(bid.subtotal, bid.materials + bid.labor);
        assert_eq!(bid.total, bid.subtotal + bid.overhead);
    }

    #[test]
    fn missing_identity_fields_fail_validation() {
        let mut request = handrails_request();
        request.bid.client_name = "  ".into();
        request.bid.project_location = String::new();

        let failure = to_save_payload(Uuid::nil(), &request).unwrap_err();
        let fields: Vec<&str> = failure.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["bid.client_name", "bid.project_location"]);
    }

    #[test]
    fn unknown_item_without_price_fails_validation() {
        let mut request = handrails_request();
        request.sections[0].items.push(ItemInput {
            name: "Mystery Widget".into(),
            quantity: "2".into(),
            unit_price: None,
        });

        let failure = to_save_payload(Uuid::nil(), &request).unwrap_err();
        assert_eq!(failure.errors.len(), 1);
        assert_eq!(failure.errors[0].field, "sections[0].items[1].unit_price");
    }

    #[test]
    fn negative_quantity_fails_validation() {
        let mut request = handrails_request();
        request.sections[0].items[0].quantity = "-4".into();

        let failure = to_save_payload(Uuid::nil(), &request).unwrap_err();
        assert_eq!(failure.errors[0].field, "sections[0].items[0].quantity");
    }

    #[test]
    fn blank_date_defaults_to_today() {
        let mut request = handrails_request();
        request.bid.date = String::new();

        let (bid, _) = to_save_payload(Uuid::nil(), &request).unwrap();
        assert_eq!(bid.date, Utc::now().format("%Y-%m-%d").to_string());
    }

    #[test]
    fn empty_estimate_saves_as_zeros() {
        let mut request = handrails_request();
        request.sections.clear();
        request.labor = LaborInput::default();
        request.overhead_percentage = String::new();

        let (bid, items) = to_save_payload(Uuid::nil(), &request).unwrap();
        assert!(items.is_empty());
        assert_eq!(bid.total.to_string(), "0.00");
        assert_eq!(bid.subtotal, bid.materials + bid.labor);
    }
}
