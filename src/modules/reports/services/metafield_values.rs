//! Extraction of monetary figures from order metafield values.
//!
//! Metafield values arrive as opaque strings. The ones this service cares
//! about have been observed in three shapes: a bare decimal (`"12.5"`), a
//! JSON object with an `amount` field (`{"amount":"12.5","currency":"USD"}`),
//! and free text with a leading number (`"12.5 incl. shipping"`).

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::modules::platform::models::Metafield;

pub const ADDITIONAL_CHARGES_KEY: &str = "additional_charges";
pub const ACTUAL_TOTAL_KEY: &str = "actual_total_checkout_price";

/// The two recognized per-order figures; absent fields read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChargeFields {
    pub additional_charges: Decimal,
    pub actual_spend: Decimal,
}

/// Pull the recognized charge fields out of an order's metafields. The last
/// occurrence of a key wins, regardless of namespace.
pub fn extract_charge_fields(metafields: &[Metafield]) -> ChargeFields {
    let mut fields = ChargeFields::default();
    for metafield in metafields {
        match metafield.key.as_str() {
            ADDITIONAL_CHARGES_KEY => {
                fields.additional_charges =
                    parse_money_value(&metafield.value).unwrap_or(Decimal::ZERO);
            }
            ACTUAL_TOTAL_KEY => {
                fields.actual_spend = parse_money_value(&metafield.value).unwrap_or(Decimal::ZERO);
            }
            _ => {}
        }
    }
    fields
}

/// Best-effort parse of a monetary metafield value.
pub fn parse_money_value(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(amount) = Decimal::from_str(trimmed) {
        return Some(amount);
    }

    // JSON object shape: {"amount": ...}
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if let Some(amount) = value.get("amount") {
            return match amount {
                Value::String(text) => Decimal::from_str(text.trim()).ok(),
                Value::Number(number) => Decimal::from_str(&number.to_string()).ok(),
                _ => None,
            };
        }
    }

    // Free text: take the leading numeric run.
    let prefix: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if prefix.is_empty() {
        return None;
    }
    Decimal::from_str(&prefix).ok()
}
