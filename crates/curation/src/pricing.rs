//! Journal article-processing-charge validation and USD normalization
//!
//! Normalization runs on every save before any validation-dependent
//! persistence; validation failures block the save entirely.

use crate::exchange;
use backoffice_common::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Currency code that short-circuits conversion
pub const USD: &str = "USD";

/// A single validated pricing entry: integer minor units plus a
/// 3-letter currency code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApcPrice {
    pub price: i64,
    pub currency: String,
}

/// Validate the stored pricing list shape.
///
/// An absent or empty list is valid. Otherwise every element must be a
/// mapping with an integer `price` and an exactly-3-character string
/// `currency`; any violation blocks the save.
pub fn validate_apc_prices(value: Option<&Value>) -> Result<Vec<ApcPrice>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };

    let items = value.as_array().ok_or_else(|| AppError::InvalidPricingFormat {
        message: "apc_prices must be a list".to_string(),
    })?;

    let mut validated = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let mapping = item.as_object().ok_or_else(|| AppError::InvalidPricingFormat {
            message: format!("apc_prices[{}] is not a mapping", index),
        })?;

        let price = mapping
            .get("price")
            .and_then(Value::as_i64)
            .ok_or_else(|| AppError::InvalidPricingFormat {
                message: format!("apc_prices[{}].price must be an integer", index),
            })?;

        let currency = mapping
            .get("currency")
            .and_then(Value::as_str)
            .filter(|c| c.len() == 3)
            .ok_or_else(|| AppError::InvalidPricingFormat {
                message: format!("apc_prices[{}].currency must be a 3-letter code", index),
            })?;

        validated.push(ApcPrice {
            price,
            currency: currency.to_string(),
        });
    }

    Ok(validated)
}

/// Derive the normalized USD amount from the raw pricing list.
///
/// An item with currency `"USD"` wins verbatim; otherwise the first
/// item is converted through the exchange table; an empty list leaves
/// the amount unset. The scan is tolerant of malformed items - strict
/// shape checking is validation's job.
pub fn normalize_usd(value: Option<&Value>) -> Option<i64> {
    let items = value?.as_array()?;

    let usd_item = items.iter().find(|item| {
        item.get("currency").and_then(Value::as_str) == Some(USD)
    });
    if let Some(item) = usd_item {
        return item.get("price").and_then(Value::as_i64);
    }

    let first = items.first()?;
    let price = first.get("price").and_then(Value::as_i64)?;
    let currency = first.get("currency").and_then(Value::as_str)?;
    exchange::to_usd(price, currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_usd_item_wins_verbatim() {
        let prices = json!([
            {"price": 500, "currency": "EUR"},
            {"price": 600, "currency": "USD"}
        ]);
        assert_eq!(normalize_usd(Some(&prices)), Some(600));
    }

    #[test]
    fn test_first_item_converted_when_no_usd() {
        let prices = json!([{"price": 500, "currency": "EUR"}]);
        assert_eq!(
            normalize_usd(Some(&prices)),
            exchange::to_usd(500, "EUR")
        );
        assert_ne!(normalize_usd(Some(&prices)), Some(500));
    }

    #[test]
    fn test_first_item_rule_ignores_later_items() {
        let prices = json!([
            {"price": 500, "currency": "EUR"},
            {"price": 700, "currency": "GBP"}
        ]);
        assert_eq!(
            normalize_usd(Some(&prices)),
            exchange::to_usd(500, "EUR")
        );
    }

    #[test]
    fn test_empty_list_stays_unset() {
        assert_eq!(normalize_usd(Some(&json!([]))), None);
        assert_eq!(normalize_usd(None), None);
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        let prices = json!([
            {"price": 500, "currency": "EUR"},
            {"price": 600, "currency": "USD"}
        ]);
        let validated = validate_apc_prices(Some(&prices)).unwrap();
        assert_eq!(validated.len(), 2);
        assert_eq!(validated[1].price, 600);
    }

    #[test]
    fn test_validate_accepts_empty_and_absent() {
        assert!(validate_apc_prices(Some(&json!([]))).unwrap().is_empty());
        assert!(validate_apc_prices(None).unwrap().is_empty());
    }

    #[test]
    fn test_validate_rejects_non_list() {
        let err = validate_apc_prices(Some(&json!({"price": 1}))).unwrap_err();
        assert!(matches!(err, AppError::InvalidPricingFormat { .. }));
    }

    #[test]
    fn test_validate_rejects_non_mapping_item() {
        let err = validate_apc_prices(Some(&json!([42]))).unwrap_err();
        assert!(matches!(err, AppError::InvalidPricingFormat { .. }));
    }

    #[test]
    fn test_validate_rejects_missing_keys() {
        let err = validate_apc_prices(Some(&json!([{"price": 500}]))).unwrap_err();
        assert!(matches!(err, AppError::InvalidPricingFormat { .. }));

        let err = validate_apc_prices(Some(&json!([{"currency": "EUR"}]))).unwrap_err();
        assert!(matches!(err, AppError::InvalidPricingFormat { .. }));
    }

    #[test]
    fn test_validate_rejects_non_integer_price() {
        let err =
            validate_apc_prices(Some(&json!([{"price": "500", "currency": "EUR"}]))).unwrap_err();
        assert!(matches!(err, AppError::InvalidPricingFormat { .. }));

        let err =
            validate_apc_prices(Some(&json!([{"price": 500.5, "currency": "EUR"}]))).unwrap_err();
        assert!(matches!(err, AppError::InvalidPricingFormat { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_currency_length() {
        for currency in ["EU", "EURO", ""] {
            let err = validate_apc_prices(Some(&json!([{"price": 500, "currency": currency}])))
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidPricingFormat { .. }));
        }
    }
}
