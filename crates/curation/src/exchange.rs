//! Currency-exchange table for APC normalization
//!
//! Point-in-time USD rates; amounts are integer minor units and
//! conversions round to the nearest unit.

/// USD per one unit of the listed currency
const USD_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 1.09),
    ("GBP", 1.27),
    ("JPY", 0.0067),
    ("CHF", 1.13),
    ("CAD", 0.73),
    ("AUD", 0.66),
    ("NZD", 0.61),
    ("CNY", 0.14),
    ("HKD", 0.128),
    ("SGD", 0.74),
    ("KRW", 0.00072),
    ("INR", 0.012),
    ("SEK", 0.095),
    ("NOK", 0.094),
    ("DKK", 0.146),
    ("PLN", 0.25),
    ("CZK", 0.043),
    ("HUF", 0.0027),
    ("TRY", 0.03),
    ("BRL", 0.18),
    ("MXN", 0.054),
    ("ZAR", 0.053),
];

/// USD rate for a currency code, if the table knows it
pub fn usd_rate(currency: &str) -> Option<f64> {
    USD_RATES
        .iter()
        .find(|(code, _)| *code == currency)
        .map(|(_, rate)| *rate)
}

/// Convert an amount in minor units to USD, rounding to the nearest
/// unit. Unknown currencies convert to `None`.
pub fn to_usd(amount: i64, currency: &str) -> Option<i64> {
    let rate = usd_rate(currency)?;
    Some((amount as f64 * rate).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usd_is_identity() {
        assert_eq!(to_usd(600, "USD"), Some(600));
    }

    #[test]
    fn test_eur_conversion_rounds() {
        assert_eq!(to_usd(500, "EUR"), Some(545));
        assert_eq!(to_usd(1, "JPY"), Some(0));
    }

    #[test]
    fn test_unknown_currency() {
        assert_eq!(to_usd(100, "XXX"), None);
        assert_eq!(usd_rate("XXX"), None);
    }
}
