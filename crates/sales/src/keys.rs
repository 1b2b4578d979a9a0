//! API-key form defaults

use chrono::{Days, NaiveDate, Utc};

/// Default expiry for a newly issued key: one year from today
pub fn default_expiry() -> NaiveDate {
    Utc::now().date_naive() + Days::new(365)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_expiry_is_one_year_out() {
        let today = Utc::now().date_naive();
        let expiry = default_expiry();
        let delta = expiry - today;
        assert_eq!(delta.num_days(), 365);
    }
}
