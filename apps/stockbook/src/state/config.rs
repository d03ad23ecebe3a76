//! # Configuration State
//!
//! Settings read once at startup.
//!
//! ## Environment Variables
//! | Variable                  | Default           |
//! |---------------------------|-------------------|
//! | `STOCKBOOK_DB_PATH`       | `./stockbook.db`  |
//! | `STOCKBOOK_CURRENCY`      | `IDR`             |
//! | `STOCKBOOK_SEARCH_LIMIT`  | `50`              |
//! | `RUST_LOG`                | see `init_tracing`|

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use stockbook_core::{Money, CURRENCY_CODE, DEFAULT_SEARCH_LIMIT};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// Currency code shown before amounts (ISO 4217).
    pub currency_code: String,

    /// Default and maximum number of products a search returns.
    pub search_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("./stockbook.db"),
            currency_code: CURRENCY_CODE.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by any `STOCKBOOK_*` variables that are set.
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = AppConfig::default();

        if let Some(path) = lookup("STOCKBOOK_DB_PATH") {
            config.database_path = PathBuf::from(path);
        }

        if let Some(currency) = lookup("STOCKBOOK_CURRENCY") {
            config.currency_code = currency;
        }

        if let Some(limit) = lookup("STOCKBOOK_SEARCH_LIMIT").and_then(|v| v.parse().ok()) {
            config.search_limit = limit;
        }

        config
    }

    /// Formats an amount with the currency code and id-ID digit grouping.
    ///
    /// ```rust
    /// use stockbook_app::state::AppConfig;
    /// use stockbook_core::Money;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_rupiah(1_234_567)), "IDR 1.234.567");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!("{} {}", self.currency_code, amount.to_grouped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_lookup_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("STOCKBOOK_DB_PATH", "/data/shop.db"),
            ("STOCKBOOK_SEARCH_LIMIT", "20"),
        ]);

        let config = AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_path, PathBuf::from("/data/shop.db"));
        assert_eq!(config.search_limit, 20);
        assert_eq!(config.currency_code, "IDR");
    }

    #[test]
    fn test_bad_limit_is_ignored() {
        let config = AppConfig::from_lookup(|key| {
            (key == "STOCKBOOK_SEARCH_LIMIT").then(|| "many".to_string())
        });
        assert_eq!(config.search_limit, DEFAULT_SEARCH_LIMIT);
    }

    #[test]
    fn test_format_currency() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(Money::from_rupiah(0)), "IDR 0");
        assert_eq!(config.format_currency(Money::from_rupiah(-15_000)), "IDR -15.000");
    }
}
