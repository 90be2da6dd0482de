//! Runner configuration loaded from environment variables.

use std::path::PathBuf;

/// Runner configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `STORE_PRODUCT_IDS` — comma-separated product IDs (default: every catalog product)
/// - `STORE_CATALOG` — path to a JSON catalog file (default: built-in demo catalog)
/// - `STORE_PURCHASE` — product ID to purchase after syncing (default: none)
/// - `STORE_PRINT_METRICS` — print Prometheus metrics on exit (default: `false`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub product_ids: Vec<String>,
    pub catalog_path: Option<PathBuf>,
    pub purchase: Option<String>,
    pub print_metrics: bool,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            product_ids: non_empty("STORE_PRODUCT_IDS")
                .map(|ids| {
                    ids.split(',')
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            catalog_path: non_empty("STORE_CATALOG").map(PathBuf::from),
            purchase: non_empty("STORE_PURCHASE").map(|id| id.trim().to_string()),
            print_metrics: non_empty("STORE_PRINT_METRICS")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
            log_level: non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            product_ids: Vec::new(),
            catalog_path: None,
            purchase: None,
            print_metrics: false,
            log_level: "info".to_string(),
        }
    }
}
