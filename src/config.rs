use std::env;
use std::path::PathBuf;

pub const PRICE_URL_ENV: &str = "AUTOMETRIC_PRICE_URL";
pub const DATA_DIR_ENV: &str = "AUTOMETRIC_DATA_DIR";
pub const CATALOG_SEED_ENV: &str = "AUTOMETRIC_CATALOG_SEED";

pub const DEFAULT_PRICE_URL: &str = "http://localhost/price";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub price_url: String,
    pub data_dir: PathBuf,
    pub catalog_seed: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let price_url = lookup(PRICE_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PRICE_URL.to_string());

        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let catalog_seed = lookup(CATALOG_SEED_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Self {
            price_url,
            data_dir,
            catalog_seed,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("autometric.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("autometric.log")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("autometric")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.price_url, DEFAULT_PRICE_URL);
        assert!(config.catalog_seed.is_none());
        assert!(config.data_dir.ends_with("autometric"));
    }

    #[test]
    fn overrides_are_read_from_environment() {
        let config = Config::from_lookup(lookup_from(&[
            (PRICE_URL_ENV, "http://127.0.0.1:5000/price"),
            (DATA_DIR_ENV, "/tmp/autometric-test"),
            (CATALOG_SEED_ENV, "/tmp/seed.json"),
        ]));
        assert_eq!(config.price_url, "http://127.0.0.1:5000/price");
        assert_eq!(config.db_path(), PathBuf::from("/tmp/autometric-test/autometric.db"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/autometric-test/autometric.log"));
        assert_eq!(config.catalog_seed, Some(PathBuf::from("/tmp/seed.json")));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[(PRICE_URL_ENV, "  "), (CATALOG_SEED_ENV, "")]));
        assert_eq!(config.price_url, DEFAULT_PRICE_URL);
        assert!(config.catalog_seed.is_none());
    }
}
