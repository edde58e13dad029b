//! App Configuration
//!
//! Endpoint, paging and retry settings. Defaults can be overridden at build
//! time (`GROCERY_API_URL`) or at runtime via
//! `<meta name="grocery-api-url" content="...">` in `index.html`.

use serde::Deserialize;

use crate::query::RetryPolicy;

/// Path of the grocery resource, joined onto `api_base_url`
pub const GROCERIES_PATH: &str = "/groceries";

const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";
const API_URL_META: &str = "grocery-api-url";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub page_size: usize,
    pub retry: RetryPolicy,
    pub log_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("GROCERY_API_URL")
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            page_size: 10,
            retry: RetryPolicy::default(),
            log_capacity: 500,
        }
    }
}

impl AppConfig {
    /// Defaults, then the `<meta>` override if the page carries one
    pub fn load() -> Self {
        let mut config = Self::default();
        if let Some(url) = read_meta(API_URL_META) {
            config.api_base_url = url;
        }
        config.normalize();
        config
    }

    #[cfg(test)]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(json)?;
        config.normalize();
        Ok(config)
    }

    /// Full URL of the collection endpoint
    pub fn groceries_url(&self) -> String {
        format!("{}{}", self.api_base_url, GROCERIES_PATH)
    }

    fn normalize(&mut self) {
        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        self.api_base_url = trimmed.to_string();
        if self.page_size == 0 {
            self.page_size = 10;
        }
    }
}

fn read_meta(name: &str) -> Option<String> {
    if !cfg!(target_arch = "wasm32") {
        return None;
    }
    let document = web_sys::window()?.document()?;
    let element = document
        .query_selector(&format!("meta[name=\"{}\"]", name))
        .ok()??;
    let content = element.get_attribute("content")?;
    let content = content.trim();
    if content.is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.retry.retries, 2);
        assert!(config.groceries_url().ends_with("/groceries"));
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = AppConfig::from_json(r#"{"api_base_url":"https://api.example.com/"}"#).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.groceries_url(), "https://api.example.com/groceries");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_zero_page_size_falls_back() {
        let config = AppConfig::from_json(r#"{"page_size":0}"#).unwrap();
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_load_without_dom() {
        let config = AppConfig::load();
        assert!(!config.api_base_url.ends_with('/'));
    }
}
