use serde::{Deserialize, Serialize};

/// Path of the address search endpoint, resolved against the API base URL.
pub const SEARCH_PATH: &str = "/api/addresses/search";

pub const DEFAULT_PAGE_SIZE: u32 = 8;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_MIN_CHARS: usize = 2;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// A single address match returned by the search API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSuggestion {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub street_number: String,
    #[serde(default)]
    pub street_name: String,
    #[serde(default)]
    pub suburb: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postcode: String,
    pub full_address: String,
}

impl AddressSuggestion {
    /// Text shown in the input when this suggestion is chosen.
    pub fn label(&self) -> &str {
        &self.full_address
    }

    /// Secondary line under the highlighted address, eg: "Springfield IL 62701".
    pub fn locality(&self) -> String {
        [&self.suburb, &self.state, &self.postcode]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the address API, eg: "https://addresses.example.com".
    #[serde(default)]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a request is sent.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Minimum trimmed input length (in characters) that triggers a search.
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Number of suggestions requested per search.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_chars: default_min_chars(),
            page_size: default_page_size(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_min_chars() -> usize {
    DEFAULT_MIN_CHARS
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
