//! Front end configuration.

/// Settings shared by every screen and the backend client.
#[derive(Debug, Clone)]
pub struct ShopdeskConfig {
    /// Backend base URL (scheme, host and port)
    pub base_url: String,
    /// Rows per page on list screens
    pub page_size: usize,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Tax rate applied to quotation subtotals (0.10 = 10%)
    pub quotation_tax_rate: f64,
    /// Bearer token attached to backend requests
    pub auth_token: Option<String>,
}

impl Default for ShopdeskConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            page_size: 5,
            request_timeout_ms: 5000, // 5 seconds default
            quotation_tax_rate: 0.10,
            auth_token: None,
        }
    }
}
