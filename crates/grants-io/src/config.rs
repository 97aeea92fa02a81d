use anyhow::{Context, Result, bail};

pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

/// Connection settings for the hosted tabular-data API.
///
/// Always an explicit value handed to the adapters; nothing here is global
/// or mutable.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub token: String,
    pub base_id: String,
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(token: impl Into<String>, base_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_id: base_id.into(),
            base_url: DEFAULT_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read credentials from `GRANTS_API_TOKEN` and `GRANTS_BASE_ID`, with
    /// `GRANTS_API_URL` as an optional override.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GRANTS_API_TOKEN")
            .context("GRANTS_API_TOKEN is not set; remote mode needs an API token")?;
        let base_id = std::env::var("GRANTS_BASE_ID")
            .context("GRANTS_BASE_ID is not set; remote mode needs a base id")?;
        if token.trim().is_empty() || base_id.trim().is_empty() {
            bail!("GRANTS_API_TOKEN and GRANTS_BASE_ID must be non-empty");
        }
        let mut config = Self::new(token, base_id);
        if let Ok(url) = std::env::var("GRANTS_API_URL") {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        Ok(config)
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url.trim_end_matches('/'), self.base_id, table)
    }
}

#[cfg(test)]
mod tests {
    use super::ApiConfig;

    #[test]
    fn table_url_joins_without_double_slashes() {
        let config = ApiConfig::new("tok", "appX").with_base_url("https://example.test/v0/");
        assert_eq!(config.table_url("Grants"), "https://example.test/v0/appX/Grants");
    }
}
