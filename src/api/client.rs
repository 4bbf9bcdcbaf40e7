//! HTTP client for the upstream country API.
//!
//! Endpoints used (relative to the base URL):
//!
//! ```text
//! GET /all?fields=...     list every country
//! GET /alpha/{code}       lookup by cca2/cca3 (singleton array)
//! GET /region/{region}    countries in a region
//! GET /name/{query}       name search, used for type-ahead suggestions
//! ```

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Url;

use crate::api::{Country, FetchError};

pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Queries shorter than this never reach the network.
pub const MIN_SUGGESTION_QUERY_CHARS: usize = 2;

/// Fields requested for the full listing. The upstream caps `fields` at ten entries.
const LIST_FIELDS: &str = "name,cca2,cca3,capital,region,subregion,population,flags,languages,borders";

/// The four lookups the explorer needs from a country data source.
#[async_trait]
pub trait CountrySource: Send + Sync {
    /// Every country, in upstream order.
    async fn get_all_countries(&self) -> Result<Vec<Country>, FetchError>;

    /// The country with the given alpha-2 or alpha-3 code, as a singleton list.
    async fn get_country_by_code(&self, code: &str) -> Result<Vec<Country>, FetchError>;

    /// Countries in the given region (e.g. `Europe`).
    async fn get_countries_by_region(&self, region: &str) -> Result<Vec<Country>, FetchError>;

    /// Best-effort name matches for type-ahead. Never fails: errors yield an empty list.
    async fn get_country_suggestions(&self, query: &str) -> Vec<Country>;
}

/// restcountries-compatible HTTP client.
pub struct CountryClient {
    base_url: String,
    client: reqwest::Client,
    suggestion_limit: usize,
}

impl CountryClient {
    pub fn new(base_url: Option<String>) -> Self {
        let env_url = std::env::var("ATLAS_API_BASE_URL").ok();
        let final_url = base_url
            .or(env_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            base_url: final_url,
            client: reqwest::Client::new(),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    /// Joins percent-encoded path segments onto the base URL.
    fn endpoint(&self, segments: &[&str]) -> Option<Url> {
        let mut url = Url::parse(&self.base_url).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(segments);
        Some(url)
    }

    /// Issues one GET and decodes a JSON array of countries.
    /// Any failure becomes a `FetchError` carrying `failure` as its message.
    async fn fetch(
        &self,
        segments: &[&str],
        query: Option<(&str, &str)>,
        failure: String,
    ) -> Result<Vec<Country>, FetchError> {
        let Some(mut url) = self.endpoint(segments) else {
            warn!("Invalid country API base URL: {}", self.base_url);
            return Err(FetchError::new(failure, None));
        };
        if let Some((key, value)) = query {
            url.query_pairs_mut().append_pair(key, value);
        }

        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Country API request failed: {}", e);
            FetchError::new(failure.clone(), None)
        })?;

        let status = response.status();
        debug!("Country API response status: {}", status);
        if !status.is_success() {
            warn!("Country API error: {} ({})", failure, status);
            return Err(FetchError::new(failure, Some(status.as_u16())));
        }

        response.json::<Vec<Country>>().await.map_err(|e| {
            warn!("Failed to decode country API response: {}", e);
            FetchError::new(failure, Some(status.as_u16()))
        })
    }
}

#[async_trait]
impl CountrySource for CountryClient {
    async fn get_all_countries(&self) -> Result<Vec<Country>, FetchError> {
        let countries = self
            .fetch(
                &["all"],
                Some(("fields", LIST_FIELDS)),
                "Failed to fetch countries".to_string(),
            )
            .await?;
        info!("Fetched {} countries", countries.len());
        Ok(countries)
    }

    async fn get_country_by_code(&self, code: &str) -> Result<Vec<Country>, FetchError> {
        self.fetch(
            &["alpha", code],
            None,
            format!("Failed to fetch country with code: {code}"),
        )
        .await
    }

    async fn get_countries_by_region(&self, region: &str) -> Result<Vec<Country>, FetchError> {
        self.fetch(
            &["region", region],
            None,
            format!("Failed to fetch countries in region: {region}"),
        )
        .await
    }

    async fn get_country_suggestions(&self, query: &str) -> Vec<Country> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGESTION_QUERY_CHARS {
            return Vec::new();
        }

        match self
            .fetch(
                &["name", query],
                None,
                format!("Failed to fetch suggestions for: {query}"),
            )
            .await
        {
            Ok(mut countries) => {
                countries.truncate(self.suggestion_limit);
                countries
            }
            Err(e) => {
                // 404 is the upstream's "no match" answer, not worth more than debug
                debug!("No suggestions for '{}': {}", query, e);
                Vec::new()
            }
        }
    }
}
