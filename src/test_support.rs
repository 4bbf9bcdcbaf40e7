//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{Country, CountryName, CountrySource, FetchError};
use crate::core::session::SessionStore;
use crate::core::storage::MemoryStorage;

/// An in-memory country source for tests that don't need real API calls.
pub struct StaticSource {
    countries: Vec<Country>,
}

impl StaticSource {
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }
}

#[async_trait]
impl CountrySource for StaticSource {
    async fn get_all_countries(&self) -> Result<Vec<Country>, FetchError> {
        Ok(self.countries.clone())
    }

    async fn get_country_by_code(&self, code: &str) -> Result<Vec<Country>, FetchError> {
        let found: Vec<Country> = self
            .countries
            .iter()
            .filter(|c| c.cca3.eq_ignore_ascii_case(code) || c.cca2.eq_ignore_ascii_case(code))
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(FetchError::new(
                format!("Failed to fetch country with code: {code}"),
                Some(404),
            ));
        }
        Ok(found)
    }

    async fn get_countries_by_region(&self, region: &str) -> Result<Vec<Country>, FetchError> {
        Ok(self
            .countries
            .iter()
            .filter(|c| c.region.eq_ignore_ascii_case(region))
            .cloned()
            .collect())
    }

    async fn get_country_suggestions(&self, query: &str) -> Vec<Country> {
        let query = query.to_lowercase();
        self.countries
            .iter()
            .filter(|c| c.name.common.to_lowercase().contains(&query))
            .take(5)
            .cloned()
            .collect()
    }
}

/// Minimal country record. cca2 is the first two letters of cca3.
pub fn country(cca3: &str, name: &str, region: &str, population: u64) -> Country {
    Country {
        name: CountryName {
            common: name.to_string(),
            official: name.to_string(),
        },
        cca2: cca3.chars().take(2).collect(),
        cca3: cca3.to_string(),
        capital: None,
        region: region.to_string(),
        population,
        ..Default::default()
    }
}

pub fn with_languages(mut country: Country, languages: &[&str]) -> Country {
    let map: BTreeMap<String, String> = languages
        .iter()
        .map(|name| (name.to_lowercase().chars().take(3).collect(), name.to_string()))
        .collect();
    country.languages = Some(map);
    country
}

pub fn with_borders(mut country: Country, borders: &[&str]) -> Country {
    country.borders = Some(borders.iter().map(|b| b.to_string()).collect());
    country
}

/// A session store over fresh in-memory storage with no login delay.
pub fn test_session() -> Arc<SessionStore> {
    Arc::new(SessionStore::new(Arc::new(MemoryStorage::new())).with_login_latency(Duration::ZERO))
}
