//! # Catalog
//!
//! Client-side views over fetched country data: filtering, language lists,
//! neighbors, featured picks, and resolving favorite codes into records.

use std::collections::BTreeSet;

use futures::future::join_all;
use log::warn;

use crate::api::{Country, CountrySource};

/// Regions offered by the region filter and region browser.
pub const REGIONS: [&str; 5] = ["Africa", "Americas", "Asia", "Europe", "Oceania"];

/// Population above which a country qualifies as "featured".
pub const FEATURED_MIN_POPULATION: u64 = 10_000_000;

/// Narrowing criteria for a country listing. Empty/`None` criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryFilter {
    /// Case-insensitive substring of the common or official name.
    pub query: String,
    pub region: Option<String>,
    pub language: Option<String>,
}

impl CountryFilter {
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.region.is_none() && self.language.is_none()
    }

    pub fn matches(&self, country: &Country) -> bool {
        let query = self.query.trim().to_lowercase();
        if !query.is_empty()
            && !country.name.common.to_lowercase().contains(&query)
            && !country.name.official.to_lowercase().contains(&query)
        {
            return false;
        }
        if let Some(region) = &self.region
            && !country.region.eq_ignore_ascii_case(region)
        {
            return false;
        }
        if let Some(language) = &self.language
            && !country.speaks(language)
        {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, countries: &'a [Country]) -> Vec<&'a Country> {
        countries.iter().filter(|c| self.matches(c)).collect()
    }

    /// Steps the region filter: none → Africa → ... → Oceania → none.
    pub fn cycle_region(&mut self) {
        let next = match &self.region {
            None => Some(0),
            Some(current) => REGIONS
                .iter()
                .position(|r| r.eq_ignore_ascii_case(current))
                .map(|i| i + 1)
                .filter(|i| *i < REGIONS.len()),
        };
        self.region = next.map(|i| REGIONS[i].to_string());
    }
}

/// Every language spoken across `countries`, sorted and deduplicated.
pub fn all_languages(countries: &[Country]) -> Vec<String> {
    countries
        .iter()
        .flat_map(|c| c.language_names())
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Candidates that share a border with `country` (matched on cca3).
pub fn neighbors<'a>(country: &Country, candidates: &'a [Country]) -> Vec<&'a Country> {
    let borders = country.border_codes();
    candidates
        .iter()
        .filter(|c| c.cca3 != country.cca3 && borders.contains(&c.cca3))
        .collect()
}

/// The `count` most populous countries above [`FEATURED_MIN_POPULATION`].
pub fn featured(countries: &[Country], count: usize) -> Vec<&Country> {
    let mut large: Vec<&Country> = countries
        .iter()
        .filter(|c| c.population > FEATURED_MIN_POPULATION)
        .collect();
    large.sort_by(|a, b| b.population.cmp(&a.population));
    large.truncate(count);
    large
}

/// Fetches each favorite code concurrently, in favorite order. Codes that fail to
/// resolve are logged and skipped so one bad code cannot hide the rest.
pub async fn resolve_favorites(source: &dyn CountrySource, codes: &[String]) -> Vec<Country> {
    let lookups = codes.iter().map(|code| source.get_country_by_code(code));
    join_all(lookups)
        .await
        .into_iter()
        .zip(codes)
        .filter_map(|(result, code)| match result {
            Ok(countries) => countries.into_iter().next(),
            Err(e) => {
                warn!("Skipping favorite {}: {}", code, e);
                None
            }
        })
        .collect()
}
