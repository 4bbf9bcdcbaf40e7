use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Common and official names of a country.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CountryName {
    #[serde(default)]
    pub common: String,
    #[serde(default)]
    pub official: String,
}

/// Flag image URLs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Flags {
    pub svg: Option<String>,
    pub png: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Currency {
    #[serde(default)]
    pub name: String,
    pub symbol: Option<String>,
}

/// International direct dialing: a root (`+1`) plus one or more suffixes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Idd {
    pub root: Option<String>,
    #[serde(default)]
    pub suffixes: Vec<String>,
}

/// Which side of the road traffic drives on.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Car {
    pub side: Option<String>,
}

/// A country record as returned by the upstream API.
///
/// Only the fields the explorer reads are modelled; anything else in the payload
/// is ignored. Fields the upstream omits for some countries (Antarctica has no
/// capital, many islands have no borders) are `Option`s rather than parse failures.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Country {
    #[serde(default)]
    pub name: CountryName,
    #[serde(default)]
    pub cca2: String,
    #[serde(default)]
    pub cca3: String,
    pub capital: Option<Vec<String>>,
    #[serde(default)]
    pub region: String,
    pub subregion: Option<String>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub flags: Flags,
    pub currencies: Option<BTreeMap<String, Currency>>,
    pub languages: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub timezones: Vec<String>,
    #[serde(default)]
    pub tld: Vec<String>,
    #[serde(default)]
    pub idd: Idd,
    #[serde(default)]
    pub car: Car,
    pub borders: Option<Vec<String>>,
    /// Square kilometres. Absent from the trimmed `/all` listing.
    pub area: Option<f64>,
}

impl Country {
    /// First listed capital, if any.
    pub fn primary_capital(&self) -> Option<&str> {
        self.capital
            .as_ref()
            .and_then(|caps| caps.first())
            .map(String::as_str)
    }

    /// Language names, ordered by language code.
    pub fn language_names(&self) -> Vec<&str> {
        self.languages
            .as_ref()
            .map(|langs| langs.values().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Case-insensitive check against language names.
    pub fn speaks(&self, language: &str) -> bool {
        self.language_names()
            .iter()
            .any(|name| name.eq_ignore_ascii_case(language))
    }

    /// Currencies rendered as `Euro (€)`, ordered by currency code.
    pub fn currency_names(&self) -> Vec<String> {
        self.currencies
            .as_ref()
            .map(|currencies| {
                currencies
                    .values()
                    .map(|c| match &c.symbol {
                        Some(symbol) => format!("{} ({})", c.name, symbol),
                        None => c.name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Full calling codes, e.g. `+1201`, `+1202`. Root alone when there are no suffixes.
    pub fn calling_codes(&self) -> Vec<String> {
        let Some(root) = self.idd.root.as_deref() else {
            return Vec::new();
        };
        if self.idd.suffixes.is_empty() {
            return vec![root.to_string()];
        }
        self.idd
            .suffixes
            .iter()
            .map(|suffix| format!("{root}{suffix}"))
            .collect()
    }

    /// Border codes (cca3). Empty for island nations.
    pub fn border_codes(&self) -> &[String] {
        self.borders.as_deref().unwrap_or(&[])
    }

    /// Labelled facts for detail views, in display order. Missing values render as `N/A`.
    pub fn facts(&self) -> Vec<(&'static str, String)> {
        fn or_na(values: Vec<String>) -> String {
            if values.is_empty() {
                "N/A".to_string()
            } else {
                values.join(", ")
            }
        }

        vec![
            ("Official name", self.name.official.clone()),
            (
                "Capital",
                self.primary_capital().unwrap_or("N/A").to_string(),
            ),
            ("Region", self.region.clone()),
            (
                "Subregion",
                self.subregion.clone().unwrap_or_else(|| "N/A".to_string()),
            ),
            ("Population", format_thousands(self.population)),
            (
                "Area",
                self.area.map_or_else(
                    || "N/A".to_string(),
                    |area| format!("{} km²", format_thousands(area.round() as u64)),
                ),
            ),
            (
                "Languages",
                or_na(self.language_names().into_iter().map(String::from).collect()),
            ),
            ("Currencies", or_na(self.currency_names())),
            ("Timezones", or_na(self.timezones.clone())),
            ("Top-level domain", or_na(self.tld.clone())),
            ("Calling codes", or_na(self.calling_codes())),
            (
                "Drives on",
                self.car.side.clone().unwrap_or_else(|| "N/A".to_string()),
            ),
            ("Borders", or_na(self.border_codes().to_vec())),
            ("Codes", format!("{} / {}", self.cca2, self.cca3)),
        ]
    }
}

/// Formats an integer with comma thousands separators: `331002651` → `331,002,651`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
