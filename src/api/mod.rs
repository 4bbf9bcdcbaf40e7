//! # Country Data Gateway
//!
//! Thin request layer over the upstream country REST API (restcountries v3.1 shape).
//! Every operation issues exactly one request: no caching, no retry, no timeout.

pub mod client;
pub mod error;
pub mod types;

pub use client::{CountryClient, CountrySource};
pub use error::FetchError;
pub use types::{Car, Country, CountryName, Currency, Flags, Idd};
