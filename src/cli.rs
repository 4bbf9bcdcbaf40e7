//! # CLI Adapter
//!
//! One-shot commands over the session store and the country gateway.
//! Each command returns its output as a `String` so it can be tested
//! without a terminal; `main` prints it.

use std::fmt;
use std::fmt::Write as _;

use clap::Subcommand;
use unicode_width::UnicodeWidthStr;

use crate::api::types::format_thousands;
use crate::api::{Country, CountrySource, FetchError};
use crate::core::catalog::{self, CountryFilter};
use crate::core::session::{AuthError, SessionStore, User, canonical_code};

/// Width used for wrapping detail values.
const DETAIL_WIDTH: usize = 78;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive explorer with search-as-you-type (default)
    Explore,
    /// List countries, optionally filtered
    List {
        /// Only countries in this region (Africa, Americas, Asia, Europe, Oceania)
        #[arg(short, long)]
        region: Option<String>,
        /// Only countries where this language is spoken
        #[arg(short, long)]
        language: Option<String>,
        /// Only countries whose name contains this text
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show details for one country by alpha-2 or alpha-3 code
    Show { code: String },
    /// List the countries of a region
    Region { name: String },
    /// Name suggestions for a partial query
    Search { query: String },
    /// The most populous countries
    Featured {
        #[arg(short, long, default_value_t = 3)]
        count: usize,
    },
    /// List every language spoken across all countries
    Languages,
    /// Sign in (demo account: demo / password)
    Login { username: String, password: String },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Manage favorite countries (lists them by default)
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesCommand>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum FavoritesCommand {
    List,
    Add { code: String },
    Remove { code: String },
    Toggle { code: String },
}

#[derive(Debug)]
pub enum CliError {
    Auth(AuthError),
    Fetch(FetchError),
    NotFound(String),
    /// The command needs the interactive terminal, not `execute`.
    Interactive,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Auth(AuthError::NotAuthenticated) => {
                write!(f, "Not logged in. Run `atlas login demo password` first.")
            }
            CliError::Auth(AuthError::InvalidCredentials) => {
                write!(f, "Invalid username or password")
            }
            CliError::Auth(e) => write!(f, "{e}"),
            CliError::Fetch(e) => write!(f, "{e}"),
            CliError::NotFound(what) => write!(f, "{what}"),
            CliError::Interactive => write!(f, "this command runs in the interactive explorer"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<AuthError> for CliError {
    fn from(e: AuthError) -> Self {
        CliError::Auth(e)
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Fetch(e)
    }
}

/// Runs a non-interactive command and returns what should be printed.
pub async fn execute(
    command: Command,
    session: &SessionStore,
    source: &dyn CountrySource,
) -> Result<String, CliError> {
    match command {
        Command::Explore => Err(CliError::Interactive),
        Command::List {
            region,
            language,
            query,
        } => {
            let countries = source.get_all_countries().await?;
            let filter = CountryFilter {
                query: query.unwrap_or_default(),
                region,
                language,
            };
            let visible = filter.apply(&countries);
            Ok(format_table(&visible, |c| session.is_favorite(&c.cca3)))
        }
        Command::Show { code } => {
            let country = source
                .get_country_by_code(&code)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| CliError::NotFound(format!("Country not found: {code}")))?;
            let mut out = format_detail(&country, session.is_favorite(&country.cca3));
            if !country.border_codes().is_empty() {
                // Neighbors share a region with the country in nearly every case
                if let Ok(region) = source.get_countries_by_region(&country.region).await {
                    let neighbors = catalog::neighbors(&country, &region);
                    if !neighbors.is_empty() {
                        let names: Vec<&str> =
                            neighbors.iter().map(|c| c.name.common.as_str()).collect();
                        out.push_str(&format_field("Neighbors", &names.join(", ")));
                    }
                }
            }
            Ok(out)
        }
        Command::Region { name } => {
            let countries = source.get_countries_by_region(&name).await?;
            let all: Vec<&Country> = countries.iter().collect();
            Ok(format_table(&all, |c| session.is_favorite(&c.cca3)))
        }
        Command::Search { query } => {
            let suggestions = source.get_country_suggestions(&query).await;
            if suggestions.is_empty() {
                return Ok(format!("No countries match '{query}'\n"));
            }
            let all: Vec<&Country> = suggestions.iter().collect();
            Ok(format_table(&all, |c| session.is_favorite(&c.cca3)))
        }
        Command::Featured { count } => {
            let countries = source.get_all_countries().await?;
            let featured = catalog::featured(&countries, count);
            Ok(format_table(&featured, |c| session.is_favorite(&c.cca3)))
        }
        Command::Languages => {
            let countries = source.get_all_countries().await?;
            let mut out = String::new();
            for language in catalog::all_languages(&countries) {
                let _ = writeln!(out, "{language}");
            }
            Ok(out)
        }
        Command::Login { username, password } => {
            let user = session.login(&username, &password).await?;
            Ok(format!(
                "Logged in as {} ({})\n",
                user.username, user.email
            ))
        }
        Command::Logout => {
            let was_authenticated = session.is_authenticated();
            session.logout();
            Ok(if was_authenticated {
                "Logged out\n".to_string()
            } else {
                "Not logged in\n".to_string()
            })
        }
        Command::Whoami => Ok(match session.current_user() {
            Some(user) => format_user(&user),
            None => "Not logged in\n".to_string(),
        }),
        Command::Favorites { action } => {
            execute_favorites(action.unwrap_or(FavoritesCommand::List), session, source).await
        }
    }
}

async fn execute_favorites(
    action: FavoritesCommand,
    session: &SessionStore,
    source: &dyn CountrySource,
) -> Result<String, CliError> {
    let changed = |verb: &str, code: &str, user: &User| {
        format!(
            "{verb} {code}. Favorites: {}\n",
            user.favorite_countries.as_slice().join(", ")
        )
    };

    match action {
        FavoritesCommand::List => {
            let user = session.current_user().ok_or(AuthError::NotAuthenticated)?;
            if user.favorite_countries.is_empty() {
                return Ok("No favorites yet\n".to_string());
            }
            let codes = user.favorite_countries.as_slice().to_vec();
            let countries = catalog::resolve_favorites(source, &codes).await;
            let all: Vec<&Country> = countries.iter().collect();
            Ok(format_table(&all, |_| true))
        }
        FavoritesCommand::Add { code } => {
            let code = canonical_code(&code);
            let user = session.add_favorite_country(&code).await?;
            Ok(changed("Added", &code, &user))
        }
        FavoritesCommand::Remove { code } => {
            let code = canonical_code(&code);
            let user = session.remove_favorite_country(&code).await?;
            Ok(changed("Removed", &code, &user))
        }
        FavoritesCommand::Toggle { code } => {
            let code = canonical_code(&code);
            let user = session.toggle_favorite(&code).await?;
            let verb = if user.favorite_countries.contains(&code) {
                "Added"
            } else {
                "Removed"
            };
            Ok(changed(verb, &code, &user))
        }
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Left-aligns `text` in `width` display columns (CJK and emoji count double).
fn pad(text: &str, width: usize) -> String {
    let used = text.width();
    format!("{text}{}", " ".repeat(width.saturating_sub(used)))
}

/// Renders countries as an aligned table. `is_favorite` marks rows with `*`.
pub fn format_table(countries: &[&Country], is_favorite: impl Fn(&Country) -> bool) -> String {
    if countries.is_empty() {
        return "No countries found\n".to_string();
    }

    let headers = ["", "CODE", "NAME", "CAPITAL", "REGION", "POPULATION"];
    let rows: Vec<[String; 6]> = countries
        .iter()
        .map(|&c| {
            [
                if is_favorite(c) { "*" } else { "" }.to_string(),
                c.cca3.clone(),
                c.name.common.clone(),
                c.primary_capital().unwrap_or("-").to_string(),
                c.region.clone(),
                format_thousands(c.population),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.width());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let render = |cells: &[&str]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| pad(cell, width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", render(&headers[..]));
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        let _ = writeln!(out, "{}", render(&cells));
    }
    out
}

/// One labelled line, wrapped under the value column when too long.
fn format_field(label: &str, value: &str) -> String {
    const LABEL_WIDTH: usize = 18;
    let indent = " ".repeat(LABEL_WIDTH);
    let options = textwrap::Options::new(DETAIL_WIDTH)
        .initial_indent(&indent)
        .subsequent_indent(&indent);
    let wrapped = textwrap::fill(value, options);
    let value = wrapped.strip_prefix(indent.as_str()).unwrap_or(&wrapped);
    let line = format!("{}{}", pad(&format!("{label}:"), LABEL_WIDTH), value);
    format!("{}\n", line.trim_end())
}

/// Multi-line detail card for one country.
pub fn format_detail(country: &Country, is_favorite: bool) -> String {
    let star = if is_favorite { " *" } else { "" };
    let mut out = format!("{} ({}){}\n", country.name.common, country.cca3, star);
    let underline = "=".repeat(out.trim_end().width());
    let _ = writeln!(out, "{underline}");
    for (label, value) in country.facts() {
        out.push_str(&format_field(label, &value));
    }
    if let Some(flag) = country.flags.svg.as_deref().or(country.flags.png.as_deref()) {
        out.push_str(&format_field("Flag", flag));
    }
    out
}

fn format_user(user: &User) -> String {
    let favorites = if user.favorite_countries.is_empty() {
        "none".to_string()
    } else {
        user.favorite_countries.as_slice().join(", ")
    };
    format!(
        "{} <{}> (id {})\nFavorites: {}\n",
        user.username, user.email, user.id, favorites
    )
}
