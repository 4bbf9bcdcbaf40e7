use std::fmt;

/// The single failure type surfaced by the gateway.
///
/// `message` is what callers show to users (e.g. `Failed to fetch country with code: XYZ`).
/// `status` carries the upstream HTTP status when one was received; transport and
/// decode failures leave it `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub message: String,
    pub status: Option<u16>,
}

impl FetchError {
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    /// True when the upstream answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FetchError {}
