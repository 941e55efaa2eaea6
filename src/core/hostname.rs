use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::errors::{BuildError, BuildResult};

// alphanumeric ends, hyphens only in the interior; a lone character is fine
static HOSTNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z0-9]+[a-zA-Z0-9-]*[a-zA-Z0-9]+|[a-zA-Z0-9])$")
        .expect("hostname pattern is valid")
});

pub const INVALID_HOSTNAME: &str = "only letters, numbers, or hyphens allowed in hostname";

/// Picks the explicit hostname if there is one, the VM name otherwise, and
/// checks it against DNS label syntax.
pub fn hostname_for(explicit: Option<&str>, default_name: &str) -> BuildResult<String> {
    let hostname = explicit.unwrap_or(default_name);
    if is_valid_hostname(hostname) {
        Ok(hostname.to_string())
    } else {
        Err(BuildError::validation(INVALID_HOSTNAME))
    }
}

pub fn is_valid_hostname(hostname: &str) -> bool {
    HOSTNAME_RE.is_match(hostname)
}
