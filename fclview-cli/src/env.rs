use tracing::warn;

/// Interpret a string value such as "50" or "unlimited" as an element count.
///
/// Returns `None` if the value is not recognized.
pub fn str_as_limit(s: &str) -> Option<usize> {
    match s.trim() {
        "unlimited" | "none" | "0" => Some(usize::MAX),
        s => s.parse().ok(),
    }
}

/// Return the element limit controlled by an environment variable, or
/// `default` if the variable is unset or invalid.
pub fn env_limit(name: &str, default: usize) -> usize {
    let Ok(value) = std::env::var(name) else {
        return default;
    };
    str_as_limit(&value).unwrap_or_else(|| {
        warn!(name, value = %value, "unrecognized element limit");
        default
    })
}
