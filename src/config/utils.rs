use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Read an environment variable, treating blank values as unset.
pub(crate) fn env_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse an environment variable.
pub(crate) fn parse_env<T>(name: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: Display,
{
    match env_var(name) {
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("Invalid value for {name}: '{value}' ({e})")),
        None => Ok(None),
    }
}

/// Split a comma-separated list, dropping empty entries.
pub(crate) fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list(" en-US, es-US ,,ja-JP "),
            vec!["en-US", "es-US", "ja-JP"]
        );
        assert!(parse_list(" , ").is_empty());
    }
}
