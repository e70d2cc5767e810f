use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Read piped loan input from stdin, JSON or YAML.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Input that opens like a JSON object reports the JSON error.
    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) if trimmed.starts_with('{') => Err(json_err.into()),
        Err(_) => Ok(Some(serde_yaml::from_str(trimmed)?)),
    }
}
