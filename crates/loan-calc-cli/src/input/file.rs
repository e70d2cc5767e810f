use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a loan input file and deserialise into a typed struct.
///
/// `.yaml` / `.yml` files are parsed as YAML, everything else as JSON.
pub fn read_input<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    parse_contents(&canonical, &contents)
}

fn parse_contents<T: DeserializeOwned>(
    path: &Path,
    contents: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let parsed = if is_yaml {
        serde_yaml::from_str(contents).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(contents).map_err(|e| e.to_string())
    };
    parsed.map_err(|e| format!("Failed to parse '{}': {}", path.display(), e).into())
}

/// Resolve the path against the working directory and check it is a file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
