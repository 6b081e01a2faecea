pub mod file;

use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Read `T` from `--input <file.json>` or, failing that, from piped stdin.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_json(path);
    }
    match piped_json()? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Err(format!("--input <file.json> or stdin required for {}", what).into()),
    }
}

/// The piped stdin body, or `None` on a terminal or an empty pipe.
fn piped_json() -> io::Result<Option<String>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    let trimmed = buffer.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}
