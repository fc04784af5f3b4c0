//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating `phineas.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read phineas config: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file not found: {0} (run `phineas config init` to create one)")]
    NotFound(PathBuf),

    #[error("invalid phineas.toml: {0}")]
    Parse(String),

    #[error("invalid {} setting '{field}': {message}", section_of(.field))]
    Validation { field: String, message: String },
}

/// Table header a dotted field path lives under, e.g. `drivers[2].id`
/// belongs to `[[drivers]]` and `server.port` to `[server]`.
fn section_of(field: &str) -> String {
    let head = field.split(['.', '[']).next().unwrap_or(field);
    match head {
        "drivers" | "bookings" => format!("[[{}]]", head),
        _ => format!("[{}]", head),
    }
}
