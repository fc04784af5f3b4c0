//! Config command handlers

use crate::cli::ConfigInitArgs;
use crate::config::{ConfigError, PhineasConfig};
use std::fs;

const EXAMPLE_CONFIG: &str = include_str!("../../phineas.example.toml");

/// Handle `phineas config init` command
///
/// Writes the sample fleet configuration after checking that it loads,
/// and reports the sections an operator fills in next.
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<String, Box<dyn std::error::Error>> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "File already exists: {}. Use --force to overwrite.",
            args.output.display()
        )
        .into());
    }

    let sample: PhineasConfig =
        toml::from_str(EXAMPLE_CONFIG).map_err(|e| ConfigError::Parse(e.to_string()))?;
    sample.validate()?;

    fs::write(&args.output, EXAMPLE_CONFIG)?;

    Ok(format!(
        "✓ Configuration file created: {}\n  \
         Sample fleet: {} drivers, {} bookings, geocoder {:?}.\n  \
         Edit [depot], [[drivers]] and [[bookings]] to describe your fleet.",
        args.output.display(),
        sample.drivers.len(),
        sample.bookings.len(),
        sample.geocoding.provider,
    ))
}
