//! Scan command implementation

use crate::cli::output::{format_json, format_scan_table};
use crate::cli::ScanArgs;
use crate::engine::AssignmentEngine;

/// Handle `phineas scan` command
///
/// Proposals live in memory, so a one-shot scan previews what a running
/// server would propose.
pub async fn handle_scan(
    args: &ScanArgs,
    engine: &AssignmentEngine,
) -> Result<String, Box<dyn std::error::Error>> {
    let summary = engine.scan_assignments().await?;

    if args.json {
        Ok(format_json(&summary)?)
    } else {
        Ok(format_scan_table(&summary))
    }
}
