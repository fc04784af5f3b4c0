//! Recommend command implementation

use crate::cli::output::{format_json, format_recommendations_table};
use crate::cli::RecommendArgs;
use crate::engine::AssignmentEngine;

/// Handle `phineas recommend <booking_id>` command
pub async fn handle_recommend(
    args: &RecommendArgs,
    engine: &AssignmentEngine,
) -> Result<String, Box<dyn std::error::Error>> {
    let set = engine.driver_recommendations(&args.booking_id).await?;

    if args.json {
        Ok(format_json(&set)?)
    } else {
        Ok(format_recommendations_table(&set))
    }
}
