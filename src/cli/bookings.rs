//! Bookings command implementation

use crate::api::BookingSummary;
use crate::cli::output::{format_bookings_json, format_bookings_table};
use crate::cli::BookingsArgs;
use crate::engine::AssignmentEngine;

/// Handle `phineas bookings` command
pub fn handle_bookings(
    args: &BookingsArgs,
    engine: &AssignmentEngine,
) -> Result<String, Box<dyn std::error::Error>> {
    let bookings: Vec<BookingSummary> = engine
        .list_unassigned_bookings()
        .into_iter()
        .map(BookingSummary::from)
        .collect();

    if args.json {
        Ok(format_bookings_json(&bookings)?)
    } else {
        Ok(format_bookings_table(&bookings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhineasConfig;
    use crate::engine::FixedClock;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn example_engine() -> AssignmentEngine {
        let config: PhineasConfig =
            toml::from_str(include_str!("../../phineas.example.toml")).unwrap();
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2030, 6, 1).unwrap());
        AssignmentEngine::from_config(&config, Arc::new(clock)).unwrap()
    }

    #[test]
    fn test_bookings_json_excludes_assigned() {
        let args = BookingsArgs {
            json: true,
            config: PathBuf::from("phineas.toml"),
        };
        let output = handle_bookings(&args, &example_engine()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["total"], 2);
        let ids: Vec<&str> = value["bookings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["booking_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["bk-1001", "bk-1002"]);
    }

    #[test]
    fn test_bookings_table() {
        let args = BookingsArgs {
            json: false,
            config: PathBuf::from("phineas.toml"),
        };
        let output = handle_bookings(&args, &example_engine()).unwrap();
        assert!(output.contains("ORD-1001"));
        assert!(!output.contains("ORD-0900"));
    }
}
