//! Driver and route types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geo::Location;

/// What happens at a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StopKind {
    #[default]
    Delivery,
    Pickup,
}

impl fmt::Display for StopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopKind::Delivery => f.write_str("delivery"),
            StopKind::Pickup => f.write_str("pickup"),
        }
    }
}

/// One stop on a driver's route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub booking_id: String,
    pub kind: StopKind,
    pub location: Location,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
}

/// Inclusive date range during which a driver cannot take work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unavailability {
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Unavailability {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// A driver and the stops already on their schedule.
///
/// `stops` is ordered by date and, within a date, by route order.
/// `route_version` changes on every stop mutation so a plan computed
/// against an older route can be detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub driver_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_daily_stops: Option<usize>,
    pub unavailable: Vec<Unavailability>,
    pub stops: Vec<Stop>,
    pub route_version: u64,
}

impl Driver {
    pub fn new(driver_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            driver_id: driver_id.into(),
            name: name.into(),
            phone: None,
            is_active: true,
            max_daily_stops: None,
            unavailable: Vec::new(),
            stops: Vec::new(),
            route_version: 0,
        }
    }

    /// Total stops on the schedule.
    pub fn current_load(&self) -> usize {
        self.stops.len()
    }

    /// Route for one day, in driving order.
    pub fn stops_on(&self, date: NaiveDate) -> impl Iterator<Item = &Stop> {
        self.stops.iter().filter(move |s| s.date == date)
    }

    pub fn load_on(&self, date: NaiveDate) -> usize {
        self.stops_on(date).count()
    }

    pub fn is_unavailable_on(&self, date: NaiveDate) -> bool {
        self.unavailable.iter().any(|u| u.covers(date))
    }

    pub fn daily_capacity(&self, default: usize) -> usize {
        self.max_daily_stops.unwrap_or(default)
    }

    /// Insert a stop at `route_index` within the stop's day.
    ///
    /// An index past the end of that day's route appends to the day.
    pub fn insert_stop(&mut self, route_index: usize, stop: Stop) {
        let day_positions: Vec<usize> = self
            .stops
            .iter()
            .enumerate()
            .filter(|(_, s)| s.date == stop.date)
            .map(|(i, _)| i)
            .collect();

        let position = match day_positions.get(route_index) {
            Some(&pos) => pos,
            None => self.stops.partition_point(|s| s.date <= stop.date),
        };

        self.stops.insert(position, stop);
        self.route_version += 1;
    }

    /// Keep `stops` ordered by date, preserving route order within a day.
    pub fn normalize_route(&mut self) {
        self.stops.sort_by_key(|s| s.date);
    }
}
