//! Best-insertion search over a driver's route.
//!
//! A route is an open path that starts at the depot and visits its stops in
//! order. Inserting a point at position `i` places it between stop `i - 1`
//! (the depot when `i == 0`) and stop `i`; position `route.len()` appends it.

use crate::geo::{haversine_miles, Coordinates};

/// Where to insert a new stop and what it costs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insertion {
    pub index: usize,
    /// Miles added to the route, never negative
    pub added_distance: f64,
}

/// Miles added by inserting `point` at `index`.
///
/// `index` is clamped to `route.len()`.
pub fn insertion_cost(depot: Coordinates, route: &[Coordinates], point: Coordinates, index: usize) -> f64 {
    let index = index.min(route.len());
    let prev = if index == 0 { depot } else { route[index - 1] };
    let added = match route.get(index) {
        Some(&next) => {
            haversine_miles(prev, point) + haversine_miles(point, next) - haversine_miles(prev, next)
        }
        None => haversine_miles(prev, point),
    };
    added.max(0.0)
}

/// Cheapest insertion position; the lowest index wins ties.
///
/// # Examples
///
/// ```
/// use phineas::geo::Coordinates;
/// use phineas::scoring::best_insertion;
///
/// let depot = Coordinates::new(0.0, 0.0);
/// let route = [Coordinates::new(0.01, 0.0), Coordinates::new(0.03, 0.0)];
///
/// // A point between the two stops goes between them at no extra cost.
/// let ins = best_insertion(depot, &route, Coordinates::new(0.02, 0.0));
/// assert_eq!(ins.index, 1);
/// assert!(ins.added_distance < 1e-9);
/// ```
pub fn best_insertion(depot: Coordinates, route: &[Coordinates], point: Coordinates) -> Insertion {
    best_insertion_from(depot, route, point, 0)
}

/// Cheapest insertion position at or after `min_index`.
///
/// Used to keep a pickup after its delivery on a same-day route.
pub fn best_insertion_from(
    depot: Coordinates,
    route: &[Coordinates],
    point: Coordinates,
    min_index: usize,
) -> Insertion {
    let start = min_index.min(route.len());
    let mut best = Insertion {
        index: route.len(),
        added_distance: f64::INFINITY,
    };
    for index in start..=route.len() {
        let added = insertion_cost(depot, route, point, index);
        if added < best.added_distance {
            best = Insertion {
                index,
                added_distance: added,
            };
        }
    }
    best
}

/// Distance from the nearest stop, or from the depot for an empty route.
pub fn nearest_distance(depot: Coordinates, route: &[Coordinates], point: Coordinates) -> f64 {
    if route.is_empty() {
        return haversine_miles(depot, point);
    }
    route
        .iter()
        .map(|&stop| haversine_miles(stop, point))
        .fold(f64::INFINITY, f64::min)
}

/// Total miles driven from the depot through every stop.
pub fn route_length(depot: Coordinates, route: &[Coordinates]) -> f64 {
    let mut prev = depot;
    let mut total = 0.0;
    for &stop in route {
        total += haversine_miles(prev, stop);
        prev = stop;
    }
    total
}
