//! Greedy nearest-neighbor tour construction.
//!
//! The tour starts at the merchant flagged as the starting point, repeatedly hops to the closest unvisited merchant,
//! and ends with the leg to the user. Not globally optimal, but deterministic and fast for the small point sets an
//! estimate ever carries.
use thiserror::Error;

use super::{haversine, Coordinates};
use crate::db_types::MerchantId;

#[derive(Debug, Clone, Error)]
pub enum RouteError {
    #[error("exactly one point must be flagged as the starting point, got {0}")]
    StartingPointCount(usize),
}

/// One merchant stop as seen by the planner.
#[derive(Debug, Clone, Copy)]
pub struct RoutePoint {
    pub merchant_id: MerchantId,
    pub location: Coordinates,
    pub is_start: bool,
}

/// A completed tour: the visiting order over all merchants plus the total length including the final leg to the user.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub stops: Vec<MerchantId>,
    pub total_meters: f64,
}

/// Builds the nearest-neighbor tour over `points`, ending at `terminal` (the user's location).
///
/// Ties on distance resolve to the earliest point in input order, which makes the output a pure function of the
/// input sequence.
pub fn plan(points: &[RoutePoint], terminal: Coordinates) -> Result<RoutePlan, RouteError> {
    let start_count = points.iter().filter(|p| p.is_start).count();
    if start_count != 1 {
        return Err(RouteError::StartingPointCount(start_count));
    }
    let start = points.iter().position(|p| p.is_start).expect("checked above");

    let mut stops = Vec::with_capacity(points.len());
    let mut remaining: Vec<&RoutePoint> = points.iter().enumerate().filter(|(i, _)| *i != start).map(|(_, p)| p).collect();
    let mut current = points[start];
    let mut total = 0.0;
    stops.push(current.merchant_id);

    while !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;
        for (i, p) in remaining.iter().enumerate() {
            let d = haversine(current.location, p.location);
            if d < best_dist {
                best_dist = d;
                best_idx = i;
            }
        }
        let next = remaining.remove(best_idx);
        stops.push(next.merchant_id);
        total += best_dist;
        current = *next;
    }

    total += haversine(current.location, terminal);
    Ok(RoutePlan { stops, total_meters: total })
}
