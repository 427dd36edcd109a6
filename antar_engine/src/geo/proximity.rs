//! Two-tier proximity validation.
//!
//! Tier one classifies every merchant by hex-grid distance alone. The [2500, 3500] meter band around the
//! authoritative 3000 m threshold absorbs the worst-case error of the grid approximation at resolution 10, so a
//! verdict of [`ProximityVerdict::Ok`] or [`ProximityVerdict::TooFar`] can never disagree with the great-circle
//! truth. Anything inside the band, and any pair of cells with an undefined grid path, is [`Ambiguous`] and must be
//! settled by the caller with the exact check in [`within_exact_range`].
//!
//! [`Ambiguous`]: ProximityVerdict::Ambiguous
use super::{
    grid_meters, haversine, to_cell, Coordinates, MAX_DELIVERY_DISTANCE_METERS, SAFE_ACCEPT_METERS, SAFE_REJECT_METERS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityVerdict {
    /// Every merchant is conclusively within delivery range.
    Ok,
    /// At least one merchant is conclusively out of range.
    TooFar,
    /// The grid approximation cannot decide; fall back to the exact check.
    Ambiguous,
}

/// Classifies a set of merchant points against the user's location using only grid distances.
pub fn grid_verdict(user: Coordinates, merchants: &[Coordinates]) -> ProximityVerdict {
    let user_cell = match to_cell(user) {
        Ok(cell) => cell,
        Err(_) => return ProximityVerdict::Ambiguous,
    };
    let mut ambiguous = false;
    for merchant in merchants {
        let cell = match to_cell(*merchant) {
            Ok(cell) => cell,
            Err(_) => {
                ambiguous = true;
                continue;
            },
        };
        match grid_meters(user_cell, cell) {
            None => ambiguous = true,
            Some(d) if d > SAFE_REJECT_METERS => return ProximityVerdict::TooFar,
            Some(d) if d >= SAFE_ACCEPT_METERS => ambiguous = true,
            Some(_) => {},
        }
    }
    if ambiguous {
        ProximityVerdict::Ambiguous
    } else {
        ProximityVerdict::Ok
    }
}

/// The authoritative check: true iff every merchant is within [`MAX_DELIVERY_DISTANCE_METERS`] great-circle meters
/// of the user (inclusive).
pub fn within_exact_range(user: Coordinates, merchants: &[Coordinates]) -> bool {
    merchants.iter().all(|m| haversine(user, *m) <= MAX_DELIVERY_DISTANCE_METERS)
}
