//! Geospatial primitives.
//!
//! Two distance measures coexist here. The H3 hex grid gives an O(1) approximation (cell lookup plus an integer ring
//! count times a fixed edge length) that is orders of magnitude cheaper than trigonometry, and the haversine formula
//! gives the authoritative great-circle meters. The proximity validator combines the two; see [`proximity`].
pub mod proximity;
pub mod route;

use h3o::{CellIndex, LatLng, Resolution};
use thiserror::Error;

/// H3 resolution used for all grid lookups.
pub const GRID_RESOLUTION: Resolution = Resolution::Ten;
/// Hexagon edge length in meters at [`GRID_RESOLUTION`].
pub const EDGE_LENGTH_METERS: f64 = 104.8;
/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
/// Assumed courier speed.
pub const COURIER_SPEED_KMH: f64 = 40.0;
/// The authoritative great-circle rejection threshold (inclusive).
pub const MAX_DELIVERY_DISTANCE_METERS: f64 = 3_000.0;
/// Grid distances below this are conclusively within range.
pub const SAFE_ACCEPT_METERS: f64 = 2_500.0;
/// Grid distances above this are conclusively out of range.
pub const SAFE_REJECT_METERS: f64 = 3_500.0;

#[derive(Debug, Clone, Error)]
pub enum GeoError {
    #[error("latitude must be between -90 and 90, got {0}")]
    InvalidLatitude(f64),
    #[error("longitude must be between -180 and 180, got {0}")]
    InvalidLongitude(f64),
}

//--------------------------------------    Coordinates    -----------------------------------------------------------
/// A validated (lat, lng) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    lat: f64,
    lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&lat) || lat.is_nan() {
            return Err(GeoError::InvalidLatitude(lat));
        }
        if !(-180.0..=180.0).contains(&lng) || lng.is_nan() {
            return Err(GeoError::InvalidLongitude(lng));
        }
        Ok(Self { lat, lng })
    }

    /// For values that already come from a trusted source, such as a database row that was validated on the way in.
    pub const fn new_unchecked(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// Great-circle distance in meters between two points, on a sphere of mean Earth radius.
pub fn haversine(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Maps a point to its hex cell at [`GRID_RESOLUTION`].
pub fn to_cell(point: Coordinates) -> Result<CellIndex, GeoError> {
    let ll = LatLng::new(point.lat, point.lng).map_err(|_| {
        if (-90.0..=90.0).contains(&point.lat) {
            GeoError::InvalidLongitude(point.lng)
        } else {
            GeoError::InvalidLatitude(point.lat)
        }
    })?;
    Ok(ll.to_cell(GRID_RESOLUTION))
}

/// Number of hex steps between two cells, or `None` when the grid path is undefined (cells on opposite sides of a
/// pentagon or otherwise disconnected at this resolution).
pub fn grid_distance(a: CellIndex, b: CellIndex) -> Option<i32> {
    if a == b {
        return Some(0);
    }
    a.grid_distance(b).ok()
}

/// Approximate meters between two cells: ring count times the fixed edge length. `None` when the ring count is
/// undefined.
pub fn grid_meters(a: CellIndex, b: CellIndex) -> Option<f64> {
    grid_distance(a, b).map(|d| f64::from(d) * EDGE_LENGTH_METERS)
}

/// Delivery time estimate for a total route length, rounded to whole minutes at [`COURIER_SPEED_KMH`].
pub fn time_minutes(total_distance_meters: f64) -> i64 {
    let km = total_distance_meters / 1000.0;
    let minutes = km / COURIER_SPEED_KMH * 60.0;
    minutes.round() as i64
}
