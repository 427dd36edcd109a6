use antar_engine::geo::Coordinates;

use crate::errors::ServerError;

/// Parses the `lat,lng` path segment of the nearby endpoint.
pub fn parse_coords(coords: &str) -> Result<Coordinates, ServerError> {
    let parts: Vec<&str> = coords.split(',').collect();
    if parts.len() != 2 {
        return Err(ServerError::bad_request("invalid coordinates format. Use lat,lng"));
    }
    let lat: f64 = parts[0].trim().parse().map_err(|_| ServerError::bad_request("invalid latitude"))?;
    let lng: f64 = parts[1].trim().parse().map_err(|_| ServerError::bad_request("invalid longitude"))?;
    Coordinates::new(lat, lng)
        .map_err(|_| ServerError::bad_request("latitude must be [-90,90], longitude [-180,180]"))
}
