//! Configuration for storemap.
//!
//! Every value has a compile-time default and can be overridden at runtime via
//! a dedicated environment variable:
//! - `STOREMAP_DATA_DIR`: directory holding the catalog blob. Without it the
//!   catalog goes under `$HOME/.config/storemap/data`, or `./data` when no
//!   home directory is known.
//! - `STOREMAP_MAP_ZOOM`: zoom level used when centring on a store
//! - `STOREMAP_LOCATION`: current position as `lat,lng`

use std::ffi::OsString;
use std::path::PathBuf;
use store_catalog::app::DEFAULT_ZOOM;
use store_catalog::Coords;

const HOME_DATA_SUBDIR: &str = ".config/storemap/data";
const LOCAL_DATA_DIR: &str = "data";

/// Where the catalog blob is stored, from the environment.
pub fn get_data_dir() -> PathBuf {
    resolve_data_dir(
        std::env::var_os("STOREMAP_DATA_DIR"),
        std::env::var_os("HOME"),
    )
}

fn resolve_data_dir(explicit: Option<OsString>, home: Option<OsString>) -> PathBuf {
    explicit
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|home| PathBuf::from(home).join(HOME_DATA_SUBDIR)))
        .unwrap_or_else(|| PathBuf::from(".").join(LOCAL_DATA_DIR))
}

/// Get the map zoom level. Unparsable values fall back to 13.
pub fn get_map_zoom() -> u8 {
    std::env::var("STOREMAP_MAP_ZOOM")
        .ok()
        .and_then(|z| z.parse().ok())
        .unwrap_or(DEFAULT_ZOOM)
}

/// Get the configured current position, if any.
pub fn get_location() -> Option<Result<Coords, String>> {
    std::env::var("STOREMAP_LOCATION")
        .ok()
        .map(|value| parse_coords(&value))
}

/// Parse `"lat,lng"` into coordinates, checking their ranges.
pub fn parse_coords(value: &str) -> Result<Coords, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lng\", got {:?}", value))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude {:?}: {}", lat, e))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude {:?}: {}", lng, e))?;
    let coords = Coords::new(lat, lng);
    if !coords.is_valid() {
        return Err(format!("position {} is out of range", coords));
    }
    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_precedence() {
        let some = |s: &str| Some(OsString::from(s));

        assert_eq!(
            resolve_data_dir(some("/srv/stores"), some("/home/ana")),
            PathBuf::from("/srv/stores")
        );
        assert_eq!(
            resolve_data_dir(None, some("/home/ana")),
            PathBuf::from("/home/ana/.config/storemap/data")
        );
        assert_eq!(
            resolve_data_dir(some(""), some("/home/ana")),
            PathBuf::from("/home/ana/.config/storemap/data")
        );
        assert_eq!(resolve_data_dir(None, None), PathBuf::from("./data"));
    }

    #[test]
    fn test_parse_coords() {
        assert_eq!(parse_coords("40.0,-73.0"), Ok(Coords::new(40.0, -73.0)));
        assert_eq!(parse_coords(" 1.5 , 2.5 "), Ok(Coords::new(1.5, 2.5)));
    }

    #[test]
    fn test_parse_coords_rejects_garbage() {
        assert!(parse_coords("40.0").is_err());
        assert!(parse_coords("north,-73.0").is_err());
        assert!(parse_coords("91.0,0.0").is_err());
        assert!(parse_coords("0.0,181.0").is_err());
        assert!(parse_coords("NaN,0.0").is_err());
        assert!(parse_coords("0.0,inf").is_err());
    }
}
