//! Terminal stand-ins for the map widget and the location service.

use crate::config;
use std::io::Write;
use store_catalog::map::Marker;
use store_catalog::{Coords, LocationError, LocationProvider, MapView, StoreId};

/// A "map" that prints what it would draw.
pub struct TerminalMap<W> {
    out: W,
}

impl<W: Write> TerminalMap<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::warn!("Failed to write map output: {}", e);
        }
    }
}

impl<W: Write> MapView for TerminalMap<W> {
    fn render_marker(&mut self, marker: &Marker) {
        self.line(format_args!(
            "📍 ({}) [{}]\n{}",
            marker.coords,
            marker.style_class,
            indent(&marker.popup)
        ));
    }

    fn remove_marker(&mut self, id: &StoreId) {
        self.line(format_args!("✖ marker {} removed", id));
    }

    fn pan_to(&mut self, coords: Coords, zoom: u8) {
        self.line(format_args!("Map centred on ({}) at zoom {}", coords, zoom));
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("    {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Position read from `STOREMAP_LOCATION`.
pub struct ConfiguredLocation;

impl LocationProvider for ConfiguredLocation {
    async fn current_position(&self) -> Result<Coords, LocationError> {
        match config::get_location() {
            Some(Ok(coords)) => Ok(coords),
            Some(Err(e)) => Err(LocationError::Unavailable(e)),
            None => Err(LocationError::Unavailable(
                "STOREMAP_LOCATION is not set".to_string(),
            )),
        }
    }
}
