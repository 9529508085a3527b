//! Map view configuration

use crate::geometry::LatLng;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial centre latitude
    /// Env: CRAG_MAP_CENTER ("lat,lng")
    /// Default: -2.031246
    pub center_lat: f64,

    /// Initial centre longitude
    /// Default: 33.496643
    pub center_lng: f64,

    /// Initial zoom level
    /// Env: CRAG_MAP_ZOOM
    /// Default: 8
    pub zoom: u8,

    /// Marker cluster radius in screen pixels
    /// Env: CRAG_MAP_CLUSTER_RADIUS
    /// Default: 10
    pub cluster_radius: f64,

    /// Stroke colour of area polygons
    /// Env: CRAG_MAP_POLYGON_COLOR
    /// Default: "blue"
    pub polygon_color: String,

    /// Tile server URL template
    /// Env: CRAG_MAP_TILE_URL
    pub tile_url: String,

    pub attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: -2.031246,
            center_lng: 33.496643,
            zoom: 8,
            cluster_radius: 10.0,
            polygon_color: "blue".to_string(),
            tile_url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".to_string(),
            attribution: "&copy; Esri contributors".to_string(),
        }
    }
}

impl MapConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(center) = env::var("CRAG_MAP_CENTER") {
            if let Some((lat, lng)) = center.split_once(',') {
                if let (Ok(lat), Ok(lng)) = (lat.trim().parse(), lng.trim().parse()) {
                    self.center_lat = lat;
                    self.center_lng = lng;
                }
            }
        }

        if let Ok(zoom) = env::var("CRAG_MAP_ZOOM") {
            if let Ok(z) = zoom.parse() {
                self.zoom = z;
            }
        }

        if let Ok(radius) = env::var("CRAG_MAP_CLUSTER_RADIUS") {
            if let Ok(r) = radius.parse() {
                self.cluster_radius = r;
            }
        }

        if let Ok(color) = env::var("CRAG_MAP_POLYGON_COLOR") {
            self.polygon_color = color;
        }

        if let Ok(url) = env::var("CRAG_MAP_TILE_URL") {
            self.tile_url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.center().is_valid() {
            bail!("Invalid map centre {}, {}", self.center_lat, self.center_lng);
        }

        if self.zoom > 22 {
            bail!("Invalid zoom {}: must be between 0 and 22", self.zoom);
        }

        if !(self.cluster_radius >= 0.0) {
            bail!("Invalid cluster_radius: must be zero or positive");
        }

        Ok(())
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(self.center_lat, self.center_lng)
    }
}
