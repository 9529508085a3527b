//! Map scene building
//!
//! Turns climbs and areas into what a map widget draws: one marker per climb
//! (optionally clustered), area polygons in (lat, lng) order and the initial
//! view. [`PinDropper`] is the interactive single-pin map used by the climb
//! form.

use crate::api::{CatalogApi, ClimbQuery};
use crate::config::MapConfig;
use crate::error::Result;
use crate::filter::FilterState;
use crate::geometry::{parse_wkt, Geometry, LatLng};
use crate::model::{Area, Climb, ClimbType};
use serde::Serialize;
use std::f64::consts::PI;

const TILE_SIZE: f64 = 256.0;

/// Web-Mercator latitude limit
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub climb_id: u64,
    pub name: String,
    pub grade: Option<String>,
    pub position: LatLng,
    pub href: String,
}

impl From<&Climb> for Marker {
    fn from(climb: &Climb) -> Self {
        Self {
            climb_id: climb.id,
            name: climb.name.clone(),
            grade: climb.grade.clone(),
            position: LatLng::new(climb.latitude, climb.longitude),
            href: climb.href(),
        }
    }
}

impl Marker {
    /// Popup text
    pub fn label(&self) -> String {
        match &self.grade {
            Some(grade) => format!("{} ({})", self.name, grade),
            None => self.name.clone(),
        }
    }
}

/// Markers drawn as one pin; a single marker is a cluster of one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub position: LatLng,
    pub markers: Vec<Marker>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.markers.len() == 1
    }
}

/// World pixel coordinates of `point` at `zoom`
pub fn project(point: LatLng, zoom: u8) -> (f64, f64) {
    let scale = TILE_SIZE * f64::from(1u32 << zoom.min(30));
    let lat = point.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = (point.lng + 180.0) / 360.0 * scale;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * scale;
    (x, y)
}

/// Greedy clustering in screen space
///
/// Markers are visited in order; each joins the first cluster whose seed lies
/// within `radius` pixels at `zoom`, or seeds a new one. A cluster is drawn
/// at the mean position of its members.
pub fn cluster_markers(markers: Vec<Marker>, zoom: u8, radius: f64) -> Vec<Cluster> {
    let mut seeds: Vec<(f64, f64)> = Vec::new();
    let mut groups: Vec<Vec<Marker>> = Vec::new();

    for marker in markers {
        let (x, y) = project(marker.position, zoom);
        let hit = seeds.iter().position(|(sx, sy)| (sx - x).hypot(sy - y) <= radius);
        match hit {
            Some(i) => groups[i].push(marker),
            None => {
                seeds.push((x, y));
                groups.push(vec![marker]);
            }
        }
    }

    groups
        .into_iter()
        .map(|markers| {
            let n = markers.len() as f64;
            let lat = markers.iter().map(|m| m.position.lat).sum::<f64>() / n;
            let lng = markers.iter().map(|m| m.position.lng).sum::<f64>() / n;
            Cluster { position: LatLng::new(lat, lng), markers }
        })
        .collect()
}

/// An area boundary ready to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaOverlay {
    pub area_id: u64,
    pub name: String,
    pub color: String,
    /// Rings in (lat, lng) order
    pub paths: Vec<Vec<LatLng>>,
    #[serde(skip)]
    geometry: Geometry,
}

impl AreaOverlay {
    /// `None` for independent areas; malformed WKT is an error
    pub fn from_area(area: &Area, color: &str) -> Result<Option<Self>> {
        if area.is_independent() {
            return Ok(None);
        }
        let wkt = area.polygon.as_deref().unwrap_or_default();
        let geometry = parse_wkt(wkt)?;
        Ok(Some(Self {
            area_id: area.id,
            name: area.name.clone(),
            color: color.to_string(),
            paths: geometry.to_map_paths(),
            geometry,
        }))
    }

    pub fn contains(&self, point: LatLng) -> bool {
        self.geometry.contains(point)
    }
}

/// Overlays for every area with a usable polygon; problems are returned as
/// warnings instead of failing the map
pub fn area_overlays(areas: &[Area], color: &str) -> (Vec<AreaOverlay>, Vec<String>) {
    let mut overlays = Vec::new();
    let mut warnings = Vec::new();

    for area in areas {
        match AreaOverlay::from_area(area, color) {
            Ok(Some(overlay)) => overlays.push(overlay),
            Ok(None) => {}
            Err(e) => {
                log::warn!("Skipping polygon of area {}: {}", area.name, e);
                warnings.push(format!("area {}: {}", area.name, e));
            }
        }
    }

    (overlays, warnings)
}

/// The area whose polygon contains `point`, if any
pub fn area_at(overlays: &[AreaOverlay], point: LatLng) -> Option<&AreaOverlay> {
    overlays.iter().find(|o| o.contains(point))
}

/// Initial map view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl From<&MapConfig> for MapView {
    fn from(config: &MapConfig) -> Self {
        Self {
            center: config.center(),
            zoom: config.zoom,
            tile_url: config.tile_url.clone(),
            attribution: config.attribution.clone(),
        }
    }
}

/// Everything a map widget draws, serialisable for external renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    pub view: MapView,
    pub clusters: Vec<Cluster>,
    pub areas: Vec<AreaOverlay>,
    /// Data that could not be drawn
    pub warnings: Vec<String>,
}

impl MapScene {
    /// `cluster = false` gives every climb its own pin
    pub fn build(climbs: &[Climb], areas: &[Area], config: &MapConfig, cluster: bool) -> Self {
        let view = MapView::from(config);
        let markers: Vec<Marker> = climbs.iter().map(Marker::from).collect();

        let clusters = if cluster {
            cluster_markers(markers, view.zoom, config.cluster_radius)
        } else {
            markers
                .into_iter()
                .map(|m| Cluster { position: m.position, markers: vec![m] })
                .collect()
        };

        let (areas, warnings) = area_overlays(areas, &config.polygon_color);
        Self { view, clusters, areas, warnings }
    }

    /// Fetch climbs and areas concurrently and build the scene
    ///
    /// Only a failure to fetch climbs fails; missing areas become a warning.
    pub async fn load(
        api: &dyn CatalogApi,
        climb_type: Option<ClimbType>,
        filter: &FilterState,
        config: &MapConfig,
        cluster: bool,
    ) -> Result<Self> {
        let query = ClimbQuery::new(climb_type, 0)
            .with_grades(filter.selected_grades().iter().cloned())
            .with_areas(filter.selected_areas().iter().cloned());

        let (climbs, areas) = futures::join!(api.list_climbs(&query), api.list_areas());
        let climbs = climbs?;

        let mut area_warning = None;
        let areas = areas.unwrap_or_else(|e| {
            log::warn!("Area polygons unavailable: {}", e);
            area_warning = Some(format!("areas unavailable: {}", e));
            Vec::new()
        });

        let mut scene = Self::build(&climbs, &areas, config, cluster);
        scene.warnings.extend(area_warning);
        Ok(scene)
    }

    pub fn marker_count(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Single-pin map of the climb form
///
/// Toggling arms pin-drop mode; while armed, the next click places the pin,
/// reports the coordinate and disarms. Dragging the pin reports the new
/// coordinate. A read-only map ignores all input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinDropper {
    read_only: bool,
    armed: bool,
    pin: Option<LatLng>,
}

impl PinDropper {
    pub fn new(initial: Option<LatLng>) -> Self {
        Self { read_only: false, armed: false, pin: initial }
    }

    pub fn read_only(pin: Option<LatLng>) -> Self {
        Self { read_only: true, armed: false, pin }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn pin(&self) -> Option<LatLng> {
        self.pin
    }

    /// Arm or disarm pin-drop mode; returns the new state
    pub fn toggle(&mut self) -> bool {
        if !self.read_only {
            self.armed = !self.armed;
        }
        self.armed
    }

    /// A map click; returns the coordinate to report, if any
    pub fn click(&mut self, at: LatLng) -> Option<LatLng> {
        if self.read_only || !self.armed {
            return None;
        }
        self.armed = false;
        self.pin = Some(at);
        Some(at)
    }

    /// The pin was dragged to `to`
    pub fn drag(&mut self, to: LatLng) -> Option<LatLng> {
        if self.read_only || self.pin.is_none() {
            return None;
        }
        self.pin = Some(to);
        Some(to)
    }
}
