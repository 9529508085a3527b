//! Area geometry
//!
//! Area boundaries are stored as WKT (`POLYGON` / `MULTIPOLYGON`) whose
//! coordinate pairs are `x y`, i.e. longitude first. Map consumers want
//! latitude first. [`Polygon::to_map_path`] is the only place the order flips.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A map position in (lat, lng) order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Coordinates with 8 decimals, the precision forms submit
    pub fn display_fixed(&self) -> String {
        format!("{:.8}, {:.8}", self.lat, self.lng)
    }
}

/// A stored coordinate pair in WKT order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl From<LonLat> for LatLng {
    fn from(p: LonLat) -> Self {
        LatLng { lat: p.lat, lng: p.lon }
    }
}

/// One polygon: an outer ring followed by optional holes
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub rings: Vec<Vec<LonLat>>,
}

impl Polygon {
    pub fn exterior(&self) -> &[LonLat] {
        self.rings.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rings in map (lat, lng) order
    pub fn to_map_path(&self) -> Vec<Vec<LatLng>> {
        self.rings.iter().map(|ring| ring.iter().copied().map(LatLng::from).collect()).collect()
    }

    /// Even-odd containment: inside the outer ring and outside every hole
    pub fn contains(&self, point: LatLng) -> bool {
        let mut rings = self.rings.iter();
        match rings.next() {
            Some(outer) if ring_contains(outer, point) => {
                !rings.any(|hole| ring_contains(hole, point))
            }
            _ => false,
        }
    }

    /// Mean of the outer ring's distinct vertices
    pub fn centroid(&self) -> Option<LatLng> {
        let ring = self.exterior();
        let pts = match (ring.first(), ring.last()) {
            (Some(a), Some(b)) if ring.len() > 1 && a == b => &ring[..ring.len() - 1],
            _ => ring,
        };
        if pts.is_empty() {
            return None;
        }
        let n = pts.len() as f64;
        let lat = pts.iter().map(|p| p.lat).sum::<f64>() / n;
        let lng = pts.iter().map(|p| p.lon).sum::<f64>() / n;
        Some(LatLng::new(lat, lng))
    }
}

/// A parsed area boundary
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub polygons: Vec<Polygon>,
}

impl Geometry {
    pub fn contains(&self, point: LatLng) -> bool {
        self.polygons.iter().any(|p| p.contains(point))
    }

    /// Every ring of every polygon in map (lat, lng) order
    pub fn to_map_paths(&self) -> Vec<Vec<LatLng>> {
        self.polygons.iter().flat_map(|p| p.to_map_path()).collect()
    }
}

fn ring_contains(ring: &[LonLat], point: LatLng) -> bool {
    let (x, y) = (point.lng, point.lat);
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (ring[i].lon, ring[i].lat);
        let (xj, yj) = (ring[j].lon, ring[j].lat);
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Parse WKT `POLYGON` or `MULTIPOLYGON` text.
///
/// An optional `SRID=4326;` prefix (EWKT) is accepted.
pub fn parse_wkt(text: &str) -> Result<Geometry> {
    let mut body = text.trim();
    if body.get(..5).is_some_and(|prefix| prefix.eq_ignore_ascii_case("SRID=")) {
        body = body
            .split_once(';')
            .map(|(_, rest)| rest.trim())
            .ok_or_else(|| Error::Geometry("SRID prefix without ';'".to_string()))?;
    }

    let (tag, rest) = split_tag(body)?;
    match tag.as_str() {
        "POLYGON" => {
            let polygon = parse_polygon(rest)?;
            Ok(Geometry { polygons: vec![polygon] })
        }
        "MULTIPOLYGON" => {
            let inner = strip_parens(rest)?;
            let polygons = split_groups(inner)?
                .into_iter()
                .map(parse_polygon)
                .collect::<Result<Vec<_>>>()?;
            if polygons.is_empty() {
                return Err(Error::Geometry("MULTIPOLYGON without polygons".to_string()));
            }
            Ok(Geometry { polygons })
        }
        other => Err(Error::Geometry(format!("unsupported geometry type {}", other))),
    }
}

fn split_tag(body: &str) -> Result<(String, &str)> {
    let idx = body
        .find('(')
        .ok_or_else(|| Error::Geometry(format!("missing '(' in \"{}\"", truncate(body))))?;
    let tag = body[..idx].trim().to_ascii_uppercase();
    if tag.is_empty() {
        return Err(Error::Geometry("missing geometry type".to_string()));
    }
    Ok((tag, body[idx..].trim()))
}

/// `((x y, ...), (x y, ...))` -> Polygon
fn parse_polygon(text: &str) -> Result<Polygon> {
    let inner = strip_parens(text)?;
    let rings = split_groups(inner)?
        .into_iter()
        .map(|ring| parse_ring(strip_parens(ring)?))
        .collect::<Result<Vec<_>>>()?;
    if rings.is_empty() {
        return Err(Error::Geometry("polygon without rings".to_string()));
    }
    Ok(Polygon { rings })
}

fn parse_ring(text: &str) -> Result<Vec<LonLat>> {
    let points = text
        .split(',')
        .map(|pair| {
            let mut nums = pair.split_whitespace();
            let lon = parse_coord(nums.next(), pair)?;
            let lat = parse_coord(nums.next(), pair)?;
            // Z / M ordinates are ignored
            Ok(LonLat { lon, lat })
        })
        .collect::<Result<Vec<_>>>()?;
    if points.len() < 3 {
        return Err(Error::Geometry(format!("ring needs at least 3 points, got {}", points.len())));
    }
    Ok(points)
}

fn parse_coord(token: Option<&str>, pair: &str) -> Result<f64> {
    token
        .ok_or_else(|| Error::Geometry(format!("incomplete coordinate \"{}\"", pair.trim())))?
        .parse::<f64>()
        .map_err(|e| Error::Geometry(format!("bad coordinate \"{}\": {}", pair.trim(), e)))
}

fn strip_parens(text: &str) -> Result<&str> {
    let t = text.trim();
    if t.starts_with('(') && t.ends_with(')') && t.len() >= 2 {
        Ok(&t[1..t.len() - 1])
    } else {
        Err(Error::Geometry(format!("expected parenthesised group, got \"{}\"", truncate(t))))
    }
}

/// Split `(a), (b), (c)` at depth-0 commas
fn split_groups(text: &str) -> Result<Vec<&str>> {
    let mut groups = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(Error::Geometry("unbalanced ')'".to_string()));
                }
            }
            ',' if depth == 0 => {
                groups.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(Error::Geometry("unbalanced '('".to_string()));
    }
    let last = text[start..].trim();
    if !last.is_empty() {
        groups.push(last);
    }
    Ok(groups)
}

fn truncate(s: &str) -> String {
    s.chars().take(40).collect()
}
