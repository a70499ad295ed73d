//! Geographic Dispersion
//!
//! Optional rebalancing of ranked hits: results are bucketed into ~11 km
//! grid cells and drained round-robin so one dense area cannot monopolize
//! a reply page. Fully deterministic: cells are visited in sorted id order
//! and each cell is pre-sorted on stable keys.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_json::Value;

use super::models::{Candidate, ScoredHit};

/// Grid cell edge in degrees (≈ 11 km).
const GRID_SIZE_DEGREES: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
struct GeoPoint {
    lat: f64,
    lng: f64,
}

fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Coordinates from the candidate bag, in any of the shapes the index
/// stores them: `_geo: {lat, lng}`, `lat` + `lng`, or `lat` + `long`.
fn geo_point(candidate: &Candidate) -> Option<GeoPoint> {
    let attrs = &candidate.attributes;

    let (lat, lng) = if let Some(Value::Object(geo)) = attrs.get("_geo") {
        (geo.get("lat"), geo.get("lng"))
    } else if attrs.contains_key("lng") {
        (attrs.get("lat"), attrs.get("lng"))
    } else {
        (attrs.get("lat"), attrs.get("long"))
    };

    Some(GeoPoint {
        lat: coordinate(lat?)?,
        lng: coordinate(lng?)?,
    })
}

fn grid_cell(point: GeoPoint) -> String {
    let lat_cell = (point.lat / GRID_SIZE_DEGREES) as i64;
    let lng_cell = (point.lng / GRID_SIZE_DEGREES) as i64;
    format!("{lat_cell}_{lng_cell}")
}

fn cell_sort_key(hit: &ScoredHit) -> (String, String) {
    (
        hit.candidate.id_key().unwrap_or_default(),
        hit.candidate.name.clone(),
    )
}

fn compare_in_cell(a: &ScoredHit, b: &ScoredHit) -> Ordering {
    cell_sort_key(a).cmp(&cell_sort_key(b)).then_with(|| {
        let pa = geo_point(&a.candidate).unwrap_or(GeoPoint { lat: 0.0, lng: 0.0 });
        let pb = geo_point(&b.candidate).unwrap_or(GeoPoint { lat: 0.0, lng: 0.0 });
        pa.lat
            .partial_cmp(&pb.lat)
            .unwrap_or(Ordering::Equal)
            .then(pa.lng.partial_cmp(&pb.lng).unwrap_or(Ordering::Equal))
    })
}

/// Disperse ranked hits across grid cells. Hits without coordinates keep
/// their rank order and append after the dispersed ones.
pub fn disperse(hits: Vec<ScoredHit>) -> Vec<ScoredHit> {
    if hits.is_empty() {
        return hits;
    }

    let mut cells: BTreeMap<String, Vec<ScoredHit>> = BTreeMap::new();
    let mut without_geo = Vec::new();

    for hit in hits {
        match geo_point(&hit.candidate) {
            Some(point) => cells.entry(grid_cell(point)).or_default().push(hit),
            None => without_geo.push(hit),
        }
    }

    if cells.is_empty() {
        log::warn!("Geographic dispersion requested but no hit carries coordinates");
        return without_geo;
    }

    let mut cell_lists: Vec<Vec<ScoredHit>> = cells.into_values().collect();
    for cell in &mut cell_lists {
        cell.sort_by(compare_in_cell);
    }
    let cell_count = cell_lists.len();

    let max_items = cell_lists.iter().map(Vec::len).max().unwrap_or(0);
    let mut dispersed = Vec::with_capacity(cell_lists.iter().map(Vec::len).sum());
    for i in 0..max_items {
        for cell in &cell_lists {
            if let Some(hit) = cell.get(i) {
                dispersed.push(hit.clone());
            }
        }
    }

    log::debug!("Dispersed {} hits over {} grid cells", dispersed.len(), cell_count);
    dispersed.extend(without_geo);
    dispersed
}

// ============================================================================
// Tests
// ============================================================================
