use std::f64::consts::PI;

use geojson::{Feature, GeoJson, PolygonType, Value};

use crate::color_scale::{Color, color_for};
use crate::error::LoadError;

/// World size in projected units at zoom 0.
pub const WORLD_SIZE: f64 = 256.0;
/// Web Mercator latitude limit.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// A closed ring of `(x, y)` points. Unprojected rings hold `(lon, lat)`.
pub type Ring = Vec<(f64, f64)>;

/// A country's shape as read from the boundary document (lon/lat degrees).
#[derive(Debug, Clone, PartialEq)]
pub struct CountryBoundary {
    pub name: String,
    /// Each polygon is an outer ring followed by its holes.
    pub polygons: Vec<Vec<Ring>>,
}

impl CountryBoundary {
    /// Features without a string `name` property or without polygonal geometry are skipped.
    pub fn from_feature(feature: &Feature) -> Option<Self> {
        let name = feature.properties.as_ref()?.get("name")?.as_str()?.to_string();
        let geometry = feature.geometry.as_ref()?;
        let polygons = match &geometry.value {
            Value::Polygon(rings) => vec![convert_polygon(rings)],
            Value::MultiPolygon(polygons) => polygons.iter().map(convert_polygon).collect(),
            _ => return None,
        };
        Some(Self { name, polygons })
    }
}

fn convert_polygon(rings: &PolygonType) -> Vec<Ring> {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .filter_map(|position| Some((*position.first()?, *position.get(1)?)))
                .collect()
        })
        .collect()
}

/// Parse a GeoJSON FeatureCollection into country boundaries.
pub fn parse_boundaries(text: &str) -> Result<Vec<CountryBoundary>, LoadError> {
    let geojson: GeoJson = text.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(LoadError::NotAFeatureCollection);
    };
    Ok(collection
        .features
        .iter()
        .filter_map(CountryBoundary::from_feature)
        .collect())
}

/// Spherical Web Mercator: lon/lat degrees to world units at zoom 0 (y grows southward).
pub fn project(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = (lon + 180.0) / 360.0 * WORLD_SIZE;
    let sin = lat.to_radians().sin();
    let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * WORLD_SIZE;
    (x, y)
}

/// Axis-aligned bounding box in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        min_x: f64::MAX,
        min_y: f64::MAX,
        max_x: f64::MIN,
        max_y: f64::MIN,
    };

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn union(&mut self, other: &Bounds) {
        if other.is_empty() {
            return;
        }
        self.include(other.min_x, other.min_y);
        self.include(other.max_x, other.max_y);
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// A boundary annotated once with its join result and projected geometry.
#[derive(Debug, Clone)]
pub struct JoinedBoundary {
    pub name: String,
    /// Position of the matching record in the score list, if the name matched.
    pub record: Option<usize>,
    /// The matched score (may be NaN); `None` for "no data".
    pub score: Option<f64>,
    /// Projected rings of every polygon, filled with the even-odd rule.
    pub rings: Vec<Ring>,
    pub bounds: Bounds,
    pub fill: Color,
}

impl JoinedBoundary {
    pub fn new(boundary: &CountryBoundary, record: Option<usize>, score: Option<f64>) -> Self {
        let mut bounds = Bounds::EMPTY;
        let rings: Vec<Ring> = boundary
            .polygons
            .iter()
            .flatten()
            .map(|ring| {
                ring.iter()
                    .map(|&(lon, lat)| {
                        let point = project(lon, lat);
                        bounds.include(point.0, point.1);
                        point
                    })
                    .collect()
            })
            .collect();
        Self {
            name: boundary.name.clone(),
            record,
            score,
            rings,
            bounds,
            fill: color_for(score),
        }
    }

    /// Only boundaries that joined a score record react to hover.
    pub fn is_interactive(&self) -> bool {
        self.record.is_some()
    }

    /// Even-odd point-in-polygon test in world units.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        if !self.bounds.contains(x, y) {
            return false;
        }
        let mut inside = false;
        for ring in &self.rings {
            if ring.len() < 3 {
                continue;
            }
            let mut j = ring.len() - 1;
            for i in 0..ring.len() {
                let (xi, yi) = ring[i];
                let (xj, yj) = ring[j];
                if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                    inside = !inside;
                }
                j = i;
            }
        }
        inside
    }
}
