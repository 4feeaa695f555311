//! GeoJSON geometry literals.
//!
//! Filter operands that look like GeoJSON geometries are parsed into
//! [`Geometry`] so that builders can evaluate spatial lookups. Only the
//! geometry object itself is accepted (not `Feature` or `FeatureCollection`),
//! and it must be structurally valid: positions carry two or three finite
//! ordinates, line strings have at least two positions, and polygon rings are
//! closed with at least four positions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A single coordinate tuple: `[x, y]` or `[x, y, z]`.
pub type Position = Vec<f64>;

/// Errors produced while parsing a geometry literal.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("geometry literal must be a JSON object")]
    NotAnObject,

    #[error("malformed GeoJSON geometry: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("position must have 2 or 3 finite ordinates, got {0}")]
    InvalidPosition(usize),

    #[error("{kind} needs at least {min} positions, got {actual}")]
    TooFewPositions {
        kind: &'static str,
        min: usize,
        actual: usize,
    },

    #[error("polygon ring is not closed")]
    UnclosedRing,
}

/// A GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: Position,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
}

impl Geometry {
    /// Parses and validates a geometry from a JSON value.
    pub fn parse(raw: &Value) -> Result<Self, GeometryError> {
        if !raw.is_object() {
            return Err(GeometryError::NotAnObject);
        }
        let geometry = Geometry::deserialize(raw)?;
        geometry.validate()?;
        Ok(geometry)
    }

    /// Returns the GeoJSON type name.
    pub fn geometry_type(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::LineString { .. } => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
            Geometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    /// Serializes the geometry back to a GeoJSON value.
    pub fn to_json(&self) -> Value {
        // Serializing owned numbers and strings cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Returns the 2D bounding box, or `None` for an empty geometry.
    pub fn bbox(&self) -> Option<BoundingBox> {
        let mut bbox: Option<BoundingBox> = None;
        self.for_each_position(&mut |position| {
            let &[x, y, ..] = position.as_slice() else {
                return;
            };
            match bbox.as_mut() {
                Some(b) => b.extend(x, y),
                None => bbox = Some(BoundingBox::point(x, y)),
            }
        });
        bbox
    }

    fn for_each_position(&self, f: &mut impl FnMut(&Position)) {
        match self {
            Geometry::Point { coordinates } => f(coordinates),
            Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
                coordinates.iter().for_each(|p| f(p))
            }
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                coordinates.iter().flatten().for_each(|p| f(p))
            }
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().flatten().for_each(|p| f(p))
            }
            Geometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.for_each_position(f);
                }
            }
        }
    }

    fn validate(&self) -> Result<(), GeometryError> {
        match self {
            Geometry::Point { coordinates } => validate_position(coordinates),
            Geometry::MultiPoint { coordinates } => {
                coordinates.iter().try_for_each(validate_position)
            }
            Geometry::LineString { coordinates } => validate_line(coordinates),
            Geometry::MultiLineString { coordinates } => {
                coordinates.iter().try_for_each(|line| validate_line(line))
            }
            Geometry::Polygon { coordinates } => validate_polygon(coordinates),
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().try_for_each(|polygon| validate_polygon(polygon))
            }
            Geometry::GeometryCollection { geometries } => {
                geometries.iter().try_for_each(Geometry::validate)
            }
        }
    }
}

fn validate_position(position: &Position) -> Result<(), GeometryError> {
    if !(2..=3).contains(&position.len()) || position.iter().any(|n| !n.is_finite()) {
        return Err(GeometryError::InvalidPosition(position.len()));
    }
    Ok(())
}

fn validate_line(line: &[Position]) -> Result<(), GeometryError> {
    if line.len() < 2 {
        return Err(GeometryError::TooFewPositions {
            kind: "LineString",
            min: 2,
            actual: line.len(),
        });
    }
    line.iter().try_for_each(validate_position)
}

fn validate_polygon(rings: &[Vec<Position>]) -> Result<(), GeometryError> {
    for ring in rings {
        if ring.len() < 4 {
            return Err(GeometryError::TooFewPositions {
                kind: "Polygon ring",
                min: 4,
                actual: ring.len(),
            });
        }
        ring.iter().try_for_each(validate_position)?;
        if ring.first() != ring.last() {
            return Err(GeometryError::UnclosedRing);
        }
    }
    Ok(())
}

/// Axis-aligned 2D bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Creates a degenerate box around a single point.
    pub fn point(x: f64, y: f64) -> Self {
        BoundingBox {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Grows the box to include `(x, y)`.
    pub fn extend(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Returns `true` if `other` lies entirely inside this box (edges included).
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    /// Returns `true` if the two boxes share at least one point.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}
