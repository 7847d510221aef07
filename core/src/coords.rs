//! Nested coordinate structures.
//!
//! GeoJSON nests coordinate arrays to arbitrary depth and bottoms out in
//! numeric pairs. The shape is decided once, when a JSON value is parsed
//! into a [`Coordinates`] tree: an array whose first element is a number is
//! a pair, anything else is a list of nodes. Later passes (swap, validate,
//! serialize) match on the variant instead of re-inspecting values.
//!
//! The tree itself is order-agnostic. A [`Feature`](crate::Feature) keeps
//! its coordinates in `[lat, lon]` order; the wire uses `[lon, lat]`, and
//! [`Coordinates::swapped`] converts between the two.

use serde_json::Value;

use crate::error::{ApiError, Result};

/// A coordinate pair, or a list of nested nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinates {
    Pair(f64, f64),
    List(Vec<Coordinates>),
}

impl Coordinates {
    /// Parse a JSON value into a tree, keeping element order as given.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(ApiError::precondition(format!(
                "coordinates must be a sequence (of sequences of...) numbers, got {value}"
            )));
        };
        match items.first() {
            None => Err(ApiError::precondition("coordinate sequence is empty")),
            Some(Value::Number(_)) => {
                let [Value::Number(a), Value::Number(b)] = items.as_slice() else {
                    return Err(ApiError::precondition(format!(
                        "coordinate pair must have exactly 2 numbers, got {value}"
                    )));
                };
                match (a.as_f64(), b.as_f64()) {
                    (Some(a), Some(b)) => Ok(Coordinates::Pair(a, b)),
                    _ => Err(ApiError::precondition(format!("coordinate out of f64 range: {value}"))),
                }
            }
            Some(_) => items
                .iter()
                .map(Coordinates::from_json)
                .collect::<Result<Vec<_>>>()
                .map(Coordinates::List),
        }
    }

    /// Inverse of [`Coordinates::from_json`]. Non-finite numbers have no
    /// JSON representation and are written as `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Coordinates::Pair(a, b) => Value::Array(vec![number(*a), number(*b)]),
            Coordinates::List(nodes) => Value::Array(nodes.iter().map(Coordinates::to_json).collect()),
        }
    }

    /// Reverse every leaf pair, keeping the nesting intact.
    pub fn swapped(&self) -> Self {
        match self {
            Coordinates::Pair(a, b) => Coordinates::Pair(*b, *a),
            Coordinates::List(nodes) => Coordinates::List(nodes.iter().map(Coordinates::swapped).collect()),
        }
    }

    /// Check that every leaf is a `[lat, lon]` pair within bounds. Stops at
    /// the first offending pair. An empty list at any depth is rejected.
    pub fn validate_lat_lon(&self) -> Result<()> {
        match self {
            Coordinates::Pair(lat, lon) => {
                if !is_valid_lat(*lat) {
                    return Err(ApiError::precondition(format!("latitude {lat} is outside [-90, 90]")));
                }
                if !is_valid_lon(*lon) {
                    return Err(ApiError::precondition(format!("longitude {lon} is outside [-180, 180]")));
                }
                Ok(())
            }
            Coordinates::List(nodes) if nodes.is_empty() => Err(ApiError::precondition("coordinate sequence is empty")),
            Coordinates::List(nodes) => nodes.iter().try_for_each(Coordinates::validate_lat_lon),
        }
    }
}

/// NaN compares false against both bounds, so it is rejected here too.
pub fn is_valid_lat(x: f64) -> bool {
    (-90.0..=90.0).contains(&x)
}

pub fn is_valid_lon(x: f64) -> bool {
    (-180.0..=180.0).contains(&x)
}

fn number(x: f64) -> Value {
    serde_json::Number::from_f64(x).map_or(Value::Null, Value::Number)
}
