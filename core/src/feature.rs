//! The Feature value object and its GeoJSON wire form.
//!
//! # Design
//! A `Feature` always holds its coordinates in `[lat, lon]` order and is
//! validated when constructed, whether by a caller or by decoding a
//! response. The wire form is plain GeoJSON with `[lon, lat]` leaves; the
//! swap happens in `from_value`/`to_value` and nowhere else.
//!
//! Fields are private so a constructed Feature cannot drift out of its
//! invariants. The properties map is the one exception: it is free-form
//! and exposed mutably.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::coords::Coordinates;
use crate::error::{ApiError, Result};
use crate::handle::{is_simplegeohandle, HANDLE_PATTERN};
use crate::http::ResponseMeta;

/// Reserved property holding the caller's account-scoped record id.
pub const RECORD_ID: &str = "record_id";

#[derive(Debug, Deserialize)]
struct WireGeometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Value,
}

#[derive(Debug, Deserialize)]
struct WireFeature {
    #[serde(default)]
    id: Option<String>,
    geometry: WireGeometry,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

/// A geospatial entity: geometry, optional handle, free-form properties.
///
/// The handle and the record id are independent and both optional. The
/// handle is assigned by the service and stored in `id`; the record id is
/// chosen by the caller and lives in `properties["record_id"]`.
#[derive(Debug, Clone)]
pub struct Feature {
    id: Option<String>,
    coordinates: Coordinates,
    geomtype: String,
    properties: Map<String, Value>,
    http_response: Option<ResponseMeta>,
}

impl Feature {
    /// Build a feature from `[lat, lon]`-ordered coordinates.
    ///
    /// Fails with `ApiError::Precondition` when the handle does not match
    /// the handle pattern, when `record_id` is present but not a string, or
    /// when any coordinate pair is out of range.
    pub fn new(
        coordinates: Coordinates,
        geomtype: impl Into<String>,
        handle: Option<String>,
        properties: Map<String, Value>,
    ) -> Result<Self> {
        if let Some(h) = &handle {
            if !is_simplegeohandle(h) {
                return Err(ApiError::precondition(format!(
                    "simplegeohandle is required to be None or to match the regex {HANDLE_PATTERN}, got {h:?}"
                )));
            }
        }
        match properties.get(RECORD_ID) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(other) => {
                return Err(ApiError::precondition(format!(
                    "record_id is required to be None or a string, got {other}"
                )));
            }
        }
        coordinates.validate_lat_lon()?;

        Ok(Self {
            id: handle,
            coordinates,
            geomtype: geomtype.into(),
            properties,
            http_response: None,
        })
    }

    pub fn point(lat: f64, lon: f64) -> Result<Self> {
        Self::new(Coordinates::Pair(lat, lon), "Point", None, Map::new())
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn geomtype(&self) -> &str {
        &self.geomtype
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.properties
    }

    pub fn record_id(&self) -> Option<&str> {
        self.properties.get(RECORD_ID).and_then(Value::as_str)
    }

    /// Status and headers of the response this feature was decoded from.
    /// Debug information only; ignored by equality.
    pub fn http_response(&self) -> Option<&ResponseMeta> {
        self.http_response.as_ref()
    }

    pub(crate) fn with_response(mut self, meta: ResponseMeta) -> Self {
        self.http_response = Some(meta);
        self
    }

    /// Build a feature from a GeoJSON value (`[lon, lat]` order).
    pub fn from_value(value: Value) -> Result<Self> {
        match serde_json::from_value(value.clone()) {
            Ok(wire) => Self::from_wire(wire),
            Err(e) => Err(ApiError::decode(value.to_string().as_bytes(), e)),
        }
    }

    fn from_wire(wire: WireFeature) -> Result<Self> {
        let coordinates = Coordinates::from_json(&wire.geometry.coordinates)?.swapped();
        Self::new(
            coordinates,
            wire.geometry.kind,
            wire.id,
            wire.properties.unwrap_or_default(),
        )
    }

    /// GeoJSON value with coordinates swapped back to `[lon, lat]`.
    pub fn to_value(&self) -> Value {
        json!({
            "type": "Feature",
            "id": self.id,
            "geometry": {
                "type": self.geomtype,
                "coordinates": self.coordinates.swapped().to_json(),
            },
            "properties": self.properties,
        })
    }

    /// Decode a response body. Text that is not JSON, or JSON without the
    /// Feature shape, yields `ApiError::Decode` carrying `body` unchanged.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let wire: WireFeature = serde_json::from_slice(body).map_err(|e| ApiError::decode(body, e))?;
        Self::from_wire(wire)
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

impl PartialEq for Feature {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.coordinates == other.coordinates
            && self.geomtype == other.geomtype
            && self.properties == other.properties
    }
}
