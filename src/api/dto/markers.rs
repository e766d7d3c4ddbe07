/*
 * Responsibility
 * - Markers の request/response DTO
 * - PUT body の validation (lat/lng は 0 を「未指定」と同じ扱いにする)
 */
use serde::{Deserialize, Serialize};

use crate::repos::Marker;

// Clients send capitalized keys too; accept the usual casings.
#[derive(Debug, Deserialize)]
pub struct CreateMarkerRequest {
    #[serde(default, alias = "Lat", alias = "LAT")]
    pub lat: Option<f64>,
    #[serde(default, alias = "Lng", alias = "LNG")]
    pub lng: Option<f64>,
    #[serde(default, alias = "Note", alias = "NOTE")]
    pub note: Option<String>,
}

/// A PUT body that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMarker {
    pub lat: f64,
    pub lng: f64,
    pub note: String,
}

// The wire format cannot tell "omitted" from "0", so both count as absent.
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

impl CreateMarkerRequest {
    pub fn validate(self) -> Result<NewMarker, &'static str> {
        let lat = present(self.lat).ok_or("lat is required")?;
        let lng = present(self.lng).ok_or("lng is required")?;

        Ok(NewMarker {
            lat,
            lng,
            note: self.note.unwrap_or_default(),
        })
    }

    /// Decode the raw body and validate it in one step.
    pub fn parse(body: &[u8]) -> Result<NewMarker, String> {
        let req: Self = serde_json::from_slice(body).map_err(|e| e.to_string())?;
        req.validate().map_err(str::to_string)
    }
}

#[derive(Debug, Serialize)]
pub struct MarkerResponse {
    pub user: String,
    pub lat: f64,
    pub lng: f64,
    pub note: String,
}

impl From<Marker> for MarkerResponse {
    fn from(m: Marker) -> Self {
        Self {
            user: m.user,
            lat: m.lat,
            lng: m.lng,
            note: m.note,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MarkerCollectionResponse {
    pub markers: Vec<MarkerResponse>,
}
