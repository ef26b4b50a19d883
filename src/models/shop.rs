use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FeeError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Rejects non-finite components and values off the globe.
    pub fn validate(&self) -> Result<(), FeeError> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(FeeError::InvalidCoordinate(format!(
                "({}, {}) is not a finite coordinate",
                self.lat, self.lng
            )));
        }

        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(FeeError::InvalidCoordinate(format!(
                "latitude {} outside [-90, 90]",
                self.lat
            )));
        }

        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(FeeError::InvalidCoordinate(format!(
                "longitude {} outside [-180, 180]",
                self.lng
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub id: Uuid,
    pub name: String,
    pub location: GeoPoint,
    pub created_at: DateTime<Utc>,
}
