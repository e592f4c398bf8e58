//! Coordinate Reference System identifiers and their canonical text form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GeoError;

/// A coordinate reference system, kept in a form that survives a text
/// round trip.
///
/// Accepts formats like:
/// - "EPSG:4326" / "epsg:4326"
/// - "+init=epsg:4326" (legacy PROJ.4 init form, normalized to EPSG)
/// - "+proj=longlat +datum=WGS84 +no_defs"
/// - any other non-empty definition (WKT, URN, ...) kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crs {
    /// Authority code from the EPSG registry.
    Epsg(u32),
    /// PROJ string, whitespace-normalized.
    Proj(String),
    /// Any other textual definition.
    Other(String),
}

impl Crs {
    /// WGS84 geographic.
    pub fn wgs84() -> Self {
        Crs::Epsg(4326)
    }

    /// Get the EPSG code, if this CRS is identified by one.
    pub fn epsg(&self) -> Option<u32> {
        match self {
            Crs::Epsg(code) => Some(*code),
            _ => None,
        }
    }

    /// Check if this is a geographic (lat/lon) CRS.
    pub fn is_geographic(&self) -> bool {
        match self {
            Crs::Epsg(code) => matches!(code, 4326 | 4269 | 4258),
            Crs::Proj(proj) => proj
                .split_whitespace()
                .any(|p| p == "+proj=longlat" || p == "+proj=latlong"),
            Crs::Other(_) => false,
        }
    }

    /// Check that this value reads back unchanged from its text form.
    ///
    /// Values built directly from the variants may not: `Other("EPSG:4326")`
    /// parses as `Epsg(4326)` and `Other("")` does not parse at all.
    pub fn check_canonical(&self) -> Result<(), GeoError> {
        let text = self.to_string();
        let parsed: Crs = text.parse()?;
        if parsed != *self {
            return Err(GeoError::InvalidCrs(format!(
                "{:?} is not canonical, its text '{}' reads back as {:?}",
                self, text, parsed
            )));
        }
        Ok(())
    }
}

fn parse_epsg_code(code: &str) -> Result<u32, GeoError> {
    code.trim()
        .parse::<u32>()
        .map_err(|_| GeoError::InvalidCrs(format!("bad EPSG code '{}'", code)))
}

impl FromStr for Crs {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(GeoError::InvalidCrs("empty definition".to_string()));
        }

        let lower = trimmed.to_lowercase();
        if let Some(code) = lower.strip_prefix("epsg:") {
            return parse_epsg_code(code).map(Crs::Epsg);
        }
        if let Some(code) = lower.strip_prefix("+init=epsg:") {
            // "+init=epsg:4326 +no_defs" style strings carry trailing flags
            let code = code.split_whitespace().next().unwrap_or_default();
            return parse_epsg_code(code).map(Crs::Epsg);
        }
        if trimmed.starts_with("+proj=") {
            let normalized = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
            return Ok(Crs::Proj(normalized));
        }

        Ok(Crs::Other(trimmed.to_string()))
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Epsg(code) => write!(f, "EPSG:{}", code),
            Crs::Proj(proj) => write!(f, "{}", proj),
            Crs::Other(text) => write!(f, "{}", text),
        }
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}
