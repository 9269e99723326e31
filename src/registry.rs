//! Station catalog loaded once per process from the published JSON list.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{Result, ScrapeError};
use crate::models::StationMeta;

#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    stations: Vec<StationMeta>,
    by_code: HashMap<String, usize>,
}

impl StationRegistry {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ScrapeError::io(path, e))?;
        let registry = Self::from_json(&content)?;
        info!(
            "Loaded {} stations from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let stations: Vec<StationMeta> =
            serde_json::from_str(json).map_err(|e| ScrapeError::Catalog(e.to_string()))?;
        Self::from_stations(stations)
    }

    pub fn from_stations(stations: Vec<StationMeta>) -> Result<Self> {
        let mut registry = Self::default();
        for station in stations {
            let station = normalize(station)?;
            if registry.by_code.contains_key(&station.code) {
                warn!("Duplicate station code {} ignored", station.code);
                continue;
            }
            registry
                .by_code
                .insert(station.code.clone(), registry.stations.len());
            registry.stations.push(station);
        }
        Ok(registry)
    }

    /// Case-insensitive lookup.
    pub fn find(&self, code: &str) -> Result<&StationMeta> {
        let code = code.trim().to_uppercase();
        self.by_code
            .get(&code)
            .map(|&index| &self.stations[index])
            .ok_or_else(|| ScrapeError::NotFound(format!("station with code '{}'", code)))
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StationMeta> {
        self.stations.iter()
    }
}

fn normalize(mut station: StationMeta) -> Result<StationMeta> {
    station.code = station.code.trim().to_uppercase();
    if station.code.is_empty() {
        return Err(ScrapeError::Catalog("station code must not be empty".to_string()));
    }

    station.name = title_case(station.name.trim());
    if station.name.is_empty() {
        return Err(ScrapeError::Catalog(format!(
            "station {} has an empty name",
            station.code
        )));
    }

    if !(-90.0..=90.0).contains(&station.latitude) {
        return Err(ScrapeError::Catalog(format!(
            "station {} latitude {} is outside [-90, 90]",
            station.code, station.latitude
        )));
    }
    if !(-180.0..=180.0).contains(&station.longitude) {
        return Err(ScrapeError::Catalog(format!(
            "station {} longitude {} is outside [-180, 180]",
            station.code, station.longitude
        )));
    }

    station.legacy_code = station
        .legacy_code
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty());

    Ok(station)
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}
