use serde::{Deserialize, Serialize};
use std::fmt;

use super::schema::HeaderSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationCategory {
    /// Estación Automática Agrícola
    #[serde(rename = "EAA")]
    Eaa,
    /// Pluviométrica Especial
    #[serde(rename = "PE")]
    Pe,
    /// Climatológica Principal
    #[serde(rename = "CP")]
    Cp,
    /// Hidrológica con Limnígrafo
    #[serde(rename = "HLM")]
    Hlm,
    /// Meteorológica Aeroportuaria
    #[serde(rename = "MAP")]
    Map,
    /// Estación Hidrológica Automática
    #[serde(rename = "EHA")]
    Eha,
    /// Estación Hidrometeorológica Automática
    #[serde(rename = "EHMA")]
    Ehma,
    /// Climatológica Ordinaria
    #[serde(rename = "CO")]
    Co,
    /// Estación Meteorológica Automática
    #[serde(rename = "EMA")]
    Ema,
    /// Pluviométrica
    #[serde(rename = "PLU")]
    Plu,
    /// Estación Agrometeorológica Automática
    #[serde(rename = "EAMA")]
    Eama,
    /// Hidrológica con Limniógrafo
    #[serde(rename = "HLG")]
    Hlg,
}

impl StationCategory {
    pub fn key(&self) -> &'static str {
        match self {
            StationCategory::Eaa => "EAA",
            StationCategory::Pe => "PE",
            StationCategory::Cp => "CP",
            StationCategory::Hlm => "HLM",
            StationCategory::Map => "MAP",
            StationCategory::Eha => "EHA",
            StationCategory::Ehma => "EHMA",
            StationCategory::Co => "CO",
            StationCategory::Ema => "EMA",
            StationCategory::Plu => "PLU",
            StationCategory::Eama => "EAMA",
            StationCategory::Hlg => "HLG",
        }
    }
}

impl fmt::Display for StationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationType {
    #[serde(rename = "M")]
    Meteorological,
    #[serde(rename = "H")]
    Hydrological,
}

impl StationType {
    pub fn key(&self) -> &'static str {
        match self {
            StationType::Meteorological => "M",
            StationType::Hydrological => "H",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationStatus {
    #[serde(rename = "REAL")]
    RealTime,
    #[serde(rename = "DIFERIDO")]
    Deferred,
    #[serde(rename = "AUTOMATICA")]
    Automatic,
}

impl StationStatus {
    pub fn key(&self) -> &'static str {
        match self {
            StationStatus::RealTime => "REAL",
            StationStatus::Deferred => "DIFERIDO",
            StationStatus::Automatic => "AUTOMATICA",
        }
    }
}

/// One record of the station catalog, as published on the station map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationMeta {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "cate")]
    pub category: StationCategory,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(rename = "ico")]
    pub station_type: StationType,
    #[serde(rename = "cod")]
    pub code: String,
    #[serde(rename = "cod_old", default)]
    pub legacy_code: Option<String>,
    #[serde(rename = "estado")]
    pub status: StationStatus,
}

impl StationMeta {
    pub fn is_meteorological(&self) -> bool {
        self.station_type == StationType::Meteorological
    }

    pub fn is_hydrological(&self) -> bool {
        self.station_type == StationType::Hydrological
    }

    pub fn is_automatic(&self) -> bool {
        self.status == StationStatus::Automatic
    }

    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn header_set(&self) -> HeaderSet {
        HeaderSet::for_station(self.station_type, self.status)
    }

    /// Prefix for output directories and files: the name without spaces.
    pub fn file_label(&self) -> String {
        self.name.split_whitespace().collect()
    }

    /// Rows of column headings the remote table carries before its data.
    pub fn table_start_line(&self) -> usize {
        if self.is_automatic() {
            1
        } else {
            2
        }
    }
}

impl fmt::Display for StationMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) - {}", self.name, self.code, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_catalog_record() {
        let json = r#"{"nom":"TICAPAMPA","cate":"CO","lat":-9.75,"lon":-77.44,"ico":"M","cod":"472D30C8","cod_old":"","estado":"DIFERIDO"}"#;
        let station: StationMeta = serde_json::from_str(json).unwrap();

        assert_eq!(station.category, StationCategory::Co);
        assert_eq!(station.station_type, StationType::Meteorological);
        assert_eq!(station.status, StationStatus::Deferred);
        assert_eq!(station.table_start_line(), 2);
        assert_eq!(station.to_string(), "TICAPAMPA (472D30C8) - CO");
    }

    #[test]
    fn rejects_unknown_category() {
        let json = r#"{"nom":"X","cate":"ZZZ","lat":0,"lon":0,"ico":"M","cod":"1","estado":"REAL"}"#;
        assert!(serde_json::from_str::<StationMeta>(json).is_err());
    }

    #[test]
    fn file_label_drops_spaces() {
        let json = r#"{"nom":"San Juan De Lucanas","cate":"EMA","lat":0,"lon":0,"ico":"M","cod":"1","estado":"AUTOMATICA"}"#;
        let station: StationMeta = serde_json::from_str(json).unwrap();
        assert_eq!(station.file_label(), "SanJuanDeLucanas");
        assert_eq!(station.table_start_line(), 1);
    }
}
