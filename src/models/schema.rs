use super::station::{StationStatus, StationType};

pub const METEOROLOGICAL_CONVENTIONAL_HEADERS: &[&str] = &[
    "Año",
    "Mes",
    "Día",
    "Temp. Máx (°C)",
    "Temp. Mín (°C)",
    "Humedad (%)",
    "Precipitación (mm)",
];

pub const METEOROLOGICAL_AUTOMATIC_HEADERS: &[&str] = &[
    "Año",
    "Mes",
    "Día",
    "Hora",
    "Temperatura (°C)",
    "Precipitación (mm)",
    "Humedad (%)",
    "Dir. Viento (°)",
    "Vel. Viento (m/s)",
];

pub const HYDROLOGICAL_CONVENTIONAL_HEADERS: &[&str] = &[
    "Año",
    "Mes",
    "Día",
    "Nivel del río (m) 06",
    "Nivel del río (m) 10",
    "Nivel del río (m) 14",
    "Nivel del río (m) 18",
];

pub const HYDROLOGICAL_AUTOMATIC_HEADERS: &[&str] = &[
    "Año",
    "Mes",
    "Día",
    "Hora",
    "Nivel del río (m)",
    "Precipitación (mm/hora)",
];

/// CSV column schema, fixed by station type and whether it is automatic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSet {
    MeteorologicalConventional,
    MeteorologicalAutomatic,
    HydrologicalConventional,
    HydrologicalAutomatic,
}

impl HeaderSet {
    pub fn for_station(station_type: StationType, status: StationStatus) -> Self {
        let automatic = status == StationStatus::Automatic;
        match (station_type, automatic) {
            (StationType::Meteorological, true) => HeaderSet::MeteorologicalAutomatic,
            (StationType::Meteorological, false) => HeaderSet::MeteorologicalConventional,
            (StationType::Hydrological, true) => HeaderSet::HydrologicalAutomatic,
            (StationType::Hydrological, false) => HeaderSet::HydrologicalConventional,
        }
    }

    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            HeaderSet::MeteorologicalConventional => METEOROLOGICAL_CONVENTIONAL_HEADERS,
            HeaderSet::MeteorologicalAutomatic => METEOROLOGICAL_AUTOMATIC_HEADERS,
            HeaderSet::HydrologicalConventional => HYDROLOGICAL_CONVENTIONAL_HEADERS,
            HeaderSet::HydrologicalAutomatic => HYDROLOGICAL_AUTOMATIC_HEADERS,
        }
    }

    pub fn header_strings(&self) -> Vec<String> {
        self.headers().iter().map(|h| h.to_string()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.headers().len()
    }

    pub fn validate_row<S: AsRef<str>>(&self, row: &[S]) -> bool {
        row.len() == self.column_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_by_type_and_automatic_status() {
        use StationStatus::*;
        use StationType::*;

        assert_eq!(HeaderSet::for_station(Meteorological, RealTime).column_count(), 7);
        assert_eq!(HeaderSet::for_station(Meteorological, Deferred).column_count(), 7);
        assert_eq!(HeaderSet::for_station(Meteorological, Automatic).column_count(), 9);
        assert_eq!(HeaderSet::for_station(Hydrological, Deferred).column_count(), 7);
        assert_eq!(HeaderSet::for_station(Hydrological, Automatic).column_count(), 6);
    }

    #[test]
    fn validate_row_checks_column_count() {
        let set = HeaderSet::HydrologicalAutomatic;
        assert!(set.validate_row(&["2024", "09", "15", "13:00", "1.2", "0.0"]));
        assert!(!set.validate_row(&["2024", "09", "15"]));
    }
}
