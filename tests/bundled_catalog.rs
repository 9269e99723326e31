use pretty_assertions::assert_eq;
use std::path::Path;

use senamhi_scraper::models::HeaderSet;
use senamhi_scraper::parsers::html_table_to_csv;
use senamhi_scraper::registry::StationRegistry;

fn registry() -> StationRegistry {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/estaciones.json");
    StationRegistry::load(&path).unwrap()
}

#[test]
fn bundled_catalog_loads() {
    let registry = registry();
    assert_eq!(registry.len(), 4);

    let hydro = registry.find("2210d47c").unwrap();
    assert_eq!(hydro.name, "Puente Chagual");
    assert_eq!(hydro.file_label(), "PuenteChagual");
    assert_eq!(hydro.header_set(), HeaderSet::HydrologicalConventional);
    assert_eq!(hydro.legacy_code, None);

    let chavin = registry.find("47E37B7A").unwrap();
    assert_eq!(chavin.legacy_code.as_deref(), Some("000436"));
}

#[test]
fn automatic_rows_match_their_header_set() {
    let registry = registry();
    let station = registry.find("472B03DA").unwrap();
    let headers = station.header_set();
    assert_eq!(headers, HeaderSet::MeteorologicalAutomatic);

    let table = r#"<table>
        <tr><th>AÑO/MES/DÍA</th><th>HORA</th><th>TEMP</th><th>PREC</th><th>HUM</th><th>DIR</th><th>VEL</th></tr>
        <tr><td>2024/03/01</td><td>00:00</td><td>12.1</td><td>0</td><td>88</td><td>270</td><td>1.5</td></tr>
        <tr><td>2024/03/01</td><td>01:00</td><td>11.8</td><td>S/D</td><td>90</td><td>265</td><td>1.2</td></tr>
    </table>"#;

    let csv = html_table_to_csv(table, ";", station.table_start_line());
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in &lines {
        let cells: Vec<&str> = line.split(';').collect();
        assert!(headers.validate_row(&cells), "wrong width: {line}");
    }
    assert_eq!(lines[1], "2024;03;01;01:00;11.8;0.0;90;265;1.2");
}
