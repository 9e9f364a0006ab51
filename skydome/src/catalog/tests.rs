use common::float_ext::FloatExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use super::*;
use crate::placement::SKY_RADIUS;

fn header() -> serde_json::Value {
    json!({ "name": "catalog header" })
}

fn star(name: &str, ra: f64, de: f64) -> serde_json::Value {
    json!({ "name": name, "RA": ra, "DE": de, "mag": "3.2", "size": "0.25", "bv": "0.65" })
}

fn load(rows: Vec<serde_json::Value>) -> (StarCatalog, LoadReport) {
    let raw = RawCatalog::from_value(json!({ "stars": rows })).expect("star list");
    let mut catalog = StarCatalog::default();
    let mut rng = StdRng::seed_from_u64(7);
    let report = catalog.load(&raw, &CatalogConfig::default(), &mut rng);
    (catalog, report)
}

#[test]
fn header_row_is_skipped() {
    let (catalog, report) = load(vec![header(), star("Sirius", 101.28, -16.71)]);
    assert_eq!(report.rows, 1);
    assert_eq!(report.loaded, 1);
    assert_eq!(catalog.len(), 1);
    assert!(catalog.by_name("catalog header").is_none());
}

#[test]
fn malformed_rows_are_dropped() {
    let rows = vec![
        header(),
        star("Vega", 279.23, 38.78),
        json!({ "name": "broken", "RA": "??", "DE": 1.0, "mag": 1.0, "size": 0.5, "bv": 0.1 }),
        json!({ "name": "no-mag", "RA": 10.0, "DE": 1.0, "mag": "bright", "size": 0.5, "bv": 0.1 }),
        json!(42),
        star("Deneb", 310.36, 45.28),
    ];
    let (catalog, report) = load(rows);

    assert_eq!(report.rows, 5);
    assert_eq!(report.malformed, 3);
    assert_eq!(report.loaded, report.rows - report.malformed);
    assert_eq!(catalog.len(), 2);
    assert!(catalog.by_name("broken").is_none());
    assert!(catalog.by_name("no-mag").is_none());
    assert!(catalog.by_name("Deneb").is_some());
}

#[test]
fn ids_index_the_entity_list() {
    let (catalog, _) = load(vec![
        header(),
        star("A", 1.0, 1.0),
        json!({ "name": "bad" }),
        star("B", 2.0, 2.0),
    ]);
    for (idx, entity) in catalog.iter().enumerate() {
        assert_eq!(entity.id, StarId(idx as u32));
        assert_eq!(
            catalog.get(entity.id).map(|e| e.record.name.as_str()),
            Some(entity.record.name.as_str())
        );
    }
    assert_eq!(catalog.by_name("B").map(|e| e.id), Some(StarId(1)));
}

#[test]
fn entities_are_placed_and_coloured() {
    let (catalog, _) = load(vec![header(), star("Capella", 79.17, 45.99)]);
    let entity = catalog.by_name("Capella").expect("loaded");
    assert!(entity.position.length().approximately_eq_eps(SKY_RADIUS, 1e-6));
    assert!(entity.visual_radius.approximately_eq(5.0 + 345.0 * 0.25));
    assert_eq!(entity.color, crate::color::color_index_to_rgb(0.65));

    let info = entity.info();
    assert_eq!(info.id, "Capella");
    assert_eq!(info.magnitude, 3.2);
    assert_eq!(info.visual_radius, entity.visual_radius);
}

#[test]
fn empty_catalog_is_not_an_error() {
    let (catalog, report) = load(vec![]);
    assert!(catalog.is_loaded());
    assert!(catalog.is_empty());
    assert_eq!(report, LoadReport::default());
}

#[test]
fn reload_replaces_the_star_set() {
    let (mut catalog, _) = load(vec![header(), star("A", 1.0, 1.0), star("B", 2.0, 2.0)]);
    let raw = RawCatalog::from_value(json!([header(), star("C", 3.0, 3.0)])).expect("array");
    let mut rng = StdRng::seed_from_u64(1);
    catalog.load(&raw, &CatalogConfig::default(), &mut rng);
    assert_eq!(catalog.len(), 1);
    assert!(catalog.by_name("A").is_none());
    assert_eq!(catalog.by_name("C").map(|e| e.id), Some(StarId(0)));
}

#[test]
fn twinkle_follows_probability() {
    let rows: Vec<_> = std::iter::once(header())
        .chain((0..2000).map(|i| star(&format!("S{i}"), (i % 360) as f64, 0.0)))
        .collect();
    let (catalog, _) = load(rows);
    let twinkling = catalog.iter().filter(|s| s.twinkle).count();
    // ~20% with a generous band for a seeded sample of 2000
    assert!((300..500).contains(&twinkling), "got {twinkling}");

    let raw = RawCatalog::from_value(json!([header(), star("A", 1.0, 1.0)])).expect("array");
    let config = CatalogConfig {
        twinkle_probability: 0.0,
        ..Default::default()
    };
    let mut never = StarCatalog::default();
    never.load(&raw, &config, &mut StdRng::seed_from_u64(3));
    assert!(never.iter().all(|s| !s.twinkle));
}

#[test]
fn twinkle_time_advances_for_every_star() {
    let (mut catalog, _) = load(vec![header(), star("A", 1.0, 1.0), star("B", 2.0, 2.0)]);
    catalog.advance_twinkle(0.25);
    catalog.advance_twinkle(0.5);
    assert!(catalog.iter().all(|s| s.twinkle_time.approximately_eq(0.75)));
    assert!(catalog.instances().iter().all(|i| i.time.approximately_eq(0.75)));
}

#[test]
fn instances_are_plain_old_data() {
    let (catalog, _) = load(vec![header(), star("A", 90.0, 0.0)]);
    let instances = catalog.instances();
    let bytes: &[u8] = bytemuck::cast_slice(&instances);
    assert_eq!(bytes.len(), std::mem::size_of::<StarInstance>());
    assert!((instances[0].position[0] - 9000.0).abs() < 1e-2);
}

#[test]
fn config_validation() {
    assert!(CatalogConfig::default().validate().is_ok());
    let bad = CatalogConfig {
        twinkle_probability: 1.5,
        ..Default::default()
    };
    assert!(matches!(bad.validate(), Err(SkyError::Config(_))));
}

#[test]
fn non_finite_twinkle_probability_falls_back_to_default() {
    let raw = RawCatalog::from_value(json!({
        "stars": [header(), star("Vega", 279.23, 38.78), star("Deneb", 310.36, 45.28)]
    }))
    .expect("star list");
    let config = CatalogConfig {
        twinkle_probability: f64::NAN,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(SkyError::Config(_))));

    for probability in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let config = CatalogConfig {
            twinkle_probability: probability,
            ..Default::default()
        };
        let mut catalog = StarCatalog::default();
        let report = catalog.load(&raw, &config, &mut StdRng::seed_from_u64(7));
        assert_eq!(report.loaded, 2);
        assert_eq!(catalog.len(), 2);
    }
}
