use serde_json::json;

use super::*;

fn catalog_json() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "distrito": "Lima" },
                "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]] }
            },
            {
                "type": "Feature",
                "properties": { "distrito": "Callao" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[2, 2], [3, 2], [3, 3], [2, 2]]],
                        [[[4, 4], [5, 4], [5, 5], [4, 4]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "no distrito property" },
                "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]] }
            },
            {
                "type": "Feature",
                "properties": { "distrito": "Pointy" },
                "geometry": { "type": "Point", "coordinates": [0, 0] }
            }
        ]
    })
}

// =============================================================
// DistrictCatalog
// =============================================================

#[test]
fn catalog_loads_polygonal_named_features() {
    let catalog = DistrictCatalog::from_geojson(&catalog_json()).unwrap();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.contains("Lima"));
    assert!(catalog.contains("Callao"));
    assert!(!catalog.contains("Pointy"));
}

#[test]
fn catalog_lookup_returns_boundary() {
    let catalog = DistrictCatalog::from_geojson(&catalog_json()).unwrap();
    let callao = catalog.get("Callao").unwrap();
    assert_eq!(callao.boundary.type_name(), "MultiPolygon");
    assert!(catalog.get("Miraflores").is_none());
}

#[test]
fn catalog_names_are_sorted() {
    let catalog = DistrictCatalog::from_geojson(&catalog_json()).unwrap();
    assert_eq!(catalog.sorted_names(), vec!["Callao", "Lima"]);
}

#[test]
fn catalog_iterates_in_load_order() {
    let catalog = DistrictCatalog::from_geojson(&catalog_json()).unwrap();
    let names: Vec<&str> = catalog.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Lima", "Callao"]);
}

#[test]
fn catalog_rejects_duplicate_names() {
    let poly = Geometry::Polygon { coordinates: vec![] };
    let err = DistrictCatalog::new(vec![
        DistrictFeature { name: "Lima".into(), boundary: poly.clone() },
        DistrictFeature { name: "Lima".into(), boundary: poly },
    ])
    .unwrap_err();
    assert!(matches!(err, CatalogError::Duplicate(ref n) if n == "Lima"));
}

#[test]
fn catalog_rejects_non_collection() {
    assert!(DistrictCatalog::from_geojson(&json!({ "type": "Point", "coordinates": [0, 0] })).is_err());
}

// =============================================================
// ProjectStatus
// =============================================================

#[test]
fn status_serde_lowercase() {
    assert_eq!(serde_json::to_value(ProjectStatus::Completed).unwrap(), json!("completed"));
    let s: ProjectStatus = serde_json::from_value(json!("archived")).unwrap();
    assert_eq!(s, ProjectStatus::Archived);
}

#[test]
fn unknown_status_is_kept() {
    let s: ProjectStatus = serde_json::from_value(json!("paused")).unwrap();
    assert_eq!(s, ProjectStatus::Other("paused".into()));
    assert_eq!(s.to_string(), "paused");
}

// =============================================================
// Project / Drawing
// =============================================================

#[test]
fn project_defaults_missing_collections() {
    let p: Project = serde_json::from_value(json!({ "id": 7, "name": "Parque", "status": "active" })).unwrap();
    assert!(p.drawings.is_empty());
    assert!(p.districts.is_empty());
    assert!(p.description.is_none());
}

#[test]
fn project_ignores_timestamps() {
    let p: Project = serde_json::from_value(json!({
        "id": 1,
        "name": "Via",
        "description": "x",
        "status": "inactive",
        "created_at": "2024-01-01T00:00:00",
        "updated_at": "2024-01-02T00:00:00",
        "districts": ["Lima"],
        "drawings": []
    }))
    .unwrap();
    assert_eq!(p.status, ProjectStatus::Inactive);
    assert_eq!(p.districts, vec!["Lima".to_owned()]);
}

#[test]
fn drawing_parses_string_geojson() {
    let d = Drawing {
        id: Some(3),
        geojson: json!(r#"{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[-77,-12]}}"#),
        drawing_type: "point".into(),
    };
    let geoms = d.geometries().unwrap();
    assert_eq!(geoms.len(), 1);
    assert_eq!(geoms[0].type_name(), "Point");
}

#[test]
fn drawing_reports_parse_failure() {
    let d = Drawing { id: None, geojson: json!("]["), drawing_type: String::new() };
    assert!(d.geometries().is_err());
}

// =============================================================
// ProjectDraft
// =============================================================

fn draft(name: &str, districts: &[&str]) -> ProjectDraft {
    ProjectDraft {
        name: name.into(),
        description: Some("  ".into()),
        status: ProjectStatus::Active,
        districts: districts.iter().map(|s| (*s).to_owned()).collect(),
    }
}

#[test]
fn draft_trims_and_clears_blank_description() {
    let d = draft("  Ciclovia  ", &["Lima"]).validated().unwrap();
    assert_eq!(d.name, "Ciclovia");
    assert!(d.description.is_none());
}

#[test]
fn draft_requires_name() {
    assert_eq!(draft("   ", &["Lima"]).validated().unwrap_err(), ValidationError::EmptyName);
}

#[test]
fn draft_requires_district() {
    assert_eq!(draft("Ciclovia", &[" "]).validated().unwrap_err(), ValidationError::NoDistricts);
}
