//! Tests for extent accumulation, templating and the STAC records.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Map};
use stac_common::{
    expand_date_template, expand_template, BoundingBox, CollectionExtent, Collection, Extent, Item,
    StacError, TemplateFields, TemplateValue,
};

fn day(m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, m, d, 0, 0, 0).unwrap()
}

// ============================================================================
// Extent accumulation
// ============================================================================

#[test]
fn test_extent_is_coordinate_wise_min_max() {
    let boxes = [
        BoundingBox::new(-10.0, 40.0, 10.0, 60.0),
        BoundingBox::new(-5.0, 45.0, 5.0, 55.0),
        BoundingBox::new(2.0, 35.0, 12.0, 41.0),
    ];

    let forward = boxes
        .iter()
        .enumerate()
        .fold(CollectionExtent::default(), |acc, (i, b)| acc.include(b, day(1, i as u32 + 1)));
    let backward = boxes
        .iter()
        .enumerate()
        .rev()
        .fold(CollectionExtent::default(), |acc, (i, b)| acc.include(b, day(1, i as u32 + 1)));

    assert_eq!(forward, backward);
    assert_eq!(forward.bbox, Some(BoundingBox::new(-10.0, 35.0, 12.0, 60.0)));
    assert_eq!(forward.start, Some(day(1, 1)));
    assert_eq!(forward.end, Some(day(1, 3)));
}

#[test]
fn test_seeded_extent_only_widens() {
    let seed = CollectionExtent::new(
        Some(BoundingBox::new(-20.0, 50.0, 0.0, 52.0)),
        Some(day(1, 10)),
        Some(day(1, 20)),
    );
    let extent = seed.include(&BoundingBox::new(-5.0, 45.0, 5.0, 55.0), day(1, 15));

    assert_eq!(extent.bbox, Some(BoundingBox::new(-20.0, 45.0, 5.0, 55.0)));
    assert_eq!(extent.start, Some(day(1, 10)));
    assert_eq!(extent.end, Some(day(1, 20)));
}

// ============================================================================
// Templates
// ============================================================================

struct Fields;

impl TemplateFields for Fields {
    fn field(&self, name: &str) -> Option<TemplateValue> {
        match name {
            "name" => Some("sst".into()),
            "n" => Some(7i64.into()),
            _ => None,
        }
    }
}

#[test]
fn test_item_subfolder_template() {
    assert_eq!(
        expand_date_template("sst-items/{year}/{month:02d}/", &day(3, 7)).unwrap(),
        "sst-items/2022/03/"
    );
    assert_eq!(
        expand_date_template("{year}{month:02d}{day:02d}", &day(11, 30)).unwrap(),
        "20221130"
    );
}

#[test]
fn test_template_padding_and_braces() {
    assert_eq!(expand_template("{name}-{n:03d}", &Fields).unwrap(), "sst-007");
    assert_eq!(expand_template("{{literal}} {n}", &Fields).unwrap(), "{literal} 7");
}

#[test]
fn test_template_errors() {
    assert!(matches!(
        expand_template("{missing}", &Fields),
        Err(StacError::UnknownTemplateField { .. })
    ));
    assert!(matches!(expand_template("{name", &Fields), Err(StacError::Template { .. })));
    assert!(matches!(expand_template("name}", &Fields), Err(StacError::Template { .. })));
}

// ============================================================================
// Records
// ============================================================================

#[test]
fn test_climatology_item_interval() {
    let mut item = Item::new("id", BoundingBox::new(-10.0, 40.0, 10.0, 60.0), Map::new());
    item.set_datetime(&day(1, 2));
    item.set_interval(
        &Utc.with_ymd_and_hms(1991, 1, 1, 0, 0, 0).unwrap(),
        &Utc.with_ymd_and_hms(2020, 12, 31, 0, 0, 0).unwrap(),
    );

    let v = serde_json::to_value(&item).unwrap();
    assert_eq!(v["properties"]["datetime"], json!("2022-01-02T00:00:00Z"));
    assert_eq!(v["properties"]["start_datetime"], json!("1991-01-01T00:00:00Z"));
    assert_eq!(v["properties"]["end_datetime"], json!("2020-12-31T00:00:00Z"));
}

#[test]
fn test_new_collection_document() {
    let mut collection = Collection::new("sst", "Sea surface temperature");
    collection.extent = Some(Extent::new(
        BoundingBox::new(-10.0, 40.0, 10.0, 60.0),
        Some(day(1, 1)),
        Some(day(1, 2)),
    ));

    let v: serde_json::Value = serde_json::from_str(&collection.to_json_pretty().unwrap()).unwrap();
    assert_eq!(v["type"], json!("Collection"));
    assert_eq!(v["stac_version"], json!("1.0.0"));
    assert_eq!(v["license"], json!("other"));
    assert_eq!(v["links"], json!([]));
    assert_eq!(
        v["stac_extensions"],
        json!(["https://stac-extensions.github.io/cf/v0.2.0/schema.json"])
    );
    assert_eq!(
        v["extent"]["temporal"]["interval"],
        json!([["2022-01-01T00:00:00Z", "2022-01-02T00:00:00Z"]])
    );
}
