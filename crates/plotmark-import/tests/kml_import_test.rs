//! KML import through the public pipeline.

use plotmark_core::{default_color, AnnotationType, Geometry, LatLng};
use plotmark_import::{import_file, FileFormat, ImportError, ImportOptions};

fn document(placemarks: &str) -> Vec<u8> {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>Site</name>
    {placemarks}
  </Document>
</kml>"#
    )
    .into_bytes()
}

const GATE: &str = "<Placemark><name>Gate A</name>\
    <Point><coordinates>145.811,-38.186,0</coordinates></Point></Placemark>";

const SLIVER: &str = "<Placemark><name>Sliver</name><Polygon><outerBoundaryIs><LinearRing>\
    <coordinates>145.81,-38.18 145.82,-38.18</coordinates>\
    </LinearRing></outerBoundaryIs></Polygon></Placemark>";

const ROAD: &str = "<Placemark><name>Haul Road</name>\
    <LineString><coordinates>145.809,-38.188,0 145.813,-38.184,0</coordinates></LineString></Placemark>";

#[test]
fn test_two_point_polygon_rejected_others_survive() {
    let bytes = document(&format!("{GATE}{SLIVER}{ROAD}"));
    let report = import_file(&bytes, "site.kml", &ImportOptions::default()).unwrap();

    let titles: Vec<_> = report.annotations.iter().map(|a| a.title()).collect();
    assert_eq!(titles, vec!["Gate A", "Haul Road"]);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].record.index, 1);
    assert!(report.rejected[0].reason.contains("insufficient points"));
}

#[test]
fn test_point_coordinates_and_default_color() {
    let report = import_file(&document(GATE), "site.kml", &ImportOptions::default()).unwrap();
    let gate = &report.annotations[0];
    assert_eq!(
        gate.geometry(),
        &Geometry::Location(LatLng {
            lat: -38.186,
            lng: 145.811
        })
    );
    assert_eq!(gate.color(), default_color().color);
    assert_eq!(gate.fill_color(), default_color().color);
}

#[test]
fn test_polygon_is_closed_and_holes_ignored() {
    let polygon = "<Placemark><name>Pad</name><Polygon>\
        <outerBoundaryIs><LinearRing><coordinates>0,0 4,0 4,4</coordinates></LinearRing></outerBoundaryIs>\
        <innerBoundaryIs><LinearRing><coordinates>1,1 2,1 2,2 1,1</coordinates></LinearRing></innerBoundaryIs>\
        </Polygon></Placemark>";
    let report = import_file(&document(polygon), "site.kml", &ImportOptions::default()).unwrap();
    assert_eq!(report.annotations[0].annotation_type(), AnnotationType::Area);
    assert_eq!(
        report.annotations[0].geometry(),
        &Geometry::Area(vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 0.0]])
    );
}

#[test]
fn test_nested_folders_and_unnamed_placemarks() {
    let body = format!(
        "<Folder><name>Gates</name><Folder>{GATE}</Folder></Folder>\
         <Placemark><Point><coordinates>1,2</coordinates></Point></Placemark>"
    );
    let report = import_file(&document(&body), "site.kml", &ImportOptions::default()).unwrap();
    assert_eq!(report.annotations.len(), 1);
    assert_eq!(report.rejected[0].reason, "Missing required field: title");
}

#[test]
fn test_malformed_xml_is_fatal() {
    let bytes = document("<Placemark><name>Gate A</Placemark>");
    let err = import_file(&bytes, "site.kml", &ImportOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ImportError::MalformedFile {
            format: FileFormat::Kml,
            ..
        }
    ));
}

#[test]
fn test_missing_document_is_fatal() {
    let bytes = format!("<kml>{GATE}</kml>").into_bytes();
    let err = import_file(&bytes, "site.kml", &ImportOptions::default()).unwrap_err();
    assert!(err.to_string().contains("missing <Document> element"));
}

#[test]
fn test_document_without_placemarks_is_empty_result() {
    let err = import_file(&document(""), "site.kml", &ImportOptions::default()).unwrap_err();
    assert!(matches!(err, ImportError::EmptyResult { .. }));
}

#[test]
fn test_self_closing_placemark_is_reported() {
    let bytes = document(&format!("<Placemark/>{GATE}"));
    let report = import_file(&bytes, "site.kml", &ImportOptions::default()).unwrap();
    assert_eq!(report.annotations.len(), 1);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].record.index, 0);
    assert_eq!(report.rejected[0].reason, "placemark has no geometry");
}
