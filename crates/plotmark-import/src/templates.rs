//! Sample files showing the layout each format is expected to follow.
//!
//! Users download these, fill them in, and upload the result. Every
//! template imports without rejections.

use crate::format::FileFormat;

const CSV_TEMPLATE: &str = "\
annotationType,title,color,fillColor,lat,lng,geometry,description
LOCATION,Site Office,#e53935,,-38.1860,145.8110,,Main site office
AREA,Stockpile A,#43a047,#a5d6a7,,,\"[[145.8100,-38.1850],[145.8120,-38.1850],[145.8120,-38.1870],[145.8100,-38.1870]]\",Topsoil stockpile
LINE,Haul Road,#fb8c00,,,,\"[[145.8090,-38.1880],[145.8130,-38.1840]]\",
";

const GEOJSON_TEMPLATE: &str = r##"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": {"title": "Site Office", "color": "#e53935", "description": "Main site office"},
      "geometry": {"type": "Point", "coordinates": [145.8110, -38.1860]}
    },
    {
      "type": "Feature",
      "properties": {"title": "Stockpile A", "color": "#43a047", "fillColor": "#a5d6a7"},
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[145.8100, -38.1850], [145.8120, -38.1850], [145.8120, -38.1870], [145.8100, -38.1870], [145.8100, -38.1850]]]
      }
    },
    {
      "type": "Feature",
      "properties": {"title": "Haul Road", "color": "#fb8c00"},
      "geometry": {"type": "LineString", "coordinates": [[145.8090, -38.1880], [145.8130, -38.1840]]}
    }
  ]
}
"##;

const KML_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>Site annotations</name>
    <Placemark>
      <name>Site Office</name>
      <description>Main site office</description>
      <Point><coordinates>145.8110,-38.1860,0</coordinates></Point>
    </Placemark>
    <Placemark>
      <name>Stockpile A</name>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>
              145.8100,-38.1850,0 145.8120,-38.1850,0 145.8120,-38.1870,0
              145.8100,-38.1870,0 145.8100,-38.1850,0
            </coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
    <Placemark>
      <name>Haul Road</name>
      <LineString><coordinates>145.8090,-38.1880,0 145.8130,-38.1840,0</coordinates></LineString>
    </Placemark>
  </Document>
</kml>
"#;

/// Template text for `format`. KMZ has none; it is a zipped KML.
pub fn template(format: FileFormat) -> Option<&'static str> {
    match format {
        FileFormat::Csv => Some(CSV_TEMPLATE),
        FileFormat::GeoJson => Some(GEOJSON_TEMPLATE),
        FileFormat::Kml => Some(KML_TEMPLATE),
        FileFormat::Kmz => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{import_file, ImportOptions};
    use plotmark_core::AnnotationType;

    fn import_template(format: FileFormat, file_name: &str) -> Vec<AnnotationType> {
        let text = template(format).unwrap();
        let report = import_file(text.as_bytes(), file_name, &ImportOptions::default()).unwrap();
        assert!(report.rejected.is_empty(), "rejected: {:?}", report.rejected);
        report
            .annotations
            .iter()
            .map(|a| a.annotation_type())
            .collect()
    }

    #[test]
    fn test_templates_import_cleanly() {
        let expected = vec![
            AnnotationType::Location,
            AnnotationType::Area,
            AnnotationType::Line,
        ];
        assert_eq!(import_template(FileFormat::Csv, "template.csv"), expected);
        assert_eq!(import_template(FileFormat::GeoJson, "template.geojson"), expected);
        assert_eq!(import_template(FileFormat::Kml, "template.kml"), expected);
    }

    #[test]
    fn test_no_kmz_template() {
        assert_eq!(template(FileFormat::Kmz), None);
    }
}
