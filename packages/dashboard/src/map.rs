//! `GeoJSON` rendering of the city markers.

use flood_map_analytics_models::GeoPoint;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

/// One `Point` feature per marker, carrying `city`, `count` and `radius`
/// properties.
#[must_use]
pub fn marker_collection(points: &[GeoPoint]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: points.iter().map(marker_feature).collect(),
        foreign_members: None,
    }
}

fn marker_feature(point: &GeoPoint) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("city".to_string(), point.city.clone().into());
    properties.insert("count".to_string(), point.count.into());
    properties.insert("radius".to_string(), point.radius.into());

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            point.longitude,
            point.latitude,
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn puts_longitude_first() {
        let collection = marker_collection(&[GeoPoint {
            city: "BOGOR".to_string(),
            latitude: -6.5971,
            longitude: 106.806,
            count: 20,
            radius: 2.0,
        }]);

        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(
            json["features"][0]["geometry"]["coordinates"],
            serde_json::json!([106.806, -6.5971])
        );
        assert_eq!(json["features"][0]["properties"]["radius"], 2.0);
    }

    #[test]
    fn empty_markers_give_empty_collection() {
        assert!(marker_collection(&[]).features.is_empty());
    }
}
