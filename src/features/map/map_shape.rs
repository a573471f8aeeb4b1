//! GeoJSON outline the choropleth is drawn on.
//!
//! Only `features[].properties.name` is interpreted; geometry passes through.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::Path;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "feature_collection_type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub id: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub geometry: Value,
}

fn feature_collection_type() -> String {
    "FeatureCollection".to_string()
}

fn feature_type() -> String {
    "Feature".to_string()
}

impl Feature {
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(Value::as_str)
    }
}

impl FeatureCollection {
    /// Bounding box of the whole country, used when no outline can be loaded
    pub fn placeholder() -> Self {
        let mut properties = Map::new();
        properties.insert("name".to_string(), Value::from("中国"));

        Self {
            kind: feature_collection_type(),
            features: vec![Feature {
                kind: feature_type(),
                id: Some(Value::from("china")),
                properties,
                geometry: json!({
                    "type": "Polygon",
                    "coordinates": [[[75, 53], [135, 53], [135, 18], [75, 18], [75, 53]]]
                }),
            }],
        }
    }

    /// Names of all named regions, in document order
    pub fn region_names(&self) -> Vec<String> {
        self.features
            .iter()
            .filter_map(Feature::name)
            .map(str::to_string)
            .collect()
    }
}

/// Load the outline from `path`. Any failure is logged and answered with
/// [`FeatureCollection::placeholder`].
pub async fn load_map_shape(path: &Path) -> FeatureCollection {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(
                "Failed to read map shape {}: {}; using placeholder outline",
                path.display(),
                e
            );
            return FeatureCollection::placeholder();
        }
    };

    match serde_json::from_str::<FeatureCollection>(&raw) {
        Ok(shape) => {
            tracing::info!(
                "Loaded map shape {} with {} regions",
                path.display(),
                shape.features.len()
            );
            shape
        }
        Err(e) => {
            tracing::warn!(
                "Map shape {} is not a feature collection: {}; using placeholder outline",
                path.display(),
                e
            );
            FeatureCollection::placeholder()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_missing_file_falls_back_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let shape = load_map_shape(&dir.path().join("china.json")).await;
        assert_eq!(shape, FeatureCollection::placeholder());
        assert_eq!(shape.region_names(), vec!["中国"]);
    }

    #[tokio::test]
    async fn test_document_without_features_falls_back() {
        let file = write_temp(r#"{"type":"FeatureCollection"}"#);
        assert_eq!(
            load_map_shape(file.path()).await,
            FeatureCollection::placeholder()
        );

        let file = write_temp("not json");
        assert_eq!(
            load_map_shape(file.path()).await,
            FeatureCollection::placeholder()
        );
    }

    #[tokio::test]
    async fn test_valid_shape_keeps_geometry() {
        let file = write_temp(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {"type": "Feature", "properties": {"name": "广东", "adcode": 440000},
                     "geometry": {"type": "Point", "coordinates": [113.2, 23.1]}},
                    {"type": "Feature", "properties": {},
                     "geometry": {"type": "Point", "coordinates": [0, 0]}}
                ]
            }"#,
        );

        let shape = load_map_shape(file.path()).await;
        assert_eq!(shape.features.len(), 2);
        assert_eq!(shape.region_names(), vec!["广东"]);
        assert_eq!(shape.features[0].properties["adcode"], 440000);
        assert_eq!(shape.features[0].geometry["type"], "Point");
    }

    #[test]
    fn test_placeholder_serializes_as_geojson() {
        let value = serde_json::to_value(FeatureCollection::placeholder()).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["properties"]["name"], "中国");
        assert_eq!(value["features"][0]["geometry"]["coordinates"][0][2][1], 18);
    }
}
