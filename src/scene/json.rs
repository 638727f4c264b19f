//! `scene.json` schema (spec §6.4): scene name, a flat list of scene objects
//! (model file + position), and a light list. Grounded on
//! `original_source/.../SceneHierarchy.hpp`'s `SceneObject`/`LightCreateInfo`
//! field shapes, restricted to what the JSON schema actually carries — asset
//! (model) loading itself is out of scope.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSceneObject {
    pub file_name: String,
    pub position: [f32; 3],
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonLightType {
    Spotlight,
    Pointlight,
    Directional,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLight {
    pub light_type: JsonLightType,
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub specular_strength: f32,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff_radius: Option<f32>,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSceneBody {
    pub scene_name: String,
    pub scene_objects: Vec<JsonSceneObject>,
    pub lights: Vec<JsonLight>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SceneJson {
    pub scene: JsonSceneBody,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scene_with_spotlight() {
        let text = r#"{ "scene": {
            "scene_name": "demo",
            "scene_objects": [ { "file_name": "cube.model", "position": [0.0, 1.0, 0.0] } ],
            "lights": [
              { "light_type": "spotlight",
                "position": [0.0, 5.0, 0.0], "color": [1.0, 1.0, 1.0],
                "specular_strength": 0.5, "constant": 1.0, "linear": 0.09, "quadratic": 0.032,
                "direction": [0.0, -1.0, 0.0], "cutoff_radius": 12.5,
                "name": "spot_0" } ] } }"#;
        let parsed: SceneJson = serde_json::from_str(text).unwrap();
        assert_eq!(parsed.scene.scene_objects.len(), 1);
        assert_eq!(parsed.scene.lights.len(), 1);
        assert!(parsed.scene.lights[0].direction.is_some());
    }

    #[test]
    fn directional_light_omits_optional_fields() {
        let text = r#"{ "scene": {
            "scene_name": "demo",
            "scene_objects": [],
            "lights": [
              { "light_type": "directional",
                "position": [0.0, 0.0, 0.0], "color": [1.0, 1.0, 1.0],
                "specular_strength": 1.0, "constant": 1.0, "linear": 0.0, "quadratic": 0.0,
                "name": "sun" } ] } }"#;
        let parsed: SceneJson = serde_json::from_str(text).unwrap();
        assert!(parsed.scene.lights[0].direction.is_none());
    }
}
