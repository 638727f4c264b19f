//! Scene/project layer: JSON scene description, project layout discovery,
//! and the scripting bridge interface. Grounded on
//! `original_source/.../Engine/SceneHierarchy.{hpp,cpp}`.

pub mod json;
pub mod lua;
pub mod project;

pub use json::{JsonLight, JsonLightType, JsonSceneBody, JsonSceneObject, SceneJson};
pub use lua::SceneScript;
pub use project::ProjectRoot;

use crate::ecs::{LightComponent, LightType};
use crate::error::{EngineError, Result};
use glam::{Mat4, Vec3};
use std::fs;
use std::path::Path;

/// Loads and parses `scene.json` from `path`.
pub fn load_scene_json(path: &Path) -> Result<SceneJson> {
    let text = fs::read_to_string(path).map_err(|e| EngineError::ReadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| EngineError::ReadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Converts one parsed JSON light record into a `LightComponent`, per the
/// field mapping in spec §3.3/§6.4. `cutoff_radius` only matters for
/// spotlights; other kinds default it to zero. `color`/`specular_strength`
/// carry straight through from JSON, matching `SceneHierarchy.cpp`'s
/// `CreateLight` packing raw color plus the scalar specular strength with
/// no multiply.
pub fn light_from_json(json: &JsonLight) -> LightComponent {
    let light_type = match json.light_type {
        JsonLightType::Spotlight => LightType::Spot,
        JsonLightType::Pointlight => LightType::Point,
        JsonLightType::Directional => LightType::Directional,
    };
    let direction = json.direction.map(Vec3::from_array).unwrap_or(Vec3::NEG_Y);
    let position = Vec3::from_array(json.position);
    LightComponent {
        light_type,
        color: Vec3::from_array(json.color),
        specular_strength: json.specular_strength,
        position,
        radius_constant: json.constant,
        radius_linear: json.linear,
        radius_quadratic: json.quadratic,
        direction,
        cutoff: json.cutoff_radius.unwrap_or(0.0),
        projection_view: Mat4::IDENTITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::json::JsonLightType;

    #[test]
    fn spotlight_maps_to_spot_light_type() {
        let json = JsonLight {
            light_type: JsonLightType::Spotlight,
            position: [0.0, 1.0, 0.0],
            color: [1.0, 1.0, 1.0],
            specular_strength: 0.5,
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
            direction: Some([0.0, -1.0, 0.0]),
            cutoff_radius: Some(12.5),
            name: "spot".to_string(),
        };
        let light = light_from_json(&json);
        assert_eq!(light.light_type, LightType::Spot);
        assert_eq!(light.cutoff, 12.5);
        assert_eq!(light.color, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(light.specular_strength, 0.5);
    }
}
