//! Component payloads that aren't part of the transform hierarchy.
//!
//! Grounded on `original_source/.../EntityComponentSystem.cpp`'s
//! `RenderComponent`/`LightComponent` structs, translated field-for-field
//! per spec §3.3.

use glam::{Mat4, Vec3};

use crate::handle::{DescriptorIndex, Handle};

#[derive(Copy, Clone, Debug)]
pub struct NameComponent(pub [u8; 64]);

impl NameComponent {
    pub fn from_str(s: &str) -> NameComponent {
        let mut buf = [0u8; 64];
        let bytes = s.as_bytes();
        let len = bytes.len().min(63);
        buf[..len].copy_from_slice(&bytes[..len]);
        NameComponent(buf)
    }

    pub fn as_str(&self) -> &str {
        let len = self.0.iter().position(|&b| b == 0).unwrap_or(self.0.len());
        std::str::from_utf8(&self.0[..len]).unwrap_or("")
    }
}

/// Per-draw metallic/roughness parameters, written into a material
/// instance's cpu-writeable uniform buffer. Mirrors the source's
/// `MeshMetallic`, which `MaterialSystem.cpp`'s default 3D materials size
/// their `user_data_size` to exactly (`sizeof(MeshMetallic)`).
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct MeshMetallic {
    pub metallic: f32,
    pub roughness: f32,
}

impl Default for MeshMetallic {
    fn default() -> MeshMetallic {
        MeshMetallic { metallic: 0.0, roughness: 1.0 }
    }
}

/// A mesh draw with its bound material. `material_dirty` tells the material
/// cache (C4) the descriptor needs to be rewritten before the next frame.
#[derive(Copy, Clone, Debug)]
pub struct RenderComponent {
    pub mesh: Handle,
    pub index_start: u32,
    pub index_count: u32,
    pub master_material: Handle,
    pub material_instance: DescriptorIndex,
    pub material_data: MeshMetallic,
    pub material_dirty: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LightType {
    Point,
    Spot,
    Directional,
}

/// `color`/`specular_strength` mirror the source's `Light::color`, a
/// `float4` packing the raw RGB plus the scalar specular strength as the
/// fourth component for the shader to unpack.
#[derive(Copy, Clone, Debug)]
pub struct LightComponent {
    pub light_type: LightType,
    pub color: Vec3,
    pub specular_strength: f32,
    pub position: Vec3,
    pub radius_constant: f32,
    pub radius_linear: f32,
    pub radius_quadratic: f32,
    pub direction: Vec3,
    pub cutoff: f32,
    pub projection_view: Mat4,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_component_round_trips_short_strings() {
        let n = NameComponent::from_str("camera");
        assert_eq!(n.as_str(), "camera");
    }

    #[test]
    fn name_component_truncates_overlong_strings() {
        let long = "x".repeat(200);
        let n = NameComponent::from_str(&long);
        assert_eq!(n.as_str().len(), 63);
    }
}
