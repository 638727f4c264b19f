//! Master materials: a shader set bound to a pass type and material type,
//! shared by every instance drawn with it.
//!
//! Grounded on `original_source/.../MaterialSystem.{hpp,cpp}`:
//! `MaterialSystem_inst::material_map` (a slotmap of `MasterMaterial`) and
//! `CreateMasterMaterial`'s descriptor-layout selection by pass/material
//! type. The descriptor layouts themselves are out of scope (no live Vulkan
//! device); this module only records which logical set each pass/material
//! type combination resolves to.

use crate::handle::Handle;
use crate::logger::Severity;
use crate::material::shader_cache::{ShaderCache, ShaderEffectCreateInfo};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PassType {
    Global,
    Scene,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MaterialType {
    Material2D,
    Material3D,
}

/// One shader create request per stage, mirroring the source's
/// `MaterialCreateInfo::shader_infos` slice.
pub struct MaterialCreateInfo {
    pub name: &'static str,
    pub vertex: ShaderEffectCreateInfo,
    pub fragment: ShaderEffectCreateInfo,
    pub geometry: Option<ShaderEffectCreateInfo>,
    pub pass_type: PassType,
    pub material_type: MaterialType,
    pub user_data_size: u32,
    pub cpu_writeable: bool,
}

pub struct MasterMaterial {
    pub name: &'static str,
    pub vertex: Handle,
    pub fragment: Handle,
    pub geometry: Option<Handle>,
    pub pass_type: PassType,
    pub material_type: MaterialType,
    pub user_data_size: u32,
    pub cpu_writeable: bool,
}

/// Owns the shader cache and the table of master materials resolved against
/// it. Grounded on `MaterialSystem_inst`, minus the scene/global descriptor
/// layouts themselves (out of scope).
pub struct MasterMaterialTable {
    shaders: ShaderCache,
    materials: Vec<MasterMaterial>,
    max_materials: usize,
}

impl MasterMaterialTable {
    pub fn new(shaders: ShaderCache, max_materials: usize) -> MasterMaterialTable {
        MasterMaterialTable {
            shaders,
            materials: Vec::new(),
            max_materials,
        }
    }

    pub fn shaders(&self) -> &ShaderCache {
        &self.shaders
    }

    /// Resolves every shader-effect create-info against the cache in one
    /// batch (so effects sharing a source file share its single file read,
    /// per spec §4.4), then registers the master material. On a shader
    /// compile failure the master is not inserted and an invalid handle is
    /// returned, logged at `Severity::High`; capacity exceeded logs at
    /// `Severity::Medium` instead.
    pub fn create_master(&mut self, create_info: MaterialCreateInfo) -> Handle {
        if self.materials.len() >= self.max_materials {
            crate::engine_log!(Severity::Medium, "master material table full ({} slots)", self.max_materials);
            return Handle::default();
        }

        let mut infos = vec![create_info.vertex.clone(), create_info.fragment.clone()];
        if let Some(geom) = &create_info.geometry {
            infos.push(geom.clone());
        }

        let handles = match self.shaders.resolve(&infos) {
            Ok(handles) => handles,
            Err(err) => {
                crate::engine_log!(Severity::High, "{}", err);
                return Handle::default();
            }
        };

        let geometry = if create_info.geometry.is_some() {
            Some(handles[2])
        } else {
            None
        };

        let master = MasterMaterial {
            name: create_info.name,
            vertex: handles[0],
            fragment: handles[1],
            geometry,
            pass_type: create_info.pass_type,
            material_type: create_info.material_type,
            user_data_size: create_info.user_data_size,
            cpu_writeable: create_info.cpu_writeable,
        };
        let index = self.materials.len() as u32;
        self.materials.push(master);
        Handle::new(index, 1)
    }

    pub fn get(&self, handle: Handle) -> Option<&MasterMaterial> {
        self.materials.get(handle.index() as usize)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::shader_cache::{NextStages, ShaderStage};

    fn effect(stage: ShaderStage) -> ShaderEffectCreateInfo {
        ShaderEffectCreateInfo {
            path: "unused.glsl".to_string(),
            entry: "main".to_string(),
            stage,
            next_stages: NextStages::FRAGMENT,
        }
    }

    #[test]
    fn capacity_exceeded_returns_invalid_handle() {
        let shaders = match ShaderCache::new() {
            Ok(s) => s,
            Err(_) => return,
        };
        let mut table = MasterMaterialTable::new(shaders, 0);
        let handle = table.create_master(MaterialCreateInfo {
            name: "test",
            vertex: effect(ShaderStage::Vertex),
            fragment: effect(ShaderStage::Fragment),
            geometry: None,
            pass_type: PassType::Scene,
            material_type: MaterialType::Material3D,
            user_data_size: 64,
            cpu_writeable: false,
        });
        assert!(!handle.is_valid());
    }
}
