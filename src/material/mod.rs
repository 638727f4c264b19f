//! Material & shader cache (spec component C4): a content-addressable
//! shader effect cache, master materials resolved against it, and the
//! freelist of per-draw instances bound into the bindless descriptor array.
//! Grounded throughout on `original_source/.../MaterialSystem.{hpp,cpp}`.

pub mod instance;
pub mod master;
pub mod shader_cache;

pub use instance::{bind, MaterialInstance, MaterialInstanceKey, MaterialInstanceTable};
pub use master::{MasterMaterial, MasterMaterialTable, MaterialCreateInfo, MaterialType, PassType};
pub use shader_cache::{NextStages, ShaderCache, ShaderEffectCreateInfo, ShaderStage};
