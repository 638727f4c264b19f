//! Content-addressable shader effect cache.
//!
//! Grounded on `original_source/.../MaterialSystem.cpp`'s `ShaderEffectHash`
//! and `CreateShaderEffects_impl`: effects are keyed by a hash of
//! `(entry, path, stage, next_stages)`, a cache hit returns the existing
//! handle, and a miss reads the source file once and compiles every effect
//! that shares it in a single pass. Compilation itself runs through
//! `shaderc`, the teacher's own SPIR-V compiler dependency.

use std::collections::HashMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use fxhash::FxHasher;

use crate::error::{EngineError, Result};
use crate::handle::Handle;
use crate::logger::Severity;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
}

impl ShaderStage {
    fn to_shaderc_kind(self) -> shaderc::ShaderKind {
        match self {
            ShaderStage::Vertex => shaderc::ShaderKind::Vertex,
            ShaderStage::Fragment => shaderc::ShaderKind::Fragment,
            ShaderStage::Geometry => shaderc::ShaderKind::Geometry,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Geometry => "geometry",
        }
    }
}

bitflags::bitflags! {
    /// Stages a shader's outputs feed into; part of the cache key since the
    /// same entry point compiled for different downstream stages produces
    /// different interface decorations.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct NextStages: u32 {
        const FRAGMENT = 1 << 0;
        const GEOMETRY = 1 << 1;
    }
}

/// One shader-effect creation request, the unit of both hashing and
/// file-sharing: two effects with the same `path` read the file once.
#[derive(Clone, Debug)]
pub struct ShaderEffectCreateInfo {
    pub path: String,
    pub entry: String,
    pub stage: ShaderStage,
    pub next_stages: NextStages,
}

fn effect_hash(info: &ShaderEffectCreateInfo) -> u64 {
    let mut hasher = FxHasher::default();
    info.entry.hash(&mut hasher);
    info.path.hash(&mut hasher);
    info.stage.hash(&mut hasher);
    info.next_stages.bits().hash(&mut hasher);
    hasher.finish()
}

/// A compiled effect: the SPIR-V words plus the create-info that produced
/// them, kept around for introspection (`GetAllCachedShaders` in the source).
pub struct CachedShaderEffect {
    pub handle: Handle,
    pub spirv: Vec<u32>,
    pub create_info: ShaderEffectCreateInfo,
}

pub struct ShaderCache {
    compiler: shaderc::Compiler,
    by_hash: HashMap<u64, Handle>,
    effects: Vec<CachedShaderEffect>,
}

impl ShaderCache {
    pub fn new() -> Result<ShaderCache> {
        let compiler = shaderc::Compiler::new().ok_or_else(|| EngineError::ShaderCompileError {
            entry: String::new(),
            stage: "n/a",
            message: "failed to initialize shaderc compiler".to_string(),
        })?;
        Ok(ShaderCache {
            compiler,
            by_hash: HashMap::new(),
            effects: Vec::new(),
        })
    }

    pub fn get(&self, handle: Handle) -> Option<&CachedShaderEffect> {
        self.effects
            .iter()
            .find(|effect| effect.handle == handle)
    }

    /// Resolves every requested effect against the cache, reading and
    /// compiling each distinct source path only once. Returns one handle per
    /// `infos` entry in order, or the first compile error encountered (the
    /// source's "all or nothing" behavior: `CreateShaderEffects_impl` aborts
    /// the whole batch on the first failure).
    pub fn resolve(&mut self, infos: &[ShaderEffectCreateInfo]) -> Result<Vec<Handle>> {
        let mut resolved = vec![None; infos.len()];
        let mut misses: Vec<usize> = Vec::new();

        for (i, info) in infos.iter().enumerate() {
            let hash = effect_hash(info);
            if let Some(handle) = self.by_hash.get(&hash) {
                resolved[i] = Some(*handle);
            } else {
                misses.push(i);
            }
        }

        let mut source_cache: HashMap<&str, String> = HashMap::new();
        for &i in &misses {
            let info = &infos[i];
            let source = match source_cache.get(info.path.as_str()) {
                Some(cached) => cached.clone(),
                None => {
                    let text = fs::read_to_string(&info.path).map_err(|e| EngineError::ReadFailed {
                        path: info.path.clone().into(),
                        message: e.to_string(),
                    })?;
                    source_cache.insert(&info.path, text.clone());
                    text
                }
            };

            let compiled = self
                .compiler
                .compile_into_spirv(&source, info.stage.to_shaderc_kind(), &info.path, &info.entry, None)
                .map_err(|e| {
                    crate::engine_log!(
                        Severity::High,
                        "shader compile failed for '{}' ({:?}): {}",
                        info.path,
                        info.stage,
                        e
                    );
                    EngineError::ShaderCompileError {
                        entry: info.entry.clone(),
                        stage: info.stage.as_str(),
                        message: e.to_string(),
                    }
                })?;

            let handle = Handle::new(self.effects.len() as u32, 1);
            let hash = effect_hash(info);
            self.by_hash.insert(hash, handle);
            self.effects.push(CachedShaderEffect {
                handle,
                spirv: compiled.as_binary().to_vec(),
                create_info: info.clone(),
            });
            resolved[i] = Some(handle);
        }

        Ok(resolved.into_iter().map(|h| h.expect("every effect resolved")).collect())
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(path: &str, entry: &str, stage: ShaderStage) -> ShaderEffectCreateInfo {
        ShaderEffectCreateInfo {
            path: path.to_string(),
            entry: entry.to_string(),
            stage,
            next_stages: NextStages::FRAGMENT,
        }
    }

    #[test]
    fn hash_distinguishes_stage_and_entry() {
        let a = info("shader.glsl", "main_vs", ShaderStage::Vertex);
        let b = info("shader.glsl", "main_fs", ShaderStage::Fragment);
        assert_ne!(effect_hash(&a), effect_hash(&b));
    }

    #[test]
    fn hash_is_stable_for_identical_requests() {
        let a = info("shader.glsl", "main", ShaderStage::Vertex);
        let b = info("shader.glsl", "main", ShaderStage::Vertex);
        assert_eq!(effect_hash(&a), effect_hash(&b));
    }

    #[test]
    fn identical_requests_share_one_cached_effect() {
        let mut cache = match ShaderCache::new() {
            Ok(c) => c,
            Err(_) => return,
        };
        let dir = std::env::temp_dir();
        let path = dir.join("forge-engine-shader-cache-test.vert");
        fs::write(&path, "#version 450\nvoid main() { gl_Position = vec4(0.0); }\n").unwrap();
        let path_str = path.to_str().unwrap();

        let infos = vec![info(path_str, "main", ShaderStage::Vertex)];
        let first = cache.resolve(&infos).unwrap();
        let before = cache.len();
        let second = cache.resolve(&infos).unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.len(), before, "second resolve must not add a new cached effect");
        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_source_file_is_read_failed_not_panic() {
        let mut cache = match ShaderCache::new() {
            Ok(c) => c,
            Err(_) => return,
        };
        let infos = vec![info("/nonexistent/path/shader.glsl", "main", ShaderStage::Vertex)];
        assert!(cache.resolve(&infos).is_err());
    }
}
