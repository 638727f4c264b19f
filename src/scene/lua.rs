//! Scripting bridge interface (spec §6.2: `lua/` scripts implementing
//! `Init`, `Update(dt, selected)`, `Destroy`, `GetCameraPos`,
//! `GetCameraUp`, `GetCameraForward`).
//!
//! Embedding a Lua runtime is explicitly out of scope; this records only the
//! trait shape a host would implement against, grounded on
//! `original_source/.../Engine/lua/LuaEngine.hpp`'s script lifecycle calls.

use glam::Vec3;

/// The contract a project's `lua/` script fulfils. No implementation is
/// embedded here — this exists so callers elsewhere in the crate (e.g. a
/// scene update loop) have a concrete type to hold a script behind, without
/// committing to an actual Lua VM.
pub trait SceneScript {
    fn init(&mut self);
    fn update(&mut self, dt: f32, selected: bool);
    fn destroy(&mut self);
    fn camera_pos(&self) -> Vec3;
    fn camera_up(&self) -> Vec3;
    fn camera_forward(&self) -> Vec3;
}
