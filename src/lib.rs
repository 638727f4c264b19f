//! Core engine library: arenas, ECS, bindless render graph, material cache,
//! and input routing. The runnable shell lives in `main.rs`; everything here
//! is reusable without a window or a live Vulkan device.

pub mod config;
pub mod ecs;
pub mod error;
pub mod frame_graph;
pub mod gpu;
pub mod handle;
pub mod input;
pub mod logger;
pub mod material;
pub mod memory;
pub mod screenshot;
pub mod scene;
pub mod threading;

pub use error::{EngineError, Result};
