//! Render graph and frame scheduler (spec component C3): resource
//! declarations, pass recording, barrier insertion, and the canonical pass
//! library. Grounded throughout on the teacher's `src/frame/*`.

pub mod barrier;
pub mod graph;
pub mod pass;
pub mod passes;
pub mod resource;

pub use barrier::{ImageBarrier, ResourceUse};
pub use graph::{Graph, GraphState};
pub use pass::{Pass, PassBuilder, PassExecuteContext};
pub use resource::{Resource, ResourceHandle, ResourceKind, Upload};
