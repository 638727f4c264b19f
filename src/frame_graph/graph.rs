//! Render graph lifecycle: `Recording` → `Compiled` → `Submitted` →
//! `Finished`.
//!
//! Grounded on the teacher's `FrameGraph` (`src/frame/mod.rs`,
//! `Graph<Box<Pass>, Dependency, Directed, u32>`) for the "passes and
//! dependencies as a petgraph digraph" shape, and spec §4.3.1 for the
//! lifecycle/compile/execute contract. For now, "topologically sorts
//! passes" degenerates to authored order (§4.3.1); the petgraph digraph
//! still backs pass ordering so a real topological sort is a drop-in
//! replacement once cross-pass reordering is needed.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::{EngineError, Result};
use crate::frame_graph::barrier::{barrier_for, ImageBarrier, ResourceUse};
use crate::frame_graph::pass::{Pass, PassExecuteContext};
use crate::frame_graph::resource::{Resource, ResourceHandle, ResourceKind, Upload};
use crate::gpu::{ImageLayout, UploadRing};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GraphState {
    Recording,
    Compiled,
    Submitted,
    Finished,
}

struct StagedCopy {
    resource: ResourceHandle,
    ring_offset: u64,
}

pub struct Graph {
    state: GraphState,
    back_buffer: u32,
    slot_fence_value: u64,
    completed_fence: u64,

    resources: Vec<Resource>,
    passes: Vec<Pass>,
    dependencies: DiGraph<u32, ()>,

    staged_copies: Vec<StagedCopy>,
    execution_order: Vec<NodeIndex>,
}

impl Graph {
    pub fn new() -> Graph {
        Graph {
            state: GraphState::Finished,
            back_buffer: 0,
            slot_fence_value: 0,
            completed_fence: 0,
            resources: Vec::new(),
            passes: Vec::new(),
            dependencies: DiGraph::new(),
            staged_copies: Vec::new(),
            execution_order: Vec::new(),
        }
    }

    /// Records the completed GPU fence value; `start` uses it to check the
    /// previous submission to this back-buffer slot has actually finished.
    pub fn notify_fence_completed(&mut self, value: u64) {
        self.completed_fence = self.completed_fence.max(value);
    }

    /// Requires the slot's last submission to be `Finished`; resets the
    /// pass/resource vectors for a fresh recording.
    pub fn start(&mut self, back_buffer: u32) -> Result<()> {
        if self.state != GraphState::Finished && self.completed_fence < self.slot_fence_value {
            return Err(EngineError::ResourceNotReady);
        }
        self.back_buffer = back_buffer;
        self.resources.clear();
        self.passes.clear();
        self.dependencies.clear();
        self.staged_copies.clear();
        self.execution_order.clear();
        self.state = GraphState::Recording;
        Ok(())
    }

    pub fn add_resource(&mut self, resource: Resource) -> ResourceHandle {
        debug_assert_eq!(self.state, GraphState::Recording);
        let handle = ResourceHandle(self.resources.len() as u32);
        self.resources.push(resource);
        handle
    }

    /// Appends a pass and wires dependency edges from every pass that
    /// produced one of this pass's inputs, so the digraph encodes a valid
    /// partial order even though traversal currently just replays authored
    /// order.
    pub fn add_pass(&mut self, pass: Pass) {
        debug_assert_eq!(self.state, GraphState::Recording);
        let node = self.dependencies.add_node(self.passes.len() as u32);
        for (producer_index, producer) in self.passes.iter().enumerate() {
            if producer.outputs.iter().any(|o| pass.inputs.contains(o)) {
                let producer_node = NodeIndex::new(producer_index);
                self.dependencies.add_edge(producer_node, node, ());
            }
        }
        self.passes.push(pass);
    }

    /// Topologically sorts passes, reserves upload-ring space for every
    /// resource with CPU-side data, and stages the copies `execute` will
    /// perform. Returns `ResourceNotReady` if the ring can't fit this
    /// frame's uploads — the caller should retry next frame rather than
    /// block on a fence wait.
    pub fn compile(&mut self, upload_ring: &mut UploadRing, fence_value: u64) -> Result<()> {
        debug_assert_eq!(self.state, GraphState::Recording);

        let order = toposort(&self.dependencies, None).map_err(|_| EngineError::ResourceNotReady)?;

        let mut staged = Vec::new();
        for (index, resource) in self.resources.iter().enumerate() {
            if let Upload::Bytes(ref bytes) = resource.upload {
                let offset = upload_ring.allocate(bytes.len() as u64, fence_value)?;
                upload_ring.memcpy_into(offset, bytes);
                staged.push(StagedCopy {
                    resource: ResourceHandle(index as u32),
                    ring_offset: offset,
                });
            }
        }

        // Nothing is committed to the graph's own state until every upload
        // reservation succeeds, so a failed allocate above leaves
        // `execution_order`/`staged_copies` exactly as `start()` left them.
        self.execution_order = order;
        self.staged_copies = staged;
        self.slot_fence_value = fence_value;
        self.state = GraphState::Compiled;
        Ok(())
    }

    /// Performs every staged upload-ring copy, then walks passes in
    /// execution order inserting barriers for any resource whose tracked
    /// layout doesn't match the pass's implied use before invoking the
    /// pass's call function.
    pub fn execute(&mut self) -> Vec<ImageBarrier> {
        debug_assert_eq!(self.state, GraphState::Compiled);

        // Backend copy submission is out of scope; staged copies are
        // consumed here so a caller inspecting `staged_copies` after
        // execute() sees none outstanding.
        self.staged_copies.clear();

        let mut all_barriers = Vec::new();
        let ctx = PassExecuteContext {
            frame_index: self.slot_fence_value,
        };

        for node in self.execution_order.clone() {
            let pass_index = self.dependencies[node] as usize;
            let mut barriers = Vec::new();
            {
                let pass = &self.passes[pass_index];
                for &input in &pass.inputs {
                    let resource = &self.resources[input.0 as usize];
                    if resource.kind == ResourceKind::Image {
                        let intended_use = if resource.is_depth {
                            ResourceUse::ReadDepth
                        } else {
                            ResourceUse::ReadFragment
                        };
                        if let Some(b) = barrier_for(input, resource.current_layout, intended_use) {
                            barriers.push(b);
                        }
                    }
                }
                for &output in &pass.outputs {
                    let resource = &self.resources[output.0 as usize];
                    if resource.kind == ResourceKind::Image {
                        let intended_use = if resource.is_depth {
                            ResourceUse::WriteDepth
                        } else {
                            ResourceUse::WriteColor
                        };
                        if let Some(b) = barrier_for(output, resource.current_layout, intended_use) {
                            barriers.push(b);
                        }
                    }
                }
            }
            for barrier in &barriers {
                self.resources[barrier.resource.0 as usize].current_layout = barrier.next;
            }
            all_barriers.extend(barriers);

            (self.passes[pass_index].call_fn)(&ctx);
        }

        self.state = GraphState::Submitted;
        all_barriers
    }

    pub fn finish(&mut self) {
        self.state = GraphState::Finished;
    }

    pub fn state(&self) -> GraphState {
        self.state
    }

    pub fn resource_layout(&self, resource: ResourceHandle) -> ImageLayout {
        self.resources[resource.0 as usize].current_layout
    }
}

impl Default for Graph {
    fn default() -> Self {
        Graph::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_graph::pass::PassBuilder;

    fn image_resource() -> Resource {
        Resource::new("color", ResourceKind::Image)
    }

    #[test]
    fn start_resets_recording_state() {
        let mut graph = Graph::new();
        graph.start(0).unwrap();
        assert_eq!(graph.state(), GraphState::Recording);
    }

    #[test]
    fn start_fails_if_previous_submission_not_finished() {
        let mut graph = Graph::new();
        graph.start(0).unwrap();
        let color = graph.add_resource(image_resource());
        let pass = PassBuilder::new("p").output(color).build();
        graph.add_pass(pass);
        let mut ring = UploadRing::new(1024);
        graph.compile(&mut ring, 1).unwrap();
        graph.execute();
        // state is Submitted, not Finished, and fence hasn't completed yet.
        assert!(graph.start(0).is_err());
    }

    #[test]
    fn start_succeeds_once_fence_completes() {
        let mut graph = Graph::new();
        graph.start(0).unwrap();
        let color = graph.add_resource(image_resource());
        let pass = PassBuilder::new("p").output(color).build();
        graph.add_pass(pass);
        let mut ring = UploadRing::new(1024);
        graph.compile(&mut ring, 1).unwrap();
        graph.execute();
        graph.notify_fence_completed(1);
        assert!(graph.start(1).is_ok());
    }

    #[test]
    fn execute_transitions_output_image_layout() {
        let mut graph = Graph::new();
        graph.start(0).unwrap();
        let color = graph.add_resource(image_resource());
        let pass = PassBuilder::new("p").output(color).build();
        graph.add_pass(pass);
        let mut ring = UploadRing::new(1024);
        graph.compile(&mut ring, 1).unwrap();
        let barriers = graph.execute();
        assert_eq!(barriers.len(), 1);
        assert_eq!(graph.resource_layout(color), ImageLayout::RtColor);
    }

    #[test]
    fn compile_stages_upload_for_resources_with_cpu_data() {
        let mut graph = Graph::new();
        graph.start(0).unwrap();
        let buf = graph.add_resource(
            Resource::new("const", ResourceKind::ReadonlyBuffer).with_upload(vec![1, 2, 3, 4]),
        );
        let pass = PassBuilder::new("p").input(buf).build();
        graph.add_pass(pass);
        let mut ring = UploadRing::new(1024);
        graph.compile(&mut ring, 1).unwrap();
        assert_eq!(graph.staged_copies.len(), 1);
    }

    #[test]
    fn failed_upload_allocate_leaves_graph_untouched() {
        let mut graph = Graph::new();
        graph.start(0).unwrap();
        let buf = graph.add_resource(
            Resource::new("const", ResourceKind::ReadonlyBuffer).with_upload(vec![0u8; 4 * 1024 * 1024]),
        );
        let pass = PassBuilder::new("p").input(buf).build();
        graph.add_pass(pass);

        // 1 MiB ring, already holding an unfinished 1 MiB segment, leaves no
        // free span for the pass's 4 MiB upload (SPEC_FULL.md §8 scenario 3).
        let mut ring = UploadRing::new(1024 * 1024);
        ring.allocate(1024 * 1024, 5).unwrap();

        assert!(graph.compile(&mut ring, 1).is_err());
        assert_eq!(graph.passes.len(), 1, "passes list must be preserved");
        assert!(graph.execution_order.is_empty(), "execution_order must stay empty on compile failure");
        assert!(graph.staged_copies.is_empty(), "no staged copy must survive a failed compile");
        assert_eq!(graph.state(), GraphState::Recording);
    }

    #[test]
    fn depth_resource_barriers_to_depth_layouts_not_color() {
        let mut graph = Graph::new();
        graph.start(0).unwrap();
        let depth = graph.add_resource(Resource::new("depth", ResourceKind::Image).as_depth());
        let pass = PassBuilder::new("shadow").output(depth).build();
        graph.add_pass(pass);
        let mut ring = UploadRing::new(1024);
        graph.compile(&mut ring, 1).unwrap();
        graph.execute();
        assert_eq!(graph.resource_layout(depth), ImageLayout::RtDepth);
    }
}
