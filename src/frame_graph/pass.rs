//! Pass declarations: a call function plus its resource reads/writes and
//! bound material.
//!
//! Grounded on the teacher's `PassBuilder` (`src/frame/mod.rs`) for the
//! builder shape, generalized from Vulkan subpass dependencies to the
//! spec's flat input/output resource lists. Open Question decision #1
//! (SPEC_FULL.md §9): a pass may not declare the same resource as both
//! input and output — `PassBuilder::build` panics if it does, since
//! allowing it would make the barrier-insertion algorithm ambiguous about
//! read-before-write ordering within a single pass.

use crate::frame_graph::resource::ResourceHandle;
use crate::handle::Handle;

/// Context handed to a pass's call function at execution time. Backend
/// command recording is out of scope; this carries only what a canonical
/// pass stencil needs to decide what it *would* record.
pub struct PassExecuteContext {
    pub frame_index: u64,
}

pub type PassFn = Box<dyn FnMut(&PassExecuteContext) + Send>;

pub struct Pass {
    pub name: &'static str,
    pub call_fn: PassFn,
    pub material: Option<Handle>,
    pub inputs: Vec<ResourceHandle>,
    pub outputs: Vec<ResourceHandle>,
}

pub struct PassBuilder {
    name: &'static str,
    call_fn: Option<PassFn>,
    material: Option<Handle>,
    inputs: Vec<ResourceHandle>,
    outputs: Vec<ResourceHandle>,
}

impl PassBuilder {
    pub fn new(name: &'static str) -> PassBuilder {
        PassBuilder {
            name,
            call_fn: None,
            material: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn call(mut self, f: PassFn) -> PassBuilder {
        self.call_fn = Some(f);
        self
    }

    pub fn material(mut self, material: Handle) -> PassBuilder {
        self.material = Some(material);
        self
    }

    pub fn input(mut self, resource: ResourceHandle) -> PassBuilder {
        self.inputs.push(resource);
        self
    }

    pub fn output(mut self, resource: ResourceHandle) -> PassBuilder {
        self.outputs.push(resource);
        self
    }

    /// Panics if a resource was declared as both an input and an output —
    /// disallowed per Open Question decision #1.
    pub fn build(self) -> Pass {
        for input in &self.inputs {
            assert!(
                !self.outputs.contains(input),
                "pass '{}' declares resource {:?} as both input and output",
                self.name,
                input
            );
        }
        Pass {
            name: self.name,
            call_fn: self.call_fn.unwrap_or_else(|| Box::new(|_| {})),
            material: self.material,
            inputs: self.inputs,
            outputs: self.outputs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_succeeds_with_disjoint_input_output() {
        let pass = PassBuilder::new("test")
            .input(ResourceHandle(0))
            .output(ResourceHandle(1))
            .build();
        assert_eq!(pass.inputs.len(), 1);
        assert_eq!(pass.outputs.len(), 1);
    }

    #[test]
    #[should_panic(expected = "both input and output")]
    fn build_panics_on_shared_resource() {
        PassBuilder::new("bad")
            .input(ResourceHandle(0))
            .output(ResourceHandle(0))
            .build();
    }
}
