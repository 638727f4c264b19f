//! Barrier insertion: before each pass, diff every input/output image's
//! tracked layout against the layout the pass implies and emit a barrier
//! for any mismatch.
//!
//! Grounded on the teacher's `Dependency`/`BarrierDetail::Image` (`src/frame/
//! dependency.rs`) for the barrier record shape, and spec §4.3.2 for the
//! exact algorithm: read layouts are `RwFragment`/`RoDepth`, write layouts
//! are `RtColor`/`RtDepth`.

use crate::gpu::ImageLayout;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ImageBarrier {
    pub resource: super::resource::ResourceHandle,
    pub prev: ImageLayout,
    pub next: ImageLayout,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ResourceUse {
    ReadFragment,
    ReadDepth,
    WriteColor,
    WriteDepth,
}

impl ResourceUse {
    fn implied_layout(self) -> ImageLayout {
        match self {
            ResourceUse::ReadFragment => ImageLayout::RwFragment,
            ResourceUse::ReadDepth => ImageLayout::RoDepth,
            ResourceUse::WriteColor => ImageLayout::RtColor,
            ResourceUse::WriteDepth => ImageLayout::RtDepth,
        }
    }
}

/// Compares `current` against the use's implied layout and returns a
/// barrier (and the new layout to record) if they differ.
pub fn barrier_for(
    resource: super::resource::ResourceHandle,
    current: ImageLayout,
    intended_use: ResourceUse,
) -> Option<ImageBarrier> {
    let next = intended_use.implied_layout();
    if current == next {
        None
    } else {
        Some(ImageBarrier {
            resource,
            prev: current,
            next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_graph::resource::ResourceHandle;

    #[test]
    fn matching_layout_emits_no_barrier() {
        let r = ResourceHandle(0);
        assert!(barrier_for(r, ImageLayout::RtColor, ResourceUse::WriteColor).is_none());
    }

    #[test]
    fn mismatched_layout_emits_a_barrier() {
        let r = ResourceHandle(0);
        let barrier = barrier_for(r, ImageLayout::Undefined, ResourceUse::WriteColor).unwrap();
        assert_eq!(barrier.prev, ImageLayout::Undefined);
        assert_eq!(barrier.next, ImageLayout::RtColor);
    }
}
