//! Per-frame resource table: typed handles into the vector of resources a
//! `Graph` recording accumulates.
//!
//! Grounded on the teacher's `src/frame/resource.rs` (`ImageId`/`BufferId`
//! as newtyped indices into the frame's resource vectors) generalized to
//! the spec's four resource kinds.

use crate::gpu::ImageLayout;

/// Identifies a resource within one `Graph` recording. Indices are only
/// valid for the recording that produced them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ResourceHandle(pub(crate) u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ResourceKind {
    ReadonlyConstant,
    ReadonlyBuffer,
    Image,
    Sampler,
}

/// Optional CPU-side payload to upload at compile time, for resources that
/// carry one (buffers and images created from host data).
pub enum Upload {
    None,
    Bytes(Vec<u8>),
}

pub struct Resource {
    pub name: &'static str,
    pub kind: ResourceKind,
    pub upload: Upload,
    pub current_layout: ImageLayout,
    pub descriptor: crate::handle::DescriptorIndex,
    /// Marks an `Image` resource as a depth target, so the barrier
    /// algorithm transitions it through `RoDepth`/`RtDepth` rather than
    /// the color layouts (spec §4.3.2).
    pub is_depth: bool,
}

impl Resource {
    pub fn new(name: &'static str, kind: ResourceKind) -> Resource {
        Resource {
            name,
            kind,
            upload: Upload::None,
            current_layout: ImageLayout::Undefined,
            descriptor: crate::handle::DescriptorIndex::new(0),
            is_depth: false,
        }
    }

    pub fn with_upload(mut self, bytes: Vec<u8>) -> Resource {
        self.upload = Upload::Bytes(bytes);
        self
    }

    pub fn as_depth(mut self) -> Resource {
        self.is_depth = true;
        self
    }
}
