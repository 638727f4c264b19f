//! GPU-facing resource types shared by the render graph (C3) and material
//! cache (C4). Actual device calls are out of scope; resources are modeled
//! through opaque `ash::vk` handles per the spec's "backend Vulkan calls"
//! exclusion.

pub mod buffer;
pub mod descriptor;
pub mod fence;
pub mod image;
pub mod upload_ring;

pub use buffer::{BufferKind, BufferView, GpuBuffer, LinearBuffer};
pub use descriptor::DescriptorHeap;
pub use fence::Fence;
pub use image::{ImageLayout, RImage, RImageView};
pub use upload_ring::UploadRing;
