//! Physical image allocations and their view interpretations, tracked with
//! a logical current layout the render graph transitions through barriers.
//!
//! Grounded on the teacher's `src/image/description.rs` (`ImageDescription`,
//! view type/format/mip-and-layer-range) and spec §3.4: "Images carry a
//! logical `current_layout`; the render graph tracks and transitions it."

use ash::vk;

use crate::handle::DescriptorIndex;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ImageLayout {
    Undefined,
    General,
    RwFragment,
    RoDepth,
    RtColor,
    RtDepth,
    PresentSrc,
}

/// A physical image allocation. The backend handle is opaque `ash::vk`
/// per the out-of-scope note on raw Vulkan calls.
pub struct RImage {
    pub handle: vk::Image,
    pub format: vk::Format,
    pub extent: vk::Extent3D,
    pub mip_levels: u32,
    pub array_layers: u32,
    pub current_layout: ImageLayout,
    pub descriptor: DescriptorIndex,
}

impl RImage {
    pub fn transition(&mut self, next: ImageLayout) -> Option<(ImageLayout, ImageLayout)> {
        if self.current_layout == next {
            None
        } else {
            let prev = self.current_layout;
            self.current_layout = next;
            Some((prev, next))
        }
    }
}

/// A view into a subset of an image's layers/mips plus a format
/// reinterpretation, independent of the image's own format.
pub struct RImageView {
    pub image: vk::Image,
    pub view: vk::ImageView,
    pub format: vk::Format,
    pub view_type: vk::ImageViewType,
    pub base_mip: u32,
    pub mip_count: u32,
    pub base_layer: u32,
    pub layer_count: u32,
}
