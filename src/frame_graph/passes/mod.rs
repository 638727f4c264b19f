//! The canonical pass library (spec §4.3.4): a small set of ready-made
//! passes every scene wires together. Each constructor returns a [`Pass`]
//! via [`PassBuilder`]; actual draw-call recording is out of scope (backend
//! Vulkan calls), so each call function only logs what it would have
//! recorded, grounded on the teacher's `src/frame/pass/graphics.rs` stencil
//! shape (inputs/outputs declared up front, a closure invoked at execute
//! time).

use crate::frame_graph::pass::{Pass, PassBuilder};
use crate::frame_graph::resource::ResourceHandle;
use crate::handle::Handle;

/// Fullscreen cube, back-face culling off.
pub fn skybox(cube: ResourceHandle, sampler: ResourceHandle, target: ResourceHandle) -> Pass {
    PassBuilder::new("skybox")
        .input(cube)
        .input(sampler)
        .output(target)
        .call(Box::new(|ctx| log::trace!("skybox pass, frame {}", ctx.frame_index)))
        .build()
}

/// One depth layer per light; front-face culling, depth bias.
pub fn shadow_map(
    light_matrices: ResourceHandle,
    mesh_transforms: ResourceHandle,
    index_buffer: ResourceHandle,
    depth_target: ResourceHandle,
) -> Pass {
    PassBuilder::new("shadow_map")
        .input(light_matrices)
        .input(mesh_transforms)
        .input(index_buffer)
        .output(depth_target)
        .call(Box::new(|ctx| log::trace!("shadow map pass, frame {}", ctx.frame_index)))
        .build()
}

/// Per-drawlist-entry master-material bind + indexed draw.
pub fn pbr_raster(
    material: Handle,
    shadow_maps: ResourceHandle,
    per_frame_matrices: ResourceHandle,
    material_ssbo: ResourceHandle,
    color_target: ResourceHandle,
    bright_target: Option<ResourceHandle>,
    depth_target: ResourceHandle,
) -> Pass {
    let mut builder = PassBuilder::new("pbr_raster")
        .material(material)
        .input(shadow_maps)
        .input(per_frame_matrices)
        .input(material_ssbo)
        .output(color_target)
        .output(depth_target);
    if let Some(bright) = bright_target {
        builder = builder.output(bright);
    }
    builder
        .call(Box::new(|ctx| log::trace!("pbr raster pass, frame {}", ctx.frame_index)))
        .build()
}

/// Two-pass separable Gaussian blur, ping-ponging between two layers of the
/// same image, then additively composited back onto color (Open Question
/// decision #3: `SRC=ONE, DST=ONE`).
pub fn bloom(bright_layer: ResourceHandle, bloom_layer: ResourceHandle, color_target: ResourceHandle) -> Pass {
    PassBuilder::new("bloom")
        .input(bright_layer)
        .output(bloom_layer)
        .output(color_target)
        .call(Box::new(|ctx| log::trace!("bloom pass, frame {}", ctx.frame_index)))
        .build()
}

/// Line topology; width expansion happens in a geometry shader driven by a
/// push-constant.
pub fn lines(vertex_buffer: ResourceHandle, color_target: ResourceHandle) -> Pass {
    PassBuilder::new("lines")
        .input(vertex_buffer)
        .output(color_target)
        .call(Box::new(|ctx| log::trace!("lines pass, frame {}", ctx.frame_index)))
        .build()
}

/// One instanced draw of six vertices per glyph quad.
pub fn ui_glyph(font_atlas: ResourceHandle, color_target: ResourceHandle) -> Pass {
    PassBuilder::new("ui_glyph")
        .input(font_atlas)
        .output(color_target)
        .call(Box::new(|ctx| log::trace!("ui glyph pass, frame {}", ctx.frame_index)))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skybox_declares_disjoint_input_output() {
        let pass = skybox(ResourceHandle(0), ResourceHandle(1), ResourceHandle(2));
        assert_eq!(pass.inputs.len(), 2);
        assert_eq!(pass.outputs.len(), 1);
    }

    #[test]
    fn pbr_raster_includes_optional_bright_target() {
        let pass = pbr_raster(
            Handle::new(0, 1),
            ResourceHandle(0),
            ResourceHandle(1),
            ResourceHandle(2),
            ResourceHandle(3),
            Some(ResourceHandle(4)),
            ResourceHandle(5),
        );
        assert_eq!(pass.outputs.len(), 3);
    }
}
