use std::mem::{offset_of, size_of};

use sprig_core::math::{PackedVec2, PackedVec3, PackedVec4};

/// One corner of a sprite quad as it is laid out in the vertex buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    /// Local quad-space position, one of the four fixed corners.
    pub position: PackedVec3,
    /// Normalized texture coordinate, V = 1 at the top of the source image.
    pub tex_coord: PackedVec2,
    /// Batch slot the vertex belongs to. Selects both the transform and the texture unit.
    pub slot_index: f32,
    /// Normalized RGBA tint.
    pub tint: PackedVec4,
}

static_assertions::const_assert_eq!(size_of::<SpriteVertex>(), 40);
static_assertions::const_assert_eq!(offset_of!(SpriteVertex, position), 0);
static_assertions::const_assert_eq!(offset_of!(SpriteVertex, tex_coord), 12);
static_assertions::const_assert_eq!(offset_of!(SpriteVertex, slot_index), 20);
static_assertions::const_assert_eq!(offset_of!(SpriteVertex, tint), 24);

impl SpriteVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: offset_of!(SpriteVertex, position) as u64,
            shader_location: 0,
        },
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: offset_of!(SpriteVertex, tex_coord) as u64,
            shader_location: 1,
        },
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32,
            offset: offset_of!(SpriteVertex, slot_index) as u64,
            shader_location: 2,
        },
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x4,
            offset: offset_of!(SpriteVertex, tint) as u64,
            shader_location: 3,
        },
    ];

    pub const fn new(
        position: PackedVec3,
        tex_coord: PackedVec2,
        slot_index: f32,
        tint: PackedVec4,
    ) -> Self {
        Self {
            position,
            tex_coord,
            slot_index,
            tint,
        }
    }

    /// Vertex buffer layout for the sprite pipeline.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_are_contiguous() {
        let layout = SpriteVertex::layout();
        assert_eq!(layout.array_stride, 40);

        let mut expected_offset = 0;
        for attribute in layout.attributes {
            assert_eq!(attribute.offset, expected_offset);
            expected_offset += attribute.format.size();
        }
        assert_eq!(expected_offset, layout.array_stride);
    }

    #[test]
    fn test_shader_locations_are_sequential() {
        let locations: Vec<u32> = SpriteVertex::ATTRIBUTES
            .iter()
            .map(|a| a.shader_location)
            .collect();
        assert_eq!(locations, vec![0, 1, 2, 3]);
    }
}
