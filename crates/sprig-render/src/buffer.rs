use sprig_core::{geometry::Rect, profiling::profile_function};
use sprig_test_utils::{GpuBuffer, RenderContext};

use crate::{
    Color,
    error::SpriteBatchError,
    quad::{self, QUAD_SIZE},
};

/// The vertex and index buffers backing one sprite batch.
///
/// The vertex buffer holds four vertices per slot and is written one quad at a
/// time. The index buffer is filled once at allocation and never changes.
#[derive(Debug, Clone)]
pub struct QuadBuffer {
    vertices: GpuBuffer,
    indices: GpuBuffer,
    capacity: usize,
}

impl QuadBuffer {
    /// Reserve GPU memory for `capacity` quads and upload the index pattern.
    pub fn allocate(context: &dyn RenderContext, capacity: usize) -> Self {
        profile_function!();

        let vertices = context.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sprite Vertex Buffer"),
            size: QUAD_SIZE * capacity as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_data = quad::build_indices(capacity);
        let index_bytes: &[u8] = bytemuck::cast_slice(&index_data);
        let indices = context.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sprite Index Buffer"),
            size: index_bytes.len() as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        context.write_buffer(&indices, 0, index_bytes);

        tracing::trace!("Allocated quad buffers for {} slots", capacity);

        Self {
            vertices,
            indices,
            capacity,
        }
    }

    /// Rewrite the four vertices of `slot`.
    ///
    /// Texture coordinates are derived from `source` inside a texture of
    /// `texture_width` x `texture_height` pixels. Only the slot's byte range is
    /// written.
    ///
    /// The dimensions are the texture's, never the destination rectangle's:
    /// the on-screen size is carried by the slot's transform, not its UVs.
    pub fn update_quad(
        &self,
        context: &dyn RenderContext,
        slot: usize,
        source: Rect<i32>,
        texture_width: u32,
        texture_height: u32,
        tint: Color,
    ) -> Result<(), SpriteBatchError> {
        if slot >= self.capacity {
            return Err(SpriteBatchError::SlotOutOfRange {
                slot,
                capacity: self.capacity,
            });
        }

        let tex_coords = quad::texture_coords(source, texture_width, texture_height);
        let vertices = quad::quad_vertices(slot, tex_coords, tint);
        context.write_buffer(
            &self.vertices,
            slot as u64 * QUAD_SIZE,
            bytemuck::cast_slice(&vertices),
        );

        Ok(())
    }

    pub fn vertex_buffer(&self) -> &GpuBuffer {
        &self.vertices
    }

    pub fn index_buffer(&self) -> &GpuBuffer {
        &self.indices
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
