//! Trait abstracting GPU operations.
//!
//! The `RenderContext` trait is the only way the sprite batcher talks to the GPU.
//! It is implemented by the wgpu-backed `GraphicsContext` and, for tests, by
//! `MockRenderContext`.

use crate::gpu_types::*;
use wgpu::{BufferDescriptor, Extent3d, TextureDescriptor};

/// Error returned when an indexed draw cannot be completed.
#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    /// No render target is set on the context.
    #[error("no render target is set")]
    NoRenderTarget,
    /// The GPU rejected the draw.
    #[error("GPU error during draw: {0}")]
    Gpu(String),
}

/// Everything needed to compile a sprite shader program.
#[derive(Clone, Debug)]
pub struct ShaderProgramDescriptor<'a> {
    pub label: Option<&'a str>,
    /// WGSL source with `vs_main` and `fs_main` entry points.
    pub source: &'a str,
    /// Number of sampled textures, bound at bindings `2..2 + texture_slots`.
    pub texture_slots: u32,
    /// Size in bytes of the uniform block at binding 0.
    pub uniform_size: u64,
    pub vertex_layout: wgpu::VertexBufferLayout<'a>,
    pub target_format: wgpu::TextureFormat,
}

/// A single indexed draw request.
///
/// The draw uses whatever textures are currently bound to each unit via
/// [`RenderContext::bind_texture`] and draws `index_count` indices starting at 0.
#[derive(Clone, Copy, Debug)]
pub struct IndexedDraw<'a> {
    pub program: &'a GpuShaderProgram,
    pub vertex_buffer: &'a GpuBuffer,
    pub index_buffer: &'a GpuBuffer,
    pub uniform_buffer: &'a GpuBuffer,
    pub index_count: u32,
    /// Clear the render target to this colour before drawing.
    pub clear_color: Option<wgpu::Color>,
}

/// Trait abstracting GPU resource creation and operations.
///
/// Methods take `&self` and return owned wrapper types, so one context can be
/// shared through an `Arc` and mocks can record calls through interior
/// mutability. The trait is object safe.
///
/// # Example
///
/// ```rust,no_run
/// use sprig_test_utils::RenderContext;
/// use wgpu::{BufferDescriptor, BufferUsages};
///
/// fn upload(ctx: &dyn RenderContext) {
///     let buffer = ctx.create_buffer(&BufferDescriptor {
///         label: None,
///         size: 16,
///         usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
///         mapped_at_creation: false,
///     });
///     ctx.write_buffer(&buffer, 0, &[0u8; 16]);
/// }
/// ```
pub trait RenderContext: Send + Sync {
    /// Hardware limits of the device.
    fn limits(&self) -> wgpu::Limits;

    // Buffer operations

    /// Create a GPU buffer.
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer;

    /// Write data to a byte range of a buffer.
    ///
    /// Only `offset..offset + data.len()` is touched.
    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]);

    // Texture operations

    /// Create a GPU texture.
    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture;

    /// Upload tightly packed RGBA8 rows to the whole of a texture.
    fn write_texture(&self, texture: &GpuTexture, data: &[u8], size: Extent3d);

    /// Bind a texture to a sampler unit.
    ///
    /// The binding persists until the unit is rebound.
    fn bind_texture(&self, unit: u32, texture: &GpuTexture);

    // Shader operations

    /// Compile a shader program and build everything needed to draw with it.
    fn create_shader_program(&self, desc: &ShaderProgramDescriptor) -> GpuShaderProgram;

    // Draw operations

    /// Issue one indexed draw and wait for it to be submitted.
    fn draw_indexed(&self, draw: &IndexedDraw) -> Result<(), DrawError>;
}
