//! Mock implementation of RenderContext for testing.
//!
//! This module provides a mock GPU context that records operations
//! without actually interacting with the GPU.

use crate::{gpu_types::*, render_context::*};
use parking_lot::Mutex;
use wgpu::*;

/// Records a GPU operation call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    CreateBuffer {
        size: u64,
        usage: BufferUsages,
    },
    WriteBuffer {
        buffer_id: usize,
        offset: u64,
        size: usize,
    },
    CreateTexture {
        width: u32,
        height: u32,
        format: TextureFormat,
    },
    WriteTexture {
        texture_id: usize,
        size: usize,
    },
    BindTexture {
        unit: u32,
        texture_id: usize,
    },
    CreateShaderProgram {
        label: Option<String>,
        texture_slots: u32,
        uniform_size: u64,
    },
    DrawIndexed {
        index_count: u32,
        /// Mock texture id bound to each unit at draw time.
        bound_units: Vec<Option<usize>>,
        cleared: bool,
    },
}

/// Mock buffers stored in the context, including their contents.
#[derive(Debug, Clone)]
struct MockBuffer {
    data: Vec<u8>,
}

/// Mock textures stored in the context, including their contents.
#[derive(Debug, Clone)]
struct MockTexture {
    data: Vec<u8>,
}

/// Mock implementation of RenderContext for testing.
///
/// Methods take `&self` but need to mutate internal state, so everything lives
/// behind a `parking_lot::Mutex` (which keeps the context `Send + Sync`).
///
/// Buffer and texture writes are applied to in-memory copies, so tests can
/// inspect exactly which bytes the batcher uploaded.
///
/// # Example
///
/// ```rust
/// use sprig_test_utils::{MockRenderContext, RenderContext};
/// use wgpu::*;
///
/// let mock = MockRenderContext::new();
///
/// let buffer = mock.create_buffer(&BufferDescriptor {
///     label: None,
///     size: 8,
///     usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
///     mapped_at_creation: false,
/// });
/// mock.write_buffer(&buffer, 4, &[1, 2, 3, 4]);
///
/// assert_eq!(mock.buffer_data(&buffer), Some(vec![0, 0, 0, 0, 1, 2, 3, 4]));
/// assert_eq!(mock.count_buffer_writes(), 1);
/// ```
pub struct MockRenderContext {
    /// Recorded calls for verification
    calls: Mutex<Vec<RenderCall>>,

    limits: Limits,

    buffers: Mutex<Vec<MockBuffer>>,
    textures: Mutex<Vec<MockTexture>>,

    /// Mock texture id bound to each sampler unit
    bound_units: Mutex<Vec<Option<usize>>>,

    next_program_id: Mutex<usize>,

    /// Error returned by the next draw, if any
    next_draw_error: Mutex<Option<DrawError>>,
}

impl MockRenderContext {
    /// Create a new mock render context with default wgpu limits.
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Create a mock context reporting the given limits.
    pub fn with_limits(limits: Limits) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            limits,
            buffers: Mutex::new(Vec::new()),
            textures: Mutex::new(Vec::new()),
            bound_units: Mutex::new(Vec::new()),
            next_program_id: Mutex::new(0),
            next_draw_error: Mutex::new(None),
        }
    }

    /// Create a mock context whose device exposes `units` sampled textures per stage.
    pub fn with_texture_units(units: u32) -> Self {
        Self::with_limits(Limits {
            max_sampled_textures_per_shader_stage: units,
            ..Limits::default()
        })
    }

    /// Make the next `draw_indexed` call fail with `error`.
    pub fn fail_next_draw(&self, error: DrawError) {
        *self.next_draw_error.lock() = Some(error);
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    fn count(&self, predicate: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    /// Count buffer creates.
    pub fn count_buffer_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateBuffer { .. }))
    }

    /// Count buffer write operations.
    pub fn count_buffer_writes(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::WriteBuffer { .. }))
    }

    /// Count texture creates.
    pub fn count_texture_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateTexture { .. }))
    }

    /// Count texture binds.
    pub fn count_texture_binds(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::BindTexture { .. }))
    }

    /// Count shader program creates.
    pub fn count_shader_program_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateShaderProgram { .. }))
    }

    /// Count draw calls.
    pub fn count_draw_calls(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::DrawIndexed { .. }))
    }

    /// Index count of every draw call, in submission order.
    pub fn draw_index_counts(&self) -> Vec<u32> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RenderCall::DrawIndexed { index_count, .. } => Some(*index_count),
                _ => None,
            })
            .collect()
    }

    /// Units bound at the time of every draw call, in submission order.
    pub fn draw_bound_units(&self) -> Vec<Vec<Option<usize>>> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RenderCall::DrawIndexed { bound_units, .. } => Some(bound_units.clone()),
                _ => None,
            })
            .collect()
    }

    /// Mock texture id currently bound to each unit.
    pub fn bound_units(&self) -> Vec<Option<usize>> {
        self.bound_units.lock().clone()
    }

    /// Current contents of a mock buffer.
    pub fn buffer_data(&self, buffer: &GpuBuffer) -> Option<Vec<u8>> {
        let id = buffer.mock_id()?;
        self.buffers.lock().get(id).map(|b| b.data.clone())
    }

    /// Current contents of a mock texture.
    pub fn texture_data(&self, texture: &GpuTexture) -> Option<Vec<u8>> {
        let id = texture.mock_id()?;
        self.textures.lock().get(id).map(|t| t.data.clone())
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Get total number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for MockRenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for MockRenderContext {
    fn limits(&self) -> Limits {
        self.limits.clone()
    }

    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer {
        let mut buffers = self.buffers.lock();
        let id = buffers.len();

        buffers.push(MockBuffer {
            data: vec![0; desc.size as usize],
        });

        self.calls.lock().push(RenderCall::CreateBuffer {
            size: desc.size,
            usage: desc.usage,
        });

        GpuBuffer::mock(id, desc.size)
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        let Some(buffer_id) = buffer.mock_id() else {
            return;
        };

        let mut buffers = self.buffers.lock();
        let target = &mut buffers[buffer_id].data;
        let start = offset as usize;
        let end = start + data.len();
        assert!(
            end <= target.len(),
            "write of {} bytes at offset {} overruns mock buffer of {} bytes",
            data.len(),
            offset,
            target.len()
        );
        target[start..end].copy_from_slice(data);

        self.calls.lock().push(RenderCall::WriteBuffer {
            buffer_id,
            offset,
            size: data.len(),
        });
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        let mut textures = self.textures.lock();
        let id = textures.len();

        textures.push(MockTexture { data: Vec::new() });

        self.calls.lock().push(RenderCall::CreateTexture {
            width: desc.size.width,
            height: desc.size.height,
            format: desc.format,
        });

        GpuTexture::mock(id, desc.size.width, desc.size.height, desc.format)
    }

    fn write_texture(&self, texture: &GpuTexture, data: &[u8], size: Extent3d) {
        let Some(texture_id) = texture.mock_id() else {
            return;
        };

        assert_eq!(
            data.len(),
            (size.width * size.height * 4) as usize,
            "mock textures expect tightly packed RGBA8 rows"
        );
        self.textures.lock()[texture_id].data = data.to_vec();

        self.calls.lock().push(RenderCall::WriteTexture {
            texture_id,
            size: data.len(),
        });
    }

    fn bind_texture(&self, unit: u32, texture: &GpuTexture) {
        let Some(texture_id) = texture.mock_id() else {
            return;
        };

        let mut units = self.bound_units.lock();
        let unit_index = unit as usize;
        if units.len() <= unit_index {
            units.resize(unit_index + 1, None);
        }
        units[unit_index] = Some(texture_id);

        self.calls
            .lock()
            .push(RenderCall::BindTexture { unit, texture_id });
    }

    fn create_shader_program(&self, desc: &ShaderProgramDescriptor) -> GpuShaderProgram {
        let mut id = self.next_program_id.lock();
        let program_id = *id;
        *id += 1;

        self.calls.lock().push(RenderCall::CreateShaderProgram {
            label: desc.label.map(|s| s.to_string()),
            texture_slots: desc.texture_slots,
            uniform_size: desc.uniform_size,
        });

        GpuShaderProgram::mock(program_id, desc.texture_slots)
    }

    fn draw_indexed(&self, draw: &IndexedDraw) -> Result<(), DrawError> {
        if let Some(error) = self.next_draw_error.lock().take() {
            return Err(error);
        }

        let slots = draw.program.texture_slots() as usize;
        let mut bound_units = self.bound_units.lock().clone();
        bound_units.resize(slots, None);

        self.calls.lock().push(RenderCall::DrawIndexed {
            index_count: draw.index_count,
            bound_units,
            cleared: draw.clear_color.is_some(),
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex_buffer(mock: &MockRenderContext, size: u64) -> GpuBuffer {
        mock.create_buffer(&BufferDescriptor {
            label: Some("test_buffer"),
            size,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn texture(mock: &MockRenderContext, width: u32, height: u32) -> GpuTexture {
        mock.create_texture(&TextureDescriptor {
            label: Some("test_texture"),
            size: Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        })
    }

    #[test]
    fn test_mock_buffer_creation() {
        let mock = MockRenderContext::new();
        let buffer = vertex_buffer(&mock, 1024);

        assert!(buffer.is_mock());
        assert_eq!(buffer.size(), 1024);
        assert_eq!(mock.count_buffer_creates(), 1);
    }

    #[test]
    fn test_mock_buffer_partial_write() {
        let mock = MockRenderContext::new();
        let buffer = vertex_buffer(&mock, 8);

        mock.write_buffer(&buffer, 2, &[7, 7]);

        assert_eq!(mock.count_buffer_writes(), 1);
        assert_eq!(mock.buffer_data(&buffer), Some(vec![0, 0, 7, 7, 0, 0, 0, 0]));
    }

    #[test]
    #[should_panic(expected = "overruns mock buffer")]
    fn test_mock_buffer_overrun_panics() {
        let mock = MockRenderContext::new();
        let buffer = vertex_buffer(&mock, 4);
        mock.write_buffer(&buffer, 2, &[0; 4]);
    }

    #[test]
    fn test_mock_texture_upload() {
        let mock = MockRenderContext::new();
        let texture = texture(&mock, 1, 2);

        mock.write_texture(
            &texture,
            &[1, 2, 3, 4, 5, 6, 7, 8],
            Extent3d {
                width: 1,
                height: 2,
                depth_or_array_layers: 1,
            },
        );

        assert!(texture.is_mock());
        assert_eq!(mock.count_texture_creates(), 1);
        assert_eq!(mock.texture_data(&texture), Some(vec![1, 2, 3, 4, 5, 6, 7, 8]));
    }

    #[test]
    fn test_bind_texture_tracks_units() {
        let mock = MockRenderContext::new();
        let a = texture(&mock, 4, 4);
        let b = texture(&mock, 4, 4);

        mock.bind_texture(2, &b);
        mock.bind_texture(0, &a);

        assert_eq!(mock.bound_units(), vec![Some(0), None, Some(1)]);
        assert_eq!(mock.count_texture_binds(), 2);
    }

    #[test]
    fn test_draw_records_index_count_and_units() {
        let mock = MockRenderContext::new();
        let vertices = vertex_buffer(&mock, 64);
        let indices = vertex_buffer(&mock, 64);
        let uniforms = vertex_buffer(&mock, 64);
        let program = GpuShaderProgram::mock(0, 3);
        let tex = texture(&mock, 4, 4);
        mock.bind_texture(1, &tex);

        mock.draw_indexed(&IndexedDraw {
            program: &program,
            vertex_buffer: &vertices,
            index_buffer: &indices,
            uniform_buffer: &uniforms,
            index_count: 12,
            clear_color: Some(Color::BLACK),
        })
        .unwrap();

        assert_eq!(mock.draw_index_counts(), vec![12]);
        assert_eq!(mock.draw_bound_units(), vec![vec![None, Some(0), None]]);
        assert!(matches!(
            mock.calls().last(),
            Some(RenderCall::DrawIndexed { cleared: true, .. })
        ));
    }

    #[test]
    fn test_fail_next_draw_only_fails_once() {
        let mock = MockRenderContext::new();
        let buffer = vertex_buffer(&mock, 16);
        let program = GpuShaderProgram::mock(0, 1);
        let draw = IndexedDraw {
            program: &program,
            vertex_buffer: &buffer,
            index_buffer: &buffer,
            uniform_buffer: &buffer,
            index_count: 6,
            clear_color: None,
        };

        mock.fail_next_draw(DrawError::Gpu("device lost".into()));

        assert!(matches!(mock.draw_indexed(&draw), Err(DrawError::Gpu(_))));
        assert!(mock.draw_indexed(&draw).is_ok());
        assert_eq!(mock.count_draw_calls(), 1);
    }

    #[test]
    fn test_texture_unit_limits() {
        let mock = MockRenderContext::with_texture_units(4);
        assert_eq!(mock.limits().max_sampled_textures_per_shader_stage, 4);
    }

    #[test]
    fn test_clear_calls() {
        let mock = MockRenderContext::new();
        vertex_buffer(&mock, 1024);

        assert_eq!(mock.call_count(), 1);

        mock.clear_calls();
        assert_eq!(mock.call_count(), 0);
    }
}
