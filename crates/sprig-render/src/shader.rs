//! The sprite shader program and its uniform block.
//!
//! The uniform block holds one transform matrix and one texture-unit index per
//! batch slot:
//!
//! | name             | offset                         |
//! |------------------|--------------------------------|
//! | `u_transforms[i]`| `64 * i`                       |
//! | `u_textures[i]`  | `64 * slots + 16 * i`          |
//!
//! Every location is resolved once when the program is created.

use std::{fmt::Write as _, sync::Arc};

use ahash::AHashMap;
use sprig_core::{math::Mat4, profiling::profile_function};
use sprig_test_utils::{GpuBuffer, GpuShaderProgram, RenderContext, ShaderProgramDescriptor};

use crate::vertex::SpriteVertex;

const TEMPLATE: &str = include_str!("shaders/sprite_batch.wgsl");

const MATRIX_SIZE: u64 = 64;
const UNIT_STRIDE: u64 = 16;

/// Bytes of uniform data needed per batch slot.
pub const UNIFORM_BYTES_PER_SLOT: u64 = MATRIX_SIZE + UNIT_STRIDE;

/// Binding of the first sprite texture. 0 is the uniform block, 1 the sampler.
pub const FIRST_TEXTURE_BINDING: u32 = 2;

/// Byte offset of a uniform inside the program's uniform block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation {
    offset: u64,
}

impl UniformLocation {
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

/// Generate the WGSL source for a program sampling from `slots` textures.
pub fn generate_source(slots: u32) -> String {
    let mut bindings = String::new();
    let mut cases = String::new();

    for slot in 0..slots {
        let _ = writeln!(
            bindings,
            "@group(0) @binding({}) var t_slot_{slot}: texture_2d<f32>;",
            FIRST_TEXTURE_BINDING + slot
        );
        let _ = writeln!(
            cases,
            "        case {slot}u: {{ color = textureSampleLevel(t_slot_{slot}, s_sprite, input.tex_coord, 0.0); }}"
        );
    }

    TEMPLATE
        .replace("{{SLOTS}}", &slots.to_string())
        .replace("{{TEXTURE_BINDINGS}}", bindings.trim_end())
        .replace("{{SAMPLE_CASES}}", cases.trim_end())
}

/// A compiled sprite shader program together with its uniform buffer.
pub struct ShaderProgram {
    context: Arc<dyn RenderContext>,
    program: GpuShaderProgram,
    uniform_buffer: GpuBuffer,
    locations: AHashMap<String, UniformLocation>,
    texture_slots: u32,
}

impl ShaderProgram {
    /// Compile the sprite program for `texture_slots` slots rendering into `target_format`.
    pub fn new(
        context: Arc<dyn RenderContext>,
        texture_slots: u32,
        target_format: wgpu::TextureFormat,
        label: Option<&str>,
    ) -> Self {
        profile_function!();

        let source = generate_source(texture_slots);
        let uniform_size = UNIFORM_BYTES_PER_SLOT * texture_slots as u64;

        let program = context.create_shader_program(&ShaderProgramDescriptor {
            label,
            source: &source,
            texture_slots,
            uniform_size,
            vertex_layout: SpriteVertex::layout(),
            target_format,
        });

        let uniform_buffer = context.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sprite Uniform Buffer"),
            size: uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut locations = AHashMap::with_capacity(texture_slots as usize * 2);
        let units_base = MATRIX_SIZE * texture_slots as u64;
        for slot in 0..texture_slots as u64 {
            locations.insert(
                format!("u_transforms[{slot}]"),
                UniformLocation {
                    offset: MATRIX_SIZE * slot,
                },
            );
            locations.insert(
                format!("u_textures[{slot}]"),
                UniformLocation {
                    offset: units_base + UNIT_STRIDE * slot,
                },
            );
        }

        tracing::debug!(
            "Created sprite shader program with {} texture slots ({} uniform bytes)",
            texture_slots,
            uniform_size
        );

        Self {
            context,
            program,
            uniform_buffer,
            locations,
            texture_slots,
        }
    }

    /// Look up a uniform by name, e.g. `u_transforms[3]`.
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.locations.get(name).copied()
    }

    pub fn set_uniform_matrix(&self, location: UniformLocation, matrix: &Mat4) {
        self.context
            .write_buffer(&self.uniform_buffer, location.offset, bytemuck::bytes_of(matrix));
    }

    pub fn set_uniform_i32(&self, location: UniformLocation, value: i32) {
        self.context
            .write_buffer(&self.uniform_buffer, location.offset, bytemuck::bytes_of(&value));
    }

    pub fn gpu_program(&self) -> &GpuShaderProgram {
        &self.program
    }

    pub fn uniform_buffer(&self) -> &GpuBuffer {
        &self.uniform_buffer
    }

    pub fn texture_slots(&self) -> u32 {
        self.texture_slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_source_has_binding_per_slot() {
        let source = generate_source(3);

        assert!(source.contains("array<mat4x4<f32>, 3>"));
        assert!(source.contains("array<vec4<i32>, 3>"));
        assert!(source.contains("@binding(2) var t_slot_0"));
        assert!(source.contains("@binding(4) var t_slot_2"));
        assert!(!source.contains("t_slot_3"));
        assert!(source.contains("case 2u:"));
        assert!(!source.contains("{{"));
    }

    mod mock {
        use super::*;
        use sprig_test_utils::MockRenderContext;

        #[test]
        fn test_uniform_locations_are_cached() {
            let mock = Arc::new(MockRenderContext::new());
            let program =
                ShaderProgram::new(mock.clone(), 4, wgpu::TextureFormat::Rgba8UnormSrgb, None);

            assert_eq!(
                program.uniform_location("u_transforms[0]").map(|l| l.offset()),
                Some(0)
            );
            assert_eq!(
                program.uniform_location("u_transforms[3]").map(|l| l.offset()),
                Some(192)
            );
            assert_eq!(
                program.uniform_location("u_textures[0]").map(|l| l.offset()),
                Some(256)
            );
            assert_eq!(
                program.uniform_location("u_textures[3]").map(|l| l.offset()),
                Some(304)
            );
            assert_eq!(program.uniform_location("u_textures[4]"), None);
            assert_eq!(program.uniform_buffer().size(), 320);
            assert_eq!(mock.count_shader_program_creates(), 1);
        }

        #[test]
        fn test_set_uniform_writes_at_location() {
            let mock = Arc::new(MockRenderContext::new());
            let program =
                ShaderProgram::new(mock.clone(), 2, wgpu::TextureFormat::Rgba8UnormSrgb, None);

            let unit = program.uniform_location("u_textures[1]").unwrap();
            program.set_uniform_i32(unit, 1);

            let matrix = Mat4::from_scale(sprig_core::math::Vec3::splat(2.0));
            let transform = program.uniform_location("u_transforms[1]").unwrap();
            program.set_uniform_matrix(transform, &matrix);

            let data = mock.buffer_data(program.uniform_buffer()).unwrap();
            assert_eq!(&data[144..148], &1i32.to_ne_bytes());
            assert_eq!(&data[64..128], bytemuck::bytes_of(&matrix));
        }
    }
}
