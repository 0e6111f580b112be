//! Implementation of RenderContext trait for GraphicsContext.
//!
//! This allows a sprite batch to drive a real device, while tests drive the
//! same code through MockRenderContext.

use crate::{context::GraphicsContext, shader::FIRST_TEXTURE_BINDING};
use sprig_core::profiling::profile_function;
use sprig_test_utils::{
    DrawError, GpuBuffer, GpuShaderProgram, GpuTexture, IndexedDraw, RenderContext,
    ShaderProgramDescriptor, WgpuShaderProgram,
};
use wgpu::{BufferDescriptor, Extent3d, TextureDescriptor};

impl RenderContext for GraphicsContext {
    fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }

    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer {
        let buffer = self.device.create_buffer(desc);
        GpuBuffer::from_wgpu(buffer)
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        self.queue.write_buffer(buffer.as_wgpu(), offset, data);
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        let texture = self.device.create_texture(desc);
        GpuTexture::from_wgpu(texture)
    }

    fn write_texture(&self, texture: &GpuTexture, data: &[u8], size: Extent3d) {
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: texture.as_wgpu(),
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size.width * 4),
                rows_per_image: Some(size.height),
            },
            size,
        );
    }

    fn bind_texture(&self, unit: u32, texture: &GpuTexture) {
        let mut units = self.bound_units.lock();
        let unit = unit as usize;
        if units.len() <= unit {
            units.resize(unit + 1, None);
        }
        units[unit] = Some(texture.clone());
    }

    fn create_shader_program(&self, desc: &ShaderProgramDescriptor) -> GpuShaderProgram {
        profile_function!();

        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: desc.label,
                source: wgpu::ShaderSource::Wgsl(desc.source.into()),
            });

        let mut entries = vec![
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(desc.uniform_size),
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ];
        entries.extend((0..desc.texture_slots).map(|slot| wgpu::BindGroupLayoutEntry {
            binding: FIRST_TEXTURE_BINDING + slot,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        }));

        let bind_group_layout =
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("Sprite Bind Group Layout"),
                    entries: &entries,
                });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Sprite Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: desc.label,
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some("vs_main"),
                    buffers: &[desc.vertex_layout.clone()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: desc.target_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            });

        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Sprite Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // 1x1 white texture bound to any unit nothing else is bound to.
        let fallback = GpuTexture::from_wgpu(self.device.create_texture(&TextureDescriptor {
            label: Some("Sprite Fallback Texture"),
            size: Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        }));
        self.write_texture(
            &fallback,
            &[255; 4],
            Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );

        GpuShaderProgram::from_wgpu(WgpuShaderProgram {
            pipeline,
            bind_group_layout,
            sampler,
            fallback_view: fallback.as_wgpu_view().clone(),
            texture_slots: desc.texture_slots,
        })
    }

    fn draw_indexed(&self, draw: &IndexedDraw) -> Result<(), DrawError> {
        profile_function!();

        let target = self
            .render_target
            .lock()
            .clone()
            .ok_or(DrawError::NoRenderTarget)?;
        let program = draw.program.as_wgpu();

        // Snapshot the unit bindings so the lock is not held across submission.
        let views: Vec<wgpu::TextureView> = {
            let units = self.bound_units.lock();
            (0..program.texture_slots as usize)
                .map(|unit| match units.get(unit) {
                    Some(Some(texture)) => texture.as_wgpu_view().clone(),
                    _ => program.fallback_view.clone(),
                })
                .collect()
        };

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let mut entries = vec![
            wgpu::BindGroupEntry {
                binding: 0,
                resource: draw.uniform_buffer.as_wgpu().as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&program.sampler),
            },
        ];
        entries.extend(
            views
                .iter()
                .zip(FIRST_TEXTURE_BINDING..)
                .map(|(view, binding)| wgpu::BindGroupEntry {
                    binding,
                    resource: wgpu::BindingResource::TextureView(view),
                }),
        );

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sprite Bind Group"),
            layout: &program.bind_group_layout,
            entries: &entries,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Sprite Batch Encoder"),
            });

        {
            let load = match draw.clear_color {
                Some(color) => wgpu::LoadOp::Clear(color),
                None => wgpu::LoadOp::Load,
            };

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sprite Batch Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            pass.set_pipeline(&program.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.set_vertex_buffer(0, draw.vertex_buffer.as_wgpu().slice(..));
            pass.set_index_buffer(
                draw.index_buffer.as_wgpu().slice(..),
                wgpu::IndexFormat::Uint32,
            );
            pass.draw_indexed(0..draw.index_count, 0, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));

        match pollster::block_on(self.device.pop_error_scope()) {
            Some(error) => Err(DrawError::Gpu(error.to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_test_utils::MockRenderContext;

    #[test]
    fn test_render_context_trait_object() {
        // GraphicsContext and MockRenderContext are used through the same trait.
        fn uses_render_context(ctx: &dyn RenderContext) {
            let buffer = ctx.create_buffer(&BufferDescriptor {
                label: Some("Test Buffer"),
                size: 256,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            ctx.write_buffer(&buffer, 0, &[0u8; 256]);
        }

        let mock_ctx = MockRenderContext::new();
        uses_render_context(&mock_ctx);

        // create_buffer + write_buffer
        assert_eq!(mock_ctx.calls().len(), 2);
    }
}
