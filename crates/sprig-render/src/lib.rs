//! Batched 2D sprite rendering on top of wgpu.
//!
//! A [`SpriteBatch`] collects textured quads between `begin()` and `end()` and
//! draws them with as few indexed draw calls as the submission order allows.
//! All GPU access goes through the [`RenderContext`] trait, implemented by
//! [`GraphicsContext`] for real devices and by `MockRenderContext` in tests.

pub mod atlas;
pub mod batch;
pub mod buffer;
pub mod color;
pub mod context;
mod context_impl;
pub mod error;
pub mod quad;
pub mod shader;
pub mod slot_table;
pub mod sprite_batch;
pub mod texture;
pub mod transform;
pub mod vertex;

pub use atlas::TextureAtlas;
pub use batch::{BatchState, BatchStats, FlushReason};
pub use buffer::QuadBuffer;
pub use color::Color;
pub use context::{GraphicsContext, GraphicsContextDescriptor};
pub use error::{DrawError, GraphicsError, SpriteBatchError, TextureError};
pub use shader::{ShaderProgram, UniformLocation};
pub use slot_table::{BatchSlotState, TextureSlotTable, texture_slot_capacity};
pub use sprite_batch::{SpriteBatch, SpriteBatchDescriptor};
pub use texture::{SpriteTexture, Texture, TextureId};
pub use transform::build_transform_matrix;
pub use vertex::SpriteVertex;

pub use sprig_core;
pub use sprig_test_utils::RenderContext;
pub use wgpu;
