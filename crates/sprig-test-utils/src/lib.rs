//! GPU seam and test utilities for Sprig.
//!
//! This crate defines the boundary between the sprite batcher and the GPU, so the
//! batching logic can be exercised without a real adapter.
//!
//! # Overview
//!
//! The main components are:
//!
//! - [`RenderContext`] - Trait abstracting the GPU operations the batcher needs
//! - `MockRenderContext` - Recording implementation for testing (requires `mock` feature)
//! - GPU wrapper types (`GpuBuffer`, `GpuTexture`, `GpuShaderProgram`) - Can be real or mock
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use sprig_test_utils::{MockRenderContext, RenderContext};
//! use wgpu::*;
//!
//! let mock = MockRenderContext::new();
//!
//! let buffer = mock.create_buffer(&BufferDescriptor {
//!     label: Some("test_buffer"),
//!     size: 1024,
//!     usage: BufferUsages::VERTEX,
//!     mapped_at_creation: false,
//! });
//!
//! assert_eq!(mock.count_buffer_creates(), 1);
//! assert!(buffer.is_mock());
//! # }
//! ```
//!
//! # Design
//!
//! All GPU wrapper types are owned and cheap to clone, so no lifetime parameters
//! leak into the batcher. Mock implementations use `Mutex` for interior
//! mutability so `&self` methods can record calls, and the trait stays object
//! safe (`dyn RenderContext`).

pub mod gpu_types;
#[cfg(feature = "mock")]
pub mod mock_render;
pub mod render_context;

pub use gpu_types::*;
#[cfg(feature = "mock")]
pub use mock_render::*;
pub use render_context::*;
