//! The sprite batch: accumulates render requests between `begin()` and `end()`
//! and turns them into as few indexed draws as the texture order allows.
//!
//! # Batching policy
//!
//! Sprites are never reordered. Consecutive sprites that share a texture are
//! packed into one batch until every texture slot is taken. The active batch is
//! flushed eagerly when the incoming sprite uses a different texture than the
//! previous one, or when the batch is full.
//!
//! # Example
//!
//! ```rust,no_run
//! use sprig_core::geometry::{Rect, Size};
//! use sprig_render::{Color, GraphicsContext, SpriteBatch, SpriteBatchDescriptor, SpriteTexture, Texture};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let context = GraphicsContext::new_owned_sync()?;
//! let player = Texture::from_rgba8(&*context, "player", 1, 1, &[255; 4])?;
//!
//! let mut batch = SpriteBatch::new(
//!     context.clone(),
//!     SpriteBatchDescriptor::default().surface_size(Size::new(800, 600)),
//! );
//!
//! batch.begin()?;
//! batch.render(&player, player.bounds(), Rect::new(100, 100, 32, 32), 1.0, 0.0, Color::WHITE)?;
//! batch.end()?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use sprig_core::{
    geometry::{Rect, Size},
    profiling::{profile_function, profile_scope},
};
use sprig_test_utils::{IndexedDraw, RenderContext};

use crate::{
    Color,
    batch::{Batch, BatchPool, BatchState, BatchStats, FlushReason},
    buffer::QuadBuffer,
    error::SpriteBatchError,
    quad::INDICES_PER_QUAD,
    shader::{ShaderProgram, UniformLocation},
    slot_table::{SlotTexture, SpriteDraw, texture_slot_capacity},
    texture::{SpriteTexture, TextureId},
    transform::build_transform_matrix,
};

/// Configuration for a [`SpriteBatch`].
#[derive(Debug, Clone)]
pub struct SpriteBatchDescriptor {
    /// Pixel size of the surface sprites are placed on. Nothing is drawn while
    /// either dimension is zero.
    pub surface_size: Size<u32>,
    /// Format of the render target.
    pub target_format: wgpu::TextureFormat,
    /// Upper bound on texture slots per batch. The device limit applies when `None`.
    pub max_texture_slots: Option<u32>,
    /// Clear the target to this colour on the first draw after `begin()`.
    pub clear_color: Option<Color>,
    pub label: Option<&'static str>,
}

impl Default for SpriteBatchDescriptor {
    fn default() -> Self {
        Self {
            surface_size: Size::new(800, 600),
            target_format: wgpu::TextureFormat::Bgra8UnormSrgb,
            max_texture_slots: None,
            clear_color: None,
            label: None,
        }
    }
}

impl SpriteBatchDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface_size(mut self, size: Size<u32>) -> Self {
        self.surface_size = size;
        self
    }

    pub fn target_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.target_format = format;
        self
    }

    pub fn max_texture_slots(mut self, slots: u32) -> Self {
        self.max_texture_slots = Some(slots);
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = Some(color);
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }
}

/// Batches textured quads into indexed draws.
///
/// `render()` is only legal between `begin()` and `end()`. A batch assumes it is
/// the only user of its context's texture units while accumulating.
pub struct SpriteBatch {
    context: Arc<dyn RenderContext>,
    program: ShaderProgram,
    quads: QuadBuffer,
    pool: BatchPool,
    transform_locations: Vec<UniformLocation>,
    surface_size: Size<u32>,
    clear_color: Option<Color>,
    pending_clear: Option<Color>,
    state: BatchState,
    cursor: usize,
    previous_texture: Option<TextureId>,
    stats: BatchStats,
}

impl SpriteBatch {
    /// Create a sprite batch, sizing its texture slots from the context's limits.
    pub fn new(context: Arc<dyn RenderContext>, descriptor: SpriteBatchDescriptor) -> Self {
        profile_function!();

        let limits = context.limits();
        let texture_slots = texture_slot_capacity(&limits, descriptor.max_texture_slots);

        let program = ShaderProgram::new(
            context.clone(),
            texture_slots,
            descriptor.target_format,
            descriptor.label,
        );
        let quads = QuadBuffer::allocate(context.as_ref(), texture_slots as usize);
        let transform_locations = (0..texture_slots)
            .filter_map(|slot| program.uniform_location(&format!("u_transforms[{slot}]")))
            .collect();

        tracing::info!(
            "Created sprite batch with {} texture slots for a {}x{} surface",
            texture_slots,
            descriptor.surface_size.width,
            descriptor.surface_size.height
        );

        Self {
            context,
            program,
            quads,
            pool: BatchPool::new(),
            transform_locations,
            surface_size: descriptor.surface_size,
            clear_color: descriptor.clear_color,
            pending_clear: None,
            state: BatchState::Idle,
            cursor: 0,
            previous_texture: None,
            stats: BatchStats::default(),
        }
    }

    /// Start accumulating sprites.
    ///
    /// Fails with [`SpriteBatchError::AlreadyBegun`] if the previous bracket was
    /// never closed.
    pub fn begin(&mut self) -> Result<(), SpriteBatchError> {
        if self.state == BatchState::Accumulating {
            return Err(SpriteBatchError::AlreadyBegun);
        }

        self.state = BatchState::Accumulating;
        self.cursor = 0;
        self.previous_texture = None;
        self.pending_clear = self.clear_color;
        self.stats = BatchStats::default();
        Ok(())
    }

    /// Queue one sprite.
    ///
    /// `source` is the pixel rectangle within `texture`, `destination` the
    /// pixel rectangle on the surface. `size` scales the sprite uniformly and
    /// `angle` rotates it clockwise in degrees. `tint` multiplies every texel.
    ///
    /// May flush the active batch first if `texture` differs from the previous
    /// sprite's texture or the batch is full.
    #[allow(clippy::too_many_arguments)]
    pub fn render<T: SpriteTexture + ?Sized>(
        &mut self,
        texture: &T,
        source: Rect<i32>,
        destination: Rect<i32>,
        size: f32,
        angle: f32,
        tint: Color,
    ) -> Result<(), SpriteBatchError> {
        profile_function!();

        if self.state != BatchState::Accumulating {
            return Err(SpriteBatchError::NotBegun);
        }

        let id = texture.id();
        let texture_switch = self.previous_texture.is_some_and(|previous| previous != id);
        let batch_full = self.pool.active().is_some_and(|batch| batch.is_full());

        if texture_switch || batch_full {
            let reason = if texture_switch {
                FlushReason::TextureSwitch
            } else {
                FlushReason::Capacity
            };
            self.flush(reason)?;
        }

        let batch = self.pool.active_or_create(&self.program);
        let slot = batch.add_texture_data(SpriteDraw {
            texture: SlotTexture::of(texture),
            source,
            destination,
            size,
            angle,
            tint,
        })?;
        debug_assert_eq!(slot, self.cursor, "slots are assigned in submission order");

        tracing::trace!("Assigned {:?} to slot {}", id, slot);

        self.cursor += 1;
        self.previous_texture = Some(id);
        self.stats.sprites += 1;
        Ok(())
    }

    /// Draw a whole texture into `destination` with no rotation or tint.
    pub fn render_texture<T: SpriteTexture + ?Sized>(
        &mut self,
        texture: &T,
        destination: Rect<i32>,
    ) -> Result<(), SpriteBatchError> {
        self.render(texture, texture.bounds(), destination, 1.0, 0.0, Color::WHITE)
    }

    /// Flush whatever is pending and return to idle.
    ///
    /// The batch is idle afterwards even if the final draw fails.
    pub fn end(&mut self) -> Result<(), SpriteBatchError> {
        if self.state != BatchState::Accumulating {
            return Err(SpriteBatchError::NotBegun);
        }

        let result = self.flush(FlushReason::End);

        self.state = BatchState::Idle;
        self.cursor = 0;
        self.previous_texture = None;
        self.pending_clear = None;

        tracing::debug!(
            "Sprite batch ended: {} sprites in {} draw calls",
            self.stats.sprites,
            self.stats.draw_calls
        );

        result
    }

    /// Upload the active batch and draw it with a single indexed draw.
    ///
    /// Does nothing if the active batch is empty. While the surface has zero
    /// width or height the batch is discarded without a draw. The batch is
    /// cleared and the slot cursor reset whether or not the draw succeeds.
    fn flush(&mut self, reason: FlushReason) -> Result<(), SpriteBatchError> {
        profile_function!();

        let Some(batch) = self.pool.active_mut() else {
            return Ok(());
        };
        if batch.is_empty() {
            return Ok(());
        }

        // Nothing can be placed on a zero-area surface.
        if self.surface_size.is_empty() {
            tracing::debug!(
                "Discarding {} sprites: surface is {}x{}",
                batch.occupied_count(),
                self.surface_size.width,
                self.surface_size.height
            );
            batch.clear();
            self.cursor = 0;
            return Ok(());
        }

        let count = batch.occupied_count();
        debug_assert!(
            batch.occupied().map(|(slot, _)| slot).eq(0..count),
            "occupied slots must be packed at the low end"
        );

        let upload = upload_batch(
            batch,
            self.context.as_ref(),
            &self.program,
            &self.quads,
            &self.transform_locations,
            self.surface_size,
        );

        let result = upload.and_then(|()| {
            let clear_color = self.pending_clear.take().map(Color::to_wgpu);
            self.context
                .draw_indexed(&IndexedDraw {
                    program: self.program.gpu_program(),
                    vertex_buffer: self.quads.vertex_buffer(),
                    index_buffer: self.quads.index_buffer(),
                    uniform_buffer: self.program.uniform_buffer(),
                    index_count: (count * INDICES_PER_QUAD) as u32,
                    clear_color,
                })
                .map_err(SpriteBatchError::from)
        });

        batch.clear();
        self.cursor = 0;

        match &result {
            Ok(()) => {
                self.stats.record_flush(reason);
                tracing::debug!("Flushed {} sprites ({:?})", count, reason);
            }
            Err(e) => tracing::error!("Failed to flush sprite batch: {}", e),
        }

        result
    }

    /// Update the surface size used to place sprites, e.g. after a window resize.
    ///
    /// A zero width or height is accepted; sprites are dropped until the
    /// surface has an area again.
    pub fn resize(&mut self, surface_size: Size<u32>) {
        tracing::debug!(
            "Sprite batch surface resized to {}x{}",
            surface_size.width,
            surface_size.height
        );
        self.surface_size = surface_size;
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Counters for the current (or most recent) `begin()`/`end()` bracket.
    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    /// Texture slots per batch, i.e. the most sprites a single draw can cover.
    pub fn texture_slots(&self) -> u32 {
        self.program.texture_slots()
    }

    pub fn surface_size(&self) -> Size<u32> {
        self.surface_size
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    pub fn quad_buffer(&self) -> &QuadBuffer {
        &self.quads
    }

    /// Sprites waiting in the active batch.
    pub fn pending(&self) -> usize {
        self.pool.active().map_or(0, |batch| batch.occupied_count())
    }
}

/// Bind the batch's textures, then write one transform and one quad per occupied slot.
fn upload_batch(
    batch: &Batch,
    context: &dyn RenderContext,
    program: &ShaderProgram,
    quads: &QuadBuffer,
    transform_locations: &[UniformLocation],
    surface_size: Size<u32>,
) -> Result<(), SpriteBatchError> {
    profile_scope!("upload_batch");

    batch.bind_batch(context, program)?;

    for (slot, state) in batch.occupied() {
        let Some(texture) = &state.texture else {
            continue;
        };

        let location =
            transform_locations
                .get(slot)
                .copied()
                .ok_or(SpriteBatchError::SlotOutOfRange {
                    slot,
                    capacity: transform_locations.len(),
                })?;
        let matrix = build_transform_matrix(
            state.x,
            state.y,
            state.width as f32,
            state.height as f32,
            state.size,
            state.angle,
            surface_size,
        );
        program.set_uniform_matrix(location, &matrix);

        quads.update_quad(
            context,
            slot,
            state.source,
            texture.width,
            texture.height,
            state.tint,
        )?;
    }

    Ok(())
}
