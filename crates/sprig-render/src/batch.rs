use crate::{shader::ShaderProgram, slot_table::TextureSlotTable};

/// One draw call's worth of sprites.
pub type Batch = TextureSlotTable;

/// Whether a [`SpriteBatch`](crate::SpriteBatch) is between `begin()` and `end()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchState {
    #[default]
    Idle,
    Accumulating,
}

/// Why a batch was flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushReason {
    /// The incoming sprite uses a different texture than the previous one.
    TextureSwitch,
    /// Every slot of the active batch is occupied.
    Capacity,
    /// `end()` flushed the remaining sprites.
    End,
}

/// Counters for the current `begin()`/`end()` bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchStats {
    /// Indexed draws issued.
    pub draw_calls: u32,
    /// Sprites accepted by `render()`.
    pub sprites: u32,
    /// Mid-stream flushes caused by a texture switch.
    pub texture_switch_flushes: u32,
    /// Mid-stream flushes caused by a full batch.
    pub capacity_flushes: u32,
}

impl BatchStats {
    pub(crate) fn record_flush(&mut self, reason: FlushReason) {
        self.draw_calls += 1;
        match reason {
            FlushReason::TextureSwitch => self.texture_switch_flushes += 1,
            FlushReason::Capacity => self.capacity_flushes += 1,
            FlushReason::End => {}
        }
    }
}

/// Owns the batches of a sprite batch.
///
/// Batches are created on first use and cleared after every flush, so their
/// allocations are reused from frame to frame.
#[derive(Debug, Default)]
pub struct BatchPool {
    batches: Vec<Batch>,
    active: usize,
}

impl BatchPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The batch that receives the next sprite, created if the pool has none with space.
    pub fn active_or_create(&mut self, program: &ShaderProgram) -> &mut Batch {
        match self.batches.iter().position(Batch::has_space) {
            Some(index) => self.active = index,
            None => {
                tracing::trace!("Creating batch #{}", self.batches.len());
                self.batches.push(Batch::new(program));
                self.active = self.batches.len() - 1;
            }
        }
        &mut self.batches[self.active]
    }

    pub fn active(&self) -> Option<&Batch> {
        self.batches.get(self.active)
    }

    pub fn active_mut(&mut self) -> Option<&mut Batch> {
        self.batches.get_mut(self.active)
    }

    /// Number of batches created so far.
    pub fn allocated(&self) -> usize {
        self.batches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Color, Texture,
        slot_table::{SlotTexture, SpriteDraw},
    };
    use sprig_core::geometry::Rect;
    use sprig_test_utils::MockRenderContext;
    use std::sync::Arc;

    #[test]
    fn test_batches_are_created_lazily_and_reused() {
        let mock = Arc::new(MockRenderContext::with_texture_units(1));
        let program = ShaderProgram::new(
            mock.clone(),
            1,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            None,
        );
        let texture = Texture::from_rgba8(&*mock, "t", 1, 1, &[0; 4]).unwrap();
        let mut pool = BatchPool::new();

        assert_eq!(pool.allocated(), 0);
        assert!(pool.active().is_none());

        let batch = pool.active_or_create(&program);
        batch
            .add_texture_data(SpriteDraw {
                texture: SlotTexture::of(&texture),
                source: Rect::new(0, 0, 1, 1),
                destination: Rect::new(0, 0, 1, 1),
                size: 1.0,
                angle: 0.0,
                tint: Color::WHITE,
            })
            .unwrap();
        assert!(pool.active().is_some_and(Batch::is_full));

        pool.active_mut().unwrap().clear();
        pool.active_or_create(&program);
        assert_eq!(pool.allocated(), 1);
    }

    #[test]
    fn test_stats_record_reason() {
        let mut stats = BatchStats::default();
        stats.record_flush(FlushReason::TextureSwitch);
        stats.record_flush(FlushReason::Capacity);
        stats.record_flush(FlushReason::End);

        assert_eq!(
            stats,
            BatchStats {
                draw_calls: 3,
                sprites: 0,
                texture_switch_flushes: 1,
                capacity_flushes: 1,
            }
        );
    }
}
