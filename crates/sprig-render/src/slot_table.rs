//! Fixed-capacity table mapping batch slots to textures and sprite state.

use sprig_core::geometry::Rect;
use sprig_test_utils::{GpuTexture, RenderContext};

use crate::{
    Color,
    error::SpriteBatchError,
    shader::{FIRST_TEXTURE_BINDING, ShaderProgram, UNIFORM_BYTES_PER_SLOT, UniformLocation},
    texture::{SpriteTexture, TextureId},
};

/// The texture a slot draws from.
#[derive(Debug, Clone)]
pub struct SlotTexture {
    pub id: TextureId,
    pub gpu: GpuTexture,
    pub width: u32,
    pub height: u32,
}

impl SlotTexture {
    pub fn of<T: SpriteTexture + ?Sized>(texture: &T) -> Self {
        Self {
            id: texture.id(),
            gpu: texture.gpu_texture().clone(),
            width: texture.width(),
            height: texture.height(),
        }
    }
}

/// One sprite waiting to be placed in a slot.
#[derive(Debug, Clone)]
pub struct SpriteDraw {
    pub texture: SlotTexture,
    /// Pixel rectangle within the texture.
    pub source: Rect<i32>,
    /// Pixel rectangle on the render surface.
    pub destination: Rect<i32>,
    pub size: f32,
    pub angle: f32,
    pub tint: Color,
}

/// The visual state held by one batch slot.
///
/// There is no occupied flag: a slot is empty exactly when every field holds
/// its zero value and no texture is set, which is what [`BatchSlotState::EMPTY`]
/// and [`BatchSlotState::clear`] produce.
#[derive(Debug, Clone)]
pub struct BatchSlotState {
    pub x: f32,
    pub y: f32,
    pub width: i32,
    pub height: i32,
    pub size: f32,
    pub angle: f32,
    pub tint: Color,
    pub source: Rect<i32>,
    pub texture: Option<SlotTexture>,
}

impl BatchSlotState {
    pub const EMPTY: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0,
        height: 0,
        size: 0.0,
        angle: 0.0,
        tint: Color::TRANSPARENT,
        source: Rect::new(0, 0, 0, 0),
        texture: None,
    };

    pub fn is_empty(&self) -> bool {
        self.texture.is_none()
            && self.x == 0.0
            && self.y == 0.0
            && self.width == 0
            && self.height == 0
            && self.size == 0.0
            && self.angle == 0.0
            && self.tint == Color::TRANSPARENT
            && self.source == Rect::default()
    }

    pub fn is_occupied(&self) -> bool {
        !self.is_empty()
    }

    pub fn texture_id(&self) -> Option<TextureId> {
        self.texture.as_ref().map(|texture| texture.id)
    }

    pub fn clear(&mut self) {
        *self = Self::EMPTY;
    }

    fn fill(&mut self, draw: SpriteDraw) {
        *self = Self {
            x: draw.destination.x as f32,
            y: draw.destination.y as f32,
            width: draw.destination.width,
            height: draw.destination.height,
            size: draw.size,
            angle: draw.angle,
            tint: draw.tint,
            source: draw.source,
            texture: Some(draw.texture),
        };
    }
}

impl Default for BatchSlotState {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Number of texture slots a batch can hold on a device with `limits`.
///
/// wgpu reports one sampled-texture limit shared by the vertex and fragment
/// stages. The uniform block and the bind group must also have room for every
/// slot. `requested` may lower the result but never raise it, and the result is
/// never zero.
pub fn texture_slot_capacity(limits: &wgpu::Limits, requested: Option<u32>) -> u32 {
    let units = limits.max_sampled_textures_per_shader_stage;
    let uniform_room = u64::from(limits.max_uniform_buffer_binding_size) / UNIFORM_BYTES_PER_SLOT;
    let binding_room = limits
        .max_bindings_per_bind_group
        .saturating_sub(FIRST_TEXTURE_BINDING);

    let hardware = units
        .min(u32::try_from(uniform_room).unwrap_or(u32::MAX))
        .min(binding_room);

    let capacity = match requested {
        Some(requested) if requested > hardware => {
            tracing::warn!(
                "Requested {} texture slots but the device supports {}; clamping",
                requested,
                hardware
            );
            hardware
        }
        Some(requested) => requested,
        None => hardware,
    };

    capacity.max(1)
}

/// Tracks which sprite occupies each texture slot of one batch.
#[derive(Debug, Clone)]
pub struct TextureSlotTable {
    slots: Vec<BatchSlotState>,
    unit_locations: Vec<UniformLocation>,
}

impl TextureSlotTable {
    /// Create an empty table with one slot per texture unit of `program`.
    ///
    /// The `u_textures[i]` location of every slot is resolved here so binding
    /// never looks a uniform up by name.
    pub fn new(program: &ShaderProgram) -> Self {
        let capacity = program.texture_slots() as usize;
        let unit_locations = (0..capacity)
            .filter_map(|slot| program.uniform_location(&format!("u_textures[{slot}]")))
            .collect();

        Self {
            slots: vec![BatchSlotState::EMPTY; capacity],
            unit_locations,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(BatchSlotState::is_occupied)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(BatchSlotState::is_empty)
    }

    pub fn has_space(&self) -> bool {
        self.slots.iter().any(BatchSlotState::is_empty)
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_occupied()).count()
    }

    pub fn slot(&self, index: usize) -> Result<&BatchSlotState, SpriteBatchError> {
        self.slots
            .get(index)
            .ok_or(SpriteBatchError::SlotOutOfRange {
                slot: index,
                capacity: self.slots.len(),
            })
    }

    /// Occupied slots with their indices, lowest first.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &BatchSlotState)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_occupied())
    }

    /// Place `draw` in the lowest-indexed empty slot and return that index.
    pub fn add_texture_data(&mut self, draw: SpriteDraw) -> Result<usize, SpriteBatchError> {
        let capacity = self.slots.len();
        let (index, slot) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.is_empty())
            .ok_or(SpriteBatchError::BatchFull { capacity })?;

        slot.fill(draw);
        Ok(index)
    }

    /// Bind every occupied slot's texture to the unit of the same index and
    /// point the slot's `u_textures` uniform at that unit.
    pub fn bind_batch(
        &self,
        context: &dyn RenderContext,
        program: &ShaderProgram,
    ) -> Result<(), SpriteBatchError> {
        for (index, slot) in self.occupied() {
            let location =
                self.unit_locations
                    .get(index)
                    .ok_or(SpriteBatchError::SlotOutOfRange {
                        slot: index,
                        capacity: self.unit_locations.len(),
                    })?;

            if let Some(texture) = &slot.texture {
                context.bind_texture(index as u32, &texture.gpu);
                program.set_uniform_i32(*location, index as i32);
            }
        }

        Ok(())
    }

    /// Reset every slot to empty. Nothing is deallocated.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(BatchSlotState::clear);
    }
}
