//! Local-space quad geometry shared by every sprite.
//!
//! Corners are ordered top-left, top-right, bottom-right, bottom-left, which is
//! the order [`QUAD_INDEX_PATTERN`] expects.

use sprig_core::{
    geometry::Rect,
    math::{PackedVec2, PackedVec3, map_value},
};

use crate::{Color, vertex::SpriteVertex};

pub const VERTICES_PER_QUAD: usize = 4;
pub const INDICES_PER_QUAD: usize = 6;

pub const QUAD_CORNERS: [PackedVec3; VERTICES_PER_QUAD] = [
    PackedVec3::new(-1.0, 1.0, 0.0),
    PackedVec3::new(1.0, 1.0, 0.0),
    PackedVec3::new(1.0, -1.0, 0.0),
    PackedVec3::new(-1.0, -1.0, 0.0),
];

/// Texture coordinates that cover a whole texture.
pub const FULL_TEXTURE_COORDS: [PackedVec2; VERTICES_PER_QUAD] = [
    PackedVec2::new(0.0, 1.0),
    PackedVec2::new(1.0, 1.0),
    PackedVec2::new(1.0, 0.0),
    PackedVec2::new(0.0, 0.0),
];

/// Two triangles per quad: (TL, TR, BL) and (TR, BR, BL).
pub const QUAD_INDEX_PATTERN: [u32; INDICES_PER_QUAD] = [0, 1, 3, 1, 2, 3];

/// Byte size of one quad in the vertex buffer.
pub const QUAD_SIZE: u64 = (VERTICES_PER_QUAD * size_of::<SpriteVertex>()) as u64;

/// Index buffer contents for `capacity` quads: [`QUAD_INDEX_PATTERN`] repeated with a `+4` offset per quad.
pub fn build_indices(capacity: usize) -> Vec<u32> {
    (0..capacity as u32)
        .flat_map(|quad| {
            QUAD_INDEX_PATTERN
                .iter()
                .map(move |index| index + quad * VERTICES_PER_QUAD as u32)
        })
        .collect()
}

/// Maps a pixel rectangle within a texture to the four corner texture coordinates.
///
/// Left and right map onto `U` in `0..1`. Top and bottom map onto `V` flipped,
/// so the top edge of the image sits at `V = 1`.
pub fn texture_coords(
    source: Rect<i32>,
    texture_width: u32,
    texture_height: u32,
) -> [PackedVec2; VERTICES_PER_QUAD] {
    let width = texture_width as f32;
    let height = texture_height as f32;

    let left = map_value(source.left() as f32, 0.0, width, 0.0, 1.0);
    let right = map_value(source.right() as f32, 0.0, width, 0.0, 1.0);
    let top = map_value(source.top() as f32, 0.0, height, 1.0, 0.0);
    let bottom = map_value(source.bottom() as f32, 0.0, height, 1.0, 0.0);

    [
        PackedVec2::new(left, top),
        PackedVec2::new(right, top),
        PackedVec2::new(right, bottom),
        PackedVec2::new(left, bottom),
    ]
}

/// The four vertices of the quad in `slot`.
pub fn quad_vertices(
    slot: usize,
    tex_coords: [PackedVec2; VERTICES_PER_QUAD],
    tint: Color,
) -> [SpriteVertex; VERTICES_PER_QUAD] {
    let tint = tint.to_packed();
    std::array::from_fn(|corner| {
        SpriteVertex::new(QUAD_CORNERS[corner], tex_coords[corner], slot as f32, tint)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_repeat_with_offset() {
        assert_eq!(
            build_indices(3),
            vec![0, 1, 3, 1, 2, 3, 4, 5, 7, 5, 6, 7, 8, 9, 11, 9, 10, 11]
        );
    }

    #[test]
    fn test_indices_empty_for_zero_capacity() {
        assert!(build_indices(0).is_empty());
    }

    #[test]
    fn test_full_source_covers_texture() {
        let coords = texture_coords(Rect::new(0, 0, 64, 32), 64, 32);
        assert_eq!(coords, FULL_TEXTURE_COORDS);
    }

    #[test]
    fn test_sub_rect_flips_v() {
        // Top-right quarter of a 100x100 image.
        let coords = texture_coords(Rect::new(50, 0, 50, 50), 100, 100);

        assert_eq!(coords[0], PackedVec2::new(0.5, 1.0));
        assert_eq!(coords[1], PackedVec2::new(1.0, 1.0));
        assert_eq!(coords[2], PackedVec2::new(1.0, 0.5));
        assert_eq!(coords[3], PackedVec2::new(0.5, 0.5));
    }

    #[test]
    fn test_quad_vertices_carry_slot_and_tint() {
        let vertices = quad_vertices(5, FULL_TEXTURE_COORDS, Color::RED);

        for (corner, vertex) in vertices.iter().enumerate() {
            assert_eq!(vertex.position, QUAD_CORNERS[corner]);
            assert_eq!(vertex.slot_index, 5.0);
            assert_eq!(vertex.tint, Color::RED.to_packed());
        }
    }

    #[test]
    fn test_quad_size() {
        assert_eq!(QUAD_SIZE, 160);
    }
}
