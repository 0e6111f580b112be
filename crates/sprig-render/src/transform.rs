use sprig_core::{
    geometry::Size,
    math::{Mat4, Vec3, map_value},
};

/// Build the matrix that places the unit quad on a render surface.
///
/// `x`/`y` are the destination position in surface pixels (Y down) and
/// `width`/`height` the destination size. `size` scales the sprite uniformly
/// and `angle` rotates it in degrees, clockwise on screen.
///
/// The quad is rotated about its own centre first, then scaled, then translated
/// to the destination position in normalized device coordinates.
pub fn build_transform_matrix(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    size: f32,
    angle: f32,
    surface: Size<u32>,
) -> Mat4 {
    let surface_width = surface.width as f32;
    let surface_height = surface.height as f32;

    let scale_x = (width / surface_width) * size;
    let scale_y = (height / surface_height) * size;

    let ndc_x = map_value(x, 0.0, surface_width, -1.0, 1.0);
    let ndc_y = map_value(y, 0.0, surface_height, 1.0, -1.0);

    let rotation = Mat4::from_rotation_z(-angle.to_radians());
    let scale = Mat4::from_scale(Vec3::new(scale_x, scale_y, 1.0));
    let translation = Mat4::from_translation(Vec3::new(ndc_x, ndc_y, 0.0));

    translation * scale * rotation
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_core::math::Vec4;

    const SURFACE: Size<u32> = Size::new(200, 200);

    fn approx_eq(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_top_left_placement() {
        let matrix = build_transform_matrix(0.0, 0.0, 100.0, 100.0, 1.0, 0.0, SURFACE);

        // Translation lands on the NDC top-left corner.
        assert_eq!(matrix.w_axis, Vec4::new(-1.0, 1.0, 0.0, 1.0));
        // No rotation: the basis is a pure scale of half the surface.
        assert_eq!(matrix.x_axis, Vec4::new(0.5, 0.0, 0.0, 0.0));
        assert_eq!(matrix.y_axis, Vec4::new(0.0, 0.5, 0.0, 0.0));
        assert_eq!(matrix.z_axis, Vec4::new(0.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn test_centre_maps_to_origin() {
        let matrix = build_transform_matrix(100.0, 100.0, 20.0, 20.0, 1.0, 0.0, SURFACE);
        let centre = matrix * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(approx_eq(centre, Vec4::new(0.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_size_multiplies_scale() {
        let matrix = build_transform_matrix(0.0, 0.0, 50.0, 100.0, 2.0, 0.0, SURFACE);
        assert_eq!(matrix.x_axis.x, 0.5);
        assert_eq!(matrix.y_axis.y, 1.0);
    }

    #[test]
    fn test_positive_angle_rotates_clockwise() {
        let matrix = build_transform_matrix(100.0, 100.0, 200.0, 200.0, 1.0, 90.0, SURFACE);

        // The top-right corner of the unit quad ends up at the bottom right.
        let corner = matrix * Vec4::new(1.0, 1.0, 0.0, 1.0);
        assert!(approx_eq(corner, Vec4::new(1.0, -1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_non_square_surface() {
        let matrix = build_transform_matrix(800.0, 600.0, 80.0, 60.0, 1.0, 0.0, Size::new(800, 600));

        assert_eq!(matrix.w_axis, Vec4::new(1.0, -1.0, 0.0, 1.0));
        assert_eq!(matrix.x_axis.x, 0.1);
        assert_eq!(matrix.y_axis.y, 0.1);
    }
}
