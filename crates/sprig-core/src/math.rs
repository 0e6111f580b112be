/// Fast mathematical operations using SIMD-accelerated `glam` types.
///
/// This module re-exports all types and functions from the [`glam`] crate. Use these
/// types for CPU-side math such as building transformation matrices.
///
/// # Examples
///
/// ```
/// use sprig_core::math::{Mat4, Vec3};
///
/// let transform = Mat4::from_translation(Vec3::new(-1.0, 1.0, 0.0));
/// assert_eq!(transform.w_axis.x, -1.0);
/// ```
///
/// [`glam`]: https://docs.rs/glam
pub mod fast {
    pub use glam::*;
}

/// Packed vector types for GPU buffer uploads.
///
/// These `#[repr(C)]` types have no padding and implement [`bytemuck::Pod`], so
/// vertex structs built from them can be cast straight to bytes:
///
/// ```
/// use sprig_core::math::PackedVec2;
/// use bytemuck::cast_slice;
///
/// let corners = [PackedVec2::new(0.0, 1.0), PackedVec2::new(1.0, 1.0)];
/// let bytes: &[u8] = cast_slice(&corners);
/// assert_eq!(bytes.len(), 16);
/// ```
pub mod packed {
    use bytemuck::{Pod, Zeroable};

    /// A 2D vector with guaranteed `#[repr(C)]` layout (8 bytes).
    #[repr(C)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
    pub struct Vec2 {
        pub x: f32,
        pub y: f32,
    }

    impl Vec2 {
        pub const ZERO: Self = Self::new(0.0, 0.0);

        pub const fn new(x: f32, y: f32) -> Self {
            Self { x, y }
        }
    }

    /// A 3D vector with guaranteed `#[repr(C)]` layout (12 bytes).
    ///
    /// **Note**: this is only suitable for vertex data. Uniform blocks expect
    /// 16-byte alignment for `vec3`.
    #[repr(C)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
    pub struct Vec3 {
        pub x: f32,
        pub y: f32,
        pub z: f32,
    }

    impl Vec3 {
        pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

        pub const fn new(x: f32, y: f32, z: f32) -> Self {
            Self { x, y, z }
        }
    }

    /// A 4D vector with guaranteed `#[repr(C)]` layout (16 bytes).
    #[repr(C)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
    pub struct Vec4 {
        pub x: f32,
        pub y: f32,
        pub z: f32,
        pub w: f32,
    }

    impl Vec4 {
        pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

        pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
            Self { x, y, z, w }
        }
    }

    static_assertions::assert_eq_size!(Vec2, [f32; 2]);
    static_assertions::assert_eq_size!(Vec3, [f32; 3]);
    static_assertions::assert_eq_size!(Vec4, [f32; 4]);
}

pub use fast::*;
pub use packed::{Vec2 as PackedVec2, Vec3 as PackedVec3, Vec4 as PackedVec4};

/// Linearly maps `value` from the range `from_start..from_stop` onto `to_start..to_stop`.
///
/// The mapping is exact at both ends: `from_start` maps to `to_start` and
/// `from_stop` maps to `to_stop`. Values outside the source range extrapolate.
/// The source range must not be empty (`from_start != from_stop`).
///
/// ```
/// use sprig_core::math::map_value;
///
/// // Screen X to normalized device coordinates on an 800px wide surface.
/// assert_eq!(map_value(400.0, 0.0, 800.0, -1.0, 1.0), 0.0);
/// ```
#[inline]
pub fn map_value(value: f32, from_start: f32, from_stop: f32, to_start: f32, to_stop: f32) -> f32 {
    debug_assert!(from_start != from_stop, "map_value source range is empty");
    to_start + (to_stop - to_start) * ((value - from_start) / (from_stop - from_start))
}
