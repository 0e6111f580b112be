use std::sync::atomic::{AtomicU64, Ordering};

use sprig_core::geometry::Rect;
use sprig_test_utils::{GpuTexture, RenderContext};

use crate::error::TextureError;

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a texture.
///
/// The batcher compares ids, never GPU handles, to decide whether two
/// consecutive sprites share a texture. Ids are never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u64);

impl TextureId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Anything the sprite batch can draw from.
pub trait SpriteTexture {
    fn id(&self) -> TextureId;
    /// Width in pixels.
    fn width(&self) -> u32;
    /// Height in pixels.
    fn height(&self) -> u32;
    fn gpu_texture(&self) -> &GpuTexture;

    /// A source rectangle covering the whole texture.
    fn bounds(&self) -> Rect<i32> {
        Rect::new(0, 0, self.width() as i32, self.height() as i32)
    }
}

/// A 2D RGBA8 texture uploaded through a [`RenderContext`].
#[derive(Debug, Clone)]
pub struct Texture {
    id: TextureId,
    name: String,
    width: u32,
    height: u32,
    gpu: GpuTexture,
}

impl Texture {
    /// Upload tightly packed RGBA8 pixels, top row first.
    ///
    /// Rows are flipped before upload so the top of the image sits at `V = 1`,
    /// which is what the batcher's texture coordinates expect.
    pub fn from_rgba8(
        context: &dyn RenderContext,
        name: impl Into<String>,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroSize);
        }

        let row_bytes = width as usize * 4;
        let expected = row_bytes * height as usize;
        if pixels.len() != expected {
            return Err(TextureError::PixelDataSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        let name = name.into();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let gpu = context.create_texture(&wgpu::TextureDescriptor {
            label: Some(&name),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let flipped = flip_rows(pixels, row_bytes);
        context.write_texture(&gpu, &flipped, size);

        let id = TextureId::next();
        tracing::debug!("Uploaded texture '{}' ({}x{}) as {:?}", name, width, height, id);

        Ok(Self {
            id,
            name,
            width,
            height,
            gpu,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SpriteTexture for Texture {
    fn id(&self) -> TextureId {
        self.id
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn gpu_texture(&self) -> &GpuTexture {
        &self.gpu
    }
}

fn flip_rows(pixels: &[u8], row_bytes: usize) -> Vec<u8> {
    pixels
        .chunks_exact(row_bytes)
        .rev()
        .flatten()
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_test_utils::MockRenderContext;

    #[test]
    fn test_ids_are_unique_and_non_zero() {
        let a = TextureId::next();
        let b = TextureId::next();
        assert_ne!(a, b);
        assert_ne!(a.get(), 0);
    }

    #[test]
    fn test_rows_are_flipped_on_upload() {
        let mock = MockRenderContext::new();
        #[rustfmt::skip]
        let pixels = [
            1, 1, 1, 1,  2, 2, 2, 2,
            3, 3, 3, 3,  4, 4, 4, 4,
        ];

        let texture = Texture::from_rgba8(&mock, "checker", 2, 2, &pixels).unwrap();

        #[rustfmt::skip]
        let expected = vec![
            3, 3, 3, 3,  4, 4, 4, 4,
            1, 1, 1, 1,  2, 2, 2, 2,
        ];
        assert_eq!(mock.texture_data(texture.gpu_texture()), Some(expected));
        assert_eq!(texture.bounds(), Rect::new(0, 0, 2, 2));
        assert_eq!(texture.name(), "checker");
    }

    #[test]
    fn test_rejects_wrong_pixel_count() {
        let mock = MockRenderContext::new();
        let err = Texture::from_rgba8(&mock, "short", 2, 2, &[0; 12]).unwrap_err();

        assert_eq!(
            err,
            TextureError::PixelDataSize {
                width: 2,
                height: 2,
                expected: 16,
                actual: 12
            }
        );
        assert_eq!(mock.count_texture_creates(), 0);
    }

    #[test]
    fn test_rejects_zero_size() {
        let mock = MockRenderContext::new();
        assert_eq!(
            Texture::from_rgba8(&mock, "empty", 0, 4, &[]).unwrap_err(),
            TextureError::ZeroSize
        );
    }
}
