//! Headless sprite batch example.
//!
//! Renders a small checkerboard of sprites from two procedurally generated
//! textures into an offscreen target and prints the batch statistics. The
//! textures alternate every row, so each row change flushes the batch.
//!
//! Run with `RUST_LOG=debug` to see every flush. Set `SPRIG_PROFILE=1` to serve
//! puffin data on port 8585.

use sprig_core::{
    geometry::{Rect, Size},
    logging,
    profiling::{self, ProfilingBackend},
};
use sprig_render::{
    Color, GraphicsContext, SpriteBatch, SpriteBatchDescriptor, SpriteTexture, Texture,
    TextureAtlas,
};

const SURFACE: Size<u32> = Size::new(256, 256);
const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// A 2x2 sheet with one solid colour per cell.
fn generate_sheet(colors: [[u8; 4]; 4]) -> Vec<u8> {
    const CELL: usize = 8;
    let width = CELL * 2;
    let mut pixels = vec![0u8; width * width * 4];

    for y in 0..width {
        for x in 0..width {
            let cell = (y / CELL) * 2 + x / CELL;
            let i = (y * width + x) * 4;
            pixels[i..i + 4].copy_from_slice(&colors[cell]);
        }
    }

    pixels
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    if std::env::var_os("SPRIG_PROFILE").is_some() {
        profiling::init_profiling(ProfilingBackend::PuffinHttp);
    }

    let context = GraphicsContext::new_owned_sync()?;
    tracing::info!("Using adapter {}", context.info().name);

    let target = context.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Target"),
        size: wgpu::Extent3d {
            width: SURFACE.width,
            height: SURFACE.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    context.set_render_target(target.create_view(&wgpu::TextureViewDescriptor::default()));

    let warm = Texture::from_rgba8(
        &*context,
        "warm",
        16,
        16,
        &generate_sheet([
            [255, 0, 0, 255],
            [255, 128, 0, 255],
            [255, 255, 0, 255],
            [255, 0, 128, 255],
        ]),
    )?;
    let cool = Texture::from_rgba8(
        &*context,
        "cool",
        16,
        16,
        &generate_sheet([
            [0, 0, 255, 255],
            [0, 128, 255, 255],
            [0, 255, 255, 255],
            [128, 0, 255, 255],
        ]),
    )?;

    let atlas: TextureAtlas = [
        ("top_left", Rect::new(0, 0, 8, 8)),
        ("top_right", Rect::new(8, 0, 8, 8)),
        ("bottom_left", Rect::new(0, 8, 8, 8)),
        ("bottom_right", Rect::new(8, 8, 8, 8)),
    ]
    .into_iter()
    .collect();
    let cells: Vec<Rect<i32>> = ["top_left", "top_right", "bottom_left", "bottom_right"]
        .iter()
        .filter_map(|name| atlas.get(name))
        .collect();

    let mut batch = SpriteBatch::new(
        context.clone(),
        SpriteBatchDescriptor::default()
            .surface_size(SURFACE)
            .target_format(TARGET_FORMAT)
            .clear_color(Color::CORNFLOWER_BLUE)
            .label("Headless Sprite Batch"),
    );

    profiling::new_frame();
    batch.begin()?;
    for row in 0..8 {
        let texture = if row % 2 == 0 { &warm } else { &cool };
        for column in 0..8 {
            let source = cells[(row + column) % cells.len()];
            let destination = Rect::new(16 + column as i32 * 32, 16 + row as i32 * 32, 24, 24);
            let angle = (column * 15) as f32;
            batch.render(texture, source, destination, 1.0, angle, Color::WHITE)?;
        }
    }
    // One untinted full-texture sprite on top.
    batch.render_texture(&warm, Rect::new(128, 128, 64, 64))?;
    batch.end()?;

    let stats = batch.stats();
    println!(
        "Rendered {} sprites in {} draw calls ({} texture switches, {} capacity flushes, {} slots per batch)",
        stats.sprites,
        stats.draw_calls,
        stats.texture_switch_flushes,
        stats.capacity_flushes,
        batch.texture_slots()
    );
    println!("Full texture bounds: {:?}", warm.bounds());

    Ok(())
}
