//! Benchmarks for the sprite batch's CPU-side work, driven by the mock context.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sprig_core::geometry::Rect;
use sprig_render::{Color, SpriteBatch, SpriteBatchDescriptor, SpriteTexture, Texture};
use sprig_test_utils::MockRenderContext;
use std::sync::Arc;

fn textures(mock: &MockRenderContext, count: usize) -> Vec<Texture> {
    (0..count)
        .map(|i| Texture::from_rgba8(mock, format!("tex{i}"), 4, 4, &[255; 64]).unwrap())
        .collect()
}

fn bench_single_texture(c: &mut Criterion) {
    let mut group = c.benchmark_group("sprite_batch_single_texture");

    for sprites in [16, 256, 4096] {
        group.throughput(Throughput::Elements(sprites as u64));

        let mock = Arc::new(MockRenderContext::with_texture_units(16));
        let texture = textures(&mock, 1).remove(0);
        let mut batch = SpriteBatch::new(mock.clone(), SpriteBatchDescriptor::default());

        group.bench_with_input(BenchmarkId::from_parameter(sprites), &sprites, |b, &sprites| {
            b.iter(|| {
                batch.begin().unwrap();
                for i in 0..sprites {
                    let x = (i % 64) as i32 * 12;
                    let y = (i / 64) as i32 * 12;
                    batch
                        .render_texture(&texture, black_box(Rect::new(x, y, 12, 12)))
                        .unwrap();
                }
                batch.end().unwrap();
                mock.clear_calls();
            });
        });
    }

    group.finish();
}

fn bench_texture_switches(c: &mut Criterion) {
    let mut group = c.benchmark_group("sprite_batch_texture_switches");

    for distinct in [2, 8] {
        let sprites = 1024;
        group.throughput(Throughput::Elements(sprites as u64));

        let mock = Arc::new(MockRenderContext::with_texture_units(16));
        let textures = textures(&mock, distinct);
        let mut batch = SpriteBatch::new(mock.clone(), SpriteBatchDescriptor::default());

        group.bench_with_input(BenchmarkId::from_parameter(distinct), &distinct, |b, _| {
            b.iter(|| {
                batch.begin().unwrap();
                for (i, texture) in textures.iter().cycle().take(sprites).enumerate() {
                    batch
                        .render(
                            texture,
                            texture.bounds(),
                            black_box(Rect::new(i as i32, 0, 8, 8)),
                            1.0,
                            0.0,
                            Color::WHITE,
                        )
                        .unwrap();
                }
                batch.end().unwrap();
                mock.clear_calls();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_texture, bench_texture_switches);
criterion_main!(benches);
