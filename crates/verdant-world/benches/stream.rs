use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use verdant_scene::Scene;
use verdant_world::{HeightField, Palette, TerrainGenerator, TreeGenerator, WorldGenParams};

fn frame_round_trip(c: &mut Criterion) {
    let params = WorldGenParams::default();
    let heights = HeightField::new(&params);
    let palette = Arc::new(Palette::new(params.seed));
    let mut terrain = TerrainGenerator::new(&params, heights, palette.clone());
    let mut trees = TreeGenerator::new(&params, heights, palette);
    let mut scene = Scene::new();
    let frame = params.frame_width();

    c.bench_function("create_remove_frame", |b| {
        b.iter(|| {
            let built = terrain.create_in_range(&mut scene, 0, frame).unwrap()
                + trees.create_in_range(&mut scene, 0, frame).unwrap();
            terrain.remove_in_range(&mut scene, 0, frame).unwrap();
            trees.remove_in_range(&mut scene, 0, frame).unwrap();
            black_box(built)
        })
    });

    c.bench_function("height_at_column", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for x in (0..frame).step_by(params.block_size as usize) {
                acc += heights.height_at(black_box(x as f32));
            }
            black_box(acc)
        })
    });
}

criterion_group!(benches, frame_round_trip);
criterion_main!(benches);
