use criterion::{criterion_group, criterion_main, Criterion, black_box};

use pundus::core::types::{IVec3, Vec3};
use pundus::math::Aabb;
use pundus::pack::PrefixTable;
use pundus::physics::PhysicsAutomaton;
use pundus::render::AoTable;
use pundus::terrain::{TerrainGenerator, TerrainParams};
use pundus::voxel::{
    BlockEditor, Brush, BrushShape, EditMode, OccupancyHierarchy, VoxelState, VoxelStore,
    WorldDims,
};

fn terrain_world(axis: u32) -> VoxelStore {
    let mut store = VoxelStore::new(WorldDims::new(axis, 8).unwrap());
    TerrainGenerator::new(TerrainParams::for_axis(axis)).generate(&mut store);
    store
}

fn bench_generate_128(c: &mut Criterion) {
    let generator = TerrainGenerator::new(TerrainParams::for_axis(128));
    let dims = WorldDims::new(128, 8).unwrap();

    c.bench_function("generate_128", |b| {
        b.iter(|| {
            let mut store = VoxelStore::new(dims);
            generator.generate(&mut store);
            store
        });
    });
}

fn bench_occupancy_full_128(c: &mut Criterion) {
    let store = terrain_world(128);
    let mut occupancy = OccupancyHierarchy::new(store.dims());

    c.bench_function("occupancy_full_128", |b| {
        b.iter(|| occupancy.rebuild_full(black_box(&store)));
    });
}

fn bench_occupancy_window_128(c: &mut Criterion) {
    let store = terrain_world(128);
    let mut occupancy = OccupancyHierarchy::from_store(&store);
    let window = Aabb::new(IVec3::new(32, 0, 32), IVec3::new(96, 128, 96));

    c.bench_function("occupancy_window_128", |b| {
        b.iter(|| occupancy.rebuild_window(black_box(&store), black_box(&window)));
    });
}

fn bench_prefix_build(c: &mut Criterion) {
    // One 32³ chunk worth of terms, half full
    let cloud: Vec<u32> = (0..1024u32).map(|i| i.wrapping_mul(0x9E37_79B9)).collect();

    c.bench_function("prefix_build_1024", |b| {
        b.iter(|| PrefixTable::build(black_box(&cloud)));
    });
}

fn bench_dense_index(c: &mut Criterion) {
    let cloud: Vec<u32> = (0..1024u32).map(|i| i.wrapping_mul(0x9E37_79B9)).collect();
    let table = PrefixTable::build(&cloud);

    c.bench_function("dense_index", |b| {
        b.iter(|| {
            (0..32768usize)
                .step_by(97)
                .map(|p| table.dense_index(&cloud, black_box(p)).unwrap_or(0))
                .sum::<u32>()
        });
    });
}

fn bench_physics_tick_128(c: &mut Criterion) {
    let mut store = terrain_world(128);
    // Drop a slab of water on the terrain
    store.write_region(
        &Aabb::new(IVec3::new(48, 100, 48), IVec3::new(80, 104, 80)),
        |_| VoxelState::Water,
    );
    let mut occupancy = OccupancyHierarchy::from_store(&store);
    let mut physics = PhysicsAutomaton::new(64);
    let mut seed = 0u32;

    c.bench_function("physics_tick_128", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            physics.tick(&mut store, &mut occupancy, Vec3::splat(64.0), seed)
        });
    });
}

fn bench_edit_sphere(c: &mut Criterion) {
    let mut store = terrain_world(128);
    let mut occupancy = OccupancyHierarchy::from_store(&store);
    let mut editor = BlockEditor::new();
    let brush = Brush::new(BrushShape::Sphere, 16, IVec3::splat(64));

    c.bench_function("edit_sphere_16", |b| {
        b.iter(|| {
            editor.apply(&mut store, &mut occupancy, black_box(&brush), EditMode::Add(VoxelState::Stone));
            editor.apply(&mut store, &mut occupancy, black_box(&brush), EditMode::Remove)
        });
    });
}

fn bench_ao_table(c: &mut Criterion) {
    c.bench_function("ao_table_16", |b| {
        b.iter(|| AoTable::build(black_box(16), black_box(1)));
    });
}

criterion_group!(
    benches,
    bench_generate_128,
    bench_occupancy_full_128,
    bench_occupancy_window_128,
    bench_prefix_build,
    bench_dense_index,
    bench_physics_tick_128,
    bench_edit_sphere,
    bench_ao_table,
);
criterion_main!(benches);
