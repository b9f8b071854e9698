use std::hint::black_box;
use std::time::Instant;

use glam::{Mat4, UVec2};
use rubix_common::{AppState, Axis, CUBE_COUNT, FrameInput};
use rubix_render::sync::{PassInputs, build_pass_constants, sync_object_constants};
use rubix_render::{DriverOptions, FrameDriver, HeadlessBackend, ObjectConstants, UploadBuffer};
use rubix_scene::{CubeScene, SceneUpdate};

fn bench_object_sync(iterations: usize) {
    let mut scene = CubeScene::default();
    let mut buffer: UploadBuffer<ObjectConstants> =
        UploadBuffer::new("objects", CUBE_COUNT, 256);
    let rotation = Mat4::from_rotation_y(0.01);

    let start = Instant::now();
    for _ in 0..iterations {
        for item in scene.items.iter_mut() {
            item.pose(rotation);
        }
        let _ = black_box(sync_object_constants(&mut scene.items, &mut buffer));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  all dirty ({CUBE_COUNT} items, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_pass_build(iterations: usize) {
    let scene = CubeScene::default();
    let input = FrameInput::idle(1.0 / 60.0, 0.0, UVec2::new(1920, 1080));

    let start = Instant::now();
    for _ in 0..iterations {
        let inputs = PassInputs::gather(black_box(&scene), black_box(&input));
        let _ = black_box(build_pass_constants(&inputs));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  pass constants ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_headless_frame(frames: usize, spinning: bool) {
    let mut scene = CubeScene::default();
    let mut intent = AppState::new();
    if spinning {
        intent.set_rotation_axis(Some(Axis::Y));
    }
    let mut driver = match FrameDriver::new(
        HeadlessBackend::default(),
        &scene,
        SceneUpdate::default(),
        DriverOptions::default(),
    ) {
        Ok(driver) => driver,
        Err(e) => {
            eprintln!("driver setup failed: {e}");
            return;
        }
    };
    let input = FrameInput::idle(1.0 / 60.0, 0.0, UVec2::new(1920, 1080));

    let start = Instant::now();
    for _ in 0..frames {
        let _ = black_box(driver.run_frame(&mut scene, &mut intent, &input));
    }
    let elapsed = start.elapsed();
    let per_frame = elapsed / frames as u32;
    println!(
        "  headless frame (spinning={spinning}, {frames} frames): {per_frame:?}/frame, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Constant Sync Benchmarks ===\n");

    println!("Object constant sync:");
    bench_object_sync(1000);
    bench_object_sync(10000);

    println!("\nPass constants:");
    bench_pass_build(10000);

    println!("\nHeadless frame loop:");
    bench_headless_frame(1000, false);
    bench_headless_frame(1000, true);

    println!("\n=== Done ===");
}
