//! Worker pool for concurrent rendering.
//!
//! Tiles are queued up front on a lock-free FIFO; every worker of a fixed-size
//! rayon pool pops tiles until the queue is empty and pushes finished pixels to
//! a shared results queue. Once all workers have returned, results are sorted
//! by (row, col) so the output order never depends on scheduling.

use crossbeam::queue::SegQueue;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::ThreadPoolBuilder;

use crate::error::{ConfigError, RenderError, RenderResult};
use crate::progress::RenderProgress;
use crate::renderer::{derive_seed, render_pixel};
use crate::tile::{generate_tiles, Tile};
use crate::{Camera, Hittable};
use lumen_math::Color;

/// A finished pixel tagged with its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSample {
    pub row: u32,
    pub col: u32,
    pub color: Color,
}

/// Render every pixel on `workers` threads and return them in row-major order.
///
/// Blocks until the task queue is drained and all workers have finished. A
/// panic in any worker is propagated to the caller. Zero workers or a zero
/// tile size is rejected before any thread is started.
pub fn render_concurrent(
    camera: &Camera,
    world: &dyn Hittable,
    workers: usize,
    tile_size: u32,
    base_seed: u64,
    progress: &RenderProgress,
) -> RenderResult<Vec<PixelSample>> {
    if workers == 0 {
        return Err(ConfigError::ZeroWorkers.into());
    }
    if tile_size == 0 {
        return Err(ConfigError::ZeroTileSize.into());
    }

    let width = camera.image_width();
    let height = camera.image_height();

    let tasks: SegQueue<Tile> = SegQueue::new();
    for tile in generate_tiles(width, height, tile_size) {
        tasks.push(tile);
    }
    let results: SegQueue<PixelSample> = SegQueue::new();

    log::debug!(
        "Queued {} tiles of {}x{} for {} workers",
        tasks.len(),
        tile_size,
        tile_size,
        workers
    );

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("lumen-worker-{}", index))
        .build()?;

    progress.log_scanline();
    let row_len = width as usize;

    let counts = pool.broadcast(|ctx| {
        let seed = derive_seed(base_seed, ctx.index());
        let mut rng = StdRng::seed_from_u64(seed);
        let mut rendered = 0usize;

        log::debug!("Worker {} started (seed {})", ctx.index(), seed);

        while let Some(tile) = tasks.pop() {
            log::trace!("Worker {} took tile {}", ctx.index(), tile.index);
            for (row, col) in tile.pixels() {
                let color = render_pixel(camera, world, col, row, &mut rng);
                results.push(PixelSample { row, col, color });
                rendered += 1;

                if progress.record_pixel() % row_len == 0 {
                    progress.log_scanline();
                }
            }
        }

        log::debug!("Worker {} finished {} pixels", ctx.index(), rendered);
        rendered
    });

    let expected = width as usize * height as usize;
    let mut samples = Vec::with_capacity(expected);
    while let Some(sample) = results.pop() {
        samples.push(sample);
    }
    samples.sort_unstable_by_key(|sample| (sample.row, sample.col));

    let received: usize = counts.iter().sum();
    if samples.len() != expected || received != expected {
        return Err(RenderError::IncompleteImage {
            expected,
            received: samples.len(),
        });
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CameraConfig, HittableList, Lambertian, Sphere};
    use lumen_math::Vec3;

    fn scene() -> HittableList {
        let mut world = HittableList::new();
        world.push(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Lambertian::new(Color::new(0.1, 0.2, 0.5)),
        ));
        world.push(Sphere::new(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            Lambertian::new(Color::new(0.8, 0.8, 0.0)),
        ));
        world
    }

    #[test]
    fn test_results_are_row_major_and_complete() {
        let camera = CameraConfig::new()
            .with_resolution(13, 13.0 / 7.0)
            .with_quality(2, 4)
            .build()
            .expect("valid camera");
        let world = scene();
        let progress = RenderProgress::new(camera.image_width(), camera.image_height());

        let samples = render_concurrent(&camera, &world, 3, 4, 99, &progress).expect("render");

        assert_eq!(samples.len(), 13 * 7);
        for (index, sample) in samples.iter().enumerate() {
            assert_eq!(sample.row as usize, index / 13);
            assert_eq!(sample.col as usize, index % 13);
        }
        assert!(progress.is_done());
    }

    #[test]
    fn test_single_worker_matches_sequential_scan() {
        // One worker with 1x1 tiles visits pixels in the same order and with
        // the same generator as the sequential renderer
        let camera = CameraConfig::new()
            .with_resolution(6, 1.5)
            .with_quality(3, 5)
            .build()
            .expect("valid camera");
        let world = scene();
        let progress = RenderProgress::new(camera.image_width(), camera.image_height());

        let samples = render_concurrent(&camera, &world, 1, 1, 5, &progress).expect("render");

        let mut rng = StdRng::seed_from_u64(derive_seed(5, 0));
        for sample in &samples {
            let expected = render_pixel(&camera, &world, sample.col, sample.row, &mut rng);
            assert_eq!(sample.color, expected);
        }
    }

    #[test]
    fn test_rejects_zero_workers_and_tile_size() {
        let camera = CameraConfig::new()
            .with_resolution(4, 1.0)
            .with_quality(1, 1)
            .build()
            .expect("valid camera");
        let world = scene();
        let progress = RenderProgress::new(camera.image_width(), camera.image_height());

        assert!(matches!(
            render_concurrent(&camera, &world, 0, 1, 0, &progress),
            Err(RenderError::Config(ConfigError::ZeroWorkers))
        ));
        assert!(matches!(
            render_concurrent(&camera, &world, 2, 0, 0, &progress),
            Err(RenderError::Config(ConfigError::ZeroTileSize))
        ));
        assert_eq!(progress.pixels_completed(), 0);
    }

    #[test]
    fn test_more_workers_than_tiles() {
        let camera = CameraConfig::new()
            .with_resolution(2, 2.0)
            .with_quality(1, 2)
            .build()
            .expect("valid camera");
        let world = scene();
        let progress = RenderProgress::new(camera.image_width(), camera.image_height());

        let samples = render_concurrent(&camera, &world, 8, 16, 0, &progress).expect("render");
        assert_eq!(samples.len(), 2);
        assert_eq!((samples[1].row, samples[1].col), (0, 1));
    }
}
