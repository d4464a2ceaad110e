//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative light transport bounded by the camera's max depth
//! - Anti-aliasing via jittered multi-sampling
//! - Sequential or worker-pool execution with row-major output either way

use std::io::{self, Write};
use std::sync::Arc;

use crate::color::{ImageBuffer, PpmWriter};
use crate::error::{ConfigError, RenderError, RenderResult};
use crate::pool::{render_concurrent, PixelSample};
use crate::progress::RenderProgress;
use crate::tile::DEFAULT_TILE_SIZE;
use crate::{Camera, Hittable};
use lumen_math::{unit_vector, Color, Interval, Ray};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Lower bound for hit distances; suppresses self-intersection ("shadow
/// acne") at the origin of scattered rays.
pub const SHADOW_ACNE_EPSILON: f64 = 0.001;

/// How the pixels of an image are distributed over threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Single thread, row-major scan, output written as each pixel completes.
    Sequential,
    /// A fixed pool of workers pulling tiles from a shared FIFO queue.
    Concurrent { workers: usize },
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub mode: RenderMode,
    /// Base seed for the per-worker generators; `None` draws one from entropy
    pub seed: Option<u64>,
    /// Edge length of the square work items used in concurrent mode
    pub tile_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Sequential,
            seed: None,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

impl RenderConfig {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn concurrent(workers: usize) -> Self {
        Self {
            mode: RenderMode::Concurrent { workers },
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let RenderMode::Concurrent { workers: 0 } = self.mode {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        Ok(())
    }
}

/// Seed of the generator owned by worker `worker`.
///
/// The sequential renderer uses worker 0's seed. Distinct workers get distinct
/// seeds, so no two threads ever draw from correlated streams.
pub fn derive_seed(base: u64, worker: usize) -> u64 {
    base.wrapping_add(worker as u64)
}

/// Compute the color seen by a ray.
///
/// Follows the path for at most `depth` bounces, multiplying the attenuation
/// of every scatter. An exhausted bounce budget or an absorbed ray yields
/// black; a ray that escapes the scene picks up the sky gradient.
pub fn ray_color(ray: &Ray, depth: u32, world: &dyn Hittable, rng: &mut dyn RngCore) -> Color {
    let mut ray = *ray;
    let mut throughput = Color::ONE;

    for _ in 0..depth {
        let Some(rec) = world.hit(&ray, Interval::new(SHADOW_ACNE_EPSILON, f64::INFINITY)) else {
            return throughput * sky_gradient(&ray);
        };

        match rec.material.scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= result.attenuation;
                ray = result.scattered;
            }
            None => return Color::ZERO,
        }
    }

    // If we've exceeded the ray bounce limit, no more light is gathered
    Color::ZERO
}

/// Background seen by rays that miss everything: white to sky blue by height.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = unit_vector(ray.direction());
    let a = 0.5 * (unit_direction.y + 1.0);
    (1.0 - a) * Color::ONE + a * Color::new(0.5, 0.7, 1.0)
}

/// Average of `samples_per_pixel` independent samples through pixel (i, j).
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    i: u32,
    j: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        let ray = camera.get_ray(i, j, rng);
        pixel_color += ray_color(&ray, camera.max_depth(), world, rng);
    }

    pixel_color * camera.pixel_samples_scale()
}

/// Renders one scene through one camera.
///
/// The scene and camera are borrowed immutably for the whole render and are
/// shared read-only by every worker.
pub struct Renderer<'a> {
    camera: &'a Camera,
    world: &'a dyn Hittable,
    config: RenderConfig,
    progress: Arc<RenderProgress>,
}

impl<'a> Renderer<'a> {
    pub fn new(
        camera: &'a Camera,
        world: &'a dyn Hittable,
        config: RenderConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let progress = Arc::new(RenderProgress::new(
            camera.image_width(),
            camera.image_height(),
        ));

        Ok(Self {
            camera,
            world,
            config,
            progress,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Handle for observing the render from another thread.
    pub fn progress(&self) -> Arc<RenderProgress> {
        Arc::clone(&self.progress)
    }

    /// Render the full image into memory.
    pub fn render(&self) -> RenderResult<ImageBuffer> {
        let base_seed = self.begin();

        let image = match self.config.mode {
            RenderMode::Sequential => {
                let mut image =
                    ImageBuffer::new(self.camera.image_width(), self.camera.image_height());
                self.render_sequential(base_seed, |row, col, color| {
                    image.set(col, row, color);
                    Ok(())
                })?;
                image
            }
            RenderMode::Concurrent { workers } => {
                let samples = render_concurrent(
                    self.camera,
                    self.world,
                    workers,
                    self.config.tile_size,
                    base_seed,
                    &self.progress,
                )?;
                self.assemble(samples)?
            }
        };

        self.progress.log_done();
        Ok(image)
    }

    /// Render and serialize as a PPM image, returning the writer.
    ///
    /// Sequential renders stream each pixel as soon as it completes; concurrent
    /// renders write once every worker has finished and results are sorted.
    pub fn render_ppm<W: Write>(&self, out: W) -> RenderResult<W> {
        match self.config.mode {
            RenderMode::Sequential => {
                let base_seed = self.begin();
                let mut writer =
                    PpmWriter::new(out, self.camera.image_width(), self.camera.image_height())?;
                self.render_sequential(base_seed, |_, _, color| writer.write_pixel(color))?;
                let out = writer.finish()?;
                self.progress.log_done();
                Ok(out)
            }
            RenderMode::Concurrent { .. } => Ok(self.render()?.write_ppm(out)?),
        }
    }

    /// Reset progress, log the job and settle on a base seed.
    fn begin(&self) -> u64 {
        self.progress.restart();
        let base_seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen());

        log::info!(
            "Rendering {}x{} @ {} spp, max depth {}, {:?}",
            self.camera.image_width(),
            self.camera.image_height(),
            self.camera.samples_per_pixel(),
            self.camera.max_depth(),
            self.config.mode,
        );
        log::debug!("Base seed {}", base_seed);

        base_seed
    }

    /// Row-major scan on the calling thread, handing each pixel to `emit`.
    fn render_sequential<F>(&self, base_seed: u64, mut emit: F) -> io::Result<()>
    where
        F: FnMut(u32, u32, Color) -> io::Result<()>,
    {
        let mut rng = StdRng::seed_from_u64(derive_seed(base_seed, 0));

        for j in 0..self.camera.image_height() {
            self.progress.log_scanline();
            for i in 0..self.camera.image_width() {
                let color = render_pixel(self.camera, self.world, i, j, &mut rng);
                self.progress.record_pixel();
                emit(j, i, color)?;
            }
        }

        Ok(())
    }

    /// Build an image from samples already sorted row-major.
    fn assemble(&self, samples: Vec<PixelSample>) -> RenderResult<ImageBuffer> {
        let expected = self.progress.total_pixels();
        if samples.len() != expected {
            return Err(RenderError::IncompleteImage {
                expected,
                received: samples.len(),
            });
        }

        Ok(ImageBuffer {
            width: self.camera.image_width(),
            height: self.camera.image_height(),
            pixels: samples.into_iter().map(|sample| sample.color).collect(),
        })
    }
}
