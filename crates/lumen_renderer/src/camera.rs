//! Camera configuration and ray generation.
//!
//! A [`CameraConfig`] is the mutable, serializable description supplied by
//! the driver. [`CameraConfig::build`] validates it and derives a [`Camera`]
//! whose geometry never changes afterwards, so one camera can be shared
//! read-only by every render worker.

use crate::ConfigError;
use lumen_math::{near_zero, random_in_unit_disk, unit_vector, Point3, Ray, Vec3};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// User-facing camera settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Ratio of image width over height
    pub aspect_ratio: f64,
    /// Rendered image width in pixel count
    pub image_width: u32,
    /// Count of random samples for each pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces into scene
    pub max_depth: u32,
    /// Vertical view angle in degrees
    pub vfov: f64,
    /// Point camera is looking from
    pub lookfrom: Point3,
    /// Point camera is looking at
    pub lookat: Point3,
    /// Camera-relative "up" direction
    pub vup: Vec3,
    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f64,
    /// Distance from `lookfrom` to the plane of perfect focus
    pub focus_dist: f64,
    /// Jitter samples inside each pixel; off samples the pixel center
    pub antialias: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            vfov: 90.0,
            lookfrom: Point3::ZERO,
            lookat: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            antialias: true,
        }
    }
}

impl CameraConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set image width and aspect ratio (height is derived).
    pub fn with_resolution(mut self, image_width: u32, aspect_ratio: f64) -> Self {
        self.image_width = image_width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, lookfrom: Point3, lookat: Point3, vup: Vec3) -> Self {
        self.lookfrom = lookfrom;
        self.lookat = lookat;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Enable or disable per-sample jitter inside each pixel.
    pub fn with_antialias(mut self, antialias: bool) -> Self {
        self.antialias = antialias;
        self
    }

    /// Image height derived from width and aspect ratio, at least 1.
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f64 / self.aspect_ratio) as u32).max(1)
    }

    /// Validate the settings and compute the camera geometry.
    pub fn build(&self) -> Result<Camera, ConfigError> {
        if self.image_width == 0 {
            return Err(ConfigError::ZeroImageWidth);
        }
        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0.0 {
            return Err(ConfigError::InvalidAspectRatio(self.aspect_ratio));
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamplesPerPixel);
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(ConfigError::InvalidFieldOfView(self.vfov));
        }
        if !self.focus_dist.is_finite() || self.focus_dist <= 0.0 {
            return Err(ConfigError::InvalidFocusDistance(self.focus_dist));
        }
        if !(self.defocus_angle >= 0.0 && self.defocus_angle < 180.0) {
            return Err(ConfigError::InvalidDefocusAngle(self.defocus_angle));
        }

        let view = self.lookfrom - self.lookat;
        if near_zero(view) {
            return Err(ConfigError::DegenerateView);
        }

        let image_width = self.image_width;
        let image_height = self.image_height();
        let center = self.lookfrom;

        // Determine the viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * (image_width as f64 / image_height as f64);

        // Calculate the u,v,w unit basis vectors for the camera coordinate frame
        let w = unit_vector(view);
        let side = self.vup.cross(w);
        if near_zero(side) {
            return Err(ConfigError::DegenerateUp);
        }
        let u = unit_vector(side);
        let v = w.cross(u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * u;
        let viewport_v = viewport_height * -v;

        let pixel_delta_u = viewport_u / image_width as f64;
        let pixel_delta_v = viewport_v / image_height as f64;

        let viewport_upper_left = center - self.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        // Calculate the camera defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();

        Ok(Camera {
            image_width,
            image_height,
            samples_per_pixel: self.samples_per_pixel,
            max_depth: self.max_depth,
            pixel_samples_scale: 1.0 / self.samples_per_pixel as f64,
            defocus_angle: self.defocus_angle,
            antialias: self.antialias,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
        })
    }
}

/// Camera for generating rays into the scene.
///
/// Immutable after construction; obtain one through [`CameraConfig::build`].
#[derive(Debug, Clone)]
pub struct Camera {
    image_width: u32,
    image_height: u32,
    samples_per_pixel: u32,
    max_depth: u32,
    pixel_samples_scale: f64,
    defocus_angle: f64,
    antialias: bool,

    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Color scale factor for a sum of pixel samples (1 / samples_per_pixel).
    pub fn pixel_samples_scale(&self) -> f64 {
        self.pixel_samples_scale
    }

    /// Camera center (the look-from point).
    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Orthonormal camera frame: right, up, and backwards (away from the view).
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// World position of the center of pixel (0, 0).
    pub fn pixel00_loc(&self) -> Point3 {
        self.pixel00_loc
    }

    /// Offsets to the pixel to the right and to the pixel below.
    pub fn pixel_deltas(&self) -> (Vec3, Vec3) {
        (self.pixel_delta_u, self.pixel_delta_v)
    }

    /// Horizontal and vertical radius vectors of the defocus disk.
    pub fn defocus_disk(&self) -> (Vec3, Vec3) {
        (self.defocus_disk_u, self.defocus_disk_v)
    }

    /// Construct a camera ray originating from the defocus disk and directed
    /// at a randomly sampled point around pixel (i, j).
    ///
    /// `i` is the column and `j` the row, counted from the top left.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.antialias {
            sample_square(rng)
        } else {
            Vec3::ZERO
        };

        let pixel_sample = self.pixel00_loc
            + ((i as f64) + offset.x) * self.pixel_delta_u
            + ((j as f64) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5, 0.0)
}
