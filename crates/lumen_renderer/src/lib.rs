//! Lumen renderer - CPU path tracing
//!
//! A Monte Carlo path tracer for spheres with diffuse, metallic and
//! dielectric materials, a thin-lens camera and PPM output. Images can be
//! rendered on the calling thread or on a pool of workers.

mod camera;
mod color;
mod error;
mod hittable;
mod material;
mod pool;
mod progress;
mod renderer;
mod sphere;
mod tile;

pub use camera::{Camera, CameraConfig};
pub use color::{color_to_bytes, linear_to_gamma, ImageBuffer, PpmWriter};
pub use error::{ConfigError, RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use pool::{render_concurrent, PixelSample};
pub use progress::{format_mm_ss, RenderProgress};
pub use renderer::{
    derive_seed, ray_color, render_pixel, sky_gradient, RenderConfig, RenderMode, Renderer,
    SHADOW_ACNE_EPSILON,
};
pub use sphere::Sphere;
pub use tile::{generate_tiles, Tile, DEFAULT_TILE_SIZE};

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Color, Interval, Point3, Ray, Vec3};
