//! Material trait for surface scattering.

use std::sync::Arc;

use crate::hittable::HitRecord;
use lumen_math::{near_zero, random_unit_vector, reflect, refract, unit_vector, Color, Ray, Vec3};
use rand::{Rng, RngCore};

/// A scattered ray and the color it is attenuated by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

impl ScatterResult {
    pub fn new(attenuation: Color, scattered: Ray) -> Self {
        Self {
            attenuation,
            scattered,
        }
    }
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns the attenuation and scattered ray, or `None` if the ray is
    /// absorbed and the light path ends.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord<'_>, rng: &mut dyn RngCore)
        -> Option<ScatterResult>;
}

// Lets several primitives share one material instance
impl<M: Material + ?Sized> Material for Arc<M> {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        (**self).scatter(ray_in, rec, rng)
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let scatter_direction = diffuse_direction(rec.normal, random_unit_vector(rng));
        let scattered = Ray::new(rec.p, scatter_direction);
        Some(ScatterResult::new(self.albedo, scattered))
    }
}

/// Offset the normal by a random unit vector, falling back to the normal
/// when the two nearly cancel.
fn diffuse_direction(normal: Vec3, offset: Vec3) -> Vec3 {
    let direction = normal + offset;

    // Catch degenerate scatter direction
    if near_zero(direction) {
        normal
    } else {
        direction
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough. Clamped to [0, 1].
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = unit_vector(reflect(ray_in.direction(), rec.normal));
        let scattered_dir = reflected + self.fuzz * random_unit_vector(rng);

        // Fuzz pushed the ray below the surface: absorb it
        if scattered_dir.dot(rec.normal) <= 0.0 {
            return None;
        }

        let scattered = Ray::new(rec.p, scattered_dir);
        Some(ScatterResult::new(self.albedo, scattered))
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Refractive index in vacuum or air, or the ratio of the material's
    /// index over the index of the enclosing medium
    refraction_index: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `refraction_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn new(refraction_index: f64) -> Self {
        Self { refraction_index }
    }

    pub fn refraction_index(&self) -> f64 {
        self.refraction_index
    }

    /// Schlick's approximation for reflectance.
    pub fn reflectance(cosine: f64, refraction_index: f64) -> f64 {
        let r0 = ((1.0 - refraction_index) / (1.0 + refraction_index)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let attenuation = Color::ONE;
        let ri = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = unit_vector(ray_in.direction());
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Check for total internal reflection
        let cannot_refract = ri * sin_theta > 1.0;

        let direction = if cannot_refract || Self::reflectance(cos_theta, ri) > rng.gen::<f64>() {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, ri)
        };

        Some(ScatterResult::new(attenuation, Ray::new(rec.p, direction)))
    }
}
