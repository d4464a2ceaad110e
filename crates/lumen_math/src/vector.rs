//! Ray-tracing helpers on top of glam's `DVec3`.
//!
//! Every sampling function takes the generator explicitly. There is no
//! process-wide random state, so concurrent workers never share a generator.

use rand::{Rng, RngCore};

use crate::Vec3;

/// Components below this magnitude count as zero in [`near_zero`].
const NEAR_ZERO_EPSILON: f64 = 1e-8;

/// Squared lengths at or below this are rejected before normalizing.
const DEGENERATE_LENGTH_SQUARED: f64 = 1e-160;

/// `v / |v|`.
#[inline]
pub fn unit_vector(v: Vec3) -> Vec3 {
    v / v.length()
}

/// True if the vector is close to zero in all dimensions.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.abs().max_element() < NEAR_ZERO_EPSILON
}

/// Reflect a vector about a normal: `v - 2 (v . n) n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with normal `n` (Snell's law).
///
/// `etai_over_etat` is the ratio of refractive indices. The caller must rule
/// out total internal reflection (`ratio * sin_theta > 1`) first.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Vector with each component uniform in `[min, max)`.
pub fn random_vector(rng: &mut dyn RngCore, min: f64, max: f64) -> Vec3 {
    Vec3::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}

/// Uniform point strictly inside the unit sphere.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vector(rng, -1.0, 1.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform direction on the unit sphere.
///
/// Rejection samples the cube until the point lies inside the sphere and is
/// far enough from the origin to normalize safely.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vector(rng, -1.0, 1.0);
        let len_sq = p.length_squared();
        if DEGENERATE_LENGTH_SQUARED < len_sq && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Random unit vector in the same hemisphere as `normal`.
pub fn random_on_hemisphere(rng: &mut dyn RngCore, normal: Vec3) -> Vec3 {
    let on_unit_sphere = random_unit_vector(rng);
    if on_unit_sphere.dot(normal) > 0.0 {
        on_unit_sphere
    } else {
        -on_unit_sphere
    }
}

/// Uniform point inside the unit disk on the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
