//! Lumen math - vector, ray and interval primitives.
//!
//! Vector arithmetic is provided by glam's double precision `DVec3`; this
//! crate adds the ray-tracing helpers glam does not ship (random sampling,
//! reflection, refraction) along with `Ray` and `Interval`.

/// 3-component double precision vector.
pub type Vec3 = glam::DVec3;

/// A position in world space.
pub type Point3 = Vec3;

/// Linear RGB color, components nominally in [0, 1].
pub type Color = Vec3;

mod interval;
mod ray;
pub mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{
    near_zero, random_in_unit_disk, random_in_unit_sphere, random_on_hemisphere,
    random_unit_vector, random_vector, reflect, refract, unit_vector,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(2.0 * a, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(
            Vec3::new(2.0, 3.0, 4.0).cross(Vec3::new(5.0, 6.0, 7.0)),
            Vec3::new(-3.0, 6.0, -3.0)
        );
    }
}
