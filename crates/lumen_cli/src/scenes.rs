//! Built-in scenes, each paired with the camera that frames it.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use lumen_math::random_vector;
use lumen_renderer::{
    CameraConfig, Color, Dielectric, HittableList, Lambertian, Metal, Point3, Sphere, Vec3,
};
use rand::{Rng, RngCore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePreset {
    /// Random field of small spheres around three large ones
    Final,
    /// Diffuse sphere between two metal spheres
    Materials,
    /// Hollow glass bubble next to diffuse and metal spheres
    Glass,
}

impl ScenePreset {
    pub const VARIANTS: &'static [&'static str] = &["final", "materials", "glass"];

    /// Build the scene and its default camera.
    pub fn build(self, rng: &mut dyn RngCore) -> (HittableList, CameraConfig) {
        match self {
            ScenePreset::Final => (random_spheres(rng), final_camera()),
            ScenePreset::Materials => (materials(), close_up_camera()),
            ScenePreset::Glass => (glass(), close_up_camera()),
        }
    }
}

impl FromStr for ScenePreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "final" => Ok(ScenePreset::Final),
            "materials" => Ok(ScenePreset::Materials),
            "glass" => Ok(ScenePreset::Glass),
            _ => Err(anyhow!(
                "\"{}\" isn't a scene.\nPossible values: {:?}",
                s,
                Self::VARIANTS
            )),
        }
    }
}

impl fmt::Display for ScenePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScenePreset::Final => "final",
            ScenePreset::Materials => "materials",
            ScenePreset::Glass => "glass",
        };
        f.write_str(name)
    }
}

fn random_spheres(rng: &mut dyn RngCore) -> HittableList {
    let mut world = HittableList::new();

    world.push(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::new(Color::new(0.5, 0.5, 0.5)),
    ));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = rng.gen::<f64>();
            let center = Point3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );

            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // diffuse
                let albedo = random_vector(rng, 0.0, 1.0) * random_vector(rng, 0.0, 1.0);
                world.push(Sphere::new(center, 0.2, Lambertian::new(albedo)));
            } else if choose_mat < 0.95 {
                // metal
                let albedo = random_vector(rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.5..1.0);
                world.push(Sphere::new(center, 0.2, Metal::new(albedo, fuzz)));
            } else {
                // glass
                world.push(Sphere::new(center, 0.2, Dielectric::new(1.5)));
            }
        }
    }

    world.push(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, Dielectric::new(1.5)));
    world.push(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        Lambertian::new(Color::new(0.4, 0.2, 0.1)),
    ));
    world.push(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Metal::new(Color::new(0.7, 0.6, 0.5), 0.0),
    ));

    world
}

fn materials() -> HittableList {
    let mut world = HittableList::new();

    world.push(Sphere::new(
        Point3::new(0.0, -100.5, -1.0),
        100.0,
        Lambertian::new(Color::new(0.8, 0.8, 0.0)),
    ));
    world.push(Sphere::new(
        Point3::new(0.0, 0.0, -1.2),
        0.5,
        Lambertian::new(Color::new(0.1, 0.2, 0.5)),
    ));
    world.push(Sphere::new(
        Point3::new(-1.0, 0.0, -1.0),
        0.5,
        Metal::new(Color::new(0.8, 0.8, 0.8), 0.3),
    ));
    world.push(Sphere::new(
        Point3::new(1.0, 0.0, -1.0),
        0.5,
        Metal::new(Color::new(0.8, 0.6, 0.2), 1.0),
    ));

    world
}

fn glass() -> HittableList {
    let mut world = HittableList::new();

    world.push(Sphere::new(
        Point3::new(0.0, -100.5, -1.0),
        100.0,
        Lambertian::new(Color::new(0.8, 0.8, 0.0)),
    ));
    world.push(Sphere::new(
        Point3::new(0.0, 0.0, -1.2),
        0.5,
        Lambertian::new(Color::new(0.1, 0.2, 0.5)),
    ));
    world.push(Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.5, Dielectric::new(1.5)));
    // Air bubble inside the glass sphere
    world.push(Sphere::new(
        Point3::new(-1.0, 0.0, -1.0),
        0.4,
        Dielectric::new(1.0 / 1.5),
    ));
    world.push(Sphere::new(
        Point3::new(1.0, 0.0, -1.0),
        0.5,
        Metal::new(Color::new(0.8, 0.6, 0.2), 1.0),
    ));

    world
}

fn final_camera() -> CameraConfig {
    CameraConfig::new()
        .with_resolution(320, 16.0 / 9.0)
        .with_quality(10, 5)
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0)
}

fn close_up_camera() -> CameraConfig {
    CameraConfig::new()
        .with_resolution(400, 16.0 / 9.0)
        .with_quality(100, 50)
        .with_position(Point3::new(-2.0, 2.0, 1.0), Point3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(20.0, 10.0, 3.4)
}
