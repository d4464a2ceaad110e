//! End-to-end rendering tests.

use lumen_renderer::{
    color_to_bytes, sky_gradient, Camera, CameraConfig, Color, ConfigError, Dielectric, HittableList,
    Lambertian, Metal, Point3, RenderConfig, RenderError, Renderer, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn render_to_string(camera: &Camera, world: &HittableList, config: RenderConfig) -> String {
    let renderer = Renderer::new(camera, world, config).expect("valid render config");
    let out = renderer.render_ppm(Vec::new()).expect("render succeeds");
    String::from_utf8(out).expect("ppm is ascii")
}

fn pixel_lines(ppm: &str) -> Vec<[u8; 3]> {
    ppm.lines()
        .skip(3)
        .map(|line| {
            let mut channels = line.split(' ').map(|c| c.parse::<u8>().expect("channel"));
            [
                channels.next().expect("r"),
                channels.next().expect("g"),
                channels.next().expect("b"),
            ]
        })
        .collect()
}

fn diffuse_scene() -> HittableList {
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
    world.push(Sphere::new(
        Point3::new(1.0, 0.0, -1.0),
        0.5,
        Metal::new(Color::new(0.8, 0.6, 0.2), 0.3),
    ));
    world
}

fn mirror_scene() -> HittableList {
    let mut world = HittableList::new();
    world.push(Sphere::new(
        Point3::new(0.0, -100.5, -1.0),
        100.0,
        Metal::new(Color::new(0.7, 0.7, 0.7), 0.0),
    ));
    world.push(Sphere::new(
        Point3::new(0.0, 0.0, -1.0),
        0.5,
        Metal::new(Color::new(0.8, 0.6, 0.2), 0.0),
    ));
    world
}

#[test]
fn two_pixel_empty_scene() {
    init_logging();
    let camera = CameraConfig::new()
        .with_resolution(2, 2.0)
        .with_quality(1, 10)
        .with_antialias(false)
        .build()
        .expect("valid camera");
    let world = HittableList::new();

    let ppm = render_to_string(&camera, &world, RenderConfig::sequential().with_seed(1));

    // Both rays are level, so the gradient sits halfway: (0.75, 0.85, 1.0)
    assert_eq!(ppm, "P3\n2 1\n255\n221 236 255\n221 236 255\n");
}

#[test]
fn empty_scene_is_background_gradient() {
    init_logging();
    let camera = CameraConfig::new()
        .with_resolution(8, 2.0)
        .with_quality(1, 10)
        .with_antialias(false)
        .build()
        .expect("valid camera");
    let world = HittableList::new();

    let ppm = render_to_string(&camera, &world, RenderConfig::concurrent(3).with_seed(4));
    let pixels = pixel_lines(&ppm);
    assert_eq!(pixels.len(), 8 * 4);

    let mut rng = StdRng::seed_from_u64(0);
    for j in 0..camera.image_height() {
        for i in 0..camera.image_width() {
            let ray = camera.get_ray(i, j, &mut rng);
            let index = (j * camera.image_width() + i) as usize;
            assert_eq!(pixels[index], color_to_bytes(sky_gradient(&ray)));
        }
    }
}

#[test]
fn sequential_and_concurrent_agree() {
    init_logging();
    let camera = CameraConfig::new()
        .with_resolution(16, 2.0)
        .with_quality(64, 8)
        .with_position(Point3::new(0.0, 0.0, 1.0), Point3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(60.0, 0.0, 2.0)
        .build()
        .expect("valid camera");
    let world = diffuse_scene();

    let sequential = render_to_string(&camera, &world, RenderConfig::sequential().with_seed(11));
    let concurrent = render_to_string(
        &camera,
        &world,
        RenderConfig::concurrent(4).with_seed(11).with_tile_size(3),
    );

    let header = |ppm: &str| ppm.lines().take(3).collect::<Vec<_>>().join("\n");
    assert_eq!(header(&sequential), "P3\n16 8\n255");
    assert_eq!(header(&sequential), header(&concurrent));

    let a = pixel_lines(&sequential);
    let b = pixel_lines(&concurrent);
    assert_eq!(a.len(), 16 * 8);
    assert_eq!(a.len(), b.len());

    // Row-major in both: the top row sees sky, the bottom row sees ground
    let mean = |pixels: &[[u8; 3]]| {
        let sum: u64 = pixels.iter().flatten().map(|&c| c as u64).sum();
        sum as f64 / (pixels.len() * 3) as f64
    };
    let mean_diff = a
        .iter()
        .zip(&b)
        .flat_map(|(p, q)| p.iter().zip(q).map(|(x, y)| (*x as f64 - *y as f64).abs()))
        .sum::<f64>()
        / (a.len() * 3) as f64;

    assert!((mean(&a) - mean(&b)).abs() < 6.0);
    assert!(mean_diff < 24.0, "mean channel difference {}", mean_diff);
    assert!(a[0][2] > a[0][0]);
    assert!(b[0][2] > b[0][0]);
}

#[test]
fn deterministic_scene_is_byte_identical() {
    init_logging();
    let camera = CameraConfig::new()
        .with_resolution(12, 1.5)
        .with_quality(2, 20)
        .with_antialias(false)
        .build()
        .expect("valid camera");
    let world = mirror_scene();

    let first = render_to_string(&camera, &world, RenderConfig::sequential().with_seed(3));
    let second = render_to_string(&camera, &world, RenderConfig::sequential().with_seed(3));
    let pooled = render_to_string(&camera, &world, RenderConfig::concurrent(4).with_seed(9));

    assert_eq!(first, second);
    assert_eq!(first, pooled);
}

#[test]
fn fixed_seed_is_reproducible() {
    init_logging();
    let camera = CameraConfig::new()
        .with_resolution(10, 1.0)
        .with_quality(4, 10)
        .with_lens(40.0, 2.0, 1.0)
        .build()
        .expect("valid camera");
    let world = diffuse_scene();

    let first = render_to_string(&camera, &world, RenderConfig::sequential().with_seed(21));
    let second = render_to_string(&camera, &world, RenderConfig::sequential().with_seed(21));
    assert_eq!(first, second);
}

#[test]
fn render_into_memory_matches_ppm() {
    init_logging();
    let camera = CameraConfig::new()
        .with_resolution(6, 1.5)
        .with_quality(2, 5)
        .build()
        .expect("valid camera");
    let world = diffuse_scene();
    let config = RenderConfig::sequential().with_seed(8);

    let renderer = Renderer::new(&camera, &world, config.clone()).expect("valid config");
    let image = renderer.render().expect("render");
    assert_eq!((image.width, image.height), (6, 4));
    assert!(renderer.progress().is_done());

    let from_image = String::from_utf8(image.write_ppm(Vec::new()).expect("write")).expect("ascii");
    assert_eq!(from_image, render_to_string(&camera, &world, config));
}

#[test]
fn invalid_configuration_is_rejected() {
    assert_eq!(
        CameraConfig::new().with_resolution(0, 1.0).build().err(),
        Some(ConfigError::ZeroImageWidth)
    );
    assert_eq!(
        CameraConfig::new().with_quality(0, 10).build().err(),
        Some(ConfigError::ZeroSamplesPerPixel)
    );
    assert_eq!(
        CameraConfig::new()
            .with_position(Point3::ONE, Point3::ONE, Vec3::Y)
            .build()
            .err(),
        Some(ConfigError::DegenerateView)
    );

    let camera = CameraConfig::new().build().expect("default camera is valid");
    let world = HittableList::new();
    assert!(matches!(
        Renderer::new(&camera, &world, RenderConfig::concurrent(0)),
        Err(ConfigError::ZeroWorkers)
    ));

    let error: RenderError = ConfigError::ZeroTileSize.into();
    assert!(matches!(error, RenderError::Config(ConfigError::ZeroTileSize)));
}

#[test]
fn camera_config_from_json() {
    let json = r#"{
        "image_width": 40,
        "aspect_ratio": 2.0,
        "lookfrom": [13.0, 2.0, 3.0],
        "lookat": [0.0, 0.0, 0.0],
        "defocus_angle": 0.6
    }"#;

    let config: CameraConfig = serde_json::from_str(json).expect("parse camera");
    assert_eq!(config.image_width, 40);
    assert_eq!(config.image_height(), 20);
    assert_eq!(config.lookfrom, Point3::new(13.0, 2.0, 3.0));
    // Unspecified fields fall back to defaults
    assert_eq!(config.samples_per_pixel, CameraConfig::default().samples_per_pixel);
    assert!(config.antialias);

    let round_trip: CameraConfig =
        serde_json::from_str(&serde_json::to_string(&config).expect("serialize")).expect("parse");
    assert_eq!(round_trip.lookfrom, config.lookfrom);
    assert_eq!(round_trip.defocus_angle, config.defocus_angle);
}
