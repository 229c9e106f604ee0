use image::{DynamicImage, GrayImage, Luma};
use reliefkit_camtools::{
    ModelTransformation, ReliefError, ReliefParameters, ReliefToolpathGenerator,
};
use reliefkit_core::FeedRates;
use reliefkit_gcode::{HeaderType, MovementMode, ProcessMode};

fn flat_image(width: u32, height: u32, value: u8) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([value])))
}

/// Steep tool and one step down: the whole job fits in a single pass.
fn small_job() -> (ReliefParameters, ModelTransformation) {
    (
        ReliefParameters {
            tool_angle: 178.0,
            target_depth: 5.0,
            step_down: 5.0,
            density: 1.0,
            ..ReliefParameters::default()
        },
        ModelTransformation {
            width: 2.0,
            height: 2.0,
            ..ModelTransformation::default()
        },
    )
}

#[test]
fn test_image_to_toolpath_object() {
    let (params, transform) = small_job();
    let generator = ReliefToolpathGenerator::from_image(
        flat_image(2, 2, 128),
        params,
        transform,
        FeedRates::default(),
    )
    .unwrap();

    let toolpath = generator.generate_toolpath().unwrap();
    assert_eq!(toolpath.header_type, HeaderType::Cnc);
    assert_eq!(toolpath.mode, ProcessMode::Greyscale);
    assert_eq!(toolpath.movement_mode, MovementMode::GreyscaleLine);
    assert!(toolpath.estimated_time > 0.0, "cutting moves take time");

    // one structured command per motion line, blanks included
    let gcode = generator.generate_gcode().unwrap();
    assert_eq!(toolpath.data.len(), gcode.lines().count());

    let cuts = toolpath.data.iter().filter(|c| c.g == Some(1)).count();
    assert_eq!(cuts, 4, "one cut per grid cell");
}

#[test]
fn test_from_file_matches_in_memory_generation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("relief.png");
    GrayImage::from_pixel(2, 2, Luma([128])).save(&path).unwrap();

    let (params, transform) = small_job();
    let from_file =
        ReliefToolpathGenerator::from_file(&path, params, transform, FeedRates::default())
            .unwrap();
    let from_image = ReliefToolpathGenerator::from_image(
        flat_image(2, 2, 128),
        params,
        transform,
        FeedRates::default(),
    )
    .unwrap();

    assert_eq!(
        from_file.generate_gcode().unwrap(),
        from_image.generate_gcode().unwrap()
    );
}

#[test]
fn test_missing_files_surface_as_image_errors() {
    let dir = tempfile::tempdir().unwrap();
    let result = ReliefToolpathGenerator::from_file(
        dir.path().join("missing.png"),
        ReliefParameters::default(),
        ModelTransformation::default(),
        FeedRates::default(),
    );
    assert!(matches!(result, Err(ReliefError::Image(_))));
}

#[test]
fn test_progress_reports_end_at_one() {
    let (params, transform) = small_job();
    let generator = ReliefToolpathGenerator::from_image(
        flat_image(2, 2, 128),
        params,
        transform,
        FeedRates::default(),
    )
    .unwrap();

    let mut reports = Vec::new();
    let toolpath = generator
        .generate_toolpath_with_progress(|fraction| reports.push(fraction))
        .unwrap();

    assert!(toolpath.estimated_time > 0.0);
    assert_eq!(reports.first(), Some(&0.0));
    assert_eq!(reports.last(), Some(&1.0));
}

#[test]
fn test_regeneration_is_deterministic() {
    let img = DynamicImage::ImageLuma8(GrayImage::from_fn(12, 12, |x, y| {
        Luma([((x * x + y * 3) % 256) as u8])
    }));
    let generator = ReliefToolpathGenerator::from_image(
        img,
        ReliefParameters {
            density: 1.0,
            ..ReliefParameters::default()
        },
        ModelTransformation {
            width: 12.0,
            height: 12.0,
            ..ModelTransformation::default()
        },
        FeedRates::default(),
    )
    .unwrap();

    let first = generator.generate_toolpath().unwrap();
    let second = generator.generate_toolpath().unwrap();
    assert_eq!(first, second);
}
