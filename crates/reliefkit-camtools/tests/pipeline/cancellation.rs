use image::{DynamicImage, GrayImage, Luma};
use reliefkit_camtools::{
    ModelTransformation, ReliefError, ReliefParameters, ReliefToolpathGenerator,
};
use reliefkit_core::{CancelToken, FeedRates};

fn gradient_job(size: u32) -> ReliefToolpathGenerator {
    let img = DynamicImage::ImageLuma8(GrayImage::from_fn(size, size, |x, y| {
        Luma([((x + y) * 8) as u8])
    }));
    ReliefToolpathGenerator::from_image(
        img,
        ReliefParameters {
            density: 1.0,
            ..ReliefParameters::default()
        },
        ModelTransformation {
            width: size as f64,
            height: size as f64,
            ..ModelTransformation::default()
        },
        FeedRates::default(),
    )
    .unwrap()
}

#[test]
fn test_pre_cancelled_jobs_produce_no_toolpath() {
    let cancel = CancelToken::new();
    cancel.cancel();

    let generator = gradient_job(8).with_cancel_token(cancel);
    assert!(matches!(
        generator.generate_toolpath(),
        Err(ReliefError::Cancelled)
    ));
}

#[test]
fn test_mid_run_cancellation_stops_between_columns() {
    let cancel = CancelToken::new();
    let generator = gradient_job(16).with_cancel_token(cancel.clone());

    // cancel from inside the second progress report; the next column
    // boundary must abort the run
    let mut calls = 0;
    let result = generator.generate_gcode_with_progress(|_| {
        calls += 1;
        if calls == 2 {
            cancel.cancel();
        }
    });
    assert!(matches!(result, Err(ReliefError::Cancelled)));
    assert!(calls >= 2);
}

#[test]
fn test_fresh_tokens_do_not_interfere() {
    let generator = gradient_job(8).with_cancel_token(CancelToken::new());
    assert!(generator.generate_gcode().is_ok());
}
