//! Error handling integration tests.
//!
//! These verify that failures surface as the right [`ConvertError`] variant
//! with a readable message, and that a failed run never writes output.

use std::fs;

use lottie2webp::{
    ConvertError, ConvertOptions, Converter, LottieAnimation, MAX_RENDER_SIZE, WebpOptions,
};

#[test]
fn missing_input_leaves_no_output() {
    let directory = tempfile::tempdir().unwrap();
    let output = directory.path().join("out.webp");

    let result = Converter::default().convert_file("this_file_does_not_exist.tgs", &output);

    let error = result.unwrap_err();
    assert!(matches!(error, ConvertError::Load { .. }), "got: {error:?}");
    let message = error.to_string();
    assert!(
        message.contains("Failed to load animation"),
        "Error message should mention the load failure: {message}",
    );
    assert!(!output.exists());
    assert_eq!(fs::read_dir(directory.path()).unwrap().count(), 0);
}

#[test]
fn invalid_json_is_a_load_error() {
    let directory = tempfile::tempdir().unwrap();
    let input = directory.path().join("invalid.json");
    fs::write(&input, b"this is not a lottie animation").unwrap();

    let error = LottieAnimation::open(&input, (64, 64)).unwrap_err();
    assert!(error.is_load_error(), "got: {error:?}");
}

#[test]
fn failed_run_keeps_existing_output() {
    let directory = tempfile::tempdir().unwrap();
    let input = directory.path().join("broken.tgs");
    let output = directory.path().join("out.webp");
    fs::write(&input, b"not gzip").unwrap();
    fs::write(&output, b"previous").unwrap();

    let result = Converter::default().convert_file(&input, &output);

    assert!(matches!(result, Err(ConvertError::Decompress { .. })));
    assert_eq!(fs::read(&output).unwrap(), b"previous");
}

#[test]
fn invalid_options_fail_before_loading() {
    let directory = tempfile::tempdir().unwrap();
    let output = directory.path().join("out.webp");
    let options = ConvertOptions::new().with_webp(WebpOptions::default().quality(250.0));

    // The input does not exist either; configuration is checked first.
    let result = Converter::new(options).convert_file("missing.json", &output);

    let error = result.unwrap_err();
    assert!(matches!(error, ConvertError::Configuration(_)), "got: {error:?}");
    assert!(error.to_string().contains("quality"));
    assert!(!output.exists());
}

#[test]
fn zero_render_size_is_rejected() {
    let directory = tempfile::tempdir().unwrap();
    let input = directory.path().join("animation.json");
    fs::write(&input, b"{}").unwrap();

    let result = LottieAnimation::open(&input, (0, 64));
    assert!(matches!(result, Err(ConvertError::Configuration(_))));
}

#[test]
fn oversized_render_size_is_rejected() {
    let directory = tempfile::tempdir().unwrap();
    let input = directory.path().join("animation.json");
    fs::write(&input, b"{}").unwrap();

    let result = LottieAnimation::open(&input, (MAX_RENDER_SIZE + 1, 64));
    assert!(matches!(result, Err(ConvertError::Configuration(_))));

    let result = LottieAnimation::open(&input, (u32::MAX, u32::MAX));
    assert!(matches!(result, Err(ConvertError::Configuration(_))));
}

#[test]
fn oversized_render_size_fails_before_loading() {
    let directory = tempfile::tempdir().unwrap();
    let output = directory.path().join("out.webp");
    let options = ConvertOptions::new().with_size(100_000, 100_000);

    let error = Converter::new(options)
        .convert_file("missing.json", &output)
        .unwrap_err();

    assert!(matches!(error, ConvertError::Configuration(_)), "got: {error:?}");
    assert!(error.to_string().contains("16383"));
    assert!(!output.exists());
}

#[test]
fn dimension_mismatch_message_names_both_sizes() {
    let error = ConvertError::DimensionMismatch {
        frame: 12,
        expected: (512, 512),
        actual: (256, 512),
    };
    let message = error.to_string();
    assert!(message.contains("Frame 12"), "{message}");
    assert!(message.contains("256x512"), "{message}");
    assert!(message.contains("expected 512x512"), "{message}");
    assert!(!error.is_load_error());
}

#[test]
fn io_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: ConvertError = io.into();
    assert!(matches!(error, ConvertError::Io(_)));
    assert!(error.to_string().starts_with("I/O error"));
}
