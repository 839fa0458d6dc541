use app_state::load_app_settings;
use color_eyre::eyre::eyre;
use ml_analysis::{Detector, ImageDimensions, YoloDetector, classify_boxes, decide_movement};
use std::path::PathBuf;
use std::time::Instant;

// Run from the workspace root: cargo run -p ml_analysis --example run_detection -- frame.jpg
fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let image_path: PathBuf = std::env::args()
        .nth(1)
        .ok_or_else(|| eyre!("usage: run_detection <image>"))?
        .into();

    let settings = load_app_settings()?;
    let detector = YoloDetector::new(&settings.model.path, settings.model.detector)?;

    let image = image::open(&image_path)?;
    let dimensions = ImageDimensions::new(image.width(), image.height())
        .ok_or_else(|| eyre!("{} has no pixels", image_path.display()))?;

    let now = Instant::now();
    let boxes = detector.detect(&image)?;
    println!("Detection took {:?}", now.elapsed());

    let objects = classify_boxes(&boxes, dimensions);
    for (raw, object) in boxes.iter().zip(&objects) {
        println!(
            "{:<12} {:>5.1}% {:>12} ({:.0}x{:.0} at {:.0},{:.0})",
            object.class_name,
            raw.confidence * 100.0,
            object.position.to_string(),
            object.width,
            object.height,
            object.center_x,
            object.center_y,
        );
    }
    println!("Decision: {}", decide_movement(&objects));

    Ok(())
}
