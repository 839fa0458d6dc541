use crate::api::detect::error::DetectError;
use crate::api::detect::interfaces::DetectionResponse;
use axum::body::Bytes;
use axum::extract::Multipart;
use image::DynamicImage;
use ml_analysis::{Detector, ImageDimensions, RawBox, classify_boxes, decide_movement};
use std::sync::Arc;
use tracing::{debug, info};

/// Reads the first uploaded file from a multipart body.
///
/// Form fields without a file name are skipped. The file must declare an `image/*`
/// content type and be at most `max_upload_bytes` long.
///
/// # Errors
///
/// Returns a client error (`400`) for malformed bodies, missing files, non-image content
/// types, and oversized files.
pub async fn read_image_upload(
    multipart: &mut Multipart,
    max_upload_bytes: usize,
) -> Result<Bytes, DetectError> {
    while let Some(field) = multipart.next_field().await? {
        if field.file_name().is_none() {
            debug!("Skipping non-file form field {:?}", field.name());
            continue;
        }
        check_content_type(field.content_type())?;
        let bytes = field.bytes().await?;
        check_size(bytes.len(), max_upload_bytes)?;
        return Ok(bytes);
    }
    Err(DetectError::MissingFile)
}

pub fn check_content_type(content_type: Option<&str>) -> Result<(), DetectError> {
    match content_type {
        Some(content_type) if content_type.starts_with("image/") => Ok(()),
        _ => Err(DetectError::NotAnImage),
    }
}

pub fn check_size(size: usize, max_upload_bytes: usize) -> Result<(), DetectError> {
    if size > max_upload_bytes {
        return Err(DetectError::PayloadTooLarge {
            limit: max_upload_bytes,
        });
    }
    Ok(())
}

/// Decode an uploaded file into pixels.
pub fn decode_image(bytes: &[u8]) -> Result<(DynamicImage, ImageDimensions), DetectError> {
    let image = image::load_from_memory(bytes)?;
    let dimensions =
        ImageDimensions::new(image.width(), image.height()).ok_or(DetectError::EmptyImage)?;
    Ok((image, dimensions))
}

/// Classify raw detections and decide how the satellite should move.
#[must_use]
pub fn assemble_response(boxes: &[RawBox], dimensions: ImageDimensions) -> DetectionResponse {
    let objects = classify_boxes(boxes, dimensions);
    let decision = decide_movement(&objects);
    DetectionResponse { objects, decision }
}

/// Decode, detect, classify and decide for one uploaded image.
pub fn detect_objects(
    detector: &dyn Detector,
    bytes: &[u8],
) -> Result<DetectionResponse, DetectError> {
    let (image, dimensions) = decode_image(bytes)?;
    debug!(
        "Decoded {}x{} image",
        dimensions.width(),
        dimensions.height()
    );
    let boxes = detector.detect(&image)?;
    Ok(assemble_response(&boxes, dimensions))
}

/// Runs [`detect_objects`] on the blocking pool, inference is CPU bound.
pub async fn run_detection(
    detector: Arc<dyn Detector>,
    bytes: Bytes,
) -> Result<DetectionResponse, DetectError> {
    let response =
        tokio::task::spawn_blocking(move || detect_objects(detector.as_ref(), &bytes)).await??;
    info!(
        "Detected {} objects, decision: {}",
        response.objects.len(),
        response.decision
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use ml_analysis::{Decision, DetectorError};
    use std::io::Cursor;

    struct FixedDetector(Vec<RawBox>);

    impl Detector for FixedDetector {
        fn detect(&self, _image: &DynamicImage) -> Result<Vec<RawBox>, DetectorError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenDetector;

    impl Detector for BrokenDetector {
        fn detect(&self, _image: &DynamicImage) -> Result<Vec<RawBox>, DetectorError> {
            Err(DetectorError::Inference("boom".to_owned()))
        }
    }

    fn png(width: u32, height: u32) -> color_eyre::Result<Vec<u8>> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        Ok(buf)
    }

    fn raw(x1: f64, y1: f64, x2: f64, y2: f64) -> RawBox {
        RawBox {
            class_id: 0,
            class_name: "debris".to_owned(),
            confidence: 0.8,
            x1,
            y1,
            x2,
            y2,
        }
    }

    #[test]
    fn content_type_must_be_image() {
        assert!(check_content_type(Some("image/png")).is_ok());
        assert!(check_content_type(Some("image/jpeg")).is_ok());
        assert!(matches!(
            check_content_type(Some("text/plain")),
            Err(DetectError::NotAnImage)
        ));
        assert!(matches!(check_content_type(None), Err(DetectError::NotAnImage)));
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(check_size(100, 100).is_ok());
        assert!(matches!(
            check_size(101, 100),
            Err(DetectError::PayloadTooLarge { limit: 100 })
        ));
    }

    #[test]
    fn garbage_does_not_decode() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(DetectError::Decode(_))
        ));
    }

    #[test]
    fn detects_and_decides() -> color_eyre::Result<()> {
        let detector = FixedDetector(vec![
            raw(250.0, 10.0, 290.0, 30.0),
            raw(10.0, 250.0, 30.0, 290.0),
        ]);
        let response = detect_objects(&detector, &png(300, 300)?)?;

        let positions: Vec<String> = response
            .objects
            .iter()
            .map(|o| o.position.to_string())
            .collect();
        assert_eq!(positions, ["top-right", "bottom-left"]);
        assert_eq!(response.decision, Decision::MoveLeft);
        assert_eq!(response.objects[0].width, 40.0);
        Ok(())
    }

    #[test]
    fn empty_detection_stays() -> color_eyre::Result<()> {
        let response = detect_objects(&FixedDetector(vec![]), &png(64, 48)?)?;
        assert!(response.objects.is_empty());
        assert_eq!(response.decision, Decision::NoObjects);
        Ok(())
    }

    #[test]
    fn detector_failure_is_reported() -> color_eyre::Result<()> {
        let result = detect_objects(&BrokenDetector, &png(10, 10)?);
        assert!(matches!(result, Err(DetectError::Detector(_))));
        Ok(())
    }

    #[tokio::test]
    async fn runs_on_blocking_pool() -> color_eyre::Result<()> {
        let detector: Arc<dyn Detector> = Arc::new(FixedDetector(vec![raw(
            140.0, 140.0, 160.0, 160.0,
        )]));
        let response = run_detection(detector, Bytes::from(png(300, 300)?)).await?;
        assert_eq!(response.decision, Decision::MoveSlightlyRight);

        let json = serde_json::to_value(&response)?;
        assert_eq!(json["decision"], "Move satellite slightly right");
        assert_eq!(json["objects"][0]["position"], "center");
        assert_eq!(json["objects"][0]["center_x"], 150.0);
        Ok(())
    }
}
