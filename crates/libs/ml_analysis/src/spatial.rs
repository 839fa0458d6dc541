use crate::{
    ClassifiedObject, HorizontalBucket, ImageDimensions, Position, RawBox, VerticalBucket,
};

impl HorizontalBucket {
    /// Thirds of the image width; both boundaries belong to the center column.
    #[must_use]
    pub fn from_center(center_x: f64, image_width: f64) -> Self {
        if center_x < image_width / 3.0 {
            Self::Left
        } else if center_x > 2.0 * image_width / 3.0 {
            Self::Right
        } else {
            Self::Center
        }
    }
}

impl VerticalBucket {
    /// Thirds of the image height; both boundaries belong to the middle row.
    #[must_use]
    pub fn from_center(center_y: f64, image_height: f64) -> Self {
        if center_y < image_height / 3.0 {
            Self::Top
        } else if center_y > 2.0 * image_height / 3.0 {
            Self::Bottom
        } else {
            Self::Middle
        }
    }
}

/// Derive geometry and grid position for one box.
///
/// Coordinates are used as given, boxes reaching past the image edge are not clamped.
#[must_use]
pub fn classify_box(raw: &RawBox, dims: ImageDimensions) -> ClassifiedObject {
    let center_x = (raw.x1 + raw.x2) / 2.0;
    let center_y = (raw.y1 + raw.y2) / 2.0;
    let position = Position::new(
        VerticalBucket::from_center(center_y, f64::from(dims.height())),
        HorizontalBucket::from_center(center_x, f64::from(dims.width())),
    );

    ClassifiedObject {
        class_id: raw.class_id,
        class_name: raw.class_name.clone(),
        width: raw.x2 - raw.x1,
        height: raw.y2 - raw.y1,
        center_x,
        center_y,
        position,
    }
}

/// Classify every box, keeping the detector's order.
#[must_use]
pub fn classify_boxes(boxes: &[RawBox], dims: ImageDimensions) -> Vec<ClassifiedObject> {
    boxes.iter().map(|raw| classify_box(raw, dims)).collect()
}
