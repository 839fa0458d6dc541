use crate::DetectorError;
use ndarray::{ArrayView2, ArrayViewD, Axis, Ix2};

/// A scored box in model input space, before suppression.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub class_id: usize,
    pub score: f32,
    /// `[x1, y1, x2, y2]`
    pub bbox: [f32; 4],
}

impl Candidate {
    fn area(&self) -> f32 {
        let [x1, y1, x2, y2] = self.bbox;
        (x2 - x1).max(0.0) * (y2 - y1).max(0.0)
    }

    #[must_use]
    pub fn iou(&self, other: &Self) -> f32 {
        let x1 = self.bbox[0].max(other.bbox[0]);
        let y1 = self.bbox[1].max(other.bbox[1]);
        let x2 = self.bbox[2].min(other.bbox[2]);
        let y2 = self.bbox[3].min(other.bbox[3]);
        let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}

/// Decode a YOLO head of shape `[1, 4 + classes, anchors]` (or `[1, anchors, 4 + classes]`).
///
/// The head is read as `[1, 4 + classes, anchors]` unless `num_classes` is known and only
/// the last axis matches `4 + num_classes`. Each anchor keeps its best class, anchors at
/// or below `confidence_threshold` are dropped.
pub fn decode_predictions(
    output: &ArrayViewD<'_, f32>,
    num_classes: Option<usize>,
    confidence_threshold: f32,
) -> Result<Vec<Candidate>, DetectorError> {
    let unexpected = || DetectorError::UnexpectedOutput(output.shape().to_vec());

    let view = match output.ndim() {
        3 if output.shape()[0] == 1 => output.index_axis(Axis(0), 0),
        2 => output.view(),
        _ => return Err(unexpected()),
    };
    let view: ArrayView2<'_, f32> = view.into_dimensionality::<Ix2>().map_err(|_| unexpected())?;

    let transposed = num_classes
        .map(|classes| classes + 4)
        .is_some_and(|attributes| view.ncols() == attributes && view.nrows() != attributes);
    let predictions = if transposed {
        view.reversed_axes()
    } else {
        view
    };
    if predictions.nrows() <= 4 {
        return Err(unexpected());
    }

    let mut candidates = Vec::new();
    for anchor in predictions.axis_iter(Axis(1)) {
        let Some((class_id, score)) = anchor
            .iter()
            .skip(4)
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
        else {
            continue;
        };
        if score <= confidence_threshold {
            continue;
        }

        let (cx, cy, w, h) = (anchor[0], anchor[1], anchor[2], anchor[3]);
        candidates.push(Candidate {
            class_id,
            score,
            bbox: [cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0],
        });
    }

    Ok(candidates)
}

/// Per-class greedy non-maximum suppression. Output is sorted by descending score.
#[must_use]
pub fn non_max_suppression(
    mut candidates: Vec<Candidate>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        if kept.len() >= max_detections {
            break;
        }
        let suppressed = kept.iter().any(|k| {
            k.class_id == candidate.class_id && k.iou(&candidate) > iou_threshold
        });
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}
