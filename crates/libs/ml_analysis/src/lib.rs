#![deny(clippy::unwrap_used)]
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

mod decision;
mod letterbox;
mod object_detection;
mod postprocess;
mod spatial;
mod structs;

pub use decision::decide_movement;
pub use letterbox::{Letterbox, letterbox_tensor};
pub use object_detection::{Detector, DetectorError, YoloDetector};
pub use postprocess::{Candidate, decode_predictions, non_max_suppression};
pub use spatial::{classify_box, classify_boxes};
pub use structs::*;
