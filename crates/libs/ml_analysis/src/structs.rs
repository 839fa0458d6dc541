use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// One detector output in original image pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBox {
    pub class_id: usize,
    pub class_name: String,
    pub confidence: f32,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Pixel size of a decoded image. Both sides are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    width: NonZeroU32,
    height: NonZeroU32,
}

impl ImageDimensions {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            width: NonZeroU32::new(width)?,
            height: NonZeroU32::new(height)?,
        })
    }

    #[must_use]
    pub const fn width(self) -> u32 {
        self.width.get()
    }

    #[must_use]
    pub const fn height(self) -> u32 {
        self.height.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalBucket {
    Left,
    Center,
    Right,
}

impl HorizontalBucket {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalBucket {
    Top,
    Middle,
    Bottom,
}

impl VerticalBucket {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

/// Cell of the 3x3 grid an object's center falls in.
///
/// Serialized as its label: `"center"` for the middle cell, `"{vertical}-{horizontal}"`
/// for every other cell (`"top-left"`, `"middle-right"`, `"bottom-center"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Position {
    pub vertical: VerticalBucket,
    pub horizontal: HorizontalBucket,
}

impl Position {
    pub const CENTER: Self = Self::new(VerticalBucket::Middle, HorizontalBucket::Center);

    #[must_use]
    pub const fn new(vertical: VerticalBucket, horizontal: HorizontalBucket) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    #[must_use]
    pub fn is_center(self) -> bool {
        self == Self::CENTER
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_center() {
            f.write_str("center")
        } else {
            write!(f, "{}-{}", self.vertical.as_str(), self.horizontal.as_str())
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid position label: {0:?}")]
pub struct ParsePositionError(String);

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "center" {
            return Ok(Self::CENTER);
        }
        let err = || ParsePositionError(s.to_owned());
        let (vertical, horizontal) = s.split_once('-').ok_or_else(err)?;
        let vertical = match vertical {
            "top" => VerticalBucket::Top,
            "middle" => VerticalBucket::Middle,
            "bottom" => VerticalBucket::Bottom,
            _ => return Err(err()),
        };
        let horizontal = match horizontal {
            "left" => HorizontalBucket::Left,
            "center" => HorizontalBucket::Center,
            "right" => HorizontalBucket::Right,
            _ => return Err(err()),
        };
        let position = Self::new(vertical, horizontal);
        // "middle-center" is always spelled "center".
        if position.is_center() {
            return Err(err());
        }
        Ok(position)
    }
}

impl From<Position> for String {
    fn from(position: Position) -> Self {
        position.to_string()
    }
}

impl TryFrom<String> for Position {
    type Error = ParsePositionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A detection enriched with its geometry and grid position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClassifiedObject {
    pub class_id: usize,
    pub class_name: String,
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub center_y: f64,
    #[schema(value_type = String, example = "top-left")]
    pub position: Position,
}

/// Movement recommendation for the satellite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Decision {
    NoObjects,
    MoveRight,
    MoveLeft,
    MoveSlightlyRight,
    Stay,
}

impl Decision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoObjects => "No objects detected, stay in position",
            Self::MoveRight => "Move satellite right",
            Self::MoveLeft => "Move satellite left",
            Self::MoveSlightlyRight => "Move satellite slightly right",
            Self::Stay => "Stay in position",
        }
    }
}

impl From<Decision> for String {
    fn from(decision: Decision) -> Self {
        decision.as_str().to_owned()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("center", Position::CENTER)]
    #[case("top-left", Position::new(VerticalBucket::Top, HorizontalBucket::Left))]
    #[case("top-center", Position::new(VerticalBucket::Top, HorizontalBucket::Center))]
    #[case("middle-left", Position::new(VerticalBucket::Middle, HorizontalBucket::Left))]
    #[case("middle-right", Position::new(VerticalBucket::Middle, HorizontalBucket::Right))]
    #[case("bottom-right", Position::new(VerticalBucket::Bottom, HorizontalBucket::Right))]
    fn label_parses_and_prints(#[case] label: &str, #[case] position: Position) {
        assert_eq!(label.parse::<Position>(), Ok(position));
        assert_eq!(position.to_string(), label);
    }

    #[rstest]
    #[case("middle-center")]
    #[case("left")]
    #[case("top-")]
    #[case("upper-left")]
    #[case("")]
    fn bad_labels_are_rejected(#[case] label: &str) {
        assert!(label.parse::<Position>().is_err());
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(ImageDimensions::new(0, 10).is_none());
        assert!(ImageDimensions::new(10, 0).is_none());
        let dims = ImageDimensions::new(640, 480).expect("non-zero");
        assert_eq!((dims.width(), dims.height()), (640, 480));
    }

    #[test]
    fn serializes_labels_as_strings() -> color_eyre::Result<()> {
        let object = ClassifiedObject {
            class_id: 0,
            class_name: "debris".to_owned(),
            width: 10.0,
            height: 20.0,
            center_x: 5.0,
            center_y: 10.0,
            position: Position::new(VerticalBucket::Top, HorizontalBucket::Left),
        };
        let value = serde_json::to_value(&object)?;
        assert_eq!(value["position"], "top-left");
        assert_eq!(value["class_name"], "debris");
        assert_eq!(value["width"], 10.0);
        assert_eq!(
            serde_json::to_value(Decision::MoveSlightlyRight)?,
            "Move satellite slightly right"
        );

        let back: ClassifiedObject = serde_json::from_value(value)?;
        assert_eq!(back, object);
        Ok(())
    }
}
