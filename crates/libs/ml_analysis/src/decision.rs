use crate::{ClassifiedObject, Decision, HorizontalBucket};

/// Pick a movement for the satellite from the objects in view.
///
/// The first object in the left or right column decides: debris on the left means move
/// right, debris on the right means move left. Only when no object sits in a side column
/// does an object in the exact center cell trigger a slight move right.
///
/// The result depends on the order of `objects`. It is reproducible only if the detector
/// emits boxes in a reproducible order, so callers must not reorder the list.
#[must_use]
pub fn decide_movement(objects: &[ClassifiedObject]) -> Decision {
    if objects.is_empty() {
        return Decision::NoObjects;
    }

    for object in objects {
        match object.position.horizontal {
            HorizontalBucket::Left => return Decision::MoveRight,
            HorizontalBucket::Right => return Decision::MoveLeft,
            HorizontalBucket::Center => {}
        }
    }

    if objects.iter().any(|object| object.position.is_center()) {
        return Decision::MoveSlightlyRight;
    }

    Decision::Stay
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;
    use rstest::rstest;

    fn objects(labels: &[&str]) -> Vec<ClassifiedObject> {
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| ClassifiedObject {
                class_id: i,
                class_name: "debris".to_owned(),
                width: 1.0,
                height: 1.0,
                center_x: 0.0,
                center_y: 0.0,
                position: label.parse::<Position>().expect("valid test label"),
            })
            .collect()
    }

    #[rstest]
    #[case(&[], Decision::NoObjects)]
    #[case(&["top-right", "bottom-left"], Decision::MoveLeft)]
    #[case(&["bottom-left", "top-right"], Decision::MoveRight)]
    #[case(&["center", "middle-left"], Decision::MoveRight)]
    #[case(&["top-center", "center", "bottom-right"], Decision::MoveLeft)]
    #[case(&["middle-right"], Decision::MoveLeft)]
    #[case(&["top-left"], Decision::MoveRight)]
    #[case(&["center", "center"], Decision::MoveSlightlyRight)]
    #[case(&["top-center", "center"], Decision::MoveSlightlyRight)]
    #[case(&["top-center"], Decision::Stay)]
    #[case(&["top-center", "bottom-center"], Decision::Stay)]
    fn first_match_wins(#[case] labels: &[&str], #[case] expected: Decision) {
        assert_eq!(decide_movement(&objects(labels)), expected);
    }

    #[test]
    fn decision_strings() {
        assert_eq!(
            decide_movement(&[]).to_string(),
            "No objects detected, stay in position"
        );
        assert_eq!(
            decide_movement(&objects(&["bottom-left"])).as_str(),
            "Move satellite right"
        );
        assert_eq!(
            decide_movement(&objects(&["bottom-center"])).as_str(),
            "Stay in position"
        );
    }
}
