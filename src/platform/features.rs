//! Classifier input layout

use super::{BoundingBox, Handedness, Landmark};

/// Handedness flag followed by each joint's (x, y) offset from the wrist,
/// divided by the bounding box size.
///
/// Returns just the flag when there are no landmarks or the box is degenerate.
pub fn landmark_features(
    landmarks: &[Landmark],
    handedness: Handedness,
    bbox: &BoundingBox,
) -> Vec<f32> {
    let mut features = Vec::with_capacity(1 + landmarks.len() * 2);
    features.push(handedness.as_feature());

    let Some(wrist) = landmarks.first() else {
        return features;
    };
    if bbox.width <= 0.0 || bbox.height <= 0.0 {
        log::debug!("degenerate hand bbox {:?}", bbox);
        return features;
    }

    for joint in landmarks {
        features.push((joint.x - wrist.x) / bbox.width);
        features.push((joint.y - wrist.y) / bbox.height);
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(width: f32, height: f32) -> BoundingBox {
        BoundingBox { x: 0.0, y: 0.0, width, height }
    }

    #[test]
    fn test_wrist_relative_and_scaled() {
        let landmarks = [
            Landmark::new(0, 100.0, 200.0),
            Landmark::new(1, 150.0, 100.0),
            Landmark::new(2, 50.0, 250.0),
        ];
        let features = landmark_features(&landmarks, Handedness::Right, &bbox(100.0, 50.0));
        assert_eq!(features, vec![1.0, 0.0, 0.0, 0.5, -2.0, -0.5, 1.0]);
    }

    #[test]
    fn test_left_hand_flag_and_empty_input() {
        assert_eq!(landmark_features(&[], Handedness::Left, &bbox(10.0, 10.0)), vec![0.0]);
        let one = [Landmark::new(0, 5.0, 5.0)];
        assert_eq!(landmark_features(&one, Handedness::Left, &bbox(0.0, 10.0)), vec![0.0]);
    }
}
