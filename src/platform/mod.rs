//! Platform collaborators
//!
//! Camera capture, hand-landmark detection and the gesture model live outside
//! this crate. They are reached through the narrow traits here:
//! - `FrameSource`: one camera frame per call
//! - `HandLandmarkProvider`: landmarks, bounding box and handedness
//! - `GestureClassifier`: landmark features to a gesture id
//!
//! `PipelineSource` chains the three into a `GestureSource`, the only thing the
//! session loop consumes.

mod bounded;
mod features;
mod replay;

pub use bounded::BoundedSource;
pub use features::landmark_features;
pub use replay::ReplaySource;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArcadeError, Result};
use crate::gesture::GestureSample;

/// Raw camera frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Packed pixel data, layout owned by the camera backend
    pub data: Vec<u8>,
}

/// One hand joint in frame pixel coordinates. Index 0 is the wrist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Encoding the classifier was trained with
    pub fn as_feature(&self) -> f32 {
        match self {
            Handedness::Left => 0.0,
            Handedness::Right => 1.0,
        }
    }
}

/// Hand bounding box in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Camera or video input
pub trait FrameSource {
    /// `None` when no frame could be read this time
    fn read_frame(&mut self) -> Option<Frame>;
}

/// Hand tracker. `find_hands` runs detection on a frame; the other two report
/// on the most recent detection.
pub trait HandLandmarkProvider {
    /// Landmarks of the first detected hand, empty when no hand was found
    fn find_hands(&mut self, frame: &Frame) -> Vec<Landmark>;
    fn get_bbox_location(&self) -> Option<BoundingBox>;
    fn get_handedness(&self) -> Option<Handedness>;
}

/// Gesture model, constructed once per process
pub trait GestureClassifier {
    fn classify(
        &self,
        landmarks: &[Landmark],
        handedness: Handedness,
        bbox: &BoundingBox,
    ) -> Option<u8>;
}

/// Load the gesture model at `path` with the backend's own `loader`.
///
/// A missing file or a loader failure is fatal for the session.
pub fn load_classifier<C, L>(path: &Path, loader: L) -> Result<C>
where
    C: GestureClassifier,
    L: FnOnce(&Path) -> std::result::Result<C, String>,
{
    let model_err = |reason: String| ArcadeError::ModelLoad {
        path: path.to_path_buf(),
        reason,
    };
    if !path.is_file() {
        return Err(model_err("model file not found".to_string()));
    }
    let classifier = loader(path).map_err(model_err)?;
    log::info!("gesture model loaded from {}", path.display());
    Ok(classifier)
}

/// Per-frame gesture stream consumed by the session loop
pub trait GestureSource {
    /// `None` when no frame was acquired this tick
    fn next_sample(&mut self) -> Option<GestureSample>;

    /// True once the source will never produce another frame
    fn is_finished(&self) -> bool {
        false
    }
}

impl<S: GestureSource + ?Sized> GestureSource for Box<S> {
    fn next_sample(&mut self) -> Option<GestureSample> {
        (**self).next_sample()
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
}

/// Camera → landmarks → classifier
pub struct PipelineSource<F, H, C> {
    frames: F,
    hands: H,
    classifier: C,
}

impl<F, H, C> PipelineSource<F, H, C>
where
    F: FrameSource,
    H: HandLandmarkProvider,
    C: GestureClassifier,
{
    pub fn new(frames: F, hands: H, classifier: C) -> Self {
        Self {
            frames,
            hands,
            classifier,
        }
    }

    /// Like `new`, but first checks that the camera delivers a frame
    pub fn open(mut frames: F, hands: H, classifier: C) -> Result<Self> {
        let Some(frame) = frames.read_frame() else {
            return Err(ArcadeError::Camera(
                "no frame received at session start".to_string(),
            ));
        };
        log::info!("camera open: {}x{}", frame.width, frame.height);
        Ok(Self::new(frames, hands, classifier))
    }
}

impl<F, H, C> GestureSource for PipelineSource<F, H, C>
where
    F: FrameSource,
    H: HandLandmarkProvider,
    C: GestureClassifier,
{
    fn next_sample(&mut self) -> Option<GestureSample> {
        let frame = self.frames.read_frame()?;
        let landmarks = self.hands.find_hands(&frame);
        if landmarks.is_empty() {
            return Some(GestureSample::no_hand());
        }

        let bbox = self.hands.get_bbox_location();
        let handedness = self.hands.get_handedness();
        let (Some(bbox), Some(handedness)) = (bbox, handedness) else {
            log::debug!("hand found without bbox/handedness, treating as no hand");
            return Some(GestureSample::no_hand());
        };

        Some(GestureSample {
            gesture_id: self.classifier.classify(&landmarks, handedness, &bbox),
        })
    }
}
