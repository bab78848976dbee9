use serde::{Deserialize, Serialize};

use crate::timers::Millis;

/// Which tracked hand a landmark list belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    pub fn opposite(self) -> Self {
        match self {
            HandSide::Left => HandSide::Right,
            HandSide::Right => HandSide::Left,
        }
    }
}

/// A single keypoint in normalized image coordinates.
///
/// `x` and `y` are nominally in `[0, 1]` but values outside that range are
/// accepted as-is; the perception model happily reports joints just off frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: None,
        }
    }
}

/// Everything the perception pipeline reported for one video frame.
///
/// A missing list means nothing was detected for that part this frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkFrame {
    /// Optional capture time, relative to the start of a recording
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<Millis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<Vec<Landmark>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_hand: Option<Vec<Landmark>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_hand: Option<Vec<Landmark>>,
}

impl LandmarkFrame {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_hand(mut self, side: HandSide, landmarks: Vec<Landmark>) -> Self {
        match side {
            HandSide::Left => self.left_hand = Some(landmarks),
            HandSide::Right => self.right_hand = Some(landmarks),
        }
        self
    }

    pub fn hand(&self, side: HandSide) -> Option<&[Landmark]> {
        match side {
            HandSide::Left => self.left_hand.as_deref(),
            HandSide::Right => self.right_hand.as_deref(),
        }
    }
}
