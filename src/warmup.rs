use crate::geometry::{collides, Circle, HandPoints};
use crate::landmark::HandSide;

/// Free-play pad: no timers, no score, circles light up under a hand
#[derive(Debug, Clone)]
pub struct WarmupPad {
    pads: Vec<(Circle, Option<HandSide>)>,
}

impl Default for WarmupPad {
    fn default() -> Self {
        Self::new(&[
            Circle::new(100.0, 450.0, 50.0),
            Circle::new(300.0, 500.0, 50.0),
            Circle::new(500.0, 500.0, 50.0),
            Circle::new(700.0, 450.0, 50.0),
        ])
    }
}

impl WarmupPad {
    pub fn new(layout: &[Circle]) -> Self {
        Self {
            pads: layout.iter().map(|c| (*c, None)).collect(),
        }
    }

    /// Recolor every pad from this frame's hands; the left hand wins overlaps
    pub fn update(&mut self, hands: &HandPoints) {
        for (circle, touched) in &mut self.pads {
            *touched = if collides(&hands.left, circle) {
                Some(HandSide::Left)
            } else if collides(&hands.right, circle) {
                Some(HandSide::Right)
            } else {
                None
            };
        }
    }

    pub fn pads(&self) -> &[(Circle, Option<HandSide>)] {
        &self.pads
    }
}
