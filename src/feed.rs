//! Landmark frame sources standing in for the perception pipeline.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::landmark::{HandSide, Landmark, LandmarkFrame};
use crate::timers::Millis;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read landmark recording {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("landmark recording {0} contains no frames")]
    Empty(PathBuf),
}

/// Supplies at most one frame per render tick
pub trait FrameSource {
    fn next_frame(&mut self, now: Millis) -> Option<LandmarkFrame>;

    /// Called when a session (re)starts
    fn restart(&mut self) {}
}

/// Plays back a JSON-lines recording, one `LandmarkFrame` per line.
///
/// Frames carrying `t` are released once that many milliseconds have passed
/// since the first request after a restart; frames without `t` go out one per
/// call. When several timed frames are due at once only the newest is kept.
#[derive(Debug, Clone)]
pub struct ReplayFeed {
    frames: Vec<LandmarkFrame>,
    cursor: usize,
    origin: Option<Millis>,
}

impl ReplayFeed {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FeedError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let frames = parse_lines(BufReader::new(file)).map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if frames.is_empty() {
            return Err(FeedError::Empty(path.to_path_buf()));
        }
        info!(path = %path.display(), frames = frames.len(), "loaded landmark recording");
        Ok(Self::from_frames(frames))
    }

    pub fn from_frames(frames: Vec<LandmarkFrame>) -> Self {
        Self {
            frames,
            cursor: 0,
            origin: None,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.frames.len()
    }
}

fn parse_lines<R: BufRead>(reader: R) -> io::Result<Vec<LandmarkFrame>> {
    let mut frames = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<LandmarkFrame>(line) {
            Ok(frame) => frames.push(frame),
            Err(e) => debug!(line = idx + 1, error = %e, "skipping malformed landmark line"),
        }
    }
    Ok(frames)
}

impl FrameSource for ReplayFeed {
    fn next_frame(&mut self, now: Millis) -> Option<LandmarkFrame> {
        let origin = *self.origin.get_or_insert(now);
        let elapsed = now.saturating_sub(origin);

        let mut released = None;
        while let Some(frame) = self.frames.get(self.cursor) {
            match frame.t {
                Some(t) if t > elapsed => break,
                Some(_) => {
                    released = Some(frame.clone());
                    self.cursor += 1;
                }
                None => {
                    if released.is_none() {
                        released = Some(frame.clone());
                        self.cursor += 1;
                    }
                    break;
                }
            }
        }
        released
    }

    fn restart(&mut self) {
        self.cursor = 0;
        self.origin = None;
    }
}

/// Turns pointer positions into single-landmark hands.
///
/// Each held mouse button stands for one hand: left button for the left hand,
/// right button for the right hand. Coordinates are normalized.
#[derive(Debug, Clone, Default)]
pub struct PointerFeed {
    left: Option<Landmark>,
    right: Option<Landmark>,
}

impl PointerFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, side: HandSide, x: f64, y: f64) {
        let landmark = Some(Landmark::new(x, y));
        match side {
            HandSide::Left => self.left = landmark,
            HandSide::Right => self.right = landmark,
        }
    }

    pub fn release(&mut self, side: HandSide) {
        match side {
            HandSide::Left => self.left = None,
            HandSide::Right => self.right = None,
        }
    }
}

impl FrameSource for PointerFeed {
    fn next_frame(&mut self, _now: Millis) -> Option<LandmarkFrame> {
        let mut frame = LandmarkFrame::empty();
        if let Some(l) = self.left {
            frame = frame.with_hand(HandSide::Left, vec![l]);
        }
        if let Some(r) = self.right {
            frame = frame.with_hand(HandSide::Right, vec![r]);
        }
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn timed(t: Millis, x: f64) -> LandmarkFrame {
        LandmarkFrame {
            t: Some(t),
            ..LandmarkFrame::empty().with_hand(HandSide::Left, vec![Landmark::new(x, 0.5)])
        }
    }

    #[test]
    fn parse_skips_blank_and_malformed_lines() {
        let input = "{\"leftHand\":[{\"x\":0.1,\"y\":0.2}]}\n\nnot json\n{\"t\":5}\n";
        let frames = parse_lines(Cursor::new(input)).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].t, Some(5));
    }

    #[test]
    fn untimed_frames_go_out_one_per_call() {
        let mut feed = ReplayFeed::from_frames(vec![LandmarkFrame::empty(); 2]);
        assert!(feed.next_frame(0).is_some());
        assert!(feed.next_frame(0).is_some());
        assert!(feed.next_frame(0).is_none());
        assert!(feed.is_finished());
    }

    #[test]
    fn timed_frames_wait_for_the_clock() {
        let mut feed = ReplayFeed::from_frames(vec![timed(0, 0.1), timed(100, 0.2), timed(150, 0.3)]);

        // origin pinned at 1_000
        assert_eq!(feed.next_frame(1_000), Some(timed(0, 0.1)));
        assert_eq!(feed.next_frame(1_050), None);
        // both remaining frames due; newest wins
        assert_eq!(feed.next_frame(1_200), Some(timed(150, 0.3)));
        assert!(feed.is_finished());
    }

    #[test]
    fn restart_rewinds_recording() {
        let mut feed = ReplayFeed::from_frames(vec![timed(0, 0.1)]);
        assert!(feed.next_frame(10).is_some());
        assert!(feed.next_frame(20).is_none());
        feed.restart();
        assert_eq!(feed.next_frame(5_000), Some(timed(0, 0.1)));
    }

    #[test]
    fn open_reports_missing_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.jsonl");
        assert!(matches!(ReplayFeed::open(&missing), Err(FeedError::Io { .. })));

        let empty = dir.path().join("empty.jsonl");
        std::fs::write(&empty, "\n").unwrap();
        assert!(matches!(ReplayFeed::open(&empty), Err(FeedError::Empty(_))));
    }

    #[test]
    fn pointer_feed_tracks_held_buttons() {
        let mut feed = PointerFeed::new();
        assert_eq!(feed.next_frame(0), Some(LandmarkFrame::empty()));

        feed.press(HandSide::Right, 0.5, 0.25);
        let frame = feed.next_frame(0).unwrap();
        assert!(frame.hand(HandSide::Left).is_none());
        assert_eq!(frame.hand(HandSide::Right).unwrap()[0], Landmark::new(0.5, 0.25));

        feed.release(HandSide::Right);
        assert_eq!(feed.next_frame(0), Some(LandmarkFrame::empty()));
    }
}
