//! Input Capture and Recording
//!
//! Key presses reach the simulation as edge events. A frame's edges are
//! packed into an `InputFrame`, and frames are recorded sparsely so a run
//! can be replayed exactly.

use serde::{Serialize, Deserialize};
use thiserror::Error;

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Discrete key-press edge reported by the input source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputEvent {
    /// Start key went down (starts the run when idle, flaps when active)
    StartPressed,
    /// Restart key went down (only honoured after game over)
    RestartPressed,
}

/// Edges seen during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputFrame {
    /// Action flags (packed bits):
    /// - Bit 0: Start pressed this frame
    /// - Bit 1: Restart pressed this frame
    /// - Bit 2-7: Reserved
    pub flags: u8,
}

impl InputFrame {
    /// Start flag bit
    pub const FLAG_START: u8 = 0x01;

    /// Restart flag bit
    pub const FLAG_RESTART: u8 = 0x02;

    /// Create a new empty input frame.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Frame with only the start edge set.
    pub const fn start() -> Self {
        Self { flags: Self::FLAG_START }
    }

    /// Frame with only the restart edge set.
    pub const fn restart() -> Self {
        Self { flags: Self::FLAG_RESTART }
    }

    /// Check if start was pressed this frame.
    #[inline]
    pub fn start_pressed(&self) -> bool {
        self.flags & Self::FLAG_START != 0
    }

    /// Check if restart was pressed this frame.
    #[inline]
    pub fn restart_pressed(&self) -> bool {
        self.flags & Self::FLAG_RESTART != 0
    }

    /// Check if this is an idle frame (no input).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }

    /// Merge an edge event into the frame.
    #[inline]
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::StartPressed => self.flags |= Self::FLAG_START,
            InputEvent::RestartPressed => self.flags |= Self::FLAG_RESTART,
        }
    }

    /// Edge events in dispatch order (restart before start).
    pub fn events(&self) -> impl Iterator<Item = InputEvent> {
        let restart = self.restart_pressed().then_some(InputEvent::RestartPressed);
        let start = self.start_pressed().then_some(InputEvent::StartPressed);
        restart.into_iter().chain(start)
    }
}

impl FromIterator<InputEvent> for InputFrame {
    fn from_iter<I: IntoIterator<Item = InputEvent>>(iter: I) -> Self {
        let mut frame = InputFrame::new();
        for event in iter {
            frame.push(event);
        }
        frame
    }
}

/// A non-idle frame and the frame number it happened on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Frame number
    pub frame_no: u32,
    /// Edges pressed on that frame
    pub frame: InputFrame,
}

// =============================================================================
// INPUT RECORDING
// =============================================================================

/// A decoded recording whose deltas cannot be replayed faithfully.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordingError {
    /// Deltas must have strictly increasing frame numbers.
    #[error("input delta for frame {frame_no} is out of order")]
    OutOfOrder {
        /// Offending frame number
        frame_no: u32,
    },
    /// A delta points past the end of the recording.
    #[error("input delta for frame {frame_no} is past the end ({frame_count} frames)")]
    PastEnd {
        /// Offending frame number
        frame_no: u32,
        /// Recorded frame count
        frame_count: u32,
    },
}

/// Sparse input recording for one run.
///
/// Only frames with at least one edge are stored; every other frame is idle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecording {
    /// Total number of frames recorded (idle frames included)
    pub frame_count: u32,
    /// Non-idle frames, in frame order
    deltas: Vec<InputDelta>,
}

impl InputRecording {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a recording from dense per-frame input.
    pub fn from_frames(frames: &[InputFrame]) -> Self {
        let mut recording = Self::new();
        for frame in frames {
            recording.push(*frame);
        }
        recording
    }

    /// Append the next frame.
    pub fn push(&mut self, frame: InputFrame) {
        if !frame.is_idle() {
            self.deltas.push(InputDelta {
                frame_no: self.frame_count,
                frame,
            });
        }
        self.frame_count += 1;
    }

    /// Input on a specific frame.
    pub fn get_input_at(&self, frame_no: u32) -> InputFrame {
        self.deltas
            .binary_search_by_key(&frame_no, |d| d.frame_no)
            .map(|idx| self.deltas[idx].frame)
            .unwrap_or_default()
    }

    /// Stored non-idle frames.
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Check that every delta will be visited by `replay_iter`.
    pub fn validate(&self) -> Result<(), RecordingError> {
        let mut previous: Option<u32> = None;
        for delta in &self.deltas {
            if previous.is_some_and(|p| delta.frame_no <= p) {
                return Err(RecordingError::OutOfOrder { frame_no: delta.frame_no });
            }
            if delta.frame_no >= self.frame_count {
                return Err(RecordingError::PastEnd {
                    frame_no: delta.frame_no,
                    frame_count: self.frame_count,
                });
            }
            previous = Some(delta.frame_no);
        }
        Ok(())
    }

    /// Iterate every frame in order, idle frames included.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            recording: self,
            frame_no: 0,
            delta_idx: 0,
        }
    }
}

/// Iterator for replaying inputs frame-by-frame.
pub struct ReplayIterator<'a> {
    recording: &'a InputRecording,
    frame_no: u32,
    delta_idx: usize,
}

impl Iterator for ReplayIterator<'_> {
    type Item = InputFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.frame_no >= self.recording.frame_count {
            return None;
        }

        let frame = match self.recording.deltas.get(self.delta_idx) {
            Some(delta) if delta.frame_no == self.frame_no => {
                self.delta_idx += 1;
                delta.frame
            }
            _ => InputFrame::new(),
        };

        self.frame_no += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.recording.frame_count - self.frame_no) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ReplayIterator<'_> {}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_frame_flags() {
        let mut frame = InputFrame::new();
        assert!(frame.is_idle());

        frame.push(InputEvent::StartPressed);
        assert!(frame.start_pressed());
        assert!(!frame.restart_pressed());

        frame.push(InputEvent::RestartPressed);
        assert!(frame.start_pressed() && frame.restart_pressed());
    }

    #[test]
    fn test_events_dispatch_order() {
        let frame: InputFrame = [InputEvent::StartPressed, InputEvent::RestartPressed]
            .into_iter()
            .collect();
        let events: Vec<_> = frame.events().collect();
        assert_eq!(events, vec![InputEvent::RestartPressed, InputEvent::StartPressed]);
        assert_eq!(InputFrame::new().events().count(), 0);
    }

    #[test]
    fn test_recording_is_sparse() {
        let mut recording = InputRecording::new();
        for i in 0..100 {
            let frame = if i % 25 == 0 { InputFrame::start() } else { InputFrame::new() };
            recording.push(frame);
        }

        assert_eq!(recording.frame_count, 100);
        assert_eq!(recording.deltas().len(), 4);
        assert_eq!(recording.get_input_at(50), InputFrame::start());
        assert!(recording.get_input_at(51).is_idle());
        assert!(recording.get_input_at(500).is_idle());
    }

    #[test]
    fn test_validate_rejects_unreachable_deltas() {
        let recording = InputRecording::from_frames(&[InputFrame::new(), InputFrame::start()]);
        assert_eq!(recording.validate(), Ok(()));

        let mut past_end = recording.clone();
        past_end.frame_count = 1;
        assert_eq!(
            past_end.validate(),
            Err(RecordingError::PastEnd { frame_no: 1, frame_count: 1 })
        );

        let mut unsorted = InputRecording::from_frames(&[
            InputFrame::start(),
            InputFrame::new(),
            InputFrame::restart(),
        ]);
        unsorted.deltas.swap(0, 1);
        assert_eq!(unsorted.validate(), Err(RecordingError::OutOfOrder { frame_no: 0 }));

        let mut duplicate = recording;
        duplicate.frame_count = 3;
        duplicate.deltas.push(duplicate.deltas[0]);
        assert_eq!(duplicate.validate(), Err(RecordingError::OutOfOrder { frame_no: 1 }));
    }

    #[test]
    fn test_replay_iterator_round_trip() {
        let frames = vec![
            InputFrame::new(),
            InputFrame::start(),
            InputFrame::new(),
            InputFrame::new(),
            InputFrame::restart(),
            InputFrame::new(),
        ];
        let recording = InputRecording::from_frames(&frames);

        let replayed: Vec<_> = recording.replay_iter().collect();
        assert_eq!(replayed, frames);
        assert_eq!(recording.replay_iter().len(), 6);
    }
}
