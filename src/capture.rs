//! Recording lifecycle state machine: start, pause/resume toggle, stop.

use thiserror::Error;

/// MIME-like type tag attached to finalized capture payloads.
pub const CAPTURE_MIME: &str = "audio/ogg; codecs=opus";

/// A finalized recording: one opaque byte blob plus its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Where the recorder currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Recording,
    Paused,
}

/// Lifecycle notifications observable by the UI layer.
///
/// `Stopped` is emitted exactly once per capture, at the transition back to
/// `Idle`, when the finalized payload is handed off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureEvent {
    Started,
    Paused,
    Resumed,
    Stopped,
}

/// Errors from capture transitions. Failed transitions change no state.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no audio input selected")]
    NoInputSelected,

    #[error("no recording in progress")]
    NotRecording,

    #[error("a recording is already in progress")]
    AlreadyRecording,
}

/// The capture state machine.
///
/// `Idle → Recording ⇄ Paused → (stop) → Idle`. The recorder accumulates
/// opaque audio chunks pushed in by the capture collaborator and finalizes
/// them into a single [`AudioPayload`] on stop; the payload is returned for
/// the staging workflow to pick up. At most one capture is in flight at a
/// time, by construction.
///
/// The recorder holds no UI state; lifecycle events queue up in order and
/// are drained by whoever renders them.
#[derive(Debug, Default)]
pub struct Recorder {
    state: CaptureState,
    input: Option<String>,
    chunks: Vec<Vec<u8>>,
    events: Vec<CaptureEvent>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// The currently connected input device id, if any.
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    /// Drains the queued lifecycle events, oldest first.
    pub fn take_events(&mut self) -> Vec<CaptureEvent> {
        std::mem::take(&mut self.events)
    }

    /// Switches the connected input device.
    ///
    /// An input switch always wins over an in-flight capture: if a
    /// recording is in progress it is aborted first, its data discarded,
    /// and nothing reaches staging.
    pub fn set_input(&mut self, device: Option<String>) {
        if self.state != CaptureState::Idle {
            self.abort();
        }
        self.input = device;
    }

    /// Discards an in-flight capture without staging anything.
    pub fn abort(&mut self) {
        self.state = CaptureState::Idle;
        self.chunks.clear();
    }

    /// Starts a new capture.
    ///
    /// # Errors
    ///
    /// `NoInputSelected` without a connected input; `AlreadyRecording`
    /// unless the recorder is idle. Neither changes state.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.state != CaptureState::Idle {
            return Err(CaptureError::AlreadyRecording);
        }
        if self.input.is_none() {
            return Err(CaptureError::NoInputSelected);
        }
        self.state = CaptureState::Recording;
        self.events.push(CaptureEvent::Started);
        Ok(())
    }

    /// Single pause/resume toggle; the direction is inferred from the
    /// current state.
    ///
    /// # Errors
    ///
    /// `NotRecording` when idle.
    pub fn toggle_pause(&mut self) -> Result<(), CaptureError> {
        match self.state {
            CaptureState::Recording => {
                self.state = CaptureState::Paused;
                self.events.push(CaptureEvent::Paused);
                Ok(())
            }
            CaptureState::Paused => {
                self.state = CaptureState::Recording;
                self.events.push(CaptureEvent::Resumed);
                Ok(())
            }
            CaptureState::Idle => Err(CaptureError::NotRecording),
        }
    }

    /// Accepts one opaque chunk of captured audio.
    ///
    /// # Errors
    ///
    /// `NotRecording` unless a capture is actively recording (a paused
    /// recorder produces no data).
    pub fn push_chunk(&mut self, chunk: impl Into<Vec<u8>>) -> Result<(), CaptureError> {
        if self.state != CaptureState::Recording {
            return Err(CaptureError::NotRecording);
        }
        self.chunks.push(chunk.into());
        Ok(())
    }

    /// Stops the capture, finalizing all accumulated chunks into a single
    /// payload blob, and resets to idle. Works from both recording and
    /// paused.
    ///
    /// # Errors
    ///
    /// `NotRecording` when idle.
    pub fn stop(&mut self) -> Result<AudioPayload, CaptureError> {
        if self.state == CaptureState::Idle {
            return Err(CaptureError::NotRecording);
        }
        let bytes = self.chunks.drain(..).flatten().collect();
        self.state = CaptureState::Idle;
        self.events.push(CaptureEvent::Stopped);
        Ok(AudioPayload {
            bytes,
            mime: CAPTURE_MIME.to_string(),
        })
    }
}
