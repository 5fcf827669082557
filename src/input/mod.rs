//! Gesture commands and the cross-thread queue that carries them.
//!
//! Gesture handlers on the input thread never touch camera state directly.
//! They push immutable [`CameraCommand`] intents through a channel; the
//! render-thread frame step drains the queue and applies each command to
//! its single owned camera before the next frame. Camera state is
//! therefore never touched concurrently from two threads, without locks.

use std::sync::mpsc;

use glam::Vec2;

/// An immutable camera gesture intent.
///
/// All deltas are screen-space pixels; zoom is a dimensionless scale
/// factor. Nothing here is tied to a specific input-device API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    /// Rotate azimuth/elevation by a drag delta.
    Orbit {
        /// Horizontal and vertical drag delta in pixels.
        delta: Vec2,
    },
    /// Translate the look-at target by a drag delta.
    Pan {
        /// Horizontal and vertical drag delta in pixels.
        delta: Vec2,
    },
    /// Scale the orbit distance.
    Zoom {
        /// Dimensionless zoom factor (>1 zooms in).
        factor: f32,
    },
}

/// Input-thread half: enqueues gesture commands. Cheap to clone.
#[derive(Debug, Clone)]
pub struct GestureSender {
    tx: mpsc::Sender<CameraCommand>,
}

impl GestureSender {
    /// Enqueue a command. A disconnected receiver (renderer torn down)
    /// silently drops the gesture; there is nothing useful to do with it.
    pub fn send(&self, command: CameraCommand) {
        if self.tx.send(command).is_err() {
            log::debug!("gesture dropped: render thread gone");
        }
    }
}

/// Render-thread half: drains queued commands before each frame.
#[derive(Debug)]
pub struct GestureReceiver {
    rx: mpsc::Receiver<CameraCommand>,
}

impl GestureReceiver {
    /// Drain all commands queued since the last frame, in arrival order.
    pub fn drain(&self) -> impl Iterator<Item = CameraCommand> + '_ {
        self.rx.try_iter()
    }
}

/// Create a connected gesture queue pair.
#[must_use]
pub fn gesture_queue() -> (GestureSender, GestureReceiver) {
    let (tx, rx) = mpsc::channel();
    (GestureSender { tx }, GestureReceiver { rx })
}
