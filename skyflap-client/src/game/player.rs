//! Player input
//!
//! Key edges are captured every rendered frame and consumed by the next
//! fixed step, so none are lost or handled twice.

use bevy::prelude::*;

use skyflap::{InputEvent, InputFrame};

/// Edges waiting for the next fixed step
#[derive(Resource, Default)]
pub struct PendingInput(pub InputFrame);

impl PendingInput {
    /// Take the queued edges, leaving an idle frame behind
    pub fn take(&mut self) -> InputFrame {
        std::mem::take(&mut self.0)
    }
}

/// Space starts and flaps, Enter restarts
pub fn capture_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut pending: ResMut<PendingInput>,
) {
    if keyboard.just_pressed(KeyCode::Space) {
        pending.0.push(InputEvent::StartPressed);
    }
    if keyboard.just_pressed(KeyCode::Enter) || keyboard.just_pressed(KeyCode::NumpadEnter) {
        pending.0.push(InputEvent::RestartPressed);
    }
}
