use rubix_common::{AppState, Axis, CameraPreset, CullMode, Face, FillMode};

/// A high-level action produced by the platform layer from a key press.
///
/// Continuous inputs (mouse drags, held arrow keys) travel through
/// `FrameInput` instead; actions cover the latched, discrete intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Enable or disable spin-axis selection.
    ToggleRotatable,
    /// Select the whole-cube spin axis. Ignored unless rotatable.
    SelectAxis(Axis),
    /// Rebuild the cube and camera from their starting state.
    Reset,
    SetFill(FillMode),
    SetCull(CullMode),
    SetCamera(CameraPreset),
    /// Queue a one-shot quarter turn of a face.
    TurnFace(Face),
}

impl Action {
    /// Apply the action to the intent state. Returns whether anything changed.
    pub fn apply(self, state: &mut AppState) -> bool {
        let before = state.clone();
        match self {
            Action::ToggleRotatable => state.toggle_rotatable(),
            Action::SelectAxis(axis) => {
                if state.rotatable() {
                    state.set_rotation_axis(Some(axis));
                } else {
                    tracing::debug!("axis {axis:?} ignored: rotation selection disabled");
                }
            }
            Action::Reset => state.request_reset(),
            Action::SetFill(fill) => state.set_fill_mode(fill),
            Action::SetCull(cull) => state.set_cull_mode(cull),
            Action::SetCamera(preset) => state.set_camera_preset(preset),
            Action::TurnFace(face) => state.request_face_turn(face),
        }
        let changed = *state != before;
        if changed {
            tracing::debug!("applied {self:?}");
        }
        changed
    }
}
