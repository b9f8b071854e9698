use crate::types::{Axis, CameraPreset, CullMode, Face, FillMode};

/// Latched user intent.
///
/// Input handling writes it; the scene update stage reads it and clears the
/// one-shot parts (reset and face turn). Latched values persist until the user
/// changes them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    needs_reset: bool,
    fill: FillMode,
    cull: CullMode,
    camera: CameraPreset,
    rotation_axis: Option<Axis>,
    face_turn: Option<Face>,
    rotatable: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn needs_reset(&self) -> bool {
        self.needs_reset
    }

    pub fn request_reset(&mut self) {
        self.needs_reset = true;
    }

    pub fn clear_reset(&mut self) {
        self.needs_reset = false;
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill
    }

    pub fn set_fill_mode(&mut self, fill: FillMode) {
        self.fill = fill;
    }

    pub fn cull_mode(&self) -> CullMode {
        self.cull
    }

    pub fn set_cull_mode(&mut self, cull: CullMode) {
        self.cull = cull;
    }

    pub fn camera_preset(&self) -> CameraPreset {
        self.camera
    }

    pub fn set_camera_preset(&mut self, preset: CameraPreset) {
        self.camera = preset;
    }

    /// Axis of the continuous whole-cube spin, if any.
    pub fn rotation_axis(&self) -> Option<Axis> {
        self.rotation_axis
    }

    pub fn set_rotation_axis(&mut self, axis: Option<Axis>) {
        self.rotation_axis = axis;
    }

    pub fn requested_face_turn(&self) -> Option<Face> {
        self.face_turn
    }

    /// Latch a face turn. A second request before the next tick replaces the
    /// first.
    pub fn request_face_turn(&mut self, face: Face) {
        self.face_turn = Some(face);
    }

    /// Consume the pending face turn.
    pub fn take_face_turn(&mut self) -> Option<Face> {
        self.face_turn.take()
    }

    /// Whether spin-axis selection is currently enabled.
    pub fn rotatable(&self) -> bool {
        self.rotatable
    }

    pub fn toggle_rotatable(&mut self) {
        self.rotatable = !self.rotatable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_blank() {
        let state = AppState::new();
        assert!(!state.needs_reset());
        assert_eq!(state.fill_mode(), FillMode::Solid);
        assert_eq!(state.cull_mode(), CullMode::None);
        assert_eq!(state.camera_preset(), CameraPreset::Free);
        assert_eq!(state.rotation_axis(), None);
        assert_eq!(state.requested_face_turn(), None);
        assert!(!state.rotatable());
    }

    #[test]
    fn face_turn_is_one_shot() {
        let mut state = AppState::new();
        state.request_face_turn(Face::Top);
        assert_eq!(state.requested_face_turn(), Some(Face::Top));
        assert_eq!(state.take_face_turn(), Some(Face::Top));
        assert_eq!(state.take_face_turn(), None);
    }

    #[test]
    fn reset_flag_round_trip() {
        let mut state = AppState::new();
        state.request_reset();
        assert!(state.needs_reset());
        state.clear_reset();
        assert!(!state.needs_reset());
    }

    #[test]
    fn rotatable_toggles() {
        let mut state = AppState::new();
        state.toggle_rotatable();
        assert!(state.rotatable());
        state.toggle_rotatable();
        assert!(!state.rotatable());
    }
}
