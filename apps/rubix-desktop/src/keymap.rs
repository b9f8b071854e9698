use glam::Vec2;
use rubix_common::{Axis, CameraPreset, CullMode, Face, FillMode};
use rubix_input::Action;
use std::collections::HashSet;
use winit::keyboard::KeyCode;

/// Map a key press to an action. Arrow keys are not actions; they are
/// sampled every frame through [`pan_direction`].
pub fn action_for_key(key: KeyCode) -> Option<Action> {
    let action = match key {
        KeyCode::KeyR => Action::ToggleRotatable,
        KeyCode::KeyX => Action::SelectAxis(Axis::X),
        KeyCode::KeyY => Action::SelectAxis(Axis::Y),
        KeyCode::KeyZ => Action::SelectAxis(Axis::Z),
        KeyCode::KeyI => Action::Reset,
        KeyCode::KeyS => Action::SetFill(FillMode::Solid),
        KeyCode::KeyW => Action::SetFill(FillMode::Wireframe),
        KeyCode::KeyN => Action::SetCull(CullMode::None),
        KeyCode::KeyF => Action::SetCull(CullMode::Front),
        KeyCode::KeyB => Action::SetCull(CullMode::Back),
        KeyCode::Digit0 | KeyCode::Numpad0 => Action::SetCamera(CameraPreset::Origin),
        KeyCode::Digit1 | KeyCode::Numpad1 => Action::SetCamera(CameraPreset::Front),
        KeyCode::Digit2 | KeyCode::Numpad2 => Action::SetCamera(CameraPreset::Top),
        KeyCode::Digit3 | KeyCode::Numpad3 => Action::SetCamera(CameraPreset::Right),
        KeyCode::Digit4 | KeyCode::Numpad4 => Action::TurnFace(Face::Front),
        KeyCode::Digit5 | KeyCode::Numpad5 => Action::TurnFace(Face::Left),
        KeyCode::Digit6 | KeyCode::Numpad6 => Action::TurnFace(Face::Right),
        KeyCode::Digit7 | KeyCode::Numpad7 => Action::TurnFace(Face::Back),
        KeyCode::Digit8 | KeyCode::Numpad8 => Action::TurnFace(Face::Top),
        KeyCode::Digit9 | KeyCode::Numpad9 => Action::TurnFace(Face::Bottom),
        _ => return None,
    };
    Some(action)
}

/// Arrow-key direction on the x/z plane. Opposite keys cancel.
pub fn pan_direction(keys_held: &HashSet<KeyCode>) -> Vec2 {
    let axis = |neg: KeyCode, pos: KeyCode| {
        let mut v = 0.0;
        if keys_held.contains(&neg) {
            v -= 1.0;
        }
        if keys_held.contains(&pos) {
            v += 1.0;
        }
        v
    };
    Vec2::new(
        axis(KeyCode::ArrowLeft, KeyCode::ArrowRight),
        axis(KeyCode::ArrowDown, KeyCode::ArrowUp),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_turn_faces_in_order() {
        let digits = [
            KeyCode::Digit4,
            KeyCode::Digit5,
            KeyCode::Digit6,
            KeyCode::Digit7,
            KeyCode::Digit8,
            KeyCode::Digit9,
        ];
        for (key, face) in digits.into_iter().zip(Face::ALL) {
            assert_eq!(action_for_key(key), Some(Action::TurnFace(face)));
        }
    }

    #[test]
    fn mode_keys() {
        assert_eq!(
            action_for_key(KeyCode::KeyW),
            Some(Action::SetFill(FillMode::Wireframe))
        );
        assert_eq!(
            action_for_key(KeyCode::KeyB),
            Some(Action::SetCull(CullMode::Back))
        );
        assert_eq!(
            action_for_key(KeyCode::Digit0),
            Some(Action::SetCamera(CameraPreset::Origin))
        );
        assert_eq!(action_for_key(KeyCode::KeyI), Some(Action::Reset));
    }

    #[test]
    fn arrows_are_not_actions() {
        assert_eq!(action_for_key(KeyCode::ArrowUp), None);
        assert_eq!(action_for_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn pan_direction_cancels_opposites() {
        let mut held = HashSet::new();
        assert_eq!(pan_direction(&held), Vec2::ZERO);
        held.insert(KeyCode::ArrowUp);
        held.insert(KeyCode::ArrowRight);
        assert_eq!(pan_direction(&held), Vec2::new(1.0, 1.0));
        held.insert(KeyCode::ArrowLeft);
        assert_eq!(pan_direction(&held), Vec2::new(0.0, 1.0));
    }
}
