//! Per-tick scene update: reset, camera, whole-cube spin, face turn.

use crate::cube::CubeScene;
use crate::faces::FaceSets;
use glam::{Mat4, Vec2};
use std::f32::consts::TAU;
use rubix_common::config::SceneConfig;
use rubix_common::{AppState, Axis, CameraPreset, Face, FrameInput};

/// Angle of one face turn, in degrees.
pub const FACE_TURN_DEGREES: f32 = 90.0;

/// What one tick changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub reset: bool,
    pub spun: Option<Axis>,
    pub turned: Option<Face>,
}

/// Rotation about a principal axis through the origin.
pub fn axis_rotation(axis: Axis, radians: f32) -> Mat4 {
    match axis {
        Axis::X => Mat4::from_rotation_x(radians),
        Axis::Y => Mat4::from_rotation_y(radians),
        Axis::Z => Mat4::from_rotation_z(radians),
    }
}

/// Rotation bookkeeping carried between ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneUpdate {
    spin_step: f32,
    spin_axis: Option<Axis>,
    spin_angle: f32,
    face_angles: [f32; 6],
    faces: FaceSets,
}

impl Default for SceneUpdate {
    fn default() -> Self {
        Self::new(&SceneConfig::default())
    }
}

impl SceneUpdate {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            spin_step: config.spin_step_degrees.to_radians(),
            spin_axis: None,
            spin_angle: 0.0,
            face_angles: [FACE_TURN_DEGREES; 6],
            faces: FaceSets::new(),
        }
    }

    /// Axis the current spin angle is measured about.
    pub fn spin_axis(&self) -> Option<Axis> {
        self.spin_axis
    }

    /// Whole-cube spin about [`Self::spin_axis`], in radians, kept in `[0, 2π)`.
    pub fn spin_angle(&self) -> f32 {
        self.spin_angle
    }

    fn spin_rotation(&self) -> Mat4 {
        self.spin_axis
            .map_or(Mat4::IDENTITY, |axis| axis_rotation(axis, self.spin_angle))
    }

    /// Per-face turn accumulator in degrees.
    pub fn face_angle(&self, face: Face) -> f32 {
        self.face_angles[face.index()]
    }

    pub fn faces(&self) -> &FaceSets {
        &self.faces
    }

    fn reset_accumulators(&mut self) {
        self.spin_axis = None;
        self.spin_angle = 0.0;
        self.face_angles = [FACE_TURN_DEGREES; 6];
    }

    /// Advance the scene by one frame.
    ///
    /// Order is fixed: a pending reset runs first and wipes the intent, then
    /// the camera, then the spin, then at most one face turn.
    pub fn tick(
        &mut self,
        scene: &mut CubeScene,
        intent: &mut AppState,
        input: &FrameInput,
    ) -> TickReport {
        let mut report = TickReport::default();

        if intent.needs_reset() {
            *intent = AppState::new();
            scene.rebuild_items();
            scene.camera.reset();
            self.reset_accumulators();
            report.reset = true;
            tracing::info!("scene reset");
        }

        self.update_camera(scene, intent, input);

        if let Some(axis) = intent.rotation_axis() {
            if self.spin_axis != Some(axis) {
                // The angle restarts about the new axis from the current pose.
                for item in scene.items.iter_mut() {
                    item.settle();
                }
                self.spin_axis = Some(axis);
                self.spin_angle = 0.0;
            }
            self.spin_angle = (self.spin_angle + self.spin_step).rem_euclid(TAU);
            let spin = self.spin_rotation();
            for item in scene.items.iter_mut() {
                item.pose(spin);
            }
            report.spun = Some(axis);
        }

        if let Some(face) = intent.take_face_turn() {
            let rotation = axis_rotation(face.axis(), FACE_TURN_DEGREES.to_radians());
            let spin = self.spin_rotation();
            for &index in self.faces.members(face) {
                if let Some(item) = scene.items.get_mut(index) {
                    item.turn(rotation, spin);
                }
            }
            self.face_angles[face.index()] += FACE_TURN_DEGREES;
            report.turned = Some(face);
            tracing::debug!(
                "turned {face} face (accumulated {}°)",
                self.face_angles[face.index()]
            );
        }

        report
    }

    fn update_camera(&self, scene: &mut CubeScene, intent: &mut AppState, input: &FrameInput) {
        let camera = &mut scene.camera;
        if input.orbit_drag != Vec2::ZERO {
            camera.orbit(input.orbit_drag);
        }
        if input.zoom_drag != Vec2::ZERO {
            camera.zoom(input.zoom_drag);
        }
        if input.pan != Vec2::ZERO {
            intent.set_camera_preset(CameraPreset::Pan);
            camera.pan(input.pan, input.delta_seconds);
        }
        if intent.camera_preset() == CameraPreset::Origin {
            camera.reset();
            intent.set_camera_preset(CameraPreset::Free);
        }
        camera.update(intent.camera_preset());
    }
}
