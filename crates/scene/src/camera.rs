use glam::{Mat4, Vec2, Vec3};
use rubix_common::CameraPreset;
use rubix_common::config::CameraConfig;
use std::f32::consts::PI;

pub const INITIAL_THETA: f32 = 1.3 * PI;
pub const INITIAL_PHI: f32 = 0.4 * PI;
pub const INITIAL_RADIUS: f32 = 2.5;

pub const MIN_PHI: f32 = 0.1;
pub const MAX_PHI: f32 = PI - 0.1;
pub const MIN_RADIUS: f32 = 9.0;
pub const MAX_RADIUS: f32 = 1500.0;

const PRESET_DISTANCE: f32 = 6.0;

/// Closest a panned eye may come to the target.
const MIN_PAN_DISTANCE: f32 = 1.0;
/// Below this x/z offset the eye is looking straight along the y axis.
const VERTICAL_EPSILON: f32 = 1e-3;

/// Camera orbiting the origin on a sphere, with fixed viewing presets.
///
/// Mouse drags always edit the spherical coordinates; the eye only follows
/// them while the preset is `Free`. Clamping is applied on every mutation, so
/// the radius is never below `MIN_RADIUS` even straight after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    theta: f32,
    phi: f32,
    radius: f32,
    eye: Vec3,
    up: Vec3,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    orbit_rate: f32,
    zoom_rate: f32,
    pan_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

impl OrbitCamera {
    pub fn new(config: &CameraConfig) -> Self {
        let mut camera = Self {
            theta: INITIAL_THETA,
            phi: INITIAL_PHI,
            radius: INITIAL_RADIUS,
            eye: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 0.25 * PI,
            near: 1.0,
            far: 1000.0,
            orbit_rate: config.orbit_degrees_per_pixel.to_radians(),
            zoom_rate: config.zoom_units_per_pixel,
            pan_speed: config.pan_speed,
        };
        camera.clamp();
        camera.update(CameraPreset::Free);
        camera
    }

    /// Restore the starting orbit. Eye and up are recomputed by the next
    /// `update`.
    pub fn reset(&mut self) {
        self.theta = INITIAL_THETA;
        self.phi = INITIAL_PHI;
        self.radius = INITIAL_RADIUS;
        self.eye = Vec3::ZERO;
        self.up = Vec3::Y;
        self.clamp();
    }

    /// Left-button drag: orbit by a pixel delta.
    pub fn orbit(&mut self, drag: Vec2) {
        self.theta += drag.x * self.orbit_rate;
        self.phi += drag.y * self.orbit_rate;
        self.clamp();
    }

    /// Right-button drag: dolly in or out by a pixel delta.
    pub fn zoom(&mut self, drag: Vec2) {
        self.radius += self.zoom_rate * (drag.x - drag.y);
        self.clamp();
    }

    /// Translate the eye on the x/z plane. A move that would bring the eye
    /// within `MIN_PAN_DISTANCE` of the target is dropped.
    pub fn pan(&mut self, direction: Vec2, delta_seconds: f32) {
        let step = self.pan_speed * delta_seconds;
        let eye = self.eye + Vec3::new(direction.x * step, 0.0, direction.y * step);
        if eye.length() >= MIN_PAN_DISTANCE {
            self.eye = eye;
        }
    }

    /// Recompute eye and up for the given preset.
    pub fn update(&mut self, preset: CameraPreset) {
        let (eye, up) = match preset {
            CameraPreset::Free | CameraPreset::Origin => (self.spherical_eye(), Vec3::Y),
            CameraPreset::Front => (Vec3::new(0.0, 0.0, -PRESET_DISTANCE), Vec3::Y),
            CameraPreset::Top => (Vec3::new(0.0, PRESET_DISTANCE, 0.0), Vec3::Z),
            CameraPreset::Right => (Vec3::new(PRESET_DISTANCE, 0.0, 0.0), Vec3::Y),
            CameraPreset::Pan => self.pan_pose(),
        };
        self.eye = eye;
        self.up = up;
    }

    /// Eye and up for `Pan`, kept away from the degenerate cases of
    /// `look_at_lh`: an eye on the target, or an eye straight above or below it.
    fn pan_pose(&self) -> (Vec3, Vec3) {
        let eye = if self.eye.length() < MIN_PAN_DISTANCE {
            self.spherical_eye()
        } else {
            self.eye
        };
        let up = if Vec2::new(eye.x, eye.z).length() < VERTICAL_EPSILON {
            Vec3::Z
        } else {
            Vec3::Y
        };
        (eye, up)
    }

    fn spherical_eye(&self) -> Vec3 {
        Vec3::new(
            self.radius * self.phi.sin() * self.theta.cos(),
            self.radius * self.phi.cos(),
            self.radius * self.phi.sin() * self.theta.sin(),
        )
    }

    fn clamp(&mut self) {
        self.phi = self.phi.clamp(MIN_PHI, MAX_PHI);
        self.radius = self.radius.clamp(MIN_RADIUS, MAX_RADIUS);
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn phi(&self) -> f32 {
        self.phi
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Left-handed view matrix looking at the origin.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_lh(self.eye, Vec3::ZERO, self.up)
    }

    /// Left-handed perspective projection with a 0..1 depth range.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_lh(self.fov_y, aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_radius_is_clamped() {
        let cam = OrbitCamera::default();
        assert_eq!(cam.theta(), INITIAL_THETA);
        assert_eq!(cam.phi(), INITIAL_PHI);
        assert_eq!(cam.radius(), MIN_RADIUS);
        assert!((cam.eye().length() - MIN_RADIUS).abs() < 1e-4);
    }

    #[test]
    fn phi_stays_clamped_under_extreme_drags() {
        let mut cam = OrbitCamera::default();
        for dy in [1e9, -1e9, 12345.0, -0.5, f32::MAX / 4.0, -f32::MAX / 4.0] {
            cam.orbit(Vec2::new(3.0, dy));
            assert!(cam.phi() >= MIN_PHI && cam.phi() <= MAX_PHI, "phi {}", cam.phi());
        }
    }

    #[test]
    fn radius_stays_clamped_under_extreme_drags() {
        let mut cam = OrbitCamera::default();
        for (dx, dy) in [(1e9, 0.0), (0.0, 1e9), (-1e9, -1e9), (5.0, -5.0), (-3.0, 7.0)] {
            cam.zoom(Vec2::new(dx, dy));
            assert!(
                cam.radius() >= MIN_RADIUS && cam.radius() <= MAX_RADIUS,
                "radius {}",
                cam.radius()
            );
        }
    }

    #[test]
    fn zoom_direction() {
        let mut cam = OrbitCamera::default();
        cam.zoom(Vec2::new(100.0, 0.0));
        assert!((cam.radius() - (MIN_RADIUS + 5.0)).abs() < 1e-4);
        cam.zoom(Vec2::new(0.0, 40.0));
        assert!((cam.radius() - (MIN_RADIUS + 3.0)).abs() < 1e-4);
    }

    #[test]
    fn orbit_uses_quarter_degree_per_pixel() {
        let mut cam = OrbitCamera::default();
        cam.orbit(Vec2::new(4.0, 0.0));
        assert!((cam.theta() - (INITIAL_THETA + 1.0_f32.to_radians())).abs() < 1e-5);
    }

    #[test]
    fn presets_fix_the_eye() {
        let mut cam = OrbitCamera::default();
        cam.update(CameraPreset::Front);
        assert_eq!(cam.eye(), Vec3::new(0.0, 0.0, -6.0));
        cam.update(CameraPreset::Top);
        assert_eq!(cam.eye(), Vec3::new(0.0, 6.0, 0.0));
        assert_eq!(cam.up(), Vec3::Z);
        cam.update(CameraPreset::Right);
        assert_eq!(cam.eye(), Vec3::new(6.0, 0.0, 0.0));
        assert_eq!(cam.up(), Vec3::Y);
    }

    #[test]
    fn pan_moves_eye_and_keeps_it() {
        let mut cam = OrbitCamera::default();
        cam.update(CameraPreset::Front);
        cam.pan(Vec2::new(1.0, 0.0), 0.5);
        cam.update(CameraPreset::Pan);
        assert_eq!(cam.eye(), Vec3::new(5.0, 0.0, -6.0));
    }

    #[test]
    fn reset_restores_starting_orbit() {
        let mut cam = OrbitCamera::default();
        cam.orbit(Vec2::new(50.0, -20.0));
        cam.zoom(Vec2::new(300.0, 0.0));
        cam.reset();
        cam.update(CameraPreset::Free);
        assert_eq!(cam, OrbitCamera::default());
    }

    #[test]
    fn matrices_are_finite() {
        let cam = OrbitCamera::default();
        let vp = cam.projection_matrix(16.0 / 9.0) * cam.view_matrix();
        assert!(vp.is_finite());
    }

    #[test]
    fn pan_after_top_preset_keeps_view_finite() {
        let mut cam = OrbitCamera::default();
        cam.update(CameraPreset::Top);
        cam.pan(Vec2::new(0.0, 1.0), 0.0);
        cam.update(CameraPreset::Pan);
        assert_eq!(cam.up(), Vec3::Z);
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn pan_stops_short_of_the_target() {
        let mut cam = OrbitCamera::default();
        cam.update(CameraPreset::Front);
        // Eye at z = -6; a 10-unit move forward would pass through the origin.
        cam.pan(Vec2::new(0.0, 1.0), 0.6);
        assert_eq!(cam.eye(), Vec3::new(0.0, 0.0, -6.0));
        cam.pan(Vec2::new(0.0, 1.0), 0.5);
        assert_eq!(cam.eye(), Vec3::new(0.0, 0.0, -1.0));
        cam.pan(Vec2::new(0.0, 1.0), 0.05);
        assert_eq!(cam.eye(), Vec3::new(0.0, 0.0, -1.0));
        cam.update(CameraPreset::Pan);
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn pan_from_a_reset_eye_falls_back_to_the_orbit() {
        let mut cam = OrbitCamera::default();
        cam.reset();
        cam.pan(Vec2::new(1.0, 0.0), 0.01);
        cam.update(CameraPreset::Pan);
        assert!(cam.eye().length() >= MIN_RADIUS - 1e-3);
        assert!(cam.view_matrix().is_finite());
    }
}
