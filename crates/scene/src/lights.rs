use glam::{Vec3, Vec4};

/// Upper bound on lights per pass.
pub const MAX_LIGHTS: usize = 16;

/// Number of lights of each kind, in the order they appear in the rig.
pub const NUM_DIRECTIONAL_LIGHTS: usize = 2;
pub const NUM_POINT_LIGHTS: usize = 1;
pub const NUM_SPOT_LIGHTS: usize = 1;

/// A light source. Which fields matter depends on where it sits in the rig:
/// directional lights use `direction`, point lights `position` and the
/// falloff range, spot lights all of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub strength: Vec3,
    pub falloff_start: f32,
    pub direction: Vec3,
    pub falloff_end: f32,
    pub position: Vec3,
    pub spot_power: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            strength: Vec3::splat(0.5),
            falloff_start: 1.0,
            direction: Vec3::NEG_Y,
            falloff_end: 10.0,
            position: Vec3::ZERO,
            spot_power: 64.0,
        }
    }
}

/// Ambient term plus directional, point and spot lights, in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    pub ambient: Vec4,
    pub lights: Vec<Light>,
}

impl Default for LightRig {
    fn default() -> Self {
        let directional = |direction: Vec3| Light {
            strength: Vec3::splat(0.3),
            direction,
            ..Light::default()
        };
        Self {
            ambient: Vec4::new(0.25, 0.25, 0.35, 1.0),
            lights: vec![
                directional(Vec3::new(-3.0, 0.0, -3.0)),
                directional(Vec3::new(3.0, 0.0, 3.0)),
                Light {
                    strength: Vec3::splat(2.0),
                    position: Vec3::new(0.0, -6.0, 0.0),
                    ..Light::default()
                },
                Light {
                    strength: Vec3::ONE,
                    position: Vec3::new(0.0, 6.0, 0.0),
                    direction: Vec3::NEG_Y,
                    spot_power: 0.001,
                    ..Light::default()
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rig_layout_matches_counts() {
        let rig = LightRig::default();
        assert_eq!(
            rig.lights.len(),
            NUM_DIRECTIONAL_LIGHTS + NUM_POINT_LIGHTS + NUM_SPOT_LIGHTS
        );
        assert!(rig.lights.len() <= MAX_LIGHTS);
        assert_eq!(rig.lights[2].position, Vec3::new(0.0, -6.0, 0.0));
        assert_eq!(rig.lights[3].spot_power, 0.001);
    }
}
