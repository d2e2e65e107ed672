use serde::{Deserialize, Serialize};

/// Biomechanical rubric for a bodyweight squat. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquatFormRules {
    /// Knee angle range (inclusive) that counts as reaching squat depth.
    pub knee_angle_min: f32,
    pub knee_angle_max: f32,

    /// Maximum forward lean of the torso from vertical.
    pub max_torso_angle: f32,

    /// Average knee angle above which the subject is considered standing.
    pub standing_knee_angle_threshold: f32,

    /// Targets used for deviation reporting.
    pub ideal_knee_angle: f32,
    pub ideal_torso_angle: f32,

    /// Stand-ins for angles that were not tracked in a frame.
    pub absent_knee_angle: f32,
    pub absent_torso_angle: f32,
}

impl Default for SquatFormRules {
    fn default() -> Self {
        Self {
            knee_angle_min: 70.0,
            knee_angle_max: 100.0,
            max_torso_angle: 45.0,
            standing_knee_angle_threshold: 140.0,
            ideal_knee_angle: 85.0,
            ideal_torso_angle: 0.0,
            absent_knee_angle: 180.0,
            absent_torso_angle: 0.0,
        }
    }
}

impl SquatFormRules {
    pub fn is_at_depth(&self, knee_angle: f32) -> bool {
        (self.knee_angle_min..=self.knee_angle_max).contains(&knee_angle)
    }

    pub fn is_standing(&self, knee_angle: f32) -> bool {
        knee_angle > self.standing_knee_angle_threshold
    }

    pub fn is_torso_acceptable(&self, torso_angle: f32) -> bool {
        torso_angle <= self.max_torso_angle
    }
}
