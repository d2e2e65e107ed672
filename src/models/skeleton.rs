use nalgebra::{Matrix4, Vector3};

/// Joint names emitted by the body-tracking subsystem for the default 3D body skeleton.
pub mod joints {
    pub const HIPS: &str = "hips_joint";
    pub const LEFT_UP_LEG: &str = "left_upLeg_joint";
    pub const LEFT_LEG: &str = "left_leg_joint";
    pub const LEFT_FOOT: &str = "left_foot_joint";
    pub const RIGHT_UP_LEG: &str = "right_upLeg_joint";
    pub const RIGHT_LEG: &str = "right_leg_joint";
    pub const RIGHT_FOOT: &str = "right_foot_joint";
    pub const SPINE_1: &str = "spine_1_joint";
    pub const SPINE_2: &str = "spine_2_joint";
    pub const SPINE_7: &str = "spine_7_joint";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn hip_joint(self) -> &'static str {
        match self {
            Side::Left => joints::LEFT_UP_LEG,
            Side::Right => joints::RIGHT_UP_LEG,
        }
    }

    pub fn knee_joint(self) -> &'static str {
        match self {
            Side::Left => joints::LEFT_LEG,
            Side::Right => joints::RIGHT_LEG,
        }
    }

    pub fn ankle_joint(self) -> &'static str {
        match self {
            Side::Left => joints::LEFT_FOOT,
            Side::Right => joints::RIGHT_FOOT,
        }
    }
}

/// A named joint and its rigid transform relative to the body anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct JointTransform {
    pub name: String,
    pub transform: Matrix4<f32>,
}

impl JointTransform {
    pub fn new(name: impl Into<String>, transform: Matrix4<f32>) -> Self {
        Self {
            name: name.into(),
            transform,
        }
    }

    pub fn at(name: impl Into<String>, position: Vector3<f32>) -> Self {
        Self::new(name, Matrix4::new_translation(&position))
    }

    /// Translation column of the transform. Orientation is discarded.
    pub fn position(&self) -> Vector3<f32> {
        let m = &self.transform;
        Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
    }
}

/// One tracked body. Joint transforms are relative to the body anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    pub joints: Vec<JointTransform>,
}

impl Skeleton {
    pub fn new(joints: Vec<JointTransform>) -> Self {
        Self { joints }
    }

    pub fn joint(&self, name: &str) -> Option<&JointTransform> {
        self.joints.iter().find(|joint| joint.name == name)
    }

    pub fn joint_position(&self, name: &str) -> Option<Vector3<f32>> {
        self.joint(name).map(JointTransform::position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_positions_come_from_the_translation() {
        let mut transform = Matrix4::new_rotation(Vector3::new(0.0, 1.2, 0.0));
        transform[(0, 3)] = 0.25;
        transform[(1, 3)] = 0.9;
        transform[(2, 3)] = -0.1;
        let skeleton = Skeleton::new(vec![JointTransform::new(joints::HIPS, transform)]);

        assert_eq!(
            skeleton.joint_position(joints::HIPS),
            Some(Vector3::new(0.25, 0.9, -0.1))
        );
        assert_eq!(skeleton.joint_position(joints::LEFT_LEG), None);
    }
}
