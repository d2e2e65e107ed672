use std::collections::BTreeMap;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::models::{joints, Side, Skeleton};

use super::vectors::{angle_between_vectors, elevation_from_horizontal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JointAngleName {
    LeftKneeAngle,
    RightKneeAngle,
    LeftHipAngle,
    RightHipAngle,
    TorsoAngle,
    LeftThighHorizontalAngle,
    RightThighHorizontalAngle,
}

impl JointAngleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            JointAngleName::LeftKneeAngle => "leftKneeAngle",
            JointAngleName::RightKneeAngle => "rightKneeAngle",
            JointAngleName::LeftHipAngle => "leftHipAngle",
            JointAngleName::RightHipAngle => "rightHipAngle",
            JointAngleName::TorsoAngle => "torsoAngle",
            JointAngleName::LeftThighHorizontalAngle => "leftThighHorizontalAngle",
            JointAngleName::RightThighHorizontalAngle => "rightThighHorizontalAngle",
        }
    }

    fn knee(side: Side) -> Self {
        match side {
            Side::Left => JointAngleName::LeftKneeAngle,
            Side::Right => JointAngleName::RightKneeAngle,
        }
    }

    fn hip(side: Side) -> Self {
        match side {
            Side::Left => JointAngleName::LeftHipAngle,
            Side::Right => JointAngleName::RightHipAngle,
        }
    }

    fn thigh_horizontal(side: Side) -> Self {
        match side {
            Side::Left => JointAngleName::LeftThighHorizontalAngle,
            Side::Right => JointAngleName::RightThighHorizontalAngle,
        }
    }
}

/// Named joint angles (degrees) for one frame.
///
/// An angle is present only when every joint it needs was tracked; there is no
/// default value at this layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointAngles(BTreeMap<JointAngleName, f32>);

impl JointAngles {
    pub fn get(&self, name: JointAngleName) -> Option<f32> {
        self.0.get(&name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointAngleName, f32)> + '_ {
        self.0.iter().map(|(name, value)| (*name, *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(JointAngleName, f32)> for JointAngles {
    fn from_iter<I: IntoIterator<Item = (JointAngleName, f32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Computes every angle the skeleton has joints for.
pub fn compute_joint_angles(skeleton: &Skeleton) -> JointAngles {
    let mut angles = BTreeMap::new();

    for side in [Side::Left, Side::Right] {
        if let Some(angle) = knee_angle(skeleton, side) {
            angles.insert(JointAngleName::knee(side), angle);
        }
        if let Some(angle) = hip_angle(skeleton, side) {
            angles.insert(JointAngleName::hip(side), angle);
        }
        if let Some(angle) = thigh_horizontal_angle(skeleton, side) {
            angles.insert(JointAngleName::thigh_horizontal(side), angle);
        }
    }

    if let Some(angle) = torso_angle(skeleton) {
        angles.insert(JointAngleName::TorsoAngle, angle);
    }

    JointAngles(angles)
}

/// Angles for a tracking frame, taken from its first tracked skeleton.
pub fn compute_frame_angles(skeletons: &[Skeleton]) -> JointAngles {
    skeletons
        .first()
        .map(compute_joint_angles)
        .unwrap_or_default()
}

/// Interior knee angle: ~180° with the leg straight, 90° at a right angle.
pub fn knee_angle(skeleton: &Skeleton, side: Side) -> Option<f32> {
    let hip = skeleton.joint_position(side.hip_joint())?;
    let knee = skeleton.joint_position(side.knee_joint())?;
    let ankle = skeleton.joint_position(side.ankle_joint())?;

    let thigh = knee - hip;
    let calf = ankle - knee;
    angle_between_vectors(&thigh, &calf).map(|raw| 180.0 - raw)
}

/// Interior hip angle between the spine and the thigh; ~180° when standing upright.
pub fn hip_angle(skeleton: &Skeleton, side: Side) -> Option<f32> {
    let spine = skeleton.joint_position(joints::SPINE_2)?;
    let hip = skeleton.joint_position(side.hip_joint())?;
    let knee = skeleton.joint_position(side.knee_joint())?;

    let spine_to_hip = hip - spine;
    let thigh = knee - hip;
    angle_between_vectors(&spine_to_hip, &thigh).map(|raw| 180.0 - raw)
}

/// Lean of the lower-to-upper spine from world vertical; 0° is upright.
pub fn torso_angle(skeleton: &Skeleton) -> Option<f32> {
    let lower = skeleton.joint_position(joints::SPINE_1)?;
    let upper = skeleton.joint_position(joints::SPINE_7)?;

    angle_between_vectors(&(upper - lower), &Vector3::y())
}

pub fn thigh_horizontal_angle(skeleton: &Skeleton, side: Side) -> Option<f32> {
    let hip = skeleton.joint_position(side.hip_joint())?;
    let knee = skeleton.joint_position(side.knee_joint())?;

    elevation_from_horizontal(&(knee - hip))
}
