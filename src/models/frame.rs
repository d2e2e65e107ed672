use serde::{Deserialize, Serialize};

use crate::capture::CameraImage;
use crate::geometry::JointAngles;

use super::skeleton::Skeleton;

/// A single event from the body-tracking subsystem.
#[derive(Debug, Clone)]
pub struct TrackingFrame {
    /// Source timestamp in seconds; monotonically increasing across a tracking session.
    pub timestamp: f64,
    pub skeletons: Vec<Skeleton>,
    pub image: CameraImage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointPosition {
    pub name: String,
    pub position: [f32; 3],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonPositions {
    pub joints: Vec<JointPosition>,
}

impl SkeletonPositions {
    /// Joints whose position is not finite are left out; JSON has no encoding for them.
    pub fn from_skeleton(skeleton: &Skeleton) -> Self {
        let joints = skeleton
            .joints
            .iter()
            .filter_map(|joint| {
                let p = joint.position();
                p.iter().all(|v| v.is_finite()).then(|| JointPosition {
                    name: joint.name.clone(),
                    position: [p.x, p.y, p.z],
                })
            })
            .collect();

        Self { joints }
    }
}

/// Per-frame skeletal record kept in the recording's frame log.
///
/// The serde layout is the on-disk JSON artifact format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRecord {
    pub timestamp: f64,
    pub skeleton_data: Vec<SkeletonPositions>,
    pub joint_angles: JointAngles,
}
