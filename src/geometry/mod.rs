pub mod angles;
pub mod vectors;

pub use angles::{compute_frame_angles, compute_joint_angles, JointAngleName, JointAngles};
pub use vectors::angle_between_vectors;
