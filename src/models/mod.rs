pub mod evaluation;
pub mod frame;
pub mod skeleton;

pub use evaluation::EvaluationResult;
pub use frame::{FrameRecord, JointPosition, SkeletonPositions, TrackingFrame};
pub use skeleton::{joints, JointTransform, Side, Skeleton};
