use thiserror::Error;

use crate::geometry::JointAngleName;
use crate::models::{EvaluationResult, FrameRecord};

use super::config::SquatFormRules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("no standing position found")]
    NoStandingPosition,
    #[error("no bottom position found")]
    NoBottomPosition,
}

/// The two values the rubric looks at for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    pub average_knee_angle: f32,
    pub torso_angle: f32,
}

/// Missing knee angles count as a straight leg and a missing torso angle as upright.
pub fn sample_frame(frame: &FrameRecord, rules: &SquatFormRules) -> FrameSample {
    let angles = &frame.joint_angles;
    let left = angles
        .get(JointAngleName::LeftKneeAngle)
        .unwrap_or(rules.absent_knee_angle);
    let right = angles
        .get(JointAngleName::RightKneeAngle)
        .unwrap_or(rules.absent_knee_angle);

    FrameSample {
        average_knee_angle: (left + right) / 2.0,
        torso_angle: angles
            .get(JointAngleName::TorsoAngle)
            .unwrap_or(rules.absent_torso_angle),
    }
}

/// First and last standing frame indices. Every repetition between them falls
/// into the one window.
pub fn standing_window(samples: &[FrameSample], rules: &SquatFormRules) -> Option<(usize, usize)> {
    let is_standing = |sample: &FrameSample| rules.is_standing(sample.average_knee_angle);
    let first = samples.iter().position(is_standing)?;
    let last = samples.iter().rposition(is_standing)?;
    Some((first, last))
}

/// Scores the bottom-of-squat frames of a completed recording.
pub fn evaluate_squat(
    frames: &[FrameRecord],
    rules: &SquatFormRules,
) -> Result<EvaluationResult, EvaluationError> {
    let samples: Vec<FrameSample> = frames
        .iter()
        .map(|frame| sample_frame(frame, rules))
        .collect();

    let (start, end) = standing_window(&samples, rules).ok_or(EvaluationError::NoStandingPosition)?;

    let bottom: Vec<&FrameSample> = samples[start..=end]
        .iter()
        .filter(|sample| rules.is_at_depth(sample.average_knee_angle))
        .collect();
    if bottom.is_empty() {
        return Err(EvaluationError::NoBottomPosition);
    }

    let mut correct_frames = 0usize;
    let mut knee_sum = 0.0f64;
    let mut knee_deviation_sum = 0.0f64;
    let mut torso_deviation_sum = 0.0f64;

    for sample in &bottom {
        let knee = sample.average_knee_angle;
        let torso = sample.torso_angle;

        if rules.is_at_depth(knee) && rules.is_torso_acceptable(torso) {
            correct_frames += 1;
        }

        knee_sum += f64::from(knee);
        knee_deviation_sum += f64::from((knee - rules.ideal_knee_angle).abs());
        torso_deviation_sum += f64::from((torso - rules.ideal_torso_angle).max(0.0));
    }

    let count = bottom.len() as f64;
    let correctness_percentage = (100.0 * correct_frames as f64 / count) as f32;

    Ok(EvaluationResult {
        correctness_percentage,
        average_knee_angle_at_bottom: (knee_sum / count) as f32,
        average_knee_deviation: (knee_deviation_sum / count) as f32,
        average_torso_deviation: (torso_deviation_sum / count) as f32,
        perfect_form_achieved: correctness_percentage == 100.0,
        bottom_frame_count: bottom.len(),
        correct_frame_count: correct_frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::JointAngles;

    fn record(index: usize, knee: f32, torso: f32) -> FrameRecord {
        let joint_angles: JointAngles = [
            (JointAngleName::LeftKneeAngle, knee),
            (JointAngleName::RightKneeAngle, knee),
            (JointAngleName::TorsoAngle, torso),
        ]
        .into_iter()
        .collect();

        FrameRecord {
            timestamp: index as f64 / 30.0,
            skeleton_data: Vec::new(),
            joint_angles,
        }
    }

    fn log(knees: &[f32], torso: f32) -> Vec<FrameRecord> {
        knees
            .iter()
            .enumerate()
            .map(|(i, knee)| record(i, *knee, torso))
            .collect()
    }

    const SQUAT: [f32; 10] = [150.0, 150.0, 90.0, 85.0, 95.0, 90.0, 85.0, 150.0, 150.0, 150.0];

    #[test]
    fn single_clean_repetition_is_perfect() {
        let result = evaluate_squat(&log(&SQUAT, 10.0), &SquatFormRules::default()).unwrap();

        assert_eq!(result.correctness_percentage, 100.0);
        assert!(result.perfect_form_achieved);
        assert_eq!(result.average_knee_angle_at_bottom, 89.0);
        assert_eq!(result.average_knee_deviation, 4.0);
        assert_eq!(result.average_torso_deviation, 10.0);
        assert_eq!(result.bottom_frame_count, 5);
        assert_eq!(result.correct_frame_count, 5);
    }

    #[test]
    fn excessive_lean_fails_every_bottom_frame() {
        let result = evaluate_squat(&log(&SQUAT, 50.0), &SquatFormRules::default()).unwrap();

        assert_eq!(result.correctness_percentage, 0.0);
        assert!(!result.perfect_form_achieved);
        assert_eq!(result.correct_frame_count, 0);
        assert_eq!(result.average_torso_deviation, 50.0);
    }

    #[test]
    fn partially_correct_repetition() {
        let mut frames = log(&SQUAT, 10.0);
        frames[3] = record(3, 85.0, 60.0);

        let result = evaluate_squat(&frames, &SquatFormRules::default()).unwrap();

        assert_eq!(result.correctness_percentage, 80.0);
        assert!(!result.perfect_form_achieved);
        assert_eq!(result.headline(), "Needs Improvement! Correctness: 80.00%");
    }

    #[test]
    fn empty_log_has_no_result() {
        assert_eq!(
            evaluate_squat(&[], &SquatFormRules::default()),
            Err(EvaluationError::NoStandingPosition)
        );
    }

    #[test]
    fn never_standing_has_no_result() {
        assert_eq!(
            evaluate_squat(&log(&[90.0, 85.0, 120.0], 0.0), &SquatFormRules::default()),
            Err(EvaluationError::NoStandingPosition)
        );
    }

    #[test]
    fn all_standing_has_no_bottom() {
        assert_eq!(
            evaluate_squat(&log(&[150.0, 170.0, 165.0], 0.0), &SquatFormRules::default()),
            Err(EvaluationError::NoBottomPosition)
        );
    }

    #[test]
    fn depth_frames_outside_standing_window_are_ignored() {
        let frames = log(&[90.0, 150.0, 85.0, 150.0, 95.0], 0.0);
        let result = evaluate_squat(&frames, &SquatFormRules::default()).unwrap();

        assert_eq!(result.bottom_frame_count, 1);
        assert_eq!(result.average_knee_angle_at_bottom, 85.0);
    }

    #[test]
    fn multiple_repetitions_share_one_window() {
        let frames = log(&[150.0, 90.0, 150.0, 80.0, 150.0], 0.0);
        let result = evaluate_squat(&frames, &SquatFormRules::default()).unwrap();

        assert_eq!(result.bottom_frame_count, 2);
        assert_eq!(result.average_knee_angle_at_bottom, 85.0);
        assert_eq!(result.average_knee_deviation, 5.0);
    }

    #[test]
    fn depth_range_is_inclusive() {
        let frames = log(&[150.0, 70.0, 100.0, 69.9, 100.1, 150.0], 0.0);
        let result = evaluate_squat(&frames, &SquatFormRules::default()).unwrap();

        assert_eq!(result.bottom_frame_count, 2);
        assert!(result.perfect_form_achieved);
    }

    #[test]
    fn missing_angles_fall_back_to_straight_and_upright() {
        let rules = SquatFormRules::default();
        let empty = FrameRecord {
            timestamp: 0.0,
            skeleton_data: Vec::new(),
            joint_angles: JointAngles::default(),
        };
        assert_eq!(
            sample_frame(&empty, &rules),
            FrameSample {
                average_knee_angle: 180.0,
                torso_angle: 0.0,
            }
        );

        let one_side = FrameRecord {
            timestamp: 0.0,
            skeleton_data: Vec::new(),
            joint_angles: [(JointAngleName::LeftKneeAngle, 90.0)].into_iter().collect(),
        };
        assert_eq!(sample_frame(&one_side, &rules).average_knee_angle, 135.0);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let frames = log(&[150.0, 91.3, 77.7, 99.9, 88.8, 150.0], 12.5);
        let rules = SquatFormRules::default();

        let first = evaluate_squat(&frames, &rules).unwrap();
        let second = evaluate_squat(&frames, &rules).unwrap();

        assert_eq!(
            first.correctness_percentage.to_bits(),
            second.correctness_percentage.to_bits()
        );
        assert_eq!(
            first.average_knee_deviation.to_bits(),
            second.average_knee_deviation.to_bits()
        );
        assert_eq!(first, second);
    }

    #[test]
    fn standing_window_finds_outermost_standing_frames() {
        let rules = SquatFormRules::default();
        let samples: Vec<FrameSample> = log(&SQUAT, 0.0)
            .iter()
            .map(|f| sample_frame(f, &rules))
            .collect();
        assert_eq!(standing_window(&samples, &rules), Some((0, 9)));
    }
}
