use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub correctness_percentage: f32,
    pub average_knee_angle_at_bottom: f32,
    pub average_knee_deviation: f32,
    pub average_torso_deviation: f32,
    pub perfect_form_achieved: bool,
    pub bottom_frame_count: usize,
    pub correct_frame_count: usize,
}

impl EvaluationResult {
    pub fn headline(&self) -> String {
        if self.perfect_form_achieved {
            "Perfect form! 100% of the bottom squat frames were correct.".to_string()
        } else {
            format!(
                "Needs Improvement! Correctness: {:.2}%",
                self.correctness_percentage
            )
        }
    }

    pub fn detail_lines(&self) -> Vec<String> {
        vec![
            format!(
                "Average knee angle at bottom: {:.2}°",
                self.average_knee_angle_at_bottom
            ),
            format!("Average knee deviation: {:.2}°", self.average_knee_deviation),
            format!("Average torso deviation: {:.2}°", self.average_torso_deviation),
        ]
    }
}
