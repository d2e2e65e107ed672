pub mod controller;
pub mod events;
pub mod state;

pub use controller::{RecorderController, RecordingOutcome};
pub use events::RecorderEvent;
pub use state::{RecorderState, RecordingStatus};
