pub mod artifact;
pub mod library;
pub mod paths;

pub use artifact::{load_frames, save_frames};
pub use library::{list_recordings, RecordedItem};
pub use paths::RecordingPaths;
