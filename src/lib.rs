pub mod component;
pub mod config;
pub mod init;
pub mod signal;
pub mod tools;

pub use component::keyframe_selector::{
    ArtifactMode, KeyframeRecord, KeyframeSelector, MediaBackend, SelectOptions,
    SelectionOutcome, SelectionResult, SelectionStats, select_keyframes,
};
pub use config::SelectorConfig;
pub use tools::CancellationToken;
