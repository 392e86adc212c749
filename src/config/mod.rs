pub mod load;
pub mod save;
pub mod types;

pub use load::SETTINGS_FILE;
pub use save::{add_recent_video, save_settings};
pub use types::{Config, MAX_RECENT_VIDEOS, SelectorConfig, UserSettings};
