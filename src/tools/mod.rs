mod cancellation;
mod ffmpeg_command;
mod ffprobe_info;
mod path_validator;
mod process_runner;

pub use cancellation::{CancellationToken, Interrupted, interruption_of};
pub use ffmpeg_command::FfmpegCommand;
pub use ffprobe_info::{probe_duration, validate_duration};
pub use path_validator::{ensure_directory_exists, validate_video_file};
pub use process_runner::{ProcessOutput, run_with_cancellation};
