use anyhow::{Context, Result};
use console::style;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use keyframe_selector::config::{Config, SETTINGS_FILE, add_recent_video, save_settings};
use keyframe_selector::init;
use keyframe_selector::signal::setup_shutdown_signal;
use keyframe_selector::tools::validate_video_file;
use keyframe_selector::{
    ArtifactMode, KeyframeSelector, SelectOptions, SelectionOutcome, SelectionResult,
};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

fn main() -> Result<ExitCode> {
    init::init();
    let cancellation = setup_shutdown_signal()?;

    let mut config = Config::new()?;
    let video_path = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => prompt_video_path(config.settings.recent_videos.first())?,
    };
    validate_video_file(&video_path)?;

    let artifacts = config
        .settings
        .persist_directory
        .clone()
        .map_or(ArtifactMode::Ephemeral, ArtifactMode::Persist);

    let selector =
        KeyframeSelector::with_ffmpeg(&config.settings.ffmpeg_path, &config.settings.ffprobe_path);
    let options = SelectOptions {
        cancellation,
        artifacts,
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("選取關鍵畫面中: {}", video_path.display()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = selector.select(&video_path, &config.settings.selector, &options);
    spinner.finish_and_clear();

    print_summary(&video_path, &result);
    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("無法輸出選取結果")?
    );

    add_recent_video(&mut config.settings, &video_path.to_string_lossy());
    if let Err(e) = save_settings(&config.settings, Path::new(SETTINGS_FILE)) {
        warn!("無法儲存設定: {e:#}");
    }

    info!("Program exited normally");
    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn prompt_video_path(recent: Option<&String>) -> Result<PathBuf> {
    let mut input = Input::<String>::new().with_prompt("請輸入影片路徑");
    if let Some(recent) = recent {
        input = input.default(recent.clone());
    }
    let path = input.interact_text()?;
    Ok(PathBuf::from(path.trim()))
}

fn print_summary(video_path: &Path, result: &SelectionResult) {
    println!();
    println!("{}", style("=== 關鍵畫面選取摘要 ===").cyan().bold());
    println!("  影片: {}", video_path.display());

    match result.outcome {
        SelectionOutcome::Completed => {
            let stats = &result.stats;
            println!("  場景: {}", stats.scene_count);
            println!(
                "  候選: {} → 黑畫面 {} → 模糊 {} → 去重 {} → 最終 {}",
                stats.candidate_count,
                stats.after_black_filter,
                stats.after_blur_filter,
                stats.after_dedupe,
                style(stats.final_count).green()
            );
            println!("  耗時: {} ms", stats.elapsed_ms);
            for frame in &result.frames {
                println!(
                    "  {} {:>9.3}s  {}",
                    style("✓").green(),
                    frame.timestamp_sec,
                    frame.image_path.display()
                );
            }
        }
        SelectionOutcome::Cancelled => println!("  {}", style("已取消").yellow()),
        SelectionOutcome::Failed => println!("  {}", style("選取失敗").red()),
    }

    for warning in &result.warnings {
        println!("  {} {}", style("!").yellow(), style(warning).dim());
    }
}
