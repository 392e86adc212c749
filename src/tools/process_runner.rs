use crate::tools::CancellationToken;
use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// 子程序輪詢間隔
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// 子程序執行結果
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    #[must_use]
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// 執行外部程序，並在權杖觸發時終止它
///
/// stdout 與 stderr 由獨立執行緒讀取，避免管線緩衝區塞滿造成死鎖。
pub fn run_with_cancellation(
    mut command: Command,
    token: &CancellationToken,
) -> Result<ProcessOutput> {
    token.check()?;

    let program = command.get_program().to_string_lossy().into_owned();
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("無法啟動 {program}"))?;

    let stdout_reader = spawn_reader(child.stdout.take());
    let stderr_reader = spawn_reader(child.stderr.take());

    let status = loop {
        if let Err(interrupted) = token.check() {
            terminate(&mut child, &program);
            // 孫程序可能仍持有管線，不等待讀取執行緒
            drop(stdout_reader);
            drop(stderr_reader);
            return Err(interrupted.context(format!("{program} 已被中斷")));
        }

        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                terminate(&mut child, &program);
                return Err(e).with_context(|| format!("無法等待 {program}"));
            }
        }
    };

    let stdout = join_reader(stdout_reader)?;
    let stderr = join_reader(stderr_reader)?;
    debug!(
        "{program} 結束: {status}, stdout {} bytes, stderr {} bytes",
        stdout.len(),
        stderr.len()
    );

    Ok(ProcessOutput {
        status,
        stdout,
        stderr,
    })
}

fn spawn_reader<R: Read + Send + 'static>(
    pipe: Option<R>,
) -> Option<JoinHandle<std::io::Result<Vec<u8>>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            pipe.read_to_end(&mut buffer)?;
            Ok(buffer)
        })
    })
}

fn join_reader(handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> Result<Vec<u8>> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| anyhow!("讀取子程序輸出的執行緒異常結束"))?
            .context("讀取子程序輸出失敗"),
        None => Ok(Vec::new()),
    }
}

fn terminate(child: &mut Child, program: &str) {
    if let Err(e) = child.kill() {
        warn!("無法終止 {program}: {e}");
    }
    if let Err(e) = child.wait() {
        warn!("無法回收 {program}: {e}");
    }
}
