use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// 中斷原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    /// 呼叫端主動取消（例如 Ctrl-C）
    Cancelled,
    /// 超過整體時間預算
    TimedOut,
}

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "operation cancelled"),
            Self::TimedOut => write!(f, "operation timed out"),
        }
    }
}

impl std::error::Error for Interrupted {}

/// 取消權杖
///
/// 共享同一個旗標的所有複本會同時被取消；
/// `with_deadline` 產生的權杖另外帶有截止時間。
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 產生共享旗標、但帶有截止時間的權杖
    ///
    /// 若原本已有更早的截止時間則保留較早者。
    #[must_use]
    pub fn with_deadline(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(existing) if existing < candidate => existing,
            _ => candidate,
        };
        Self {
            flag: Arc::clone(&self.flag),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// 已取消或逾時時回傳錯誤，錯誤本體為 [`Interrupted`]
    pub fn check(&self) -> anyhow::Result<()> {
        if self.is_cancelled() {
            return Err(Interrupted::Cancelled.into());
        }
        if self.is_expired() {
            return Err(Interrupted::TimedOut.into());
        }
        Ok(())
    }
}

/// 從錯誤鏈中找出中斷原因
#[must_use]
pub fn interruption_of(error: &anyhow::Error) -> Option<Interrupted> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<Interrupted>().copied())
}
