use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;

/// Capability interface over the host environment's sampling hooks. The
/// collector depends only on this trait.
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Allocated memory in bytes, `None` when unavailable this tick.
    fn sample_memory(&self) -> Option<u64>;

    /// Managed heap in use, `None` when unavailable this tick.
    fn sample_heap(&self) -> Option<u64>;

    /// Resolves at the next frame with its timestamp in milliseconds.
    async fn next_frame_timestamp(&self) -> f64;

    /// Stream of long-task durations in milliseconds. `None` makes the
    /// collector fall back to flagging stalled frames.
    fn observe_long_tasks(&self) -> Option<UnboundedReceiver<f64>>;

    /// Wall-clock milliseconds used to timestamp samples.
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn name(&self) -> String {
        "custom source".to_string()
    }
}

pub const FRAME_PERIOD: Duration = Duration::from_nanos(16_666_667);

/// Samples an OS process through `sysinfo`.
///
/// Memory is the process' virtual size and heap its resident set. There is no
/// real frame clock outside a browser, so frames are ticks of a 60 Hz clock
/// anchored at construction; a frame that resolves late reflects a stalled
/// scheduler, which is what the FPS and stall series then show.
pub struct ProcessSource {
    pid: Pid,
    system: Mutex<System>,
    epoch: Instant,
}

impl ProcessSource {
    pub fn new(pid: u32) -> Self {
        Self {
            pid: Pid::from_u32(pid),
            system: Mutex::new(System::new()),
            epoch: Instant::now(),
        }
    }

    /// Like [`ProcessSource::new`], but fails when `pid` is not a running
    /// process.
    pub fn attach(pid: u32) -> Result<Self> {
        let source = Self::new(pid);
        if source.refresh(|_| ()).is_none() {
            return Err(AppError::Source(format!("no process with pid {}", pid)));
        }
        Ok(source)
    }

    pub fn current() -> Self {
        Self::new(std::process::id())
    }

    pub fn pid(&self) -> u32 {
        self.pid.as_u32()
    }

    fn refresh<T>(&self, read: impl Fn(&sysinfo::Process) -> T) -> Option<T> {
        let mut system = self.system.lock().ok()?;
        system.refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);
        system.process(self.pid).map(read)
    }
}

#[async_trait]
impl MetricSource for ProcessSource {
    fn sample_memory(&self) -> Option<u64> {
        self.refresh(|p| p.virtual_memory())
    }

    fn sample_heap(&self) -> Option<u64> {
        self.refresh(|p| p.memory())
    }

    async fn next_frame_timestamp(&self) -> f64 {
        let period = FRAME_PERIOD.as_nanos();
        let elapsed = self.epoch.elapsed().as_nanos();
        let next_frame = (elapsed / period + 1) * period;
        let deadline = self.epoch + Duration::from_nanos(next_frame as u64);

        tokio::time::sleep_until(deadline).await;
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    fn observe_long_tasks(&self) -> Option<UnboundedReceiver<f64>> {
        None
    }

    fn name(&self) -> String {
        format!("process {}", self.pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_process_reports_memory() {
        let source = ProcessSource::current();
        assert!(source.sample_heap().unwrap_or(0) > 0);
        assert!(source.sample_memory().is_some());
        assert!(source.observe_long_tasks().is_none());
        assert_eq!(source.name(), format!("process {}", std::process::id()));
    }

    #[test]
    fn test_missing_process_is_unavailable() {
        let source = ProcessSource::new(u32::MAX - 1);
        assert_eq!(source.sample_memory(), None);
        assert_eq!(source.sample_heap(), None);
    }

    #[test]
    fn test_attach_checks_the_process_exists() {
        let source = ProcessSource::attach(std::process::id()).unwrap();
        assert_eq!(source.pid(), std::process::id());

        let err = ProcessSource::attach(u32::MAX - 1).err().unwrap();
        assert!(matches!(err, AppError::Source(_)));
    }

    #[test]
    fn test_frames_advance() {
        let source = ProcessSource::current();
        let (first, second) = tokio_test::block_on(async {
            let first = source.next_frame_timestamp().await;
            let second = source.next_frame_timestamp().await;
            (first, second)
        });
        assert!(second > first);
    }
}
