use crate::metrics::source::MetricSource;
use crate::metrics::store::SeriesStore;
use crate::metrics::window::clamp_interval_ms;
use crate::session::SeriesKind;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;

/// Frame gaps longer than this count as long tasks when the source has no
/// long-task stream.
pub const STALL_THRESHOLD_MS: f64 = 80.0;

struct CollectorTasks {
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

/// Runs the sampling loops that feed a [`SeriesStore`]: memory/heap polling at
/// the configured interval, frame timing, and long-task observation.
pub struct MetricsCollector {
    source: Arc<dyn MetricSource>,
    store: Arc<RwLock<SeriesStore>>,
    interval_ms: Arc<AtomicU64>,
    tick_count: Arc<AtomicU64>,
    tasks: Option<CollectorTasks>,
}

impl MetricsCollector {
    pub fn new(
        source: Arc<dyn MetricSource>,
        store: Arc<RwLock<SeriesStore>>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            store,
            interval_ms: Arc::new(AtomicU64::new(clamp_interval_ms(
                interval.as_millis() as u64,
            ))),
            tick_count: Arc::new(AtomicU64::new(0)),
            tasks: None,
        }
    }

    pub fn source_name(&self) -> String {
        self.source.name()
    }

    pub fn now_millis(&self) -> i64 {
        self.source.now_millis()
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.load(Ordering::Relaxed))
    }

    /// Clamps to 100..=2000 ms; a running poll loop picks it up on its next
    /// tick.
    pub fn set_interval(&self, interval: Duration) -> Duration {
        let ms = clamp_interval_ms(interval.as_millis() as u64);
        self.interval_ms.store(ms, Ordering::Relaxed);
        Duration::from_millis(ms)
    }

    pub fn is_running(&self) -> bool {
        self.tasks.is_some()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    /// Spawns the sampling loops. Does nothing if they are already running.
    pub fn start(&mut self) {
        if self.tasks.is_some() {
            return;
        }

        let (shutdown, _) = watch::channel(false);

        let handles = vec![
            tokio::spawn(poll_memory(
                self.source.clone(),
                self.store.clone(),
                self.interval_ms.clone(),
                self.tick_count.clone(),
                shutdown.subscribe(),
            )),
            tokio::spawn(track_frames(
                self.source.clone(),
                self.store.clone(),
                shutdown.subscribe(),
            )),
            tokio::spawn(observe_long_tasks(
                self.source.clone(),
                self.store.clone(),
                shutdown.subscribe(),
            )),
        ];

        tracing::info!(
            source = %self.source.name(),
            interval_ms = self.interval_ms.load(Ordering::Relaxed),
            "collector started"
        );
        self.tasks = Some(CollectorTasks { shutdown, handles });
    }

    /// Signals every loop to finish and waits for them.
    pub async fn stop(&mut self) {
        let Some(tasks) = self.tasks.take() else {
            return;
        };

        let _ = tasks.shutdown.send(true);
        for handle in tasks.handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "collector task ended abnormally");
            }
        }
        tracing::info!(source = %self.source.name(), "collector stopped");
    }

    /// Takes one memory/heap sample without starting the loops.
    pub async fn collect_once(&self) {
        sample_memory(self.source.as_ref(), &self.store).await;
    }
}

async fn sample_memory(source: &dyn MetricSource, store: &RwLock<SeriesStore>) {
    let now = source.now_millis();
    let memory = source.sample_memory();
    let heap = source.sample_heap();

    if memory.is_none() && heap.is_none() {
        tracing::trace!("no memory metrics available this tick");
        return;
    }

    let mut store = store.write().await;
    if let Some(bytes) = memory {
        store.record(SeriesKind::MemoryBytes, now, bytes as f64);
    }
    if let Some(bytes) = heap {
        store.record(SeriesKind::HeapBytes, now, bytes as f64);
    }
}

async fn poll_memory(
    source: Arc<dyn MetricSource>,
    store: Arc<RwLock<SeriesStore>>,
    interval_ms: Arc<AtomicU64>,
    tick_count: Arc<AtomicU64>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        sample_memory(source.as_ref(), &store).await;
        tick_count.fetch_add(1, Ordering::Relaxed);

        let delay = Duration::from_millis(interval_ms.load(Ordering::Relaxed));
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.changed() => break,
        }
    }
}

async fn track_frames(
    source: Arc<dyn MetricSource>,
    store: Arc<RwLock<SeriesStore>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut last = tokio::select! {
        t = source.next_frame_timestamp() => t,
        _ = shutdown.changed() => return,
    };

    loop {
        let t = tokio::select! {
            t = source.next_frame_timestamp() => t,
            _ = shutdown.changed() => break,
        };
        let dt = (t - last).max(1.0);
        last = t;

        store
            .write()
            .await
            .record(SeriesKind::FpsEstimate, source.now_millis(), 1000.0 / dt);
    }
}

async fn observe_long_tasks(
    source: Arc<dyn MetricSource>,
    store: Arc<RwLock<SeriesStore>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let Some(mut events) = source.observe_long_tasks() else {
        detect_stalls(source, store, shutdown).await;
        return;
    };

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(duration) => {
                    store
                        .write()
                        .await
                        .record(SeriesKind::LongTaskMs, source.now_millis(), duration);
                }
                None => {
                    tracing::debug!("long-task stream closed");
                    break;
                }
            },
            _ = shutdown.changed() => break,
        }
    }
}

async fn detect_stalls(
    source: Arc<dyn MetricSource>,
    store: Arc<RwLock<SeriesStore>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut last = tokio::select! {
        t = source.next_frame_timestamp() => t,
        _ = shutdown.changed() => return,
    };

    loop {
        let t = tokio::select! {
            t = source.next_frame_timestamp() => t,
            _ = shutdown.changed() => break,
        };
        let dt = t - last;
        last = t;

        if dt > STALL_THRESHOLD_MS {
            tracing::debug!(gap_ms = dt, "frame stall");
            store
                .write()
                .await
                .record(SeriesKind::LongTaskMs, source.now_millis(), dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use tokio::time::Instant;

    struct ScriptedSource {
        epoch: Instant,
        frame_gap: Duration,
        heap_available: bool,
        memory_calls: AtomicU64,
        long_tasks: Mutex<Option<UnboundedReceiver<f64>>>,
    }

    impl ScriptedSource {
        fn new(frame_gap: Duration) -> Self {
            Self {
                epoch: Instant::now(),
                frame_gap,
                heap_available: false,
                memory_calls: AtomicU64::new(0),
                long_tasks: Mutex::new(None),
            }
        }

        fn with_long_tasks(self, events: UnboundedReceiver<f64>) -> Self {
            *self.long_tasks.lock().unwrap() = Some(events);
            self
        }
    }

    #[async_trait]
    impl MetricSource for ScriptedSource {
        fn sample_memory(&self) -> Option<u64> {
            let calls = self.memory_calls.fetch_add(1, Ordering::SeqCst) + 1;
            Some(calls * 1024)
        }

        fn sample_heap(&self) -> Option<u64> {
            self.heap_available.then_some(512)
        }

        async fn next_frame_timestamp(&self) -> f64 {
            tokio::time::sleep(self.frame_gap).await;
            self.epoch.elapsed().as_secs_f64() * 1000.0
        }

        fn observe_long_tasks(&self) -> Option<UnboundedReceiver<f64>> {
            self.long_tasks.lock().unwrap().take()
        }

        fn now_millis(&self) -> i64 {
            self.epoch.elapsed().as_millis() as i64
        }
    }

    fn collector_for(source: Arc<ScriptedSource>) -> (MetricsCollector, Arc<RwLock<SeriesStore>>) {
        let store = Arc::new(RwLock::new(SeriesStore::new(1000).unwrap()));
        let collector = MetricsCollector::new(source, store.clone(), Duration::from_millis(100));
        (collector, store)
    }

    #[tokio::test]
    async fn test_collect_once_skips_unavailable_heap() {
        let source = Arc::new(ScriptedSource::new(Duration::from_millis(10)));
        let (collector, store) = collector_for(source);

        collector.collect_once().await;

        let store = store.read().await;
        assert_eq!(store.series(SeriesKind::MemoryBytes).len(), 1);
        assert!(store.series(SeriesKind::HeapBytes).is_empty());
        assert_eq!(
            store.series(SeriesKind::MemoryBytes).last().map(|s| s.value),
            Some(1024.0)
        );
    }

    #[tokio::test]
    async fn test_continuous_collection() {
        let source = Arc::new(ScriptedSource::new(Duration::from_millis(10)));
        let (mut collector, store) = collector_for(source);

        collector.start();
        tokio::time::sleep(Duration::from_millis(350)).await;
        collector.stop().await;

        let store = store.read().await;
        assert!(store.series(SeriesKind::MemoryBytes).len() >= 2);
        assert!(store.series(SeriesKind::FpsEstimate).len() >= 5);
        assert!(store.series(SeriesKind::HeapBytes).is_empty());
        assert!(store.series(SeriesKind::LongTaskMs).is_empty());
        assert!(collector.tick_count() >= 2);

        let fps = store.series(SeriesKind::FpsEstimate).snapshot();
        assert!(fps.iter().all(|s| s.value > 0.0 && s.value <= 1000.0));
    }

    #[tokio::test]
    async fn test_stalled_frames_become_long_tasks() {
        let source = Arc::new(ScriptedSource::new(Duration::from_millis(100)));
        let (mut collector, store) = collector_for(source);

        collector.start();
        tokio::time::sleep(Duration::from_millis(450)).await;
        collector.stop().await;

        let long_tasks = store.read().await.series(SeriesKind::LongTaskMs).snapshot();
        assert!(long_tasks.len() >= 2);
        assert!(long_tasks.iter().all(|s| s.value > STALL_THRESHOLD_MS));
    }

    #[tokio::test]
    async fn test_long_task_stream_is_recorded() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(120.0).unwrap();
        tx.send(95.5).unwrap();

        let source = Arc::new(
            ScriptedSource::new(Duration::from_millis(200)).with_long_tasks(rx),
        );
        let (mut collector, store) = collector_for(source);

        collector.start();
        tokio::time::sleep(Duration::from_millis(100)).await;
        collector.stop().await;

        let values: Vec<f64> = store
            .read()
            .await
            .series(SeriesKind::LongTaskMs)
            .iter()
            .map(|s| s.value)
            .collect();
        assert_eq!(values, vec![120.0, 95.5]);
    }

    #[tokio::test]
    async fn test_start_is_idempotent_and_stop_halts_loops() {
        let source = Arc::new(ScriptedSource::new(Duration::from_millis(10)));
        let (mut collector, _store) = collector_for(source.clone());

        collector.start();
        collector.start();
        assert!(collector.is_running());

        tokio::time::sleep(Duration::from_millis(250)).await;
        collector.stop().await;
        assert!(!collector.is_running());

        let calls = source.memory_calls.load(Ordering::SeqCst);
        // a single poll loop at 100ms cannot exceed four samples in 250ms
        assert!((1..=4).contains(&calls));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(source.memory_calls.load(Ordering::SeqCst), calls);

        collector.start();
        assert!(collector.is_running());
        collector.stop().await;
        collector.stop().await;
        assert!(!collector.is_running());
    }

    #[tokio::test]
    async fn test_set_interval_clamps() {
        let source = Arc::new(ScriptedSource::new(Duration::from_millis(10)));
        let (collector, _store) = collector_for(source);

        assert_eq!(
            collector.set_interval(Duration::from_millis(10)),
            Duration::from_millis(100)
        );
        assert_eq!(
            collector.set_interval(Duration::from_secs(5)),
            Duration::from_millis(2000)
        );
        assert_eq!(collector.interval(), Duration::from_millis(2000));
    }
}
