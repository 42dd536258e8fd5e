use crate::error::Result;
use crate::metrics::ring_buffer::RingBuffer;
use crate::session::{Mark, Sample, SeriesKind, Session};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Immutable view of the store at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub series: BTreeMap<SeriesKind, Vec<Sample>>,
    pub marks: Vec<Mark>,
}

impl StoreSnapshot {
    pub fn series(&self, kind: SeriesKind) -> &[Sample] {
        self.series.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone)]
pub struct SeriesStore {
    memory_history: RingBuffer<Sample>,
    heap_history: RingBuffer<Sample>,
    long_task_history: RingBuffer<Sample>,
    fps_history: RingBuffer<Sample>,
    marks: Vec<Mark>,
}

impl SeriesStore {
    pub fn new(history_size: usize) -> Result<Self> {
        Ok(Self {
            memory_history: RingBuffer::new(history_size)?,
            heap_history: RingBuffer::new(history_size)?,
            long_task_history: RingBuffer::new(history_size)?,
            fps_history: RingBuffer::new(history_size)?,
            marks: Vec::new(),
        })
    }

    pub fn series(&self, kind: SeriesKind) -> &RingBuffer<Sample> {
        match kind {
            SeriesKind::MemoryBytes => &self.memory_history,
            SeriesKind::HeapBytes => &self.heap_history,
            SeriesKind::LongTaskMs => &self.long_task_history,
            SeriesKind::FpsEstimate => &self.fps_history,
        }
    }

    fn series_mut(&mut self, kind: SeriesKind) -> &mut RingBuffer<Sample> {
        match kind {
            SeriesKind::MemoryBytes => &mut self.memory_history,
            SeriesKind::HeapBytes => &mut self.heap_history,
            SeriesKind::LongTaskMs => &mut self.long_task_history,
            SeriesKind::FpsEstimate => &mut self.fps_history,
        }
    }

    pub fn record(&mut self, kind: SeriesKind, timestamp: i64, value: f64) {
        self.series_mut(kind).push(Sample::new(timestamp, value));
    }

    pub fn add_mark(&mut self, now: i64, label: impl Into<String>) {
        self.marks.push(Mark::new(now, label));
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            series: SeriesKind::iter()
                .map(|kind| (kind, self.series(kind).snapshot()))
                .collect(),
            marks: self.marks.clone(),
        }
    }

    pub fn clear(&mut self) {
        for kind in SeriesKind::iter() {
            self.series_mut(kind).clear();
        }
        self.marks.clear();
    }

    /// Replaces the current contents with the session's series and marks, in
    /// the order they appear in the session.
    pub fn load_session(&mut self, session: &Session) {
        self.clear();
        for (kind, samples) in &session.series {
            let buffer = self.series_mut(*kind);
            for sample in samples {
                buffer.push(*sample);
            }
        }
        self.marks.extend(session.marks.iter().cloned());

        tracing::info!(
            samples = self.total_samples(),
            marks = self.marks.len(),
            "loaded session into store"
        );
    }

    pub fn capacity(&self) -> usize {
        self.memory_history.capacity()
    }

    pub fn total_samples(&self) -> usize {
        SeriesKind::iter().map(|kind| self.series(kind).len()).sum()
    }
}
