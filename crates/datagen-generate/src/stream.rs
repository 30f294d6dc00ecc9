use std::sync::Arc;
use std::time::Duration;

use datagen_core::Record;
use datagen_spec::SplitDescriptor;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::catalog::GeneratorCatalog;
use crate::errors::GenerationError;
use crate::producer::SplitProducer;

/// Settings for continuous generation.
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Pause between two full passes over the split.
    pub pause: Duration,
    /// Records buffered ahead of the consumer.
    pub channel_capacity: usize,
    /// Stop after this many passes; unbounded when absent.
    pub max_cycles: Option<u64>,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            pause: Duration::from_millis(1000),
            channel_capacity: 1024,
            max_cycles: None,
        }
    }
}

/// Totals reported when a stream ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamSummary {
    pub cycles: u64,
    pub records: u64,
}

/// Consumer side of a running stream.
pub struct StreamHandle {
    pub records: mpsc::Receiver<Record>,
    stop: watch::Sender<bool>,
    task: JoinHandle<Result<StreamSummary, GenerationError>>,
}

impl StreamHandle {
    /// Ask the runner to stop; it exits at its next poll point.
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }

    /// Wait for the runner to finish. Records not yet received are dropped,
    /// which also ends an unbounded runner at its next send.
    pub async fn join(self) -> Result<StreamSummary, GenerationError> {
        let Self {
            records,
            stop: _stop,
            task,
        } = self;
        drop(records);
        task.await
            .map_err(|err| GenerationError::StreamTask(err.to_string()))?
    }
}

/// Replays one split continuously until stopped.
pub struct StreamRunner;

impl StreamRunner {
    /// Spawn the runner on the current tokio runtime.
    pub fn spawn(
        catalog: Arc<GeneratorCatalog>,
        descriptor: SplitDescriptor,
        options: StreamOptions,
    ) -> StreamHandle {
        let (records_tx, records_rx) = mpsc::channel(options.channel_capacity.max(1));
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(run(catalog, descriptor, options, records_tx, stop_rx));
        StreamHandle {
            records: records_rx,
            stop: stop_tx,
            task,
        }
    }
}

async fn run(
    catalog: Arc<GeneratorCatalog>,
    descriptor: SplitDescriptor,
    options: StreamOptions,
    records: mpsc::Sender<Record>,
    mut stop: watch::Receiver<bool>,
) -> Result<StreamSummary, GenerationError> {
    let mut summary = StreamSummary::default();
    let split = descriptor.split_index;

    info!(split, pause_ms = options.pause.as_millis() as u64, "stream started");

    'cycles: loop {
        if *stop.borrow() {
            break;
        }
        if options.max_cycles.is_some_and(|max| summary.cycles >= max) {
            break;
        }

        let mut producer = match SplitProducer::new(&catalog, descriptor.clone()) {
            Ok(producer) => producer,
            Err(err) => {
                warn!(split, error = %err, "stream producer failed to build");
                return Err(err);
            }
        };

        while let Some(record) = producer.next_record()? {
            if *stop.borrow() {
                break 'cycles;
            }
            tokio::select! {
                biased;
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break 'cycles;
                    }
                }
                sent = records.send(record) => {
                    if sent.is_err() {
                        debug!(split, "stream consumer dropped");
                        break 'cycles;
                    }
                    summary.records += 1;
                }
            }
        }

        summary.cycles += 1;
        debug!(split, cycle = summary.cycles, records = summary.records, "stream cycle finished");

        if options.max_cycles.is_some_and(|max| summary.cycles >= max) {
            break;
        }

        tokio::select! {
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
            _ = tokio::time::sleep(options.pause) => {}
        }
    }

    info!(split, cycles = summary.cycles, records = summary.records, "stream stopped");
    Ok(summary)
}
