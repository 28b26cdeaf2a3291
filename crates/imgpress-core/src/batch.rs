//! Batch orchestration: run the pipeline over many inputs and hand the
//! results to a sink.
//!
//! Items are processed strictly one after another. Decoding and the pipeline
//! are CPU-bound, so each item runs on the blocking pool and is awaited
//! before the next one starts. A failing item is recorded and skipped; it
//! never aborts the run.
//!
//! Once every item has been attempted, successful results are emitted on
//! spawned tasks, the n-th success delayed by `n * emit_interval`. `run`
//! does not wait for delivery; the join handles are returned in the
//! [`BatchReport`] instead.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::ProcessorConfig;
use crate::decode::Decoder;
use crate::error::ProcessError;
use crate::geometry::CropRegion;
use crate::pipeline::{compression_ratio, output_file_name, process_image, ProcessedImage};

/// Destination for processed results. Emission is fire-and-forget.
pub trait Sink: Send + Sync {
    fn emit(&self, name: &str, bytes: &[u8]);
}

/// Sink that writes each result into a directory.
///
/// Write failures are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Sink for DirSink {
    fn emit(&self, name: &str, bytes: &[u8]) {
        let path = self.dir.join(name);
        match fs::write(&path, bytes) {
            Ok(()) => tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote output"),
            Err(err) => tracing::warn!(path = %path.display(), %err, "failed to write output"),
        }
    }
}

/// One encoded file queued for processing.
#[derive(Debug, Clone)]
pub struct BatchInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl BatchInput {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// A successfully processed input.
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// Position of the input in the submitted list.
    pub index: usize,
    pub name: String,
    /// Name the result is emitted under.
    pub output_name: String,
    pub original_size: u64,
    pub bytes: Arc<[u8]>,
    pub byte_size: u64,
    pub width: u32,
    pub height: u32,
}

impl BatchItem {
    fn new(index: usize, name: String, original_size: u64, output_name: String, processed: ProcessedImage) -> Self {
        Self {
            index,
            name,
            output_name,
            original_size,
            byte_size: processed.byte_size as u64,
            width: processed.width,
            height: processed.height,
            bytes: processed.bytes.into(),
        }
    }

    /// Percentage saved relative to the input file.
    pub fn compression_ratio(&self) -> f64 {
        compression_ratio(self.original_size, self.byte_size)
    }
}

/// An input that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub index: usize,
    pub name: String,
    pub reason: String,
}

/// Outcome of a batch run.
#[derive(Debug)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
    pub failures: Vec<BatchFailure>,
    /// True when the run stopped early because of a cancel request.
    pub cancelled: bool,
    /// One handle per item, in emission order.
    pub emissions: Vec<JoinHandle<()>>,
}

impl BatchReport {
    /// Wait until every pending emission has reached the sink.
    pub async fn wait_for_emissions(&mut self) {
        for handle in self.emissions.drain(..) {
            if let Err(err) = handle.await {
                tracing::warn!(%err, "emission task failed");
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("A batch run is already in progress")]
    AlreadyRunning,

    #[error("Invalid batch settings: {0}")]
    InvalidSettings(#[from] ProcessError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Running,
}

/// Handle for cancelling a running batch.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The run stops before decoding its next item.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Sequential batch runner with a single shared set of settings.
pub struct BatchOrchestrator {
    decoder: Arc<dyn Decoder>,
    sink: Arc<dyn Sink>,
    config: ProcessorConfig,
    state: Arc<Mutex<BatchState>>,
    cancel: CancelHandle,
}

impl BatchOrchestrator {
    pub fn new(decoder: Arc<dyn Decoder>, sink: Arc<dyn Sink>, config: ProcessorConfig) -> Self {
        Self {
            decoder,
            sink,
            config,
            state: Arc::new(Mutex::new(BatchState::Idle)),
            cancel: CancelHandle::new(),
        }
    }

    /// Use an externally created cancel handle (builder pattern).
    pub fn with_cancel_handle(mut self, handle: CancelHandle) -> Self {
        self.cancel = handle;
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn state(&self) -> BatchState {
        *lock(&self.state)
    }

    /// Process `inputs` in order and schedule emission of the successes.
    ///
    /// Every input is processed with a full-image crop and the shared
    /// settings. Any pending cancel request is cleared when the run starts.
    ///
    /// # Errors
    ///
    /// - `BatchError::AlreadyRunning` if another run is in progress
    /// - `BatchError::InvalidSettings` if the shared settings are out of range
    pub async fn run(&self, inputs: Vec<BatchInput>) -> Result<BatchReport, BatchError> {
        self.config.filters.validate()?;
        self.config.transform.validate()?;
        self.config.export.validate()?;
        let _running = RunGuard::acquire(&self.state)?;
        self.cancel.reset();

        let total = inputs.len();
        tracing::info!(items = total, "batch started");

        let mut items = Vec::new();
        let mut failures = Vec::new();
        let mut cancelled = false;

        for (index, input) in inputs.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::info!(index, remaining = total - index, "batch cancelled");
                cancelled = true;
                break;
            }

            let BatchInput { name, bytes } = input;
            let original_size = bytes.len() as u64;

            match self.process_one(bytes).await {
                Ok(processed) => {
                    let output_name = output_file_name(&name, processed.format);
                    tracing::debug!(index, %name, %output_name, bytes = processed.byte_size, "item processed");
                    items.push(BatchItem::new(index, name, original_size, output_name, processed));
                }
                Err(reason) => {
                    tracing::warn!(index, %name, %reason, "item failed");
                    failures.push(BatchFailure { index, name, reason });
                }
            }
        }

        tracing::info!(
            succeeded = items.len(),
            failed = failures.len(),
            cancelled,
            "batch finished"
        );

        let emissions = self.schedule_emissions(&items);
        Ok(BatchReport {
            items,
            failures,
            cancelled,
            emissions,
        })
    }

    async fn process_one(&self, bytes: Vec<u8>) -> Result<ProcessedImage, String> {
        let decoder = Arc::clone(&self.decoder);
        let ProcessorConfig {
            filters,
            transform,
            export,
            ..
        } = self.config.clone();

        let task = tokio::task::spawn_blocking(move || -> Result<ProcessedImage, ProcessError> {
            let image = decoder.decode(&bytes)?;
            let crop = CropRegion::full(image.width, image.height);
            process_image(&image, &crop, &filters, &transform, &export)
        });

        match task.await {
            Ok(result) => result.map_err(|err| err.to_string()),
            Err(join_err) => Err(format!("processing task failed: {join_err}")),
        }
    }

    fn schedule_emissions(&self, items: &[BatchItem]) -> Vec<JoinHandle<()>> {
        let interval = self.config.batch.emit_interval();
        items
            .iter()
            .enumerate()
            .map(|(slot, item)| {
                let sink = Arc::clone(&self.sink);
                let name = item.output_name.clone();
                let bytes = Arc::clone(&item.bytes);
                let delay = interval.saturating_mul(slot as u32);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    sink.emit(&name, &bytes);
                })
            })
            .collect()
    }
}

fn lock(state: &Mutex<BatchState>) -> MutexGuard<'_, BatchState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the orchestrator in `Running` and puts it back to `Idle` on drop,
/// including when the run future is dropped part way.
struct RunGuard {
    state: Arc<Mutex<BatchState>>,
}

impl RunGuard {
    fn acquire(state: &Arc<Mutex<BatchState>>) -> Result<Self, BatchError> {
        let mut current = lock(state);
        if *current == BatchState::Running {
            return Err(BatchError::AlreadyRunning);
        }
        *current = BatchState::Running;
        Ok(Self {
            state: Arc::clone(state),
        })
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        *lock(&self.state) = BatchState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{DecodeError, ImageDecoder, PixelBuffer};
    use crate::encode::{encode_png, ExportFormat};
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::time::Instant;

    #[derive(Default)]
    struct RecordingSink {
        received: Mutex<Vec<(String, usize, Instant)>>,
    }

    impl RecordingSink {
        fn received(&self) -> Vec<(String, usize, Instant)> {
            self.received.lock().unwrap().clone()
        }
    }

    impl Sink for RecordingSink {
        fn emit(&self, name: &str, bytes: &[u8]) {
            self.received
                .lock()
                .unwrap()
                .push((name.to_string(), bytes.len(), Instant::now()));
        }
    }

    /// Decoder that requests cancellation while decoding its n-th input.
    struct CancellingDecoder {
        cancel_on: usize,
        calls: Mutex<usize>,
        handle: CancelHandle,
    }

    impl Decoder for CancellingDecoder {
        fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
            let mut calls = self.calls.lock().unwrap();
            if *calls == self.cancel_on {
                self.handle.cancel();
            }
            *calls += 1;
            ImageDecoder.decode(bytes)
        }
    }

    struct SlowDecoder;

    impl Decoder for SlowDecoder {
        fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
            std::thread::sleep(Duration::from_millis(50));
            ImageDecoder.decode(bytes)
        }
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn png_input(name: &str, width: u32, height: u32) -> BatchInput {
        let image = PixelBuffer::new(width, height, [90, 120, 200, 255].repeat((width * height) as usize));
        BatchInput::new(name, encode_png(&image).unwrap())
    }

    fn png_config() -> ProcessorConfig {
        let mut config = ProcessorConfig::default();
        config.export.format = ExportFormat::Png;
        config
    }

    fn orchestrator(sink: Arc<RecordingSink>) -> BatchOrchestrator {
        BatchOrchestrator::new(Arc::new(ImageDecoder), sink, png_config())
    }

    #[tokio::test]
    async fn test_failed_item_does_not_stop_batch() {
        init_tracing();
        let sink = Arc::new(RecordingSink::default());
        let batch = orchestrator(Arc::clone(&sink));

        let inputs = vec![
            png_input("a.png", 8, 8),
            BatchInput::new("broken.jpg", vec![0xFF, 0xD8, 0x00, 0x13]),
            png_input("c.png", 4, 6),
        ];
        let mut report = batch.run(inputs).await.unwrap();

        assert_eq!(report.items.len(), 2);
        assert_eq!(report.items[0].index, 0);
        assert_eq!(report.items[1].index, 2);
        assert_eq!(report.items[1].output_name, "processed-c.png");
        assert_eq!((report.items[1].width, report.items[1].height), (4, 6));

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(report.failures[0].name, "broken.jpg");
        assert!(!report.cancelled);

        report.wait_for_emissions().await;
        let names: Vec<_> = sink.received().into_iter().map(|(n, _, _)| n).collect();
        assert_eq!(names, vec!["processed-a.png", "processed-c.png"]);
    }

    #[tokio::test]
    async fn test_failure_position_does_not_change_results() {
        let sink = Arc::new(RecordingSink::default());
        let batch = orchestrator(Arc::clone(&sink));

        let a = png_input("a.png", 8, 8);
        let c = png_input("c.png", 4, 6);
        let bad = BatchInput::new("broken.jpg", vec![0xFF, 0xD8, 0x00, 0x13]);

        let layouts = [
            (vec![bad.clone(), a.clone(), c.clone()], 0),
            (vec![a.clone(), bad.clone(), c.clone()], 1),
            (vec![a.clone(), c.clone(), bad.clone()], 2),
        ];

        let mut outputs = Vec::new();
        for (inputs, bad_index) in layouts {
            let mut report = batch.run(inputs).await.unwrap();
            report.wait_for_emissions().await;

            assert_eq!(report.failures.len(), 1);
            assert_eq!(report.failures[0].index, bad_index);
            assert_eq!(report.failures[0].name, "broken.jpg");

            let names: Vec<_> = report.items.iter().map(|item| item.name.as_str()).collect();
            assert_eq!(names, vec!["a.png", "c.png"]);
            outputs.push(
                report
                    .items
                    .iter()
                    .map(|item| (item.bytes.to_vec(), item.byte_size))
                    .collect::<Vec<_>>(),
            );
        }

        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(outputs[1], outputs[2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_emissions_are_spaced_by_interval() {
        let sink = Arc::new(RecordingSink::default());
        let batch = orchestrator(Arc::clone(&sink));

        let inputs = vec![
            png_input("one.png", 4, 4),
            png_input("two.png", 4, 4),
            png_input("three.png", 4, 4),
        ];
        let mut report = batch.run(inputs).await.unwrap();
        let start = Instant::now();

        // Nothing is delivered until the caller yields.
        assert!(sink.received().is_empty());
        assert_eq!(batch.state(), BatchState::Idle);

        report.wait_for_emissions().await;
        let received = sink.received();
        assert_eq!(received.len(), 3);

        for (slot, (name, size, at)) in received.iter().enumerate() {
            assert_eq!(name, &report.items[slot].output_name);
            assert_eq!(*size as u64, report.items[slot].byte_size);
            let elapsed = at.duration_since(start);
            let expected = Duration::from_millis(100 * slot as u64);
            assert!(
                elapsed >= expected && elapsed < expected + Duration::from_millis(5),
                "slot {slot}: {elapsed:?}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_emit_interval() {
        let sink = Arc::new(RecordingSink::default());
        let mut config = png_config();
        config.batch.emit_interval_ms = 250;
        let batch = BatchOrchestrator::new(Arc::new(ImageDecoder), sink.clone(), config);

        let mut report = batch
            .run(vec![png_input("a.png", 2, 2), png_input("b.png", 2, 2)])
            .await
            .unwrap();
        let start = Instant::now();
        report.wait_for_emissions().await;

        let received = sink.received();
        let gap = received[1].2.duration_since(start);
        assert!(gap >= Duration::from_millis(250) && gap < Duration::from_millis(255));
    }

    #[tokio::test]
    async fn test_cancel_stops_before_next_decode() {
        let handle = CancelHandle::new();
        let decoder = CancellingDecoder {
            cancel_on: 1,
            calls: Mutex::new(0),
            handle: handle.clone(),
        };
        let sink = Arc::new(RecordingSink::default());
        let batch = BatchOrchestrator::new(Arc::new(decoder), sink, png_config())
            .with_cancel_handle(handle);

        let inputs = (0..4).map(|i| png_input(&format!("{i}.png"), 3, 3)).collect();
        let report = batch.run(inputs).await.unwrap();

        // The item being decoded when cancel arrives still completes.
        assert_eq!(report.items.len(), 2);
        assert!(report.failures.is_empty());
        assert!(report.cancelled);
        assert_eq!(report.emissions.len(), 2);
        assert_eq!(batch.state(), BatchState::Idle);
    }

    #[tokio::test]
    async fn test_pending_cancel_cleared_on_new_run() {
        let sink = Arc::new(RecordingSink::default());
        let batch = orchestrator(sink);
        batch.cancel_handle().cancel();

        let report = batch.run(vec![png_input("a.png", 2, 2)]).await.unwrap();
        assert_eq!(report.items.len(), 1);
        assert!(!report.cancelled);
    }

    #[tokio::test]
    async fn test_concurrent_run_rejected() {
        let sink = Arc::new(RecordingSink::default());
        let batch = BatchOrchestrator::new(Arc::new(SlowDecoder), sink, png_config());

        let (first, second) = tokio::join!(
            batch.run(vec![png_input("a.png", 2, 2)]),
            batch.run(vec![png_input("b.png", 2, 2)]),
        );

        assert_eq!(first.unwrap().items.len(), 1);
        assert!(matches!(second, Err(BatchError::AlreadyRunning)));
        assert_eq!(batch.state(), BatchState::Idle);

        // Idle again, so a later run is accepted.
        assert!(batch.run(vec![png_input("c.png", 2, 2)]).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_settings_rejected_before_running() {
        let sink = Arc::new(RecordingSink::default());
        let mut config = png_config();
        config.export.quality = 0.0;
        let batch = BatchOrchestrator::new(Arc::new(ImageDecoder), sink, config);

        let result = batch.run(vec![png_input("a.png", 2, 2)]).await;
        assert!(matches!(result, Err(BatchError::InvalidSettings(_))));
        assert_eq!(batch.state(), BatchState::Idle);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let sink = Arc::new(RecordingSink::default());
        let batch = orchestrator(sink);
        let report = batch.run(Vec::new()).await.unwrap();
        assert!(report.items.is_empty() && report.failures.is_empty());
        assert!(report.emissions.is_empty());
    }

    #[tokio::test]
    async fn test_items_are_resized_to_export_bounds() {
        let sink = Arc::new(RecordingSink::default());
        let mut config = png_config();
        config.export.max_width = 10;
        config.export.max_height = 10;
        let batch = BatchOrchestrator::new(Arc::new(ImageDecoder), sink, config);

        let report = batch.run(vec![png_input("wide.png", 40, 20)]).await.unwrap();
        assert_eq!((report.items[0].width, report.items[0].height), (10, 5));
    }

    #[tokio::test]
    async fn test_dir_sink_writes_files() {
        let tmp = TempDir::new().unwrap();
        let batch = BatchOrchestrator::new(
            Arc::new(ImageDecoder),
            Arc::new(DirSink::new(tmp.path())),
            png_config(),
        );

        let mut report = batch.run(vec![png_input("photo.final.png", 5, 5)]).await.unwrap();
        report.wait_for_emissions().await;

        let written = fs::read(tmp.path().join("processed-photo.png")).unwrap();
        assert_eq!(written.as_slice(), &*report.items[0].bytes);
    }

    #[test]
    fn test_compression_ratio_of_item() {
        let item = BatchItem {
            index: 0,
            name: "a.png".into(),
            output_name: "processed-a.jpeg".into(),
            original_size: 2000,
            bytes: Arc::from(vec![0u8; 500]),
            byte_size: 500,
            width: 1,
            height: 1,
        };
        assert_eq!(item.compression_ratio(), 75.0);
    }
}
