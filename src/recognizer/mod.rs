//! Gesture Recognizer
//!
//! The recognition loop: a background task that paces itself to the sampling
//! interval, reads camera frames, gates them by motion, extracts the first
//! hand pose, classifies it, and pushes accepted gesture events into the
//! control channel.
//!
//! ## Lifecycle
//!
//! `Stopped → start() → Running → stop() → Stopped`. `start()` opens the
//! camera synchronously so an unavailable device is reported to the caller
//! and the loop never begins. `stop()` flips the shared running flag and
//! joins the task with a bounded timeout; the task observes the flag at the
//! top of every iteration, so shutdown completes within one sampling interval
//! plus one extraction/classification call. The camera handle is owned by
//! the task and released on every exit path.
//!
//! ## Error recovery
//!
//! No per-iteration failure is fatal: a failed frame read skips the
//! iteration, and extraction or classification failures count as "no result
//! this frame". Only a failed device open at `start()` aborts an activation.

use crate::dispatch::{DebounceConfig, DebounceDispatcher, DispatchDecision};
use crate::gesture::{GestureEvent, GESTURE_COUNT};
use crate::infer::{Classification, GestureClassifier, HandPoseExtractor};
use crate::pose::FeatureVector;
use crate::vision::{CameraOpener, CaptureError, Frame, MotionConfig, MotionGate};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Error types for the recognizer lifecycle
#[derive(Debug, Error)]
pub enum RecognizerError {
    /// `start()` called while the loop is active
    #[error("gesture recognizer is already running")]
    AlreadyRunning,

    /// `stop()` called while the loop is not active
    #[error("gesture recognizer is not running")]
    NotRunning,

    /// Classifier output size disagrees with the gesture vocabulary
    #[error("classifier produces {got} classes, vocabulary has {expected}")]
    ClassifierMismatch { got: usize, expected: usize },

    /// Camera could not be opened
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Configuration for the recognition loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizerConfig {
    /// Camera device index
    pub device_index: u32,
    /// Resolution requested from the camera
    pub capture_width: u32,
    pub capture_height: u32,
    /// Resolution frames are downscaled to before any processing
    pub working_width: u32,
    pub working_height: u32,
    /// Minimum time between samples
    pub frame_interval: Duration,
    /// How long `stop()` waits for the task to finish
    pub join_timeout: Duration,
    /// Motion gate tunables
    pub motion: MotionConfig,
    /// Debounce tunables
    pub debounce: DebounceConfig,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            capture_width: 320,
            capture_height: 240,
            working_width: 160,
            working_height: 120,
            frame_interval: Duration::from_millis(100),
            join_timeout: Duration::from_secs(1),
            motion: MotionConfig::default(),
            debounce: DebounceConfig::default(),
        }
    }
}

/// Recognition loop statistics
#[derive(Debug, Clone, Default)]
pub struct RecognizerStats {
    /// Frames read from the camera
    pub frames_read: u64,
    /// Frame reads that failed and were skipped
    pub read_errors: u64,
    /// Frames skipped by the motion gate
    pub frames_gated: u64,
    /// Frames in which at least one hand was found
    pub poses_detected: u64,
    /// Candidate events handed to the dispatcher
    pub events_emitted: u64,
    /// Events accepted and forwarded to the control channel
    pub events_accepted: u64,
    /// Events rejected by the dispatcher
    pub events_rejected: u64,
}

/// Inner statistics with atomic counters
#[derive(Debug, Default)]
struct StatsInner {
    frames_read: AtomicU64,
    read_errors: AtomicU64,
    frames_gated: AtomicU64,
    poses_detected: AtomicU64,
    events_emitted: AtomicU64,
    events_accepted: AtomicU64,
    events_rejected: AtomicU64,
}

impl StatsInner {
    fn to_stats(&self) -> RecognizerStats {
        RecognizerStats {
            frames_read: self.frames_read.load(Ordering::Relaxed),
            read_errors: self.read_errors.load(Ordering::Relaxed),
            frames_gated: self.frames_gated.load(Ordering::Relaxed),
            poses_detected: self.poses_detected.load(Ordering::Relaxed),
            events_emitted: self.events_emitted.load(Ordering::Relaxed),
            events_accepted: self.events_accepted.load(Ordering::Relaxed),
            events_rejected: self.events_rejected.load(Ordering::Relaxed),
        }
    }
}

/// The gesture recognition loop
///
/// Owns the camera opener and the inference capabilities. While running, a
/// background task holds the frame source, the previous frame, and the
/// debounce dispatcher exclusively; accepted events arrive on the receiver
/// returned by [`start`](Self::start), in acceptance order.
pub struct GestureRecognizer<E, C> {
    config: RecognizerConfig,
    opener: Box<dyn CameraOpener>,
    extractor: Arc<Mutex<E>>,
    classifier: Arc<Mutex<C>>,
    vocabulary_size: usize,
    /// Stop flag of the current activation; each `start()` allocates a fresh
    /// flag, so a task left over from a timed-out `stop()` only ever clears
    /// its own
    running: Arc<AtomicBool>,
    stats: Arc<StatsInner>,
    task: Option<JoinHandle<()>>,
}

impl<E, C> GestureRecognizer<E, C>
where
    E: HandPoseExtractor + 'static,
    C: GestureClassifier + 'static,
{
    /// Create a recognizer in the stopped state
    pub fn new(
        config: RecognizerConfig,
        opener: Box<dyn CameraOpener>,
        extractor: E,
        classifier: C,
    ) -> Self {
        let vocabulary_size = classifier.vocabulary_size();
        Self {
            config,
            opener,
            extractor: Arc::new(Mutex::new(extractor)),
            classifier: Arc::new(Mutex::new(classifier)),
            vocabulary_size,
            running: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(StatsInner::default()),
            task: None,
        }
    }

    /// Whether the loop is active
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Current statistics snapshot
    pub fn stats(&self) -> RecognizerStats {
        self.stats.to_stats()
    }

    /// Start the recognition loop
    ///
    /// Opens the camera, verifies the classifier vocabulary, and spawns the
    /// sampling task. Returns the receiving end of the control channel:
    /// accepted events are delivered on it in FIFO order.
    pub async fn start(
        &mut self,
    ) -> Result<mpsc::UnboundedReceiver<GestureEvent>, RecognizerError> {
        if self.is_running() {
            return Err(RecognizerError::AlreadyRunning);
        }

        if self.vocabulary_size != GESTURE_COUNT {
            return Err(RecognizerError::ClassifierMismatch {
                got: self.vocabulary_size,
                expected: GESTURE_COUNT,
            });
        }

        let source = self.opener.open(
            self.config.device_index,
            self.config.capture_width,
            self.config.capture_height,
        )?;

        info!(
            device_index = self.config.device_index,
            capture = %format!("{}x{}", self.config.capture_width, self.config.capture_height),
            working = %format!("{}x{}", self.config.working_width, self.config.working_height),
            interval_ms = self.config.frame_interval.as_millis() as u64,
            "starting gesture recognition loop"
        );

        let (tx, rx) = mpsc::unbounded_channel();

        let config = self.config.clone();
        let running = Arc::new(AtomicBool::new(true));
        self.running = Arc::clone(&running);
        let stats = Arc::clone(&self.stats);
        let extractor = Arc::clone(&self.extractor);
        let classifier = Arc::clone(&self.classifier);

        self.task = Some(tokio::spawn(Self::sampling_task(
            config, running, stats, source, extractor, classifier, tx,
        )));

        Ok(rx)
    }

    /// Stop the recognition loop
    ///
    /// Sets the stop flag and joins the task, waiting at most
    /// `join_timeout`. On timeout the call still succeeds; the task observes
    /// the flag at its next loop top and releases the camera shortly after.
    pub async fn stop(&mut self) -> Result<(), RecognizerError> {
        if !self.is_running() && self.task.is_none() {
            return Err(RecognizerError::NotRunning);
        }

        info!("stopping gesture recognition loop");
        self.running.store(false, Ordering::Release);

        if let Some(task) = self.task.take() {
            match tokio::time::timeout(self.config.join_timeout, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("recognition task panicked: {e}"),
                Err(_) => warn!(
                    timeout_ms = self.config.join_timeout.as_millis() as u64,
                    "recognition task did not stop within the join timeout"
                ),
            }
        }

        let stats = self.stats();
        info!(
            frames_read = stats.frames_read,
            frames_gated = stats.frames_gated,
            events_emitted = stats.events_emitted,
            events_accepted = stats.events_accepted,
            "gesture recognition loop stopped"
        );

        Ok(())
    }

    /// The background sampling loop
    async fn sampling_task(
        config: RecognizerConfig,
        running: Arc<AtomicBool>,
        stats: Arc<StatsInner>,
        mut source: Box<dyn crate::vision::FrameSource>,
        extractor: Arc<Mutex<E>>,
        classifier: Arc<Mutex<C>>,
        events: mpsc::UnboundedSender<GestureEvent>,
    ) {
        let mut extractor = extractor.lock().await;
        let classifier = classifier.lock().await;

        let gate = MotionGate::new(config.motion.clone());
        let mut dispatcher = DebounceDispatcher::new(config.debounce.clone());
        let mut prev_frame: Option<Frame> = None;
        let mut last_sample: Option<Instant> = None;

        while running.load(Ordering::Acquire) {
            if let Some(last) = last_sample {
                let elapsed = last.elapsed();
                if elapsed < config.frame_interval {
                    tokio::time::sleep(config.frame_interval - elapsed).await;
                }
            }
            if !running.load(Ordering::Acquire) {
                break;
            }
            last_sample = Some(Instant::now());

            let frame = match source.read_frame() {
                Ok(frame) => {
                    stats.frames_read.fetch_add(1, Ordering::Relaxed);
                    frame
                }
                Err(e) => {
                    stats.read_errors.fetch_add(1, Ordering::Relaxed);
                    debug!("frame read failed, skipping iteration: {e}");
                    continue;
                }
            };

            let frame = frame.downscale(config.working_width, config.working_height);

            if let Some(ref prev) = prev_frame {
                if !gate.has_motion(&frame, prev) {
                    stats.frames_gated.fetch_add(1, Ordering::Relaxed);
                    prev_frame = Some(frame);
                    continue;
                }
            }

            let poses = match extractor.extract(&frame) {
                Ok(poses) => poses,
                Err(e) => {
                    debug!("treating extraction failure as no hands: {e}");
                    Vec::new()
                }
            };

            // First hand wins; additional hands are ignored for events
            if let Some(pose) = poses.first() {
                stats.poses_detected.fetch_add(1, Ordering::Relaxed);
                let features = FeatureVector::from_pose(pose);

                match classifier.scores(&features) {
                    Ok(scores) => {
                        let Classification { label, confidence } =
                            Classification::from_scores(&scores);
                        let event = GestureEvent::new(label, confidence);
                        stats.events_emitted.fetch_add(1, Ordering::Relaxed);

                        match dispatcher.consider(&event) {
                            DispatchDecision::Accepted => {
                                stats.events_accepted.fetch_add(1, Ordering::Relaxed);
                                debug!(%label, confidence, "gesture accepted");
                                if events.send(event).is_err() {
                                    info!("event receiver dropped, ending recognition loop");
                                    break;
                                }
                            }
                            DispatchDecision::Rejected(reason) => {
                                stats.events_rejected.fetch_add(1, Ordering::Relaxed);
                                debug!(%label, confidence, ?reason, "gesture rejected");
                            }
                        }
                    }
                    Err(e) => {
                        debug!("treating classification failure as no result: {e}");
                    }
                }
            }

            prev_frame = Some(frame);
        }

        running.store(false, Ordering::Release);
        debug!("sampling task exited, camera released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::InferenceError;
    use crate::pose::HandPose;

    struct NoopExtractor;
    impl HandPoseExtractor for NoopExtractor {
        fn extract(&mut self, _frame: &Frame) -> Result<Vec<HandPose>, InferenceError> {
            Ok(Vec::new())
        }
    }

    struct UniformClassifier;
    impl GestureClassifier for UniformClassifier {
        fn scores(&self, _f: &FeatureVector) -> Result<[f32; GESTURE_COUNT], InferenceError> {
            Ok([1.0 / GESTURE_COUNT as f32; GESTURE_COUNT])
        }
    }

    struct NeverOpens;
    impl CameraOpener for NeverOpens {
        fn open(
            &self,
            _device_index: u32,
            _width: u32,
            _height: u32,
        ) -> Result<Box<dyn crate::vision::FrameSource>, CaptureError> {
            Err(CaptureError::DeviceUnavailable("no camera in tests".into()))
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = RecognizerConfig::default();
        assert_eq!(config.capture_width, 320);
        assert_eq!(config.capture_height, 240);
        assert_eq!(config.working_width, 160);
        assert_eq!(config.working_height, 120);
        assert_eq!(config.frame_interval, Duration::from_millis(100));
        assert_eq!(config.join_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_new_recognizer_is_stopped() {
        let recognizer = GestureRecognizer::new(
            RecognizerConfig::default(),
            Box::new(NeverOpens),
            NoopExtractor,
            UniformClassifier,
        );
        assert!(!recognizer.is_running());
        assert_eq!(recognizer.stats().frames_read, 0);
    }

    #[tokio::test]
    async fn test_start_fails_when_device_unavailable() {
        let mut recognizer = GestureRecognizer::new(
            RecognizerConfig::default(),
            Box::new(NeverOpens),
            NoopExtractor,
            UniformClassifier,
        );

        let err = recognizer.start().await.unwrap_err();
        assert!(matches!(
            err,
            RecognizerError::Capture(CaptureError::DeviceUnavailable(_))
        ));
        assert!(!recognizer.is_running());
    }

    #[tokio::test]
    async fn test_stop_when_not_running_is_an_error() {
        let mut recognizer = GestureRecognizer::new(
            RecognizerConfig::default(),
            Box::new(NeverOpens),
            NoopExtractor,
            UniformClassifier,
        );

        assert!(matches!(
            recognizer.stop().await,
            Err(RecognizerError::NotRunning)
        ));
    }

    #[test]
    fn test_stats_snapshot() {
        let inner = StatsInner::default();
        inner.frames_read.store(7, Ordering::Relaxed);
        inner.events_accepted.store(2, Ordering::Relaxed);
        let stats = inner.to_stats();
        assert_eq!(stats.frames_read, 7);
        assert_eq!(stats.events_accepted, 2);
        assert_eq!(stats.read_errors, 0);
    }
}
