//! Classification Pipeline
//!
//! Received → Validating → Rejected (terminal)
//!                       → Encoded → Scored → Decided → Explained → Recorded
//!
//! Rejected input never reaches the encoder, the model, the explanation
//! service or the recorder. The only error that escapes `run` is a failed
//! inference; explanation and recorder failures are absorbed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::constants::{self, MAX_LEN};
use crate::logic::explain::{self, ExplanationService};
use crate::logic::features::{encode, Vocabulary};
use crate::logic::model::{validate_probability, CancelToken, Classifier, InferenceError};
use crate::logic::telemetry::{LoggedEntry, ResultRecorder};
use crate::logic::threat::{
    classify_with_thresholds, ClassificationResult, ClassificationThresholds, ThresholdError,
};
use crate::logic::validator;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Inference failed: {0}")]
    InferenceFailed(#[from] InferenceError),

    #[error("Invalid pipeline configuration: {0}")]
    InvalidConfig(#[from] ThresholdError),
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_len: usize,
    pub thresholds: ClassificationThresholds,
    pub inference_timeout: Duration,
    pub explanation_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_len: MAX_LEN,
            thresholds: ClassificationThresholds::default(),
            inference_timeout: Duration::from_secs(constants::DEFAULT_INFERENCE_TIMEOUT_SECS),
            explanation_timeout: Duration::from_secs(constants::DEFAULT_EXPLANATION_TIMEOUT_SECS),
        }
    }
}

impl PipelineConfig {
    /// Defaults with timeouts taken from the environment
    pub fn from_env() -> Self {
        Self {
            inference_timeout: constants::get_inference_timeout(),
            explanation_timeout: constants::get_explanation_timeout(),
            ..Default::default()
        }
    }
}

/// Per-request orchestrator over shared, read-only collaborators
pub struct Pipeline {
    vocabulary: Arc<Vocabulary>,
    classifier: Arc<dyn Classifier>,
    explainer: Arc<dyn ExplanationService>,
    recorder: Arc<dyn ResultRecorder>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        vocabulary: Arc<Vocabulary>,
        classifier: Arc<dyn Classifier>,
        explainer: Arc<dyn ExplanationService>,
        recorder: Arc<dyn ResultRecorder>,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.thresholds.validate()?;

        Ok(Self {
            vocabulary,
            classifier,
            explainer,
            recorder,
            config,
        })
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn explainer_name(&self) -> &str {
        self.explainer.name()
    }

    /// Classify one URL end to end
    pub async fn run(&self, raw_url: &str) -> Result<ClassificationResult, PipelineError> {
        let start_time = Instant::now();
        let url = raw_url.trim();

        if !validator::is_valid(url) {
            log::info!("Rejected invalid input ({} chars)", url.chars().count());
            return Ok(ClassificationResult::invalid_input(url));
        }

        let probability = self.score(url).await?;
        let verdict = classify_with_thresholds(probability, &self.config.thresholds);
        log::debug!("Decided {} (p = {:.4})", verdict, probability);
        if verdict.is_actionable() {
            log::warn!("Malicious URL detected: {}", url);
        }

        let explanation = explain::explain(
            self.explainer.as_ref(),
            url,
            verdict,
            probability,
            self.config.explanation_timeout,
        )
        .await;

        let result = ClassificationResult {
            url: url.to_string(),
            verdict,
            confidence: probability,
            explanation,
        };

        self.record(LoggedEntry::from_result(&result)).await;

        log::info!(
            "Classified {} as {} (p = {:.2}) in {} ms",
            result.url,
            result.verdict,
            probability,
            start_time.elapsed().as_millis()
        );

        Ok(result)
    }

    /// Encode + model call on the blocking pool, bounded by the inference timeout.
    /// On timeout the run is cancelled, not just abandoned.
    async fn score(&self, url: &str) -> Result<f32, InferenceError> {
        let sequence = encode(url, &self.vocabulary, self.config.max_len);
        log::debug!("Encoded {} chars into {} codes", sequence.content_len(), sequence.len());

        let cancel = CancelToken::new();
        let task_cancel = cancel.clone();
        let classifier = Arc::clone(&self.classifier);
        let task = tokio::task::spawn_blocking(move || {
            classifier.predict_cancellable(&sequence, &task_cancel)
        });

        let timeout = self.config.inference_timeout;
        let probability = match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_err)) => {
                return Err(InferenceError::Runtime(format!("Inference task failed: {}", join_err)));
            }
            Err(_) => {
                log::warn!("Inference exceeded {} ms, cancelling", timeout.as_millis());
                cancel.cancel();
                return Err(InferenceError::Timeout(timeout.as_millis()));
            }
        };

        validate_probability(probability)
    }

    /// Append to the result log; failures are logged and swallowed
    async fn record(&self, entry: LoggedEntry) {
        let recorder = Arc::clone(&self.recorder);
        let outcome = tokio::task::spawn_blocking(move || recorder.record(&entry)).await;

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::warn!("Failed to record result: {}", e),
            Err(e) => log::warn!("Recorder task failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::logic::explain::{is_placeholder, ExplanationError};
    use crate::logic::features::EncodedSequence;
    use crate::logic::telemetry::{RecorderError, SqliteRecorder};
    use crate::logic::threat::{Verdict, INVALID_INPUT_EXPLANATION};

    struct FixedClassifier {
        score: f32,
        calls: AtomicUsize,
        seen_len: Mutex<Option<usize>>,
    }

    impl FixedClassifier {
        fn new(score: f32) -> Arc<Self> {
            Arc::new(Self {
                score,
                calls: AtomicUsize::new(0),
                seen_len: Mutex::new(None),
            })
        }
    }

    impl Classifier for FixedClassifier {
        fn predict(&self, sequence: &EncodedSequence) -> Result<f32, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_len.lock() = Some(sequence.len());
            Ok(self.score)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn predict(&self, _sequence: &EncodedSequence) -> Result<f32, InferenceError> {
            Err(InferenceError::Runtime("bad input shape".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct StuckClassifier;

    impl Classifier for StuckClassifier {
        fn predict(&self, _sequence: &EncodedSequence) -> Result<f32, InferenceError> {
            std::thread::sleep(Duration::from_millis(500));
            Ok(0.1)
        }

        fn name(&self) -> &str {
            "stuck"
        }
    }

    /// Works in small steps until done or interrupted, like a runtime honoring `terminate`
    struct InterruptibleClassifier {
        steps: u32,
        interrupted: Arc<AtomicBool>,
        stopped: AtomicBool,
        finished: AtomicBool,
    }

    impl InterruptibleClassifier {
        fn new() -> Arc<Self> {
            Self::with_steps(400)
        }

        fn quick() -> Arc<Self> {
            Self::with_steps(1)
        }

        fn with_steps(steps: u32) -> Arc<Self> {
            Arc::new(Self {
                steps,
                interrupted: Arc::new(AtomicBool::new(false)),
                stopped: AtomicBool::new(false),
                finished: AtomicBool::new(false),
            })
        }
    }

    impl Classifier for InterruptibleClassifier {
        fn predict(&self, sequence: &EncodedSequence) -> Result<f32, InferenceError> {
            self.predict_cancellable(sequence, &CancelToken::new())
        }

        fn predict_cancellable(
            &self,
            _sequence: &EncodedSequence,
            cancel: &CancelToken,
        ) -> Result<f32, InferenceError> {
            let interrupted = Arc::clone(&self.interrupted);
            cancel.on_cancel(move || interrupted.store(true, Ordering::SeqCst));

            for _ in 0..self.steps {
                if self.interrupted.load(Ordering::SeqCst) {
                    self.stopped.store(true, Ordering::SeqCst);
                    return Err(InferenceError::Cancelled);
                }
                std::thread::sleep(Duration::from_millis(5));
            }

            self.finished.store(true, Ordering::SeqCst);
            Ok(0.1)
        }

        fn name(&self) -> &str {
            "interruptible"
        }
    }

    struct CountingExplainer {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingExplainer {
        fn ok() -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), fail: false })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), fail: true })
        }
    }

    #[async_trait]
    impl ExplanationService for CountingExplainer {
        async fn generate(&self, _prompt: &str) -> Result<String, ExplanationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ExplanationError::Http { status: 401, body: "API key not valid".to_string() })
            } else {
                Ok("The domain imitates a well-known brand.".to_string())
            }
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    #[derive(Default)]
    struct MemoryRecorder {
        entries: Mutex<Vec<LoggedEntry>>,
    }

    impl ResultRecorder for MemoryRecorder {
        fn record(&self, entry: &LoggedEntry) -> Result<(), RecorderError> {
            self.entries.lock().push(entry.clone());
            Ok(())
        }
    }

    struct BrokenRecorder;

    impl ResultRecorder for BrokenRecorder {
        fn record(&self, _entry: &LoggedEntry) -> Result<(), RecorderError> {
            Err(RecorderError::Database(rusqlite::Error::InvalidQuery))
        }
    }

    fn vocab() -> Arc<Vocabulary> {
        Arc::new(
            Vocabulary::from_json_str(r#"{"h": 2, "t": 3, "p": 4, "s": 5, ":": 6, "/": 7, ".": 8, "e": 9}"#)
                .unwrap(),
        )
    }

    fn pipeline(
        classifier: Arc<dyn Classifier>,
        explainer: Arc<dyn ExplanationService>,
        recorder: Arc<dyn ResultRecorder>,
    ) -> Pipeline {
        Pipeline::new(vocab(), classifier, explainer, recorder, PipelineConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_malicious_url_end_to_end() {
        let classifier = FixedClassifier::new(0.72);
        let explainer = CountingExplainer::ok();
        let recorder = Arc::new(MemoryRecorder::default());
        let p = pipeline(classifier.clone(), explainer.clone(), recorder.clone());

        let result = p.run("https://example.com/path").await.unwrap();

        assert_eq!(result.verdict, Verdict::Malicious);
        assert_eq!(result.confidence, 0.72);
        assert_eq!(result.url, "https://example.com/path");
        assert!(!result.explanation.is_empty());
        assert!(!is_placeholder(&result.explanation));

        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*classifier.seen_len.lock(), Some(MAX_LEN));
        assert_eq!(explainer.calls.load(Ordering::SeqCst), 1);

        let entries = recorder.entries.lock();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "https://example.com/path");
        assert_eq!(entries[0].prediction, "Malicious");
    }

    #[tokio::test]
    async fn test_invalid_input_short_circuits() {
        let classifier = FixedClassifier::new(0.9);
        let explainer = CountingExplainer::ok();
        let recorder = Arc::new(MemoryRecorder::default());
        let p = pipeline(classifier.clone(), explainer.clone(), recorder.clone());

        let result = p.run("not a url").await.unwrap();

        assert_eq!(result.verdict, Verdict::InvalidInput);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.explanation, INVALID_INPUT_EXPLANATION);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
        assert_eq!(explainer.calls.load(Ordering::SeqCst), 0);
        assert!(recorder.entries.lock().is_empty());
    }

    #[tokio::test]
    async fn test_input_is_trimmed() {
        let recorder = Arc::new(MemoryRecorder::default());
        let p = pipeline(FixedClassifier::new(0.1), CountingExplainer::ok(), recorder.clone());

        let result = p.run("  https://example.com \n").await.unwrap();

        assert_eq!(result.url, "https://example.com");
        assert_eq!(result.verdict, Verdict::Benign);
        assert_eq!(recorder.entries.lock()[0].url, "https://example.com");
    }

    #[tokio::test]
    async fn test_each_band_is_recorded_with_its_label() {
        for (score, label) in [(0.10, "Benign"), (0.50, "Uncertain"), (0.90, "Malicious")] {
            let recorder = Arc::new(MemoryRecorder::default());
            let p = pipeline(FixedClassifier::new(score), CountingExplainer::ok(), recorder.clone());

            let result = p.run("www.google.com").await.unwrap();
            assert_eq!(result.verdict.as_str(), label);

            let entries = recorder.entries.lock();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].prediction, label);
        }
    }

    #[tokio::test]
    async fn test_explanation_failure_keeps_verdict() {
        let recorder = Arc::new(MemoryRecorder::default());
        let p = pipeline(FixedClassifier::new(0.72), CountingExplainer::failing(), recorder.clone());

        let result = p.run("https://example.com/path").await.unwrap();

        assert_eq!(result.verdict, Verdict::Malicious);
        assert_eq!(result.confidence, 0.72);
        assert!(is_placeholder(&result.explanation));
        assert!(result.explanation.contains("401"));
        assert_eq!(recorder.entries.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_inference_failure_is_typed_error() {
        let recorder = Arc::new(MemoryRecorder::default());
        let explainer = CountingExplainer::ok();
        let p = pipeline(Arc::new(FailingClassifier), explainer.clone(), recorder.clone());

        let err = p.run("https://example.com").await.unwrap_err();

        assert!(matches!(err, PipelineError::InferenceFailed(InferenceError::Runtime(_))));
        assert_eq!(explainer.calls.load(Ordering::SeqCst), 0);
        assert!(recorder.entries.lock().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_rejected() {
        let p = pipeline(
            FixedClassifier::new(1.7),
            CountingExplainer::ok(),
            Arc::new(MemoryRecorder::default()),
        );

        let err = p.run("https://example.com").await.unwrap_err();
        assert!(matches!(err, PipelineError::InferenceFailed(InferenceError::InvalidOutput(_))));
    }

    #[tokio::test]
    async fn test_inference_timeout() {
        let config = PipelineConfig {
            inference_timeout: Duration::from_millis(20),
            ..Default::default()
        };
        let p = Pipeline::new(
            vocab(),
            Arc::new(StuckClassifier),
            CountingExplainer::ok(),
            Arc::new(MemoryRecorder::default()),
            config,
        )
        .unwrap();

        let err = p.run("https://example.com").await.unwrap_err();
        assert!(matches!(err, PipelineError::InferenceFailed(InferenceError::Timeout(20))));
    }

    #[tokio::test]
    async fn test_timed_out_run_is_cancelled() {
        let classifier = InterruptibleClassifier::new();
        let config = PipelineConfig {
            inference_timeout: Duration::from_millis(20),
            ..Default::default()
        };
        let p = Pipeline::new(
            vocab(),
            classifier.clone(),
            CountingExplainer::ok(),
            Arc::new(MemoryRecorder::default()),
            config,
        )
        .unwrap();

        let err = p.run("https://example.com").await.unwrap_err();
        assert!(matches!(err, PipelineError::InferenceFailed(InferenceError::Timeout(20))));

        // The hook fires before `run` returns
        assert!(classifier.interrupted.load(Ordering::SeqCst));

        let deadline = Instant::now() + Duration::from_secs(2);
        while !classifier.stopped.load(Ordering::SeqCst) && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(classifier.stopped.load(Ordering::SeqCst));
        assert!(!classifier.finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_completed_run_is_not_cancelled() {
        let classifier = InterruptibleClassifier::quick();
        let p = pipeline(classifier.clone(), CountingExplainer::ok(), Arc::new(MemoryRecorder::default()));

        let result = p.run("https://example.com").await.unwrap();

        assert_eq!(result.verdict, Verdict::Benign);
        assert!(classifier.finished.load(Ordering::SeqCst));
        assert!(!classifier.interrupted.load(Ordering::SeqCst));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = PipelineConfig {
            thresholds: ClassificationThresholds { benign_max: 0.7, malicious_min: 0.3 },
            ..Default::default()
        };

        let err = Pipeline::new(
            vocab(),
            FixedClassifier::new(0.5),
            CountingExplainer::ok(),
            Arc::new(MemoryRecorder::default()),
            config,
        )
        .err()
        .unwrap();

        assert!(matches!(err, PipelineError::InvalidConfig(ThresholdError::Inverted { .. })));
    }

    #[tokio::test]
    async fn test_recorder_failure_is_swallowed() {
        let p = pipeline(FixedClassifier::new(0.2), CountingExplainer::ok(), Arc::new(BrokenRecorder));

        let result = p.run("example.org").await.unwrap();
        assert_eq!(result.verdict, Verdict::Benign);
    }

    #[tokio::test]
    async fn test_sqlite_recorder_integration() {
        let recorder = Arc::new(SqliteRecorder::open_in_memory().unwrap());
        let p = pipeline(FixedClassifier::new(0.5), CountingExplainer::ok(), recorder.clone());

        p.run("https://example.com").await.unwrap();
        p.run("definitely not valid").await.unwrap();

        assert_eq!(recorder.count().unwrap(), 1);
        let recent = recorder.recent(5).unwrap();
        assert_eq!(recent[0].entry.prediction, "Uncertain");
    }
}
