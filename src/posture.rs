use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::config::ClassifierConfig;
use crate::error::{InvalidConfig, MalformedSample};
use crate::indicator::{fall_indicator, FallIndicator};
use crate::pose::{BodySide, Landmark, PoseSample};
use crate::sink::EventSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierState {
    Normal,
    /// Latched until `reset()`.
    Alerted,
}

/// Emitted exactly once on each Normal → Alerted transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallConfirmed {
    /// The full-precision indicator that crossed the threshold.
    pub indicator: FallIndicator,
    pub side: BodySide,
    /// Position of the triggering sample among accepted samples.
    pub sample_index: u64,
}

/// Per-sample outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    /// `None` means indeterminate: the tracked joints were not all visible.
    Normal(Option<FallIndicator>),
    /// Carries the indicator that latched the alert.
    Alerted(FallIndicator),
}

impl Classification {
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Classification::Normal(None))
    }

    pub fn is_alerted(&self) -> bool {
        matches!(self, Classification::Alerted(_))
    }

    pub fn indicator(&self) -> Option<FallIndicator> {
        match *self {
            Classification::Normal(indicator) => indicator,
            Classification::Alerted(indicator) => Some(indicator),
        }
    }
}

/// Latching fall classifier driven one pose sample at a time.
///
/// Once a sample's fall indicator exceeds the configured threshold the
/// classifier enters `Alerted`, notifies its sink once, and ignores further
/// samples until `reset()` is called. It never clears itself.
pub struct PostureClassifier<S> {
    config: ClassifierConfig,
    sink: S,
    latched: Option<FallConfirmed>,
    samples_seen: u64,
}

impl<S: EventSink> PostureClassifier<S> {
    pub fn new(config: ClassifierConfig, sink: S) -> Result<Self, InvalidConfig> {
        config.validate()?;
        Ok(Self {
            config,
            sink,
            latched: None,
            samples_seen: 0,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn state(&self) -> ClassifierState {
        match self.latched {
            Some(_) => ClassifierState::Alerted,
            None => ClassifierState::Normal,
        }
    }

    /// The event that latched the current alert, if any.
    pub fn latched(&self) -> Option<&FallConfirmed> {
        self.latched.as_ref()
    }

    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    pub fn classify(&mut self, sample: &PoseSample) -> Result<Classification, MalformedSample> {
        if let Err(err) = sample.validate(self.config.coordinate_bounds) {
            warn!("rejecting pose sample: {}", err);
            return Err(err);
        }

        let sample_index = self.samples_seen;
        self.samples_seen += 1;

        if let Some(latched) = &self.latched {
            debug!("sample {} ignored while alerted", sample_index);
            return Ok(Classification::Alerted(latched.indicator));
        }

        let Some(indicator) = fall_indicator(sample, self.config.side) else {
            debug!("sample {}: indeterminate, {} leg not fully visible", sample_index, self.config.side.name());
            return Ok(Classification::Normal(None));
        };

        if indicator.value() > self.config.threshold {
            let event = FallConfirmed {
                indicator,
                side: self.config.side,
                sample_index,
            };
            info!(
                "Normal -> Alerted | fall value={:.2} > {:.2} | upper={:.2} lower={:.2}",
                indicator.rounded(),
                self.config.threshold,
                indicator.upper.rounded(),
                indicator.lower.rounded(),
            );
            self.latched = Some(event);
            self.sink.fall_confirmed(&event);
            return Ok(Classification::Alerted(indicator));
        }

        debug!("sample {}: fall value={:.2}", sample_index, indicator.rounded());
        Ok(Classification::Normal(Some(indicator)))
    }

    /// Converts a MediaPipe frame with the configured visibility floor and classifies it.
    pub fn classify_landmarks(&mut self, landmarks: &[Landmark]) -> Result<Classification, MalformedSample> {
        let sample = PoseSample::from_landmarks(landmarks, self.config.min_visibility).map_err(|err| {
            warn!("rejecting landmark frame: {}", err);
            err
        })?;
        self.classify(&sample)
    }

    /// Acknowledges the current alert and re-arms the classifier.
    pub fn reset(&mut self) {
        if let Some(event) = self.latched.take() {
            info!("Alerted -> Normal | acknowledged fall from sample {}", event.sample_index);
        }
    }
}

/// A classifier shared between threads.
///
/// Validation, the state transition and sink notification run under one
/// lock, so concurrent over-threshold samples produce a single event.
pub struct SharedClassifier<S> {
    inner: Arc<Mutex<PostureClassifier<S>>>,
}

impl<S> Clone for SharedClassifier<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: EventSink> SharedClassifier<S> {
    pub fn new(classifier: PostureClassifier<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(classifier)),
        }
    }

    // Poisoning is ignored: the latch is a single Option write.
    fn lock(&self) -> MutexGuard<'_, PostureClassifier<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn classify(&self, sample: &PoseSample) -> Result<Classification, MalformedSample> {
        self.lock().classify(sample)
    }

    pub fn classify_landmarks(&self, landmarks: &[Landmark]) -> Result<Classification, MalformedSample> {
        self.lock().classify_landmarks(landmarks)
    }

    pub fn reset(&self) {
        self.lock().reset()
    }

    pub fn state(&self) -> ClassifierState {
        self.lock().state()
    }

    pub fn latched(&self) -> Option<FallConfirmed> {
        self.lock().latched().copied()
    }
}
