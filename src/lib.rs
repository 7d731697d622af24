//! Worksite safety sentinel.
//!
//! The core is a latching fall classifier: pose samples in, hip/knee hinge
//! angles derived, a fall indicator compared against a threshold, and a
//! single `FallConfirmed` event per alert until the host resets it. Around it
//! sit the machinery-suitability, zone-access and hard-hat checks used by
//! the same safety dashboard.

pub mod config;
pub mod equipment;
pub mod error;
pub mod geometry;
pub mod helmet;
pub mod indicator;
pub mod pose;
pub mod posture;
pub mod sink;
pub mod source;
pub mod zones;

pub use config::{ClassifierConfig, Config};
pub use error::{InvalidConfig, MalformedSample, SourceError};
pub use geometry::{angle_between, AngleMeasurement};
pub use indicator::{fall_indicator, FallIndicator};
pub use pose::{BodyPart, BodySide, Joint, JointPosition, Landmark, Point, PoseSample};
pub use posture::{Classification, ClassifierState, FallConfirmed, PostureClassifier, SharedClassifier};
pub use sink::{ChannelSink, EventSink, LogSink};
pub use source::{JsonLinesSource, PoseSource};
