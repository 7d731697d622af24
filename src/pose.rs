//! Joint schema and per-frame pose samples.
//!
//! A sample tracks shoulder, hip, knee and ankle on both body sides. Each
//! slot is either a 2D position in image-normalized space or absent when the
//! detector did not locate that joint on the frame.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MalformedSample;

/// MediaPipe Pose emits 33 landmarks per frame.
pub const MEDIAPIPE_LANDMARKS: usize = 33;

pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A joint slot: `None` when the joint was not detected this frame.
pub type JointPosition = Option<Point>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodySide {
    #[default]
    Left,
    Right,
}

impl BodySide {
    pub fn name(&self) -> &'static str {
        match self {
            BodySide::Left => "left",
            BodySide::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Shoulder,
    Hip,
    Knee,
    Ankle,
}

impl BodyPart {
    pub const ALL: [BodyPart; 4] = [BodyPart::Shoulder, BodyPart::Hip, BodyPart::Knee, BodyPart::Ankle];

    pub fn name(&self) -> &'static str {
        match self {
            BodyPart::Shoulder => "shoulder",
            BodyPart::Hip => "hip",
            BodyPart::Knee => "knee",
            BodyPart::Ankle => "ankle",
        }
    }
}

/// A tracked anatomical landmark on one side of the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Joint {
    pub side: BodySide,
    pub part: BodyPart,
}

impl Joint {
    pub const COUNT: usize = 8;

    pub const fn new(side: BodySide, part: BodyPart) -> Self {
        Self { side, part }
    }

    pub fn all() -> impl Iterator<Item = Joint> {
        [BodySide::Left, BodySide::Right]
            .into_iter()
            .flat_map(|side| BodyPart::ALL.into_iter().map(move |part| Joint::new(side, part)))
    }

    fn slot(&self) -> usize {
        let side = match self.side {
            BodySide::Left => 0,
            BodySide::Right => 4,
        };
        let part = match self.part {
            BodyPart::Shoulder => 0,
            BodyPart::Hip => 1,
            BodyPart::Knee => 2,
            BodyPart::Ankle => 3,
        };
        side + part
    }

    /// Index of this joint in a MediaPipe Pose landmark frame.
    pub fn mediapipe_index(&self) -> usize {
        match (self.side, self.part) {
            (BodySide::Left, BodyPart::Shoulder) => LEFT_SHOULDER,
            (BodySide::Right, BodyPart::Shoulder) => RIGHT_SHOULDER,
            (BodySide::Left, BodyPart::Hip) => LEFT_HIP,
            (BodySide::Right, BodyPart::Hip) => RIGHT_HIP,
            (BodySide::Left, BodyPart::Knee) => LEFT_KNEE,
            (BodySide::Right, BodyPart::Knee) => RIGHT_KNEE,
            (BodySide::Left, BodyPart::Ankle) => LEFT_ANKLE,
            (BodySide::Right, BodyPart::Ankle) => RIGHT_ANKLE,
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.side.name(), self.part.name())
    }
}

impl FromStr for Joint {
    type Err = MalformedSample;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Joint::all()
            .find(|joint| joint.to_string() == s)
            .ok_or_else(|| MalformedSample::UnknownJoint(s.to_string()))
    }
}

/// Raw detector output for one landmark, as produced by a BlazePose-style model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub visibility: f32,
}

/// Inclusive range applied to both coordinates of every present joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateBounds {
    pub min: f32,
    pub max: f32,
}

impl CoordinateBounds {
    pub fn contains(&self, point: Point) -> bool {
        (self.min..=self.max).contains(&point.x) && (self.min..=self.max).contains(&point.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseSample {
    joints: [JointPosition; Joint::COUNT],
}

impl PoseSample {
    /// A sample with every joint absent.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, joint: Joint, point: Point) -> Self {
        self.set(joint, Some(point));
        self
    }

    pub fn set(&mut self, joint: Joint, position: JointPosition) {
        self.joints[joint.slot()] = position;
    }

    pub fn get(&self, joint: Joint) -> JointPosition {
        self.joints[joint.slot()]
    }

    pub fn present(&self) -> impl Iterator<Item = (Joint, Point)> + '_ {
        Joint::all().filter_map(|joint| self.get(joint).map(|p| (joint, p)))
    }

    /// Builds a sample from textual joint identifiers. Identifiers outside the
    /// schema are rejected; joints that are not listed stay absent.
    pub fn from_named<'a, I>(entries: I) -> Result<Self, MalformedSample>
    where
        I: IntoIterator<Item = (&'a str, JointPosition)>,
    {
        let mut sample = Self::new();
        for (name, position) in entries {
            let joint: Joint = name.parse()?;
            sample.set(joint, position);
        }
        Ok(sample)
    }

    /// Picks the tracked joints out of a full MediaPipe landmark frame.
    /// Landmarks with visibility below `min_visibility` count as absent.
    pub fn from_landmarks(landmarks: &[Landmark], min_visibility: f32) -> Result<Self, MalformedSample> {
        if landmarks.len() != MEDIAPIPE_LANDMARKS {
            return Err(MalformedSample::LandmarkCount {
                expected: MEDIAPIPE_LANDMARKS,
                found: landmarks.len(),
            });
        }

        let mut sample = Self::new();
        for joint in Joint::all() {
            let lm = landmarks[joint.mediapipe_index()];
            if lm.visibility >= min_visibility {
                sample.set(joint, Some(Point::new(lm.x, lm.y)));
            }
        }
        Ok(sample)
    }

    /// Checks every present joint for finite, in-bounds coordinates.
    pub fn validate(&self, bounds: Option<CoordinateBounds>) -> Result<(), MalformedSample> {
        for (joint, p) in self.present() {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(MalformedSample::NonFiniteCoordinate { joint });
            }
            if let Some(bounds) = bounds {
                if !bounds.contains(p) {
                    return Err(MalformedSample::OutOfBounds { joint, x: p.x, y: p.y });
                }
            }
        }
        Ok(())
    }
}
