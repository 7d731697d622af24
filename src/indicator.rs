//! Fall indicator derived from the hip and knee hinge angles.
//!
//! An upright body keeps both hinges close to 180° and the indicator near or
//! below zero. Folding at the hip or knee, as when collapsing to the ground,
//! drives it up.

use crate::geometry::{angle_between, round2, AngleMeasurement};
use crate::pose::{BodyPart, BodySide, Joint, PoseSample};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallIndicator {
    value: f32,
    /// Angle at the hip between shoulder and knee.
    pub upper: AngleMeasurement,
    /// Angle at the knee between hip and ankle.
    pub lower: AngleMeasurement,
}

impl FallIndicator {
    /// Full-precision value, used for threshold comparisons.
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn rounded(&self) -> f32 {
        round2(self.value)
    }
}

/// `180 − (upper + lower)` for the chosen body side, or `None` when either
/// hinge angle cannot be measured this frame.
pub fn fall_indicator(sample: &PoseSample, side: BodySide) -> Option<FallIndicator> {
    let joint = |part| sample.get(Joint::new(side, part));

    let shoulder = joint(BodyPart::Shoulder);
    let hip = joint(BodyPart::Hip);
    let knee = joint(BodyPart::Knee);
    let ankle = joint(BodyPart::Ankle);

    let upper = angle_between(shoulder, hip, knee)?;
    let lower = angle_between(hip, knee, ankle)?;

    Some(FallIndicator {
        value: 180.0 - (upper.degrees() + lower.degrees()),
        upper,
        lower,
    })
}
