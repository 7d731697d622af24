//! Hard-hat check combining object-detector output with a yellow colour cue.
//!
//! The detector itself is external; it hands over class names and
//! confidences. Colour is measured in 8-bit HSV with hue in [0, 180), the
//! convention used by OpenCV.

use image::{GrayImage, Luma, Rgb, RgbImage};
use serde::Deserialize;

/// Detections at or below this confidence are ignored.
pub const MIN_CONFIDENCE: f32 = 0.5;

pub const YELLOW_HUE: (u8, u8) = (20, 40);
pub const YELLOW_SATURATION: (u8, u8) = (100, 255);
pub const YELLOW_VALUE: (u8, u8) = (100, 255);

const HELMET_CLASS: &str = "helmet";
const NO_HELMET_CLASS: &str = "no_helmet";

/// One box from the object detector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Detection {
    #[serde(rename = "class")]
    pub class_name: String,
    pub confidence: f32,
}

impl Detection {
    pub fn new(class_name: impl Into<String>, confidence: f32) -> Self {
        Self {
            class_name: class_name.into(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HelmetVerdict {
    pub helmet_detected: bool,
    pub no_helmet_detected: bool,
    pub yellow_detected: bool,
}

impl HelmetVerdict {
    /// A confident helmet box or any yellow pixel counts as a helmet.
    pub fn helmet_present(&self) -> bool {
        self.helmet_detected || self.yellow_detected
    }
}

/// OpenCV-style 8-bit HSV: hue halved into [0, 180), saturation and value in [0, 255].
pub fn rgb_to_hsv(Rgb([r, g, b]): Rgb<u8>) -> (u8, u8, u8) {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let saturation = if max > 0.0 { 255.0 * delta / max } else { 0.0 };
    let mut hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    ((hue / 2.0).round() as u8 % 180, saturation.round() as u8, max as u8)
}

pub fn is_yellow(pixel: Rgb<u8>) -> bool {
    let (h, s, v) = rgb_to_hsv(pixel);
    (YELLOW_HUE.0..=YELLOW_HUE.1).contains(&h)
        && (YELLOW_SATURATION.0..=YELLOW_SATURATION.1).contains(&s)
        && (YELLOW_VALUE.0..=YELLOW_VALUE.1).contains(&v)
}

/// 255 where the pixel is yellow, 0 elsewhere.
pub fn yellow_mask(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([if is_yellow(*image.get_pixel(x, y)) { 255 } else { 0 }])
    })
}

pub fn contains_yellow(image: &RgbImage) -> bool {
    image.pixels().any(|p| is_yellow(*p))
}

pub fn evaluate(detections: &[Detection], image: &RgbImage) -> HelmetVerdict {
    let mut verdict = HelmetVerdict {
        yellow_detected: contains_yellow(image),
        ..Default::default()
    };

    for detection in detections.iter().filter(|d| d.confidence > MIN_CONFIDENCE) {
        match detection.class_name.as_str() {
            HELMET_CLASS => verdict.helmet_detected = true,
            NO_HELMET_CLASS => verdict.no_helmet_detected = true,
            _ => {}
        }
    }
    verdict
}
