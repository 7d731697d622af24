//! Pose sample producers.
//!
//! `JsonLinesSource` replays recorded detector output, one frame per line:
//!
//! ```text
//! {"left_shoulder": [0.52, 0.31], "left_hip": [0.50, 0.55], "left_knee": null}
//! ```
//!
//! Keys are joint identifiers, values `[x, y]` or `null`. Omitted joints are
//! absent.

use std::collections::HashMap;
use std::io::BufRead;

use crate::error::SourceError;
use crate::pose::{Point, PoseSample};

pub trait PoseSource {
    /// `Ok(None)` once the stream is exhausted.
    fn next_sample(&mut self) -> Result<Option<PoseSample>, SourceError>;
}

pub struct JsonLinesSource<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// Number of the last line read, starting at 1.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> PoseSource for JsonLinesSource<R> {
    fn next_sample(&mut self) -> Result<Option<PoseSample>, SourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }

            let line = self.line;
            let record: HashMap<String, Option<[f32; 2]>> =
                serde_json::from_str(text).map_err(|source| SourceError::Json { line, source })?;

            let sample = PoseSample::from_named(
                record
                    .iter()
                    .map(|(name, xy)| (name.as_str(), xy.map(|[x, y]| Point::new(x, y)))),
            )
            .map_err(|source| SourceError::Malformed { line, source })?;

            return Ok(Some(sample));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MalformedSample;
    use crate::pose::{BodyPart, BodySide, Joint};

    fn source(text: &str) -> JsonLinesSource<&[u8]> {
        JsonLinesSource::new(text.as_bytes())
    }

    #[test]
    fn reads_frames_and_skips_blank_lines() {
        let mut src = source(
            "{\"left_hip\": [0.5, 0.55], \"left_knee\": null}\n\n{\"right_ankle\": [0.6, 0.9]}\n",
        );

        let first = src.next_sample().unwrap().unwrap();
        assert_eq!(first.get(Joint::new(BodySide::Left, BodyPart::Hip)), Some(Point::new(0.5, 0.55)));
        assert_eq!(first.get(Joint::new(BodySide::Left, BodyPart::Knee)), None);

        let second = src.next_sample().unwrap().unwrap();
        assert_eq!(second.present().count(), 1);
        assert_eq!(src.line(), 3);

        assert!(src.next_sample().unwrap().is_none());
    }

    #[test]
    fn unknown_joint_reports_line() {
        let mut src = source("{}\n{\"left_wrist\": [0.1, 0.2]}\n");
        assert!(src.next_sample().unwrap().is_some());

        match src.next_sample() {
            Err(SourceError::Malformed { line, source: MalformedSample::UnknownJoint(name) }) => {
                assert_eq!(line, 2);
                assert_eq!(name, "left_wrist");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn bad_json_reports_line() {
        let mut src = source("{\"left_hip\": [0.5]}\n");
        assert!(matches!(src.next_sample(), Err(SourceError::Json { line: 1, .. })));
    }
}
