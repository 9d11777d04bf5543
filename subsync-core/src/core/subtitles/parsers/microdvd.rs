use log::{debug, trace};
use regex::Regex;

use crate::core::subtitles::parsers::utils::{atoi, parse_float_prefix, replace_pipes};
use crate::core::subtitles::parsers::{Parser, ParserContext};
use crate::core::subtitles::{Cue, LineBuffer, UNKNOWN_STOP};

const LINE_PATTERN: &str = r"^\{\s*([+-]?\d+)\}\{(?:\s*([+-]?\d+))?\}(.+)$";

/// The MicroDVD parser which handles `{start}{stop}text` lines in frame numbers.
///
/// A `{1}{1}23.976` line declares the frame rate of the subtitle and is not a cue.
#[derive(Debug)]
pub struct MicroDvdParser {
    context: ParserContext,
    line_regex: Regex,
}

impl MicroDvdParser {
    pub fn new(context: ParserContext) -> Self {
        Self {
            context,
            line_regex: Regex::new(LINE_PATTERN).expect("line pattern should be valid"),
        }
    }

    /// The duration of a frame in microseconds which is currently used for the conversion.
    pub fn microsec_per_frame(&self) -> i64 {
        self.context.microsec_per_frame
    }

    fn apply_frame_rate(&mut self, value: &str) {
        match parse_float_prefix(value) {
            Some((fps, _)) if fps > 0.0 && !self.context.frame_rate_override => {
                self.context.microsec_per_frame = (1_000_000.0 / fps as f32) as i64;
                debug!("Using subtitle frame rate {} fps", fps);
            }
            _ => trace!("Ignoring subtitle frame rate declaration {:?}", value),
        }
    }
}

impl Parser for MicroDvdParser {
    fn parse_next(&mut self, lines: &mut LineBuffer, _index: usize) -> Option<Cue> {
        loop {
            let line = lines.next()?;
            let Some(captures) = self.line_regex.captures(line) else {
                continue;
            };

            let start = atoi(&captures[1]);
            let stop = captures.get(2).map(|e| atoi(e.as_str())).unwrap_or(-1);
            let text = captures[3].to_string();

            if start == 1 && stop == 1 {
                self.apply_frame_rate(text.as_str());
                continue;
            }

            let microsec_per_frame = self.context.microsec_per_frame;
            let stop = if stop >= 0 {
                stop.checked_mul(microsec_per_frame)
            } else {
                Some(UNKNOWN_STOP)
            };

            match (start.checked_mul(microsec_per_frame), stop) {
                (Some(start), Some(stop)) => {
                    return Some(Cue::new(start, stop, replace_pipes(text.as_str())))
                }
                _ => trace!("Skipping MicroDVD line {:?} with out of range frames", line),
            }
        }
    }
}
