use log::{trace, warn};
use regex::Regex;

use crate::core::subtitles::parsers::utils::{atoi, hms_to_seconds, parse_int};
use crate::core::subtitles::parsers::Parser;
use crate::core::subtitles::{Cue, LineBuffer};

const FULL_TIME_PATTERN: &str = r"^\s*([+-]?\d+):\s*([+-]?\d+):\s*([+-]?\d+)\.\s*([+-]?\d+)\s*([+-]?\d+):\s*([+-]?\d+):\s*([+-]?\d+)\.\s*([+-]?\d+)\s*(.+)$";
const SHORT_TIME_PATTERN: &str = r"^@\s*([+-]?\d+)\s*@\s*([+-]?\d+)\s*(.+)$";
const DIRECTIVE_PATTERN: &str = r"^#([A-Za-z])[A-Za-z]*\s*(.*)$";
const SHIFT_PATTERN: &str = r"^\s*(-)?(\d+)(?::(\d+))?(?::(\d+))?(?:\.(\d+))?";
const DEFAULT_TIME_RESOLUTION: i64 = 30;
const LINE_CONTINUATION: char = '\\';

/// The JacoSub parser.
///
/// Times are expressed in frames of the time resolution, which together with the time shift can be
/// changed by the `#T` and `#S` directives within the script.
#[derive(Debug)]
pub struct JacoSubParser {
    comment: u32,
    time_resolution: i64,
    time_shift: i64,
    full_time_regex: Regex,
    short_time_regex: Regex,
    directive_regex: Regex,
    shift_regex: Regex,
}

impl JacoSubParser {
    pub fn new() -> Self {
        Self {
            comment: 0,
            time_resolution: DEFAULT_TIME_RESOLUTION,
            time_shift: 0,
            full_time_regex: Regex::new(FULL_TIME_PATTERN).expect("full time pattern should be valid"),
            short_time_regex: Regex::new(SHORT_TIME_PATTERN)
                .expect("short time pattern should be valid"),
            directive_regex: Regex::new(DIRECTIVE_PATTERN).expect("directive pattern should be valid"),
            shift_regex: Regex::new(SHIFT_PATTERN).expect("shift pattern should be valid"),
        }
    }

    /// The time shift in frames of the time resolution.
    pub fn time_shift(&self) -> i64 {
        self.time_shift
    }

    /// The number of frames per second.
    pub fn time_resolution(&self) -> i64 {
        self.time_resolution
    }

    /// Convert the given seconds and frames into microseconds, applying the time shift.
    /// It returns [None] when the time is out of range.
    fn frames_to_micros(&self, seconds: i64, frames: i64) -> Option<i64> {
        let fraction = frames.checked_add(self.time_shift)? as f64 / self.time_resolution as f64;
        let micros = (seconds as f64 + fraction) * 1_000_000.0;

        if micros.abs() < i64::MAX as f64 {
            Some(micros as i64)
        } else {
            None
        }
    }

    /// Parse the timing of the given line.
    /// It returns [None] when the line has no timing, or when the timing is out of range.
    fn parse_timing(&self, line: &str) -> Option<(i64, i64, String)> {
        if let Some(captures) = self.full_time_regex.captures(line) {
            let start_seconds = hms_to_seconds(
                parse_int(captures.get(1)),
                parse_int(captures.get(2)),
                parse_int(captures.get(3)),
            )?;
            let stop_seconds = hms_to_seconds(
                parse_int(captures.get(5)),
                parse_int(captures.get(6)),
                parse_int(captures.get(7)),
            )?;

            return Some((
                self.frames_to_micros(start_seconds, parse_int(captures.get(4)))?,
                self.frames_to_micros(stop_seconds, parse_int(captures.get(8)))?,
                captures[9].to_string(),
            ));
        }

        let captures = self.short_time_regex.captures(line)?;
        Some((
            self.frames_to_micros(0, parse_int(captures.get(1)))?,
            self.frames_to_micros(0, parse_int(captures.get(2)))?,
            captures[3].to_string(),
        ))
    }

    fn apply_directive(&mut self, line: &str) {
        let Some(captures) = self.directive_regex.captures(line) else {
            return;
        };
        let value = captures.get(2).map(|e| e.as_str()).unwrap_or("");

        match captures[1].to_ascii_uppercase().as_str() {
            "S" => {
                if let Some(shift) = self.shift_regex.captures(value) {
                    let sign = if shift.get(1).is_some() { -1 } else { 1 };
                    let fields = [shift.get(2), shift.get(3), shift.get(4)]
                        .into_iter()
                        .flatten()
                        .map(|e| atoi(e.as_str()))
                        .collect::<Vec<i64>>();
                    let frames = parse_int(shift.get(5));
                    let time_shift = fields
                        .iter()
                        .try_fold(0i64, |total, e| total.checked_mul(60)?.checked_add(*e))
                        .and_then(|e| e.checked_mul(self.time_resolution))
                        .and_then(|e| e.checked_add(frames))
                        .map(|e| sign * e);

                    match time_shift {
                        Some(time_shift) => {
                            self.time_shift = time_shift;
                            trace!("Updated JacoSub time shift to {}", self.time_shift);
                        }
                        None => warn!("Ignoring out of range JacoSub time shift {:?}", value),
                    }
                }
            }
            "T" => {
                let resolution = atoi(value);
                if resolution > 0 {
                    self.time_resolution = resolution;
                    trace!("Updated JacoSub time resolution to {}", resolution);
                } else {
                    warn!("Ignoring invalid JacoSub time resolution {:?}", value);
                }
            }
            _ => {}
        }
    }

    /// Remove the leading directive word and the inline markup of the text.
    fn clean_text(&mut self, text: &str) -> String {
        let text = text.trim_start_matches([' ', '\t']);
        let text = match text.chars().next() {
            Some(c) if c.is_ascii_alphabetic() || c == '[' => {
                text.find(' ').map(|e| &text[e..]).unwrap_or("")
            }
            _ => text,
        };
        let chars = text
            .trim_start_matches([' ', '\t'])
            .chars()
            .take_while(|e| *e != '\n' && *e != '\r')
            .collect::<Vec<char>>();
        let mut result = String::new();
        let mut index = 0;

        while index < chars.len() {
            let next = chars.get(index + 1).copied();

            match chars[index] {
                '{' => self.comment += 1,
                '}' => {
                    if self.comment > 0 {
                        self.comment = 0;
                        if next == Some(' ') {
                            index += 1;
                        }
                    }
                }
                '~' => {
                    if self.comment == 0 {
                        result.push(' ');
                    }
                }
                ' ' | '\t' => {
                    if next != Some(' ') && next != Some('\t') && self.comment == 0 {
                        result.push(' ');
                    }
                }
                '\\' => match next {
                    Some('n') => {
                        result.push('\n');
                        index += 1;
                    }
                    Some(c) if c.eq_ignore_ascii_case(&'c') || c.eq_ignore_ascii_case(&'f') => {
                        // the code and its argument
                        index += 2;
                    }
                    Some('B' | 'b' | 'I' | 'i' | 'U' | 'u' | 'D' | 'N') => index += 1,
                    Some(c @ ('~' | '{' | '\\')) => {
                        if self.comment == 0 {
                            result.push(c);
                        }
                        index += 1;
                    }
                    _ => {}
                },
                c => {
                    if self.comment == 0 {
                        result.push(c);
                    }
                }
            }

            index += 1;
        }

        result
    }
}

impl Parser for JacoSubParser {
    fn parse_next(&mut self, lines: &mut LineBuffer, _index: usize) -> Option<Cue> {
        let (start, stop, mut text) = loop {
            let line = lines.next()?;

            if let Some(timing) = self.parse_timing(line) {
                break timing;
            }
            if line.starts_with('#') {
                self.apply_directive(line);
            }
        };

        while text.ends_with(LINE_CONTINUATION) {
            let line = lines.next()?;
            if line.is_empty() {
                break;
            }

            text.push_str(line);
        }

        Some(Cue::new(start, stop, self.clean_text(text.as_str())))
    }
}
