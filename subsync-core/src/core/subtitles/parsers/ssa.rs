use log::trace;
use regex::Regex;

use crate::core::subtitles::parsers::utils::{atoi, hmsf_to_micros, parse_int};
use crate::core::subtitles::parsers::{Parser, NEWLINE};
use crate::core::subtitles::{Cue, LineBuffer, SubtitleType};

const DIALOGUE_PATTERN: &str = r"^Dialogue:\s*([^,]{1,15}),\s*([+-]?\d+):\s*([+-]?\d+):\s*([+-]?\d+)\.\s*([+-]?\d+),\s*([+-]?\d+):\s*([+-]?\d+):\s*([+-]?\d+)\.\s*([+-]?\d+),([^\r\n]+)";

/// The parser for the Sub Station Alpha dialects.
///
/// Dialogue records are rewritten to the `ReadOrder,Layer,Style,Name,...,Text` layout expected by the
/// ssa decoder, every other line of the script is collected into the header.
#[derive(Debug)]
pub struct SsaParser {
    subtitle_type: SubtitleType,
    dialogue_regex: Regex,
    header: String,
}

impl SsaParser {
    pub fn new(subtitle_type: SubtitleType) -> Self {
        Self {
            subtitle_type,
            dialogue_regex: Regex::new(DIALOGUE_PATTERN).expect("dialogue pattern should be valid"),
            header: String::new(),
        }
    }

    fn centis_to_micros(captures: &regex::Captures, offset: usize) -> Option<i64> {
        hmsf_to_micros(
            parse_int(captures.get(offset)),
            parse_int(captures.get(offset + 1)),
            parse_int(captures.get(offset + 2)),
            parse_int(captures.get(offset + 3)),
            10_000,
        )
    }
}

impl Parser for SsaParser {
    fn parse_next(&mut self, lines: &mut LineBuffer, index: usize) -> Option<Cue> {
        loop {
            let line = lines.next()?;

            if let Some(captures) = self.dialogue_regex.captures(line) {
                let (Some(start), Some(stop)) = (
                    Self::centis_to_micros(&captures, 2),
                    Self::centis_to_micros(&captures, 6),
                ) else {
                    trace!("Skipping SSA dialogue {:?} with out of range times", line);
                    continue;
                };
                let fields = &captures[10];
                let text = match self.subtitle_type {
                    // SSA-1 has one field less before the text
                    SubtitleType::Ssa1 => format!(",{}", fields),
                    SubtitleType::Ass => format!("{},{},{}", index, atoi(&captures[1]), fields),
                    _ => format!("{},{},{}", index, 0, fields),
                };

                return Some(Cue::new(start, stop, text));
            }

            self.header.push_str(line);
            self.header.push_str(NEWLINE);
        }
    }

    fn header(&self) -> Option<&str> {
        if self.header.is_empty() {
            None
        } else {
            Some(self.header.as_str())
        }
    }
}
