use log::trace;

use crate::core::subtitles::parsers::utils::{atoi, find_ignore_case};
use crate::core::subtitles::parsers::Parser;
use crate::core::subtitles::{Cue, LineBuffer, UNKNOWN_STOP};

const START_TAG: &str = "Start=";
const PARAGRAPH_TAG: &str = "<P";
const TAG_END: &str = ">";
const BREAK_TAG: &str = "<br";
const NBSP_ENTITY: &str = "&nbsp;";

/// The position within the line which is being scanned.
#[derive(Debug)]
struct Position {
    line: String,
    offset: usize,
}

impl Position {
    fn new(line: &str, offset: usize) -> Self {
        Self {
            line: line.to_string(),
            offset,
        }
    }

    fn remainder(&self) -> &str {
        &self.line[self.offset..]
    }
}

/// The SAMI parser which scans the markup character by character.
///
/// The text of a cue runs from the `<P ...>` tag after a `Start=` attribute until the next tag which
/// carries a `Start=` attribute.
#[derive(Debug, Default)]
pub struct SamiParser {
    /// The offset within the pushed back line at which the next cue starts.
    resume_offset: Option<usize>,
}

impl SamiParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search the needle, case-insensitive, from the given position onwards.
    /// It returns the position right after the needle.
    fn search(lines: &mut LineBuffer, position: Option<Position>, needle: &str) -> Option<Position> {
        if let Some(position) = position {
            if let Some(index) = find_ignore_case(position.remainder(), needle) {
                let offset = position.offset + index + needle.len();
                return Some(Position { offset, ..position });
            }
        }

        loop {
            let line = lines.next()?;
            if let Some(index) = find_ignore_case(line, needle) {
                return Some(Position::new(line, index + needle.len()));
            }
        }
    }

    /// Skip the leading integer of the remainder, as consumed by [atoi].
    fn skip_number(position: &mut Position) {
        let remainder = position.remainder();
        let trimmed = remainder.trim_start();
        let mut length = remainder.len() - trimmed.len();
        let bytes = trimmed.as_bytes();
        let mut index = 0;

        if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
            index += 1;
        }
        while index < bytes.len() && bytes[index].is_ascii_digit() {
            index += 1;
        }
        length += index;
        position.offset += length;
    }
}

impl Parser for SamiParser {
    fn parse_next(&mut self, lines: &mut LineBuffer, _index: usize) -> Option<Cue> {
        loop {
            let resume = match self.resume_offset.take() {
                Some(offset) => lines.next().map(|e| Position::new(e, offset)),
                None => None,
            };

            let mut position = Self::search(lines, resume, START_TAG)?;
            let start = atoi(position.remainder());
            Self::skip_number(&mut position);

            let position = Self::search(lines, Some(position), PARAGRAPH_TAG)?;
            let mut position = Self::search(lines, Some(position), TAG_END);
            let mut text = String::new();

            loop {
                // search the next non-empty remainder
                let current = match position.take() {
                    Some(e) if !e.remainder().is_empty() => e,
                    _ => match lines.next() {
                        Some(line) => {
                            position = Some(Position::new(line, 0));
                            continue;
                        }
                        None => break,
                    },
                };

                let remainder = current.remainder();
                let mut next = Position {
                    offset: current.offset,
                    line: String::new(),
                };
                let mut c = None;

                if remainder.starts_with('<') {
                    if remainder
                        .get(..BREAK_TAG.len())
                        .map(|e| e.eq_ignore_ascii_case(BREAK_TAG))
                        .unwrap_or(false)
                    {
                        c = Some('\n');
                    } else if find_ignore_case(remainder, START_TAG).is_some() {
                        trace!("Reached the start of the next SAMI cue");
                        lines.push_back();
                        self.resume_offset = Some(current.offset);
                        break;
                    }

                    position = Self::search(lines, Some(current), TAG_END);
                } else {
                    if remainder.starts_with(NBSP_ENTITY) {
                        c = Some(' ');
                        next.offset += NBSP_ENTITY.len();
                    } else if let Some(character) = remainder.chars().next() {
                        c = Some(if character == '\t' { ' ' } else { character });
                        next.offset += character.len_utf8();
                    }

                    next.line = current.line;
                    position = Some(next);
                }

                if let Some(c) = c {
                    text.push(c);
                }
            }

            match start.checked_mul(1000) {
                Some(start) => return Some(Cue::new(start, UNKNOWN_STOP, text)),
                None => trace!("Skipping SAMI cue with out of range start {}", start),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMI: &str = "<SAMI>
<BODY>
<SYNC Start=1000>
<P Class=ENUSCC>Hello<br>World
<SYNC Start=2500>
<P Class=ENUSCC>&nbsp;Lorem
ipsum
</BODY>
</SAMI>";

    #[test]
    fn test_parse_next() {
        let mut lines = LineBuffer::from(SAMI);
        let mut parser = SamiParser::new();

        let result = parser.parse_all(&mut lines);

        assert_eq!(
            vec![
                Cue::new(1_000_000, UNKNOWN_STOP, "Hello\nWorld"),
                Cue::new(2_500_000, UNKNOWN_STOP, " Loremipsum"),
            ],
            result
        );
    }

    #[test]
    fn test_parse_next_single_line() {
        let mut lines = LineBuffer::from(
            "<SAMI><BODY><SYNC Start=100><P>One<SYNC Start=200><P>Two</BODY></SAMI>",
        );
        let mut parser = SamiParser::new();

        let result = parser.parse_all(&mut lines);

        assert_eq!(
            vec![
                Cue::new(100_000, UNKNOWN_STOP, "One"),
                Cue::new(200_000, UNKNOWN_STOP, "Two"),
            ],
            result
        );
    }

    #[test]
    fn test_parse_next_out_of_range_start() {
        let mut lines = LineBuffer::from(
            "<SAMI><BODY><SYNC Start=9300000000000000><P>Lorem<SYNC Start=200><P>Two</BODY></SAMI>",
        );
        let mut parser = SamiParser::new();

        let result = parser.parse_all(&mut lines);

        assert_eq!(vec![Cue::new(200_000, UNKNOWN_STOP, "Two")], result);
    }
}
