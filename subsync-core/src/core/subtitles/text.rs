use std::io::BufRead;

use log::trace;

use crate::core::subtitles::{Result, SubtitleError};

/// The complete subtitle transcript split into lines, read through a cursor which supports
/// a single line of lookahead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineBuffer {
    lines: Vec<String>,
    cursor: usize,
}

impl LineBuffer {
    /// Load all remaining lines of the given reader.
    ///
    /// Line terminators (`\n` or `\r\n`) are removed and invalid UTF-8 is replaced lossy.
    /// It returns [SubtitleError::EmptyInput] when not a single line could be read.
    pub fn load<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut lines = vec![];
        let mut buffer = vec![];

        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }

            if buffer.last() == Some(&b'\n') {
                buffer.pop();
            }
            if buffer.last() == Some(&b'\r') {
                buffer.pop();
            }

            lines.push(String::from_utf8_lossy(&buffer).into_owned());
        }

        if lines.is_empty() {
            return Err(SubtitleError::EmptyInput);
        }

        trace!("Loaded a total of {} subtitle lines", lines.len());
        Ok(Self::from(lines))
    }

    /// Read the next line, or [None] when all lines have been consumed.
    pub fn next(&mut self) -> Option<&str> {
        let line = self.lines.get(self.cursor)?;
        self.cursor += 1;
        Some(line.as_str())
    }

    /// Rewind the cursor by exactly one line so the last line is returned again by [LineBuffer::next].
    pub fn push_back(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Verify if all lines have been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.lines.len()
    }

    /// The total number of lines in the buffer.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<Vec<String>> for LineBuffer {
    fn from(lines: Vec<String>) -> Self {
        Self { lines, cursor: 0 }
    }
}

impl From<&str> for LineBuffer {
    fn from(value: &str) -> Self {
        Self::from(value.lines().map(|e| e.to_string()).collect::<Vec<String>>())
    }
}
