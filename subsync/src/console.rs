use std::io::{self, Write};

use log::{debug, info, trace, warn};
use subsync_core::core::demux::{CueBlock, CueSink, SubtitleHost};
use subsync_core::core::subtitles::format_timestamp;
use subsync_core::core::sync::{SPU_DELAY, SRT_FILE_CONTENT};

/// A [SubtitleHost] which reports the demuxer notifications through the logger.
#[derive(Debug, Default)]
pub struct ConsoleHost;

impl SubtitleHost for ConsoleHost {
    fn osd_message(&self, message: &str) {
        info!("{}", message);
    }

    fn delay_changed(&self, delay: i64) {
        debug!("Received {} event, delay = {} ms", SPU_DELAY, delay / 1000);
    }

    fn export_updated(&self, content: &str) {
        trace!("Received {} event of {} bytes", SRT_FILE_CONTENT, content.len());
    }
}

/// A [CueSink] which prints the emitted cues to the given writer.
#[derive(Debug)]
pub struct PrintSink<W: Write> {
    writer: W,
    printed: usize,
}

impl PrintSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> PrintSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, printed: 0 }
    }

    /// The number of cues which have been printed.
    pub fn printed(&self) -> usize {
        self.printed
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn format(block: &CueBlock) -> String {
        let stop = block
            .length
            .map(|e| format_timestamp(block.pts + e))
            .unwrap_or_else(|| "?".to_string());
        let text = block.text.trim_end_matches(['\r', '\n']).replace('\n', " | ");

        format!("[{} --> {}] {}", format_timestamp(block.pts), stop, text)
    }
}

impl<W: Write + std::fmt::Debug> CueSink for PrintSink<W> {
    fn send(&mut self, block: CueBlock) {
        match writeln!(self.writer, "{}", Self::format(&block)) {
            Ok(_) => self.printed += 1,
            Err(e) => warn!("Failed to print subtitle {}, {}", block, e),
        }
    }
}
