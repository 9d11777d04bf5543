use std::fmt::Debug;

use derive_more::Display;
#[cfg(any(test, feature = "testing"))]
use mockall::automock;

/// A timed subtitle block which is handed to the [CueSink].
#[derive(Debug, Display, Clone, PartialEq)]
#[display("pts: {}, length: {:?}, text: {}", pts, length, text)]
pub struct CueBlock {
    /// The adjusted presentation timestamp in microseconds.
    pub pts: i64,
    /// The adjusted duration in microseconds, [None] when the end of the cue is unknown.
    pub length: Option<i64>,
    /// The text of the cue.
    pub text: String,
}

/// The receiver of the subtitle blocks which are emitted during playback.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait CueSink: Debug {
    /// Send the given block to the subtitle decoder.
    fn send(&mut self, block: CueBlock);
}

/// The host which embeds the subtitle demuxer and receives its notifications.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait SubtitleHost: Debug {
    /// Show an informational message to the user.
    fn osd_message(&self, message: &str);

    /// Invoked when the subtitle delay has been changed by the resync engine.
    ///
    /// * `delay` - The new delay in microseconds.
    fn delay_changed(&self, delay: i64);

    /// Invoked when the adjusted subtitle export has been regenerated.
    fn export_updated(&self, content: &str);
}

/// A [CueSink] which collects all received blocks.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CueCollector {
    blocks: Vec<CueBlock>,
}

impl CueCollector {
    pub fn blocks(&self) -> &[CueBlock] {
        self.blocks.as_slice()
    }

    pub fn into_blocks(self) -> Vec<CueBlock> {
        self.blocks
    }
}

impl CueSink for CueCollector {
    fn send(&mut self, block: CueBlock) {
        self.blocks.push(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_collector_send() {
        let block = CueBlock {
            pts: 1_000_000,
            length: Some(500_000),
            text: "Lorem".to_string(),
        };
        let mut collector = CueCollector::default();

        collector.send(block.clone());

        assert_eq!(vec![block], collector.into_blocks());
    }
}
