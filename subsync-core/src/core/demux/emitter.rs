use log::{debug, trace};

use crate::core::demux::{CueBlock, CueSink};
use crate::core::subtitles::{CueStore, Result, SubtitleError};
use crate::core::sync::SyncState;

/// The cue emitter hands the cues of a [CueStore] to a [CueSink] in playback order.
///
/// The emitter keeps a cursor to the next cue to emit, together with the playback horizon
/// until which the next demux pass emits cues. The horizon of the last pass is the playback
/// time used for bookmarks and for re-seeking after a timing correction.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CueEmitter {
    cursor: usize,
    next_demux_time: i64,
    last_demux_time: i64,
}

impl CueEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The index of the next cue to emit.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The horizon of the last demux pass in microseconds.
    pub fn last_demux_time(&self) -> i64 {
        self.last_demux_time
    }

    /// Set the time until which the next demux pass emits cues.
    pub fn set_next_demux_time(&mut self, time: i64) {
        self.next_demux_time = time;
    }

    /// Verify if all cues of the given store have been passed.
    pub fn is_finished(&self, cues: &CueStore) -> bool {
        self.cursor >= cues.len()
    }

    /// Emit all cues which start before the current horizon.
    ///
    /// Cues without text, or with a negative start, are skipped.
    /// It returns the number of emitted cues.
    pub fn emit(&mut self, cues: &CueStore, state: &SyncState, sink: &mut dyn CueSink) -> usize {
        let mut emitted = 0;
        if self.is_finished(cues) {
            return emitted;
        }

        let mut horizon = self.next_demux_time;
        if horizon <= 0 {
            if let Some(cue) = cues.get(self.cursor) {
                horizon = state.adjust(cue.start()).saturating_add(1);
            }
        }

        while let Some(cue) = cues.get(self.cursor) {
            let start = state.adjust(cue.start());
            if start >= horizon {
                break;
            }

            self.cursor += 1;
            if cue.text().is_empty() || cue.start() < 0 {
                trace!("Skipping subtitle cue {}", cue);
                continue;
            }

            let length = if cue.has_stop() && cue.stop() >= cue.start() {
                Some(state.adjust(cue.stop()) - start)
            } else {
                None
            };

            sink.send(CueBlock {
                pts: start,
                length,
                text: cue.text().to_string(),
            });
            emitted += 1;
        }

        self.last_demux_time = self.next_demux_time;
        self.next_demux_time = 0;
        emitted
    }

    /// Move the cursor to the first cue which is still visible at, or starts after, the given time.
    ///
    /// It returns [SubtitleError::EndOfStream] when no such cue exists.
    pub fn seek(&mut self, cues: &CueStore, state: &SyncState, time: i64) -> Result<()> {
        self.cursor = cues
            .iter()
            .position(|e| {
                state.adjust(e.start()) > time
                    || (e.stop() > e.start() && state.adjust(e.stop()) > time)
            })
            .unwrap_or(cues.len());

        if self.is_finished(cues) {
            debug!("No subtitle cue available after {}", time);
            return Err(SubtitleError::EndOfStream(time));
        }

        trace!("Subtitle cursor moved to {} for time {}", self.cursor, time);
        Ok(())
    }

    /// Move the cursor to the first cue which starts at, or after, the given fraction of the length.
    ///
    /// It returns [SubtitleError::EndOfStream] when no such cue exists.
    pub fn seek_position(&mut self, cues: &CueStore, state: &SyncState, position: f64) -> Result<()> {
        let time = (position * cues.length() as f64) as i64;

        self.cursor = cues
            .iter()
            .position(|e| state.adjust(e.start()) >= time)
            .unwrap_or(cues.len());

        if self.is_finished(cues) {
            debug!("No subtitle cue available after position {}", position);
            return Err(SubtitleError::EndOfStream(time));
        }

        Ok(())
    }

    /// The adjusted start time of the next cue.
    ///
    /// It returns [SubtitleError::EndOfStream] when all cues have been passed.
    pub fn time(&self, cues: &CueStore, state: &SyncState) -> Result<i64> {
        cues.get(self.cursor)
            .map(|e| state.adjust(e.start()))
            .ok_or(SubtitleError::EndOfStream(self.last_demux_time))
    }

    /// The position of the next cue as a fraction of the length of the store.
    pub fn position(&self, cues: &CueStore, state: &SyncState) -> f64 {
        match cues.get(self.cursor) {
            None => 1.0,
            Some(_) if cues.length() <= 0 => 0.0,
            Some(cue) => state.adjust(cue.start()) as f64 / cues.length() as f64,
        }
    }
}
