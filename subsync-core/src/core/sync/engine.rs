use log::{debug, trace};

use crate::core::sync::{
    SpeedDelay, SpeedRatio, SpeedRatioTable, SyncMessage, SyncState, IDENTITY_RATIO_INDEX,
};

/// The minimum time between two subtitle bookmarks before a speed is computed.
const MIN_SPEED_SAMPLE: i64 = 45 * 1_000_000;
/// The minimum time between two subtitle bookmarks before an already corrected speed is refined.
const MIN_SPEED_REFINE_SAMPLE: i64 = 5 * 60 * 1_000_000;

/// A pair of bookmarked playback times in microseconds, `0` meaning not set.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct BookmarkPair {
    /// The time at which the audio was heard.
    pub audio: i64,
    /// The time at which the matching subtitle was shown.
    pub subtitle: i64,
}

impl BookmarkPair {
    /// Verify if both times of the pair have been bookmarked.
    pub fn is_complete(&self) -> bool {
        self.audio != 0 && self.subtitle != 0
    }

    /// Verify if none of the times of the pair have been bookmarked.
    pub fn is_empty(&self) -> bool {
        self.audio == 0 && self.subtitle == 0
    }
}

/// The result of a resync trigger.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SyncOutcome {
    /// Indicates if the [SyncState] has been changed.
    pub applied: bool,
    /// The messages to show to the user.
    pub messages: Vec<SyncMessage>,
}

/// The resync engine infers the delay and speed corrections of the subtitle timeline
/// from the audio and subtitle times bookmarked by the user.
///
/// A speed correction is never applied directly, it's proposed first and applied when the
/// bookmarks are synced again without setting new bookmarks.
#[derive(Debug)]
pub struct ResyncEngine {
    table: SpeedRatioTable,
    state: SyncState,
    current: BookmarkPair,
    previous: BookmarkPair,
    pending: Option<SpeedDelay>,
}

impl ResyncEngine {
    /// Create a new engine with the given initial delay in microseconds.
    pub fn new(delay: i64) -> Self {
        Self {
            table: SpeedRatioTable::new(),
            state: SyncState::new(delay),
            current: BookmarkPair::default(),
            previous: BookmarkPair::default(),
            pending: None,
        }
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn table(&self) -> &SpeedRatioTable {
        &self.table
    }

    /// The speed correction which awaits the confirmation of the user.
    pub fn pending(&self) -> Option<&SpeedDelay> {
        self.pending.as_ref()
    }

    pub fn current_bookmarks(&self) -> &BookmarkPair {
        &self.current
    }

    pub fn previous_bookmarks(&self) -> &BookmarkPair {
        &self.previous
    }

    /// Bookmark the given playback time as the moment the audio was heard.
    pub fn bookmark_audio(&mut self, now: i64) -> SyncMessage {
        self.current.audio = now;
        SyncMessage::AudioBookmarked
    }

    /// Bookmark the given playback time as the moment the subtitle was shown.
    pub fn bookmark_subtitle(&mut self, now: i64) -> SyncMessage {
        self.current.subtitle = now;
        SyncMessage::SubtitleBookmarked
    }

    /// Reconcile the current bookmarks into a new delay, and when possible a speed proposal.
    ///
    /// A pending speed proposal is applied instead when no new bookmarks have been set since.
    /// The current bookmarks become the previous ones afterwards.
    pub fn sync_bookmarks(&mut self) -> SyncOutcome {
        debug!(
            "Syncing subtitle bookmarks, previous: {:?}, current: {:?}",
            self.previous, self.current
        );
        let mut outcome = SyncOutcome::default();

        match self.pending.take() {
            Some(pending) if self.current.is_empty() => {
                outcome.messages.push(self.apply(pending));
                outcome.applied = true;
            }
            _ => {
                let mut show_correction = true;

                if let Some(proposal) = self.compute_speed_and_delay() {
                    outcome.messages.push(SyncMessage::SpeedProposed(
                        self.table.description(proposal.ratio_index).to_string(),
                    ));
                    show_correction = false;
                    self.pending = Some(proposal);
                }

                match self.compute_delay() {
                    Some(speed_delay) => {
                        let message = self.apply(speed_delay);
                        if show_correction {
                            outcome.messages.push(message);
                        }
                        outcome.applied = true;
                    }
                    None => outcome.messages.push(SyncMessage::BookmarksMissing {
                        delay_ms: self.state.delay() / 1000,
                        description: self
                            .table
                            .description(self.state.ratio_index())
                            .to_string(),
                    }),
                }
            }
        }

        self.previous = self.current;
        self.current = BookmarkPair::default();
        debug!("Subtitle sync state is now {}", self.state);
        outcome
    }

    /// Reset the delay and speed, clearing all bookmarks and any pending speed proposal.
    pub fn reset(&mut self) -> SyncMessage {
        self.state = SyncState::new(0);
        self.current = BookmarkPair::default();
        self.previous = BookmarkPair::default();
        self.pending = None;
        SyncMessage::Reset
    }

    /// Write the delay in microseconds directly, keeping the current speed.
    pub fn set_delay(&mut self, delay: i64) {
        trace!("Updating subtitle delay to {}", delay);
        self.state.set_delay(delay);
    }

    fn apply(&mut self, speed_delay: SpeedDelay) -> SyncMessage {
        let ratio = self
            .table
            .get(speed_delay.ratio_index)
            .cloned()
            .unwrap_or_else(SpeedRatio::identity);
        let message = if speed_delay.ratio_index == IDENTITY_RATIO_INDEX {
            SyncMessage::DelayCorrected(speed_delay.delay / 1000)
        } else {
            SyncMessage::SpeedCorrected {
                delay_ms: speed_delay.delay / 1000,
                description: ratio.description().to_string(),
            }
        };

        debug!("Applying subtitle correction {}", speed_delay);
        self.state.apply(speed_delay, ratio);
        message
    }

    /// Compute the delay which aligns the current bookmarks, keeping the current speed.
    fn compute_delay(&self) -> Option<SpeedDelay> {
        if !self.current.is_complete() {
            return None;
        }

        Some(SpeedDelay {
            delay: self
                .state
                .delay()
                .saturating_add(self.current.audio.saturating_sub(self.current.subtitle)),
            ratio_index: self.state.ratio_index(),
        })
    }

    /// Fit a speed and delay through the previous and current bookmarks.
    /// It returns [None] when the bookmarks don't allow a reliable fit or no speed ratio matches.
    fn compute_speed_and_delay(&self) -> Option<SpeedDelay> {
        if self.previous.audio <= 0 || self.previous.subtitle <= 0 {
            return None;
        }

        let elapsed = self.current.subtitle.saturating_sub(self.previous.subtitle);
        if elapsed < MIN_SPEED_SAMPLE {
            trace!("Subtitle bookmarks are too close for a speed correction");
            return None;
        }
        if self.state.ratio_index() != IDENTITY_RATIO_INDEX && elapsed < MIN_SPEED_REFINE_SAMPLE {
            trace!("Subtitle bookmarks are too close to refine the speed correction");
            return None;
        }

        let audio0 = self.previous.audio as f64 / 1000.0;
        let subtitle0 = self.previous.subtitle as f64 / 1000.0;
        let audio1 = self.current.audio as f64 / 1000.0;
        let subtitle1 = self.current.subtitle as f64 / 1000.0;

        let time0 = audio0.max(subtitle0);
        let time1 = audio1.max(subtitle1);
        let delay0 = self.state.delay() as f64 / 1000.0;
        let delay1 = delay0 + (audio1 - subtitle1);

        let denominator = (time1 + delay1) - (time0 + delay0);
        if time1 == time0 || denominator == 0.0 {
            debug!("Unable to fit a subtitle speed through identical bookmark times");
            return None;
        }

        let speed = (time1 - time0) / denominator;
        let delay = delay0 - time0 * (delay1 - delay0) / (time1 - time0);
        debug!("Computed subtitle speed {:.4} with delay {:.0} ms", speed, delay);

        self.table.closest(speed).map(|ratio_index| SpeedDelay {
            delay: (delay * 1000.0) as i64,
            ratio_index,
        })
    }
}

impl Default for ResyncEngine {
    fn default() -> Self {
        Self::new(0)
    }
}
