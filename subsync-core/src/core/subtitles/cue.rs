use std::slice::Iter;

use derive_more::Display;
use log::trace;

/// The stop time of a cue for which the stop is unknown.
pub const UNKNOWN_STOP: i64 = -1;

/// A single timed subtitle entry, as parsed from the subtitle file.
///
/// The timestamps are the raw values from the file in microseconds,
/// the current delay and speed haven't been applied to them.
#[derive(Debug, Display, Clone, PartialEq)]
#[display("start: {}, stop: {}, text: {:?}", start, stop, text)]
pub struct Cue {
    start: i64,
    stop: i64,
    text: String,
}

impl Cue {
    pub fn new(start: i64, stop: i64, text: impl Into<String>) -> Self {
        Self {
            start,
            stop,
            text: text.into(),
        }
    }

    /// The raw start time in microseconds.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// The raw stop time in microseconds, [UNKNOWN_STOP] when the grammar doesn't define one.
    pub fn stop(&self) -> i64 {
        self.stop
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Verify if the cue has a known stop time.
    pub fn has_stop(&self) -> bool {
        self.stop >= 0
    }
}

/// The ordered collection of parsed cues of a subtitle file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueStore {
    cues: Vec<Cue>,
    length: i64,
}

impl CueStore {
    pub fn new(cues: Vec<Cue>) -> Self {
        let mut store = Self { cues, length: 0 };
        store.fix();
        store
    }

    /// Sort the cues ascending by their start time and derive the total length of the store.
    /// Cues with an equal start time keep their parse order.
    pub fn fix(&mut self) {
        self.cues.sort_by_key(|e| e.start);
        self.length = match self.cues.last() {
            None => 0,
            Some(last) if last.stop > 0 => last.stop,
            // +1 to avoid 0
            Some(last) => last.start.saturating_add(1),
        };
        trace!(
            "Fixed a total of {} cues with length {}",
            self.cues.len(),
            self.length
        );
    }

    /// The total length of the subtitles in microseconds.
    pub fn length(&self) -> i64 {
        self.length
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Cue> {
        self.cues.get(index)
    }

    pub fn iter(&self) -> Iter<'_, Cue> {
        self.cues.iter()
    }
}

impl<'a> IntoIterator for &'a CueStore {
    type Item = &'a Cue;
    type IntoIter = Iter<'a, Cue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cues.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_has_stop() {
        assert!(Cue::new(0, 1000, "lorem").has_stop());
        assert!(!Cue::new(0, UNKNOWN_STOP, "lorem").has_stop());
    }

    #[test]
    fn test_cue_store_fix_order() {
        let store = CueStore::new(vec![
            Cue::new(3_000_000, 4_000_000, "c"),
            Cue::new(1_000_000, 2_000_000, "a"),
            Cue::new(2_000_000, 2_500_000, "b"),
            Cue::new(1_000_000, 1_500_000, "a2"),
        ]);

        let result: Vec<&str> = store.iter().map(|e| e.text()).collect();

        assert_eq!(vec!["a", "a2", "b", "c"], result);
        for i in 1..store.len() {
            assert!(store.get(i - 1).unwrap().start() <= store.get(i).unwrap().start());
        }
    }

    #[test]
    fn test_cue_store_fix_permutations() {
        let cues = vec![
            Cue::new(500, 600, "1"),
            Cue::new(100, 200, "2"),
            Cue::new(900, 1000, "3"),
            Cue::new(300, 400, "4"),
        ];

        for rotation in 0..cues.len() {
            let mut permutation = cues.clone();
            permutation.rotate_left(rotation);
            permutation.swap(0, rotation);

            let store = CueStore::new(permutation);

            let starts: Vec<i64> = store.iter().map(|e| e.start()).collect();
            assert_eq!(vec![100, 300, 500, 900], starts);
        }
    }

    #[test]
    fn test_cue_store_length() {
        let store = CueStore::new(vec![
            Cue::new(0, 1_000_000, "lorem"),
            Cue::new(2_000_000, 3_000_000, "ipsum"),
        ]);
        assert_eq!(3_000_000, store.length());

        let store = CueStore::new(vec![Cue::new(2_000_000, UNKNOWN_STOP, "ipsum")]);
        assert_eq!(2_000_001, store.length());

        let store = CueStore::new(vec![]);
        assert_eq!(0, store.length());
    }
}
