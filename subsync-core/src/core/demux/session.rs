use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::{Path, PathBuf};

use log::{debug, info, trace, warn};

use crate::core::config::DemuxSettings;
use crate::core::demux::{ControlReply, CueEmitter, CueSink, DemuxControl, SubtitleHost};
use crate::core::subtitles::language::language_from_filename;
use crate::core::subtitles::parsers::{new_parser, ParserContext};
use crate::core::subtitles::{
    export_path, export_srt, skip_bom, CueStore, FormatDetector, LineBuffer, Result,
    SubtitleError, SubtitleTrack, SubtitleType,
};
use crate::core::sync::{ResyncEngine, SyncState, SyncTrigger};

/// A subtitle demuxer session of a single text subtitle file.
///
/// The session owns the parsed cues and the timing corrections, and serves the control queries,
/// demux passes and resync triggers of the host.
///
/// The session is not safe to be invoked concurrently from independent threads,
/// the host is responsible for serializing the control queries, demux passes and triggers.
#[derive(Debug)]
pub struct SubtitleDemux {
    subtitle_type: SubtitleType,
    track: SubtitleTrack,
    cues: CueStore,
    engine: ResyncEngine,
    emitter: CueEmitter,
    export: String,
    export_path: Option<PathBuf>,
    host: Box<dyn SubtitleHost>,
}

impl SubtitleDemux {
    /// Open the subtitle file at the given path.
    ///
    /// The language of the track is derived from the filename and the adjusted export
    /// path is suggested next to the file.
    pub fn open_file<P: AsRef<Path>>(
        path: P,
        settings: &DemuxSettings,
        host: Box<dyn SubtitleHost>,
    ) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening subtitle file {}", path.display());
        let file = File::open(path)?;

        Self::open_internal(BufReader::new(file), settings, host, Some(path))
    }

    /// Open the subtitle from the given reader.
    pub fn open<R: BufRead + Seek>(
        reader: R,
        settings: &DemuxSettings,
        host: Box<dyn SubtitleHost>,
    ) -> Result<Self> {
        Self::open_internal(reader, settings, host, None)
    }

    fn open_internal<R: BufRead + Seek>(
        mut reader: R,
        settings: &DemuxSettings,
        host: Box<dyn SubtitleHost>,
        path: Option<&Path>,
    ) -> Result<Self> {
        let unicode = skip_bom(&mut reader)?;
        let subtitle_type = match settings.format_selection() {
            Some(e) => {
                debug!("Using forced subtitle type {}", e);
                e
            }
            None => FormatDetector::new().detect(&mut reader, unicode)?,
        };

        let mut lines = LineBuffer::load(reader)?;
        let context = ParserContext {
            microsec_per_frame: settings.microsec_per_frame(),
            frame_rate_override: settings.frame_rate_override(),
        };
        let mut parser =
            new_parser(subtitle_type, context).ok_or(SubtitleError::UnrecognizedFormat)?;
        let cues = CueStore::new(parser.parse_all(&mut lines));
        info!("Loaded {} subtitles of type {}", cues.len(), subtitle_type);

        let language = path.and_then(language_from_filename);
        if let Some(language) = language.as_ref() {
            debug!("Detected subtitle language {}", language);
        }
        let track = SubtitleTrack::builder()
            .subtitle_type(subtitle_type)
            .language(language)
            .unicode(unicode)
            .description(settings.description().map(|e| e.to_string()))
            .header(parser.header().map(|e| e.to_string()))
            .build();

        let engine = ResyncEngine::new(settings.initial_delay_micros());
        host.delay_changed(engine.state().delay());
        let mut instance = Self {
            subtitle_type,
            track,
            cues,
            engine,
            emitter: CueEmitter::new(),
            export: String::new(),
            export_path: path.map(export_path),
            host,
        };
        instance.update_export();

        Ok(instance)
    }

    /// The subtitle type of the opened file.
    pub fn subtitle_type(&self) -> SubtitleType {
        self.subtitle_type
    }

    /// The track information of the opened file.
    pub fn track(&self) -> &SubtitleTrack {
        &self.track
    }

    pub fn cues(&self) -> &CueStore {
        &self.cues
    }

    /// The current timing corrections.
    pub fn state(&self) -> &SyncState {
        self.engine.state()
    }

    pub fn engine(&self) -> &ResyncEngine {
        &self.engine
    }

    /// The subtitle as SubRip with the current timing corrections applied.
    pub fn export(&self) -> &str {
        self.export.as_str()
    }

    /// The suggested path of the adjusted export, if the subtitle was opened from a file.
    pub fn export_path(&self) -> Option<&Path> {
        self.export_path.as_deref()
    }

    /// The adjusted time of the given raw subtitle time.
    pub fn adjust(&self, raw: i64) -> i64 {
        self.engine.state().adjust(raw)
    }

    /// The total length of the subtitle in microseconds.
    pub fn length(&self) -> i64 {
        self.cues.length()
    }

    /// The adjusted start time of the next subtitle.
    pub fn time(&self) -> Result<i64> {
        self.emitter.time(&self.cues, self.engine.state())
    }

    /// Seek to the given time in microseconds.
    pub fn set_time(&mut self, time: i64) -> Result<()> {
        self.emitter.seek(&self.cues, self.engine.state(), time)?;
        self.update_export();
        Ok(())
    }

    /// The position of the next subtitle as a fraction of the length.
    pub fn position(&self) -> f64 {
        self.emitter.position(&self.cues, self.engine.state())
    }

    /// Seek to the given position, a fraction within `[0, 1]`.
    pub fn set_position(&mut self, position: f64) -> Result<()> {
        self.emitter
            .seek_position(&self.cues, self.engine.state(), position)
    }

    /// Set the time until which the next demux pass emits subtitles.
    pub fn set_next_demux_time(&mut self, time: i64) {
        self.emitter.set_next_demux_time(time);
    }

    /// Emit the subtitles which start before the next demux time to the given sink.
    ///
    /// It returns `false` when all subtitles have been emitted.
    pub fn demux(&mut self, sink: &mut dyn CueSink) -> bool {
        if self.emitter.is_finished(&self.cues) {
            return false;
        }

        let emitted = self.emitter.emit(&self.cues, self.engine.state(), sink);
        trace!("Emitted {} subtitles", emitted);
        true
    }

    /// Handle the given control query of the host.
    pub fn control(&mut self, control: DemuxControl) -> Result<ControlReply> {
        match control {
            DemuxControl::GetLength => Ok(ControlReply::Length(self.length())),
            DemuxControl::GetTime => self.time().map(ControlReply::Time),
            DemuxControl::SetTime(time) => self.set_time(time).map(|_| ControlReply::Done),
            DemuxControl::GetPosition => Ok(ControlReply::Position(self.position())),
            DemuxControl::SetPosition(position) => {
                self.set_position(position).map(|_| ControlReply::Done)
            }
            DemuxControl::SetNextDemuxTime(time) => {
                self.set_next_demux_time(time);
                Ok(ControlReply::Done)
            }
            _ => Err(SubtitleError::UnsupportedQuery(control.to_string())),
        }
    }

    /// Handle the given resync trigger of the host.
    ///
    /// The bookmarks use the horizon of the last demux pass as the current playback time.
    pub fn trigger(&mut self, trigger: SyncTrigger) {
        let now = self.emitter.last_demux_time();
        debug!("Handling subtitle trigger {} at {}", trigger, now);

        match trigger {
            SyncTrigger::BookmarkAudio => {
                let message = self.engine.bookmark_audio(now);
                self.host.osd_message(message.to_string().as_str());
            }
            SyncTrigger::BookmarkSubtitle => {
                let message = self.engine.bookmark_subtitle(now);
                self.host.osd_message(message.to_string().as_str());
            }
            SyncTrigger::SyncBookmarks => {
                let outcome = self.engine.sync_bookmarks();
                for message in outcome.messages.iter() {
                    self.host.osd_message(message.to_string().as_str());
                }

                if outcome.applied {
                    self.host.delay_changed(self.engine.state().delay());
                    self.on_state_changed(now);
                }
            }
            SyncTrigger::ResetSync => {
                let message = self.engine.reset();
                self.host.delay_changed(self.engine.state().delay());
                self.on_state_changed(now);
                self.host.osd_message(message.to_string().as_str());
            }
            SyncTrigger::WriteDelay(delay) => {
                self.engine.set_delay(delay);
                self.on_state_changed(now);
            }
        }
    }

    /// Write the adjusted export to the given path, or to the suggested export path.
    ///
    /// It returns the path to which the export has been written.
    pub fn write_export(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = path
            .map(|e| e.to_path_buf())
            .or_else(|| self.export_path.clone())
            .ok_or_else(|| SubtitleError::Io("no export path available".to_string()))?;

        std::fs::write(&path, self.export.as_bytes())?;
        info!("Adjusted subtitle has been written to {}", path.display());
        Ok(path)
    }

    fn on_state_changed(&mut self, now: i64) {
        if let Err(e) = self.emitter.seek(&self.cues, self.engine.state(), now) {
            warn!("Failed to update the subtitle position, {}", e);
        }
        self.update_export();
    }

    fn update_export(&mut self) {
        let state = self.engine.state();
        self.export = export_srt(&self.cues, |e| state.adjust(e));
        self.host.export_updated(self.export.as_str());
    }
}
