use std::fs::File;
use std::io::{BufReader, Cursor};

use subsync_core::core::config::DemuxSettings;
use subsync_core::core::demux::{CueCollector, MockSubtitleHost, SubtitleDemux, SubtitleHost};
use subsync_core::core::subtitles::{
    FormatDetector, SubtitleCodec, SubtitleError, SubtitleType, SUBTITLE_TYPES,
};
use subsync_core::core::sync::SyncTrigger;
use subsync_core::init_logger;
use subsync_core::testing::{
    read_test_file_to_bytes, read_test_file_to_string, test_resource_filepath,
};

/// The test resources of each subtitle type with their cue count and first start time.
const RESOURCES: [(&str, SubtitleType, usize, i64); 19] = [
    ("example.sub", SubtitleType::MicroDvd, 3, 1_000_000),
    ("example.srt", SubtitleType::SubRip, 3, 1_000_000),
    ("example_subviewer.sub", SubtitleType::SubViewer, 2, 1_000_000),
    ("example_ssa1.ssa", SubtitleType::Ssa1, 2, 1_000_000),
    ("example.ssa", SubtitleType::Ssa2_4, 2, 1_000_000),
    ("example.ass", SubtitleType::Ass, 2, 1_000_000),
    ("example_vplayer.txt", SubtitleType::VPlayer, 3, 1_000_000),
    ("example.smi", SubtitleType::Sami, 2, 1_000_000),
    ("example_dvd.sub", SubtitleType::DvdSubtitle, 2, 1_000_000),
    ("example_mpl2.txt", SubtitleType::Mpl2, 2, 1_000_000),
    ("example.aqt", SubtitleType::Aqt, 2, 1_000_000),
    ("example.pjs", SubtitleType::Pjs, 2, 1_000_000),
    ("example_mpsub.sub", SubtitleType::MpSub, 2, 1_000_000),
    ("example.jss", SubtitleType::JacoSub, 2, 1_000_000),
    ("example.psb", SubtitleType::Psb, 2, 1_000_000),
    ("example.rt", SubtitleType::RealText, 2, 1_000_000),
    ("example.dks", SubtitleType::Dks, 2, 1_000_000),
    ("example_subviewer1.sub", SubtitleType::SubViewer1, 2, 1_000_000),
    ("example.vtt", SubtitleType::Vtt, 2, 1_000_000),
];

fn silent_host() -> Box<dyn SubtitleHost> {
    let mut host = MockSubtitleHost::new();
    host.expect_osd_message().return_const(());
    host.expect_delay_changed().return_const(());
    host.expect_export_updated().return_const(());
    Box::new(host)
}

#[test]
fn test_detect_resources() {
    init_logger!();
    let detector = FormatDetector::new();

    for (filename, expected_result, _, _) in RESOURCES {
        let mut reader = BufReader::new(File::open(test_resource_filepath(filename)).unwrap());

        let result = detector.detect(&mut reader, false);

        assert_eq!(Ok(expected_result), result, "unexpected type for {}", filename);
    }
}

#[test]
fn test_resources_cover_all_types() {
    for subtitle_type in SUBTITLE_TYPES {
        assert!(
            RESOURCES.iter().any(|(_, e, _, _)| *e == subtitle_type),
            "expected a test resource for {}",
            subtitle_type
        );
    }
}

#[test]
fn test_open_resources() {
    init_logger!();

    for (filename, subtitle_type, count, first_start) in RESOURCES {
        let demux = SubtitleDemux::open_file(
            test_resource_filepath(filename),
            &DemuxSettings::default(),
            silent_host(),
        )
        .unwrap_or_else(|e| panic!("expected {} to open, {}", filename, e));
        let cues = demux.cues();

        assert_eq!(subtitle_type, demux.subtitle_type(), "unexpected type for {}", filename);
        assert_eq!(count, cues.len(), "unexpected cue count for {}, {:?}", filename, cues);
        assert_eq!(
            Some(first_start),
            cues.get(0).map(|e| e.start()),
            "unexpected first start for {}",
            filename
        );
        assert!(
            cues.iter().zip(cues.iter().skip(1)).all(|(a, b)| a.start() <= b.start()),
            "expected the cues of {} to be ordered",
            filename
        );
        assert!(demux.length() > 0, "expected a length for {}", filename);
    }
}

#[test]
fn test_open_forced_type_resources() {
    init_logger!();

    for (filename, subtitle_type, count, _) in RESOURCES {
        let settings = DemuxSettings {
            sub_type: subtitle_type.name().to_string(),
            ..DemuxSettings::default()
        };

        let demux =
            SubtitleDemux::open_file(test_resource_filepath(filename), &settings, silent_host())
                .unwrap_or_else(|e| panic!("expected {} to open, {}", filename, e));

        assert_eq!(count, demux.cues().len(), "unexpected cue count for {}", filename);
    }
}

#[test]
fn test_open_unknown() {
    init_logger!();

    let result = SubtitleDemux::open_file(
        test_resource_filepath("unknown.txt"),
        &DemuxSettings::default(),
        silent_host(),
    );

    assert_eq!(
        SubtitleError::UnrecognizedFormat,
        result.expect_err("expected the format to be unrecognized")
    );
}

#[test]
fn test_open_unicode() {
    init_logger!();

    let demux = SubtitleDemux::open_file(
        test_resource_filepath("example_bom.en.srt"),
        &DemuxSettings::default(),
        silent_host(),
    )
    .unwrap();

    assert_eq!(SubtitleType::SubRip, demux.subtitle_type());
    assert_eq!(Some("UTF-8".to_string()), demux.track().encoding);
    assert_eq!(Some("en".to_string()), demux.track().language);
    assert_eq!(Some("Grüße\n"), demux.cues().get(0).map(|e| e.text()));
}

#[test]
fn test_open_reader() {
    init_logger!();
    let data = read_test_file_to_string("example.vtt");

    let demux =
        SubtitleDemux::open(Cursor::new(data), &DemuxSettings::default(), silent_host()).unwrap();

    assert_eq!(SubtitleType::Vtt, demux.subtitle_type());
    assert_eq!(2, demux.cues().len());
    assert_eq!(None, demux.track().language);
    assert_eq!(None, demux.export_path());
}

#[test]
fn test_open_out_of_range_times() {
    init_logger!();
    let samples = vec![
        (
            "{300000000000000}{300000000000001}x\n{50}{75}Hello\n",
            SubtitleType::MicroDvd,
        ),
        (
            "1000000000000000,1000000000000001,\"x\"\n100,250,\"Hello\"\n",
            SubtitleType::Pjs,
        ),
        (
            "1\n3000000000:00:00,000 --> 3000000000:00:01,000\nx\n\n2\n00:00:01,000 --> 00:00:02,000\nHello\n",
            SubtitleType::SubRip,
        ),
    ];

    for (data, expected_type) in samples {
        let demux = SubtitleDemux::open(
            Cursor::new(data.as_bytes().to_vec()),
            &DemuxSettings::default(),
            silent_host(),
        )
        .unwrap();

        assert_eq!(expected_type, demux.subtitle_type());
        assert_eq!(1, demux.cues().len(), "expected a single cue for {}", expected_type);
    }
}

#[test]
fn test_open_reader_with_bom() {
    init_logger!();
    let data = read_test_file_to_bytes("example_bom.en.srt");

    let demux =
        SubtitleDemux::open(Cursor::new(data), &DemuxSettings::default(), silent_host()).unwrap();

    assert_eq!(Some("UTF-8".to_string()), demux.track().encoding);
    assert_eq!(Some("Grüße\n"), demux.cues().get(0).map(|e| e.text()));
}

#[test]
fn test_ssa_track() {
    init_logger!();

    let demux = SubtitleDemux::open_file(
        test_resource_filepath("example.ass"),
        &DemuxSettings::default(),
        silent_host(),
    )
    .unwrap();

    assert_eq!(SubtitleCodec::Ssa, demux.track().codec);
    assert_eq!(
        Some("1,1,Default,,0000,0000,0000,,Hello"),
        demux.cues().get(0).map(|e| e.text())
    );
    assert!(demux
        .track()
        .header
        .as_ref()
        .map(|e| e.contains("ScriptType: v4.00+"))
        .unwrap_or(false));
}

#[test]
fn test_adjusted_export() {
    init_logger!();
    let mut demux = SubtitleDemux::open_file(
        test_resource_filepath("example.srt"),
        &DemuxSettings::default(),
        silent_host(),
    )
    .unwrap();

    demux.trigger(SyncTrigger::WriteDelay(500_000));
    let result = demux.export();

    assert_eq!(
        "1\r\n00:00:01,500 --> 00:00:03,000\r\nHello\nWorld\r\n\r\n\
        2\r\n00:00:03,500 --> 00:00:04,000\r\nOut of order\r\n\r\n\
        3\r\n00:00:04,500 --> 00:00:05,500\r\nLorem ipsum\r\n\r\n",
        result
    );
    assert_eq!(
        Some(test_resource_filepath("example_adjusted.srt").as_path()),
        demux.export_path()
    );
}

#[test]
fn test_playback_with_speed_correction() {
    init_logger!();
    let mut demux = SubtitleDemux::open_file(
        test_resource_filepath("example.sub"),
        &DemuxSettings::default(),
        silent_host(),
    )
    .unwrap();
    let mut sink = CueCollector::default();

    demux.set_next_demux_time(i64::MAX);
    assert!(demux.demux(&mut sink));
    assert_eq!(
        vec![1_000_000, 4_000_000, 6_000_000],
        sink.blocks().iter().map(|e| e.pts).collect::<Vec<_>>()
    );
    assert_eq!(Some(1_480_000), sink.blocks()[0].length);
    assert_eq!(None, sink.blocks()[2].length);
    assert!(!demux.demux(&mut sink));
}
