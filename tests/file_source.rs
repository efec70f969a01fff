use std::io::Write;

use tempfile::NamedTempFile;

use fallwatch::config::MonitorConfig;
use fallwatch::{FileConfig, FileSource, Monitor};

const STANDING: &str = r#"{"timestamp_s": 0.0, "width": 640, "height": 480, "detections": [
    {"bbox": [100, 60, 120, 300], "confidence": 0.9,
     "pose": {"NOSE": {"x": 0.5, "y": 0.1}, "LEFT_HIP": {"x": 0.5, "y": 0.5}}}]}"#;

fn frame_line(t: f64, lying: bool) -> String {
    if lying {
        format!(
            r#"{{"timestamp_s": {t}, "width": 640, "height": 480, "detections": [{{"bbox": [80, 380, 260, 90], "confidence": 0.9, "pose": {{"NOSE": {{"x": 0.1, "y": 0.5}}, "LEFT_HIP": {{"x": 0.5, "y": 0.5}}}}}}, {{"bbox": [84, 382, 256, 88], "confidence": 0.6}}]}}"#
        )
    } else {
        STANDING.replace('\n', " ").replace("0.0", &format!("{t:.1}"))
    }
}

fn write_frames(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp frames");
    for line in lines {
        writeln!(file, "{}", line).expect("write frame");
    }
    file
}

fn open(file: &NamedTempFile) -> FileSource {
    let mut source = FileSource::new(FileConfig {
        path: file.path().display().to_string(),
        ..FileConfig::default()
    })
    .expect("source");
    source.connect().expect("connect");
    source
}

#[test]
fn reads_frames_in_order_and_skips_blank_lines() {
    let file = write_frames(&[
        frame_line(0.0, false),
        String::new(),
        "   ".to_string(),
        frame_line(0.5, true),
    ]);
    let mut source = open(&file);

    let first = source.next_frame().unwrap().expect("first frame");
    assert_eq!(first.index, 0);
    assert_eq!(first.timestamp_s, Some(0.0));
    let second = source.next_frame().unwrap().expect("second frame");
    assert_eq!(second.index, 1);
    assert_eq!(second.timestamp_s, Some(0.5));
    assert_eq!(second.detections.len(), 2);
    assert!(source.next_frame().unwrap().is_none());
    assert_eq!(source.stats().frames_read, 2);
}

#[test]
fn invalid_line_reports_its_line_number() {
    let file = write_frames(&[frame_line(0.0, false), r#"{"width": "wide"}"#.to_string()]);
    let mut source = open(&file);

    assert!(source.next_frame().unwrap().is_some());
    let err = source.next_frame().unwrap_err();
    assert!(format!("{:#}", err).contains(":2: invalid frame"), "{:#}", err);
}

#[test]
fn monitor_over_recorded_frames() {
    let lines: Vec<String> = (0..30)
        .map(|i| {
            let t = i as f64 * 0.1;
            frame_line(t, (1.0..2.5).contains(&t))
        })
        .collect();
    let file = write_frames(&lines);
    let mut source = open(&file);
    let mut monitor = Monitor::new(&MonitorConfig::default()).unwrap();

    let mut reports = Vec::new();
    while let Some(frame) = source.next_frame().unwrap() {
        let now = frame.timestamp_s.expect("recorded timestamp");
        reports.push(monitor.process(&frame, now).unwrap());
    }

    assert_eq!(reports.len(), 30);
    // duplicate box suppressed while lying
    assert!(reports.iter().all(|r| r.person_count == 1));
    let first_fall = reports
        .iter()
        .position(|r| r.frame_has_new_fall)
        .expect("fall registered");
    assert_eq!(first_fall, 10);
    assert!(reports[first_fall].persons[0].registered);
    // still down but debounced on the next frame
    assert!(reports[first_fall + 1].persons[0].fallen);
    assert!(!reports[first_fall + 1].persons[0].registered);
    assert_eq!(monitor.state().fall_count(), 2);
    assert!(reports.last().unwrap().alert_active);
}
