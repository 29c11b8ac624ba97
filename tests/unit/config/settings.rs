use super::*;

#[test]
fn empty_object_yields_defaults() {
    let s = PreviewSettings::from_json_str("{}").unwrap();
    assert_eq!(s, PreviewSettings::default());
    assert_eq!(s.grid().total_frames(), 16);
    assert_eq!(s.cycle().frame_delay_ms(), 125.0);
}

#[test]
fn out_of_range_values_are_clamped() {
    let s = PreviewSettings::from_json_str(
        r#"{ "columns": 0, "rows": 80, "duration_seconds": 9.5, "scale_percent": 2 }"#,
    )
    .unwrap();
    assert_eq!((s.columns, s.rows), (1, 50));
    assert_eq!(s.duration_seconds, 5.0);
    assert_eq!(s.scale_percent, 10);
}

#[test]
fn mode_and_flip_parse() {
    let s = PreviewSettings::from_json_str(r#"{ "mode": "pingpong", "flip_horizontal": true }"#)
        .unwrap();
    assert_eq!(s.mode, PlaybackMode::PingPong);
    assert!(s.transform().flip_horizontal);
}

#[test]
fn bad_json_is_a_validation_error() {
    let err = PreviewSettings::from_json_str(r#"{ "mode": "sideways" }"#).unwrap_err();
    assert!(matches!(err, SheetError::Validation(_)));
}

#[test]
fn round_trips_through_a_file() {
    let dir = std::path::PathBuf::from("target").join("settings_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("settings.json");
    let s = PreviewSettings {
        columns: 6,
        mode: PlaybackMode::Reverse,
        ..PreviewSettings::default()
    };
    std::fs::write(&path, serde_json::to_string_pretty(&s).unwrap()).unwrap();
    assert_eq!(PreviewSettings::from_path(&path).unwrap(), s);
}
