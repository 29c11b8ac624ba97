use super::*;

#[test]
fn grid_counts_clamp_into_range() {
    let g = GridConfig::new(0, 99);
    assert_eq!(g.columns(), 1);
    assert_eq!(g.rows(), 50);
    assert_eq!(g.total_frames(), 50);
}

#[test]
fn total_frames_is_columns_times_rows() {
    for c in 1..=12 {
        for r in 1..=12 {
            assert_eq!(GridConfig::new(c, r).total_frames(), c * r);
        }
    }
}

#[test]
fn address_round_trips_for_every_frame() {
    let g = GridConfig::new(5, 3);
    for i in 0..g.total_frames() {
        let f = g.frame(i).unwrap();
        let addr = g.address(f);
        assert!(addr.column < 5 && addr.row < 3);
        assert_eq!(g.index_of(addr), f);
    }
    assert_eq!(g.frame(15), None);
}

#[test]
fn address_is_row_major() {
    let g = GridConfig::new(4, 4);
    assert_eq!(g.address(FrameIndex(6)), FrameAddress { column: 2, row: 1 });
    assert_eq!(g.wrap(17), FrameIndex(1));
}

#[test]
fn cycle_delay_matches_duration_over_frames() {
    let c = CycleConfig::new(2.0, 16);
    assert_eq!(c.frame_delay_ms(), 125.0);
    assert_eq!(c.approx_frame_delay_ms(), 125);
    assert_eq!(c.effective_fps(), 8.0);
}

#[test]
fn cycle_duration_clamps_and_rejects_nan() {
    assert_eq!(CycleConfig::new(0.0, 4).duration_seconds(), DURATION_MIN_SECS);
    assert_eq!(CycleConfig::new(60.0, 4).duration_seconds(), DURATION_MAX_SECS);
    assert_eq!(
        CycleConfig::new(f64::NAN, 4).duration_seconds(),
        DURATION_MIN_SECS
    );
    assert!(CycleConfig::new(0.1, 2500).frame_delay_ms() > 0.0);
}

#[test]
fn scale_clamps_into_range() {
    assert_eq!(clamp_scale_percent(0), 10);
    assert_eq!(clamp_scale_percent(100), 100);
    assert_eq!(clamp_scale_percent(9000), 500);
}

#[test]
fn image_dimensions_reject_zero() {
    assert!(ImageDimensions::new(0, 10).is_err());
    assert!(ImageDimensions::new(10, 10).is_ok());
}

#[test]
fn frame_label_is_one_based() {
    assert_eq!(frame_label(FrameIndex(4), 16), "FRAME: 5 / 16");
}
