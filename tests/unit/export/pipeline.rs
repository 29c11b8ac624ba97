use super::*;
use crate::encode::sink::InMemoryEncoder;
use crate::foundation::core::FrameIndex;
use crate::geometry::grid::FrameRect;

/// Horizontal strip of 2x2 cells; cell `i` is solid gray `i * 40`.
fn strip_sheet(cells: u32) -> Arc<SpriteSheet> {
    let (w, h) = (cells * 2, 2);
    let mut data = Vec::new();
    for _y in 0..h {
        for x in 0..w {
            let v = (x / 2 * 40) as u8;
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    Arc::new(SpriteSheet::from_rgba8(w, h, data).unwrap())
}

fn request(mode: PlaybackMode, cells: u32) -> ExportRequest {
    ExportRequest::new(strip_sheet(cells), GridConfig::new(cells, 1), 1.2, mode, false)
}

fn shown_cells(enc: &InMemoryEncoder) -> Vec<u8> {
    enc.frames().iter().map(|(s, _)| s.pixel(0, 0)[0] / 40).collect()
}

/// Fails on one chosen frame index, otherwise defers to the CPU extractor.
struct FailOn(u32);

impl FrameExtractor for FailOn {
    fn extract(
        &self,
        sheet: &SpriteSheet,
        frame: FrameIndex,
        rect: FrameRect,
        transform: RenderTransform,
    ) -> SheetResult<Surface> {
        if frame.0 == self.0 {
            return Err(SheetError::render("induced failure"));
        }
        CpuExtractor.extract(sheet, frame, rect, transform)
    }
}

#[test]
fn clean_pingpong_export_encodes_bounce_in_order() {
    let req = request(PlaybackMode::PingPong, 3);
    let mut enc = InMemoryEncoder::new();
    let art = export_cycle(
        &req,
        &ExportOpts::default(),
        &CpuExtractor,
        &mut enc,
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(shown_cells(&enc), vec![0, 1, 2, 1]);
    assert_eq!((art.width, art.height), (2, 2));
    assert_eq!(
        art.stats,
        ExportStats {
            frames_total: 4,
            frames_encoded: 4,
            frames_skipped: 0
        }
    );
    assert!(enc.is_finished());
    assert!(enc.frames().iter().all(|(_, d)| *d == 400.0));
    assert_eq!(art.bytes.len(), 4 * 2 * 2 * 4);
}

#[test]
fn skip_policy_drops_only_the_failed_frame() {
    let req = request(PlaybackMode::Forward, 4);
    let mut enc = InMemoryEncoder::new();
    let art = export_cycle(
        &req,
        &ExportOpts::default(),
        &FailOn(2),
        &mut enc,
        &CancelToken::new(),
    )
    .unwrap();
    assert_eq!(shown_cells(&enc), vec![0, 1, 3]);
    assert_eq!(art.stats.frames_skipped, 1);
    assert_eq!(art.stats.frames_encoded, 3);
}

#[test]
fn abort_policy_returns_the_failure() {
    let req = request(PlaybackMode::Forward, 4);
    let opts = ExportOpts {
        failure_policy: FailurePolicy::Abort,
        ..ExportOpts::default()
    };
    let mut enc = InMemoryEncoder::new();
    let err = export_cycle(&req, &opts, &FailOn(2), &mut enc, &CancelToken::new()).unwrap_err();
    assert!(matches!(err, SheetError::Render(_)));
    assert!(enc.config().is_none());
}

#[test]
fn every_frame_failing_is_an_encode_error() {
    let req = request(PlaybackMode::Forward, 1);
    let mut enc = InMemoryEncoder::new();
    let err = export_cycle(
        &req,
        &ExportOpts::default(),
        &FailOn(0),
        &mut enc,
        &CancelToken::new(),
    )
    .unwrap_err();
    assert!(matches!(err, SheetError::Encode(_)));
}

#[test]
fn parallel_extraction_keeps_sequence_order() {
    let req = request(PlaybackMode::Reverse, 6);
    let opts = ExportOpts {
        parallel: true,
        threads: Some(3),
        ..ExportOpts::default()
    };
    let mut enc = InMemoryEncoder::new();
    export_cycle(&req, &opts, &CpuExtractor, &mut enc, &CancelToken::new()).unwrap();
    assert_eq!(shown_cells(&enc), vec![5, 4, 3, 2, 1, 0]);
}

#[test]
fn zero_threads_is_rejected() {
    let req = request(PlaybackMode::Forward, 2);
    let opts = ExportOpts {
        parallel: true,
        threads: Some(0),
        ..ExportOpts::default()
    };
    let mut enc = InMemoryEncoder::new();
    assert!(export_cycle(&req, &opts, &CpuExtractor, &mut enc, &CancelToken::new()).is_err());
}

#[test]
fn cancelled_token_stops_before_encoding() {
    let req = request(PlaybackMode::Forward, 4);
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut enc = InMemoryEncoder::new();
    let err = export_cycle(&req, &ExportOpts::default(), &CpuExtractor, &mut enc, &cancel)
        .unwrap_err();
    assert!(matches!(err, SheetError::Cancelled));
    assert!(enc.config().is_none());
}

#[test]
fn flip_is_applied_to_exported_frames() {
    let sheet = Arc::new(
        SpriteSheet::from_rgba8(2, 1, vec![10, 10, 10, 255, 200, 200, 200, 255]).unwrap(),
    );
    let req = ExportRequest::new(sheet, GridConfig::new(1, 1), 1.0, PlaybackMode::Forward, true);
    let mut enc = InMemoryEncoder::new();
    export_cycle(
        &req,
        &ExportOpts::default(),
        &CpuExtractor,
        &mut enc,
        &CancelToken::new(),
    )
    .unwrap();
    assert_eq!(enc.frames()[0].0.pixel(0, 0)[0], 200);
}

#[test]
fn background_export_releases_flag_once_done() {
    let flag = ExportFlag::default();
    let guard = flag.try_acquire().unwrap();
    assert!(flag.is_set());
    assert!(flag.try_acquire().is_none());

    let handle = spawn_export_guarded(
        request(PlaybackMode::Forward, 4),
        ExportOpts::default(),
        Box::new(InMemoryEncoder::new()),
        CancelToken::new(),
        Some(guard),
    )
    .unwrap();
    let art = handle.wait().unwrap();
    assert_eq!(art.stats.frames_encoded, 4);
    assert!(!flag.is_set());
}

#[test]
fn background_export_failure_still_releases_flag() {
    let flag = ExportFlag::default();
    let guard = flag.try_acquire().unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();
    let handle = spawn_export_guarded(
        request(PlaybackMode::Forward, 4),
        ExportOpts::default(),
        Box::new(InMemoryEncoder::new()),
        cancel,
        Some(guard),
    )
    .unwrap();
    assert!(matches!(handle.wait(), Err(SheetError::Cancelled)));
    assert!(!flag.is_set());
}
