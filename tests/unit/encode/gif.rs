use std::io::Cursor;

use image::AnimationDecoder as _;
use image::codecs::gif::GifDecoder;

use super::*;
use crate::encode::sink::EncoderOpts;

fn solid(w: u32, h: u32, px: [u8; 4]) -> Surface {
    let mut s = Surface::new(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            s.put(x, y, px);
        }
    }
    s
}

fn cfg(frame_count: usize, opts: EncoderOpts) -> EncodeConfig {
    EncodeConfig {
        width: 4,
        height: 3,
        frame_count,
        opts,
    }
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= 8)
}

#[test]
fn encodes_frames_in_order_and_decodes_back() {
    let mut enc = GifEncoderSink::new();
    enc.begin(cfg(3, EncoderOpts::default())).unwrap();
    enc.push_frame(&solid(4, 3, [255, 0, 0, 255]), 100.0).unwrap();
    enc.push_frame(&solid(4, 3, [0, 255, 0, 255]), 100.0).unwrap();
    enc.push_frame(&solid(4, 3, [0, 0, 255, 255]), 100.0).unwrap();
    let bytes = enc.finish().unwrap();
    assert_eq!(&bytes[..3], b"GIF");

    let frames = GifDecoder::new(Cursor::new(bytes))
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap();
    assert_eq!(frames.len(), 3);
    let firsts: Vec<[u8; 4]> = frames.iter().map(|f| f.buffer().get_pixel(0, 0).0).collect();
    assert!(close(firsts[0], [255, 0, 0, 255]));
    assert!(close(firsts[1], [0, 255, 0, 255]));
    assert!(close(firsts[2], [0, 0, 255, 255]));
    for f in &frames {
        let (num, den) = f.delay().numer_denom_ms();
        assert_eq!(num / den, 100);
    }
}

#[test]
fn rejects_wrong_frame_size_and_unstarted_use() {
    let mut enc = GifEncoderSink::new();
    assert!(enc.push_frame(&solid(4, 3, [0, 0, 0, 255]), 10.0).is_err());
    enc.begin(cfg(1, EncoderOpts::default())).unwrap();
    assert!(enc.push_frame(&solid(2, 2, [0, 0, 0, 255]), 10.0).is_err());
}

#[test]
fn finish_without_frames_fails() {
    let mut enc = GifEncoderSink::new();
    enc.begin(cfg(0, EncoderOpts::default())).unwrap();
    assert!(matches!(enc.finish(), Err(SheetError::Encode(_))));
}

#[test]
fn flatten_alpha_0_returns_bg() {
    let mut px = vec![10u8, 20, 30, 0];
    flatten_over_background(&mut px, [1, 2, 3, 255]).unwrap();
    assert_eq!(px, vec![1, 2, 3, 255]);
}

#[test]
fn flatten_alpha_255_is_identity() {
    let mut px = vec![10u8, 20, 30, 255];
    flatten_over_background(&mut px, [1, 2, 3, 255]).unwrap();
    assert_eq!(px, vec![10, 20, 30, 255]);
}

#[test]
fn quality_maps_onto_speed_range() {
    assert_eq!(quality_to_speed(100), 1);
    assert_eq!(quality_to_speed(1), 30);
    assert_eq!(quality_to_speed(0), 30);
}
