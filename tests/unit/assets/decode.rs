use std::io::Cursor;

use super::*;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_keeps_dimensions_and_straight_alpha() {
    let img = image::RgbaImage::from_raw(2, 1, vec![100, 50, 200, 128, 1, 2, 3, 255]).unwrap();
    let sheet = decode_sheet(&png_bytes(img)).unwrap();
    assert_eq!(sheet.dimensions(), ImageDimensions::new(2, 1).unwrap());
    assert_eq!(sheet.pixel(0, 0), [100, 50, 200, 128]);
    assert_eq!(sheet.pixel(1, 0), [1, 2, 3, 255]);
    assert_eq!(sheet.pixels(), [100u8, 50, 200, 128, 1, 2, 3, 255].as_slice());
}

#[test]
fn garbage_is_a_decode_error() {
    let err = decode_sheet(b"definitely not an image").unwrap_err();
    assert!(matches!(err, SheetError::Decode(_)));
}

#[test]
fn from_rgba8_checks_buffer_length() {
    assert!(SpriteSheet::from_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(SpriteSheet::from_rgba8(0, 2, vec![]).is_err());
    assert!(SpriteSheet::from_rgba8(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn missing_file_reports_path() {
    let err = load_sheet(Path::new("target/does/not/exist.png")).unwrap_err();
    assert!(err.to_string().contains("exist.png"));
}
