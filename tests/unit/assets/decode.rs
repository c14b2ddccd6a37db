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
fn decode_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let prepared = decode_contained(&png_bytes(img), ImageKind::Raster, (1, 1)).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn contain_size_keeps_aspect_and_touches_box() {
    assert_eq!(contain_size(100, 100, (352, 352)), (352, 352));
    assert_eq!(contain_size(200, 100, (352, 352)), (352, 176));
    assert_eq!(contain_size(100, 200, (303, 303)), (152, 303));
    // Card scans are slightly narrower than the card slot.
    assert_eq!(contain_size(745, 1040, (579, 826)), (579, 808));
    assert_eq!(contain_size(0, 10, (5, 5)), (0, 0));
}

#[test]
fn decode_contained_upscales_small_images() {
    let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]));
    let prepared = decode_contained(&png_bytes(img), ImageKind::Raster, (40, 40)).unwrap();
    assert_eq!((prepared.width, prepared.height), (40, 20));
    let px = &prepared.rgba8_premul[..4];
    assert!(px[0] >= 250 && px[1] <= 5 && px[3] >= 250, "{px:?}");
}

#[test]
fn corrupt_bytes_fail_to_decode() {
    let err = decode_contained(b"not an image", ImageKind::Raster, (10, 10)).unwrap_err();
    assert!(matches!(err, MsemError::Other(_)));
}

#[test]
fn svg_rasterises_at_contained_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
        <rect width="20" height="10" fill="#00ff00"/>
    </svg>"##;
    let prepared = decode_contained(svg, ImageKind::Svg, (100, 100)).unwrap();
    assert_eq!((prepared.width, prepared.height), (100, 50));
    let center = ((25 * 100 + 50) * 4) as usize;
    assert_eq!(&prepared.rgba8_premul[center..center + 4], &[0, 255, 0, 255]);

    assert!(parse_svg(b"<svg").is_err());
}

#[test]
fn kind_from_extension() {
    use std::path::Path;
    assert_eq!(ImageKind::from_path(Path::new("logo.SVG")), ImageKind::Svg);
    assert_eq!(ImageKind::from_path(Path::new("pfp.png")), ImageKind::Raster);
    assert_eq!(ImageKind::from_path(Path::new("noext")), ImageKind::Raster);
}
