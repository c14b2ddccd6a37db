use std::io::Cursor;

use super::*;
use crate::{
    assets::fetch::MemoryFetcher,
    catalog::registry::CatalogSource,
    config::SideConfig,
    foundation::error::MsemError,
};

struct FixedSource;

impl CatalogSource for FixedSource {
    fn read_to_string(&self, _path: &Path) -> MsemResult<String> {
        Ok(r#"<cockatrice_carddatabase>
  <cards>
    <card><name>Plains_TWR</name><set num="250">TWR</set></card>
  </cards>
</cockatrice_carddatabase>"#
            .to_string())
    }
}

fn fixture_font(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/fonts")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

fn config_with_fixture_fonts() -> ThumbnailConfig {
    ThumbnailConfig {
        title_font: Some(fixture_font("Tuffy4.ttc")),
        deckname_font: Some(fixture_font("Tuffy.ttf")),
        ..ThumbnailConfig::default()
    }
}

/// Bounding box `(x0, y0, x1, y1)` of non-black pixels in `rows`.
fn ink_bbox(img: &image::RgbImage, rows: std::ops::Range<u32>) -> Option<(u32, u32, u32, u32)> {
    let mut bbox: Option<(u32, u32, u32, u32)> = None;
    for y in rows {
        for x in 0..img.width() {
            if img.get_pixel(x, y).0.iter().all(|&c| c <= 40) {
                continue;
            }
            bbox = Some(match bbox {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bbox
}

fn solid_jpeg(rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(579, 826, image::Rgb(rgb));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    buf
}

#[test]
fn card_is_fetched_from_its_resolved_url() {
    let mut fetcher = MemoryFetcher::new();
    fetcher.insert("http://host/TWR/250.jpg", solid_jpeg([250, 250, 250]));

    let config = ThumbnailConfig {
        cards_xml_path: Some("cards.xml".to_string()),
        card_url_template: Some("http://host/{setcode}/{setnum}.jpg".to_string()),
        right: SideConfig {
            back_card: Some("Plains_TWR".to_string()),
            ..SideConfig::default()
        },
        // The "vs" marker is always drawn, so point it at a font that exists nowhere.
        deckname_font: Some("/nonexistent/msem/Impact.ttf".to_string()),
        ..ThumbnailConfig::default()
    };

    let mut composer = ThumbnailComposer::new(CatalogRegistry::with_source(FixedSource), fetcher);
    // A wrong URL would fail the fetch before the missing font is reached.
    let err = composer.compose(&config).unwrap_err();
    assert!(matches!(err, MsemError::Config(_)), "{err}");
    assert_eq!(composer.catalogs().parse_count("cards.xml"), 1);
}

#[test]
fn unknown_card_fails_before_any_fetch() {
    let config = ThumbnailConfig {
        cards_xml_path: Some("cards.xml".to_string()),
        left: SideConfig {
            front_card: Some("Island_TWR".to_string()),
            ..SideConfig::default()
        },
        ..ThumbnailConfig::default()
    };

    let mut composer =
        ThumbnailComposer::new(CatalogRegistry::with_source(FixedSource), MemoryFetcher::new());
    let err = composer.compose(&config).unwrap_err();
    assert!(err.is_card_not_found(), "{err}");
}

#[test]
fn save_png_writes_a_readable_file() {
    let dir = std::env::temp_dir().join(format!("msem_thumb_save_png_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("out.png");

    let img = image::RgbImage::from_pixel(4, 3, image::Rgb([1, 2, 3]));
    save_png(&img, &path).unwrap();

    let back = image::open(&path).unwrap().to_rgb8();
    assert_eq!(back.dimensions(), (4, 3));
    assert_eq!(back.get_pixel(2, 1).0, [1, 2, 3]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn empty_config_draws_only_the_versus_marker() {
    let mut composer = ThumbnailComposer::new(CatalogRegistry::new(), MemoryFetcher::new());
    let img = composer.compose(&config_with_fixture_fonts()).unwrap();
    assert_eq!(img.dimensions(), (1920, 1080));

    let (x0, y0, x1, y1) = ink_bbox(&img, 0..1080).expect("vs marker leaves ink");
    assert!((f64::from(x0 + x1) / 2.0 - 960.0).abs() <= 4.0, "{x0}..{x1}");
    assert!(x1 - x0 < 120, "{x0}..{x1}");
    assert!(y0 >= 800 && y1 <= 900, "{y0}..{y1}");

    let white = img.pixels().any(|p| p.0.iter().all(|&c| c >= 245));
    assert!(white, "fill is white");
}

#[test]
fn title_only_config_centers_the_title() {
    let config = ThumbnailConfig {
        title: Some("MSEM Weekly".to_string()),
        ..config_with_fixture_fonts()
    };
    let mut composer = ThumbnailComposer::new(CatalogRegistry::new(), MemoryFetcher::new());
    let img = composer.compose(&config).unwrap();

    let (x0, y0, x1, _) = ink_bbox(&img, 0..300).expect("title leaves ink");
    assert!((f64::from(x0 + x1) / 2.0 - 960.0).abs() <= 6.0, "{x0}..{x1}");
    assert!(x1 - x0 > 300, "{x0}..{x1}");
    assert!(y0 <= 30, "{y0}");
}
