use std::path::Path;

use super::*;
use crate::catalog::registry::CatalogSource;

const CARDS_XML: &str = r#"<cockatrice_carddatabase version="4">
  <cards>
    <card><name>Plains_TWR</name><set num="250">TWR</set></card>
    <card><name>Island_TWR</name><set num="251">TWR</set></card>
    <card><name>Swamp_TWR</name><set num="252">TWR</set></card>
    <card><name>Mountain_TWR</name><set num="253">TWR</set></card>
  </cards>
</cockatrice_carddatabase>"#;

struct FixedSource;

impl CatalogSource for FixedSource {
    fn read_to_string(&self, _path: &Path) -> MsemResult<String> {
        Ok(CARDS_XML.to_string())
    }
}

fn registry() -> CatalogRegistry {
    CatalogRegistry::with_source(FixedSource)
}

fn kinds(layers: &[LayerOp]) -> Vec<LayerKind> {
    layers.iter().map(LayerOp::kind).collect()
}

#[test]
fn empty_config_plans_only_the_versus_marker() {
    let mut catalogs = registry();
    let layers = plan_layers(&ThumbnailConfig::default(), &mut catalogs).unwrap();
    assert_eq!(kinds(&layers), [LayerKind::Versus]);

    let LayerOp::Text(vs) = &layers[0] else {
        panic!("vs marker must be text");
    };
    assert_eq!(vs.text, "vs");
    assert_eq!(vs.slot, layout::VERSUS);
    // The catalog is never touched without card names.
    assert_eq!(catalogs.parse_count("cards.xml"), 0);
}

#[test]
fn title_only_plans_one_centered_text_layer_plus_versus() {
    let config = ThumbnailConfig {
        title: Some("MSEM Weekly".to_string()),
        ..ThumbnailConfig::default()
    };
    let layers = plan_layers(&config, &mut registry()).unwrap();
    assert_eq!(kinds(&layers), [LayerKind::Title, LayerKind::Versus]);

    let LayerOp::Text(title) = &layers[0] else {
        panic!("title must be text");
    };
    assert_eq!(title.text, "MSEM Weekly");
    assert_eq!(title.slot.anchor.x, layout::CANVAS.center_x());
    assert_eq!(title.slot.anchor.y, -7.0);
    assert!(
        layers
            .iter()
            .all(|l| !matches!(l, LayerOp::Image(_)))
    );
}

#[test]
fn full_config_follows_fixed_z_order() {
    let side = |n: &str, front: &str, back: &str| SideConfig {
        pfp_path: Some(format!("{n}.png")),
        player_name: Some(n.to_string()),
        deck_name: Some(format!("{n} deck")),
        front_card: Some(front.to_string()),
        back_card: Some(back.to_string()),
    };
    let config = ThumbnailConfig {
        cards_xml_path: Some("cards.xml".to_string()),
        title: Some("T".to_string()),
        subtitle: Some("S".to_string()),
        logo_path: Some("logo.png".to_string()),
        left: side("alice", "Plains_TWR", "Island_TWR"),
        right: side("bob", "Swamp_TWR", "Mountain_TWR"),
        ..ThumbnailConfig::default()
    };

    let layers = plan_layers(&config, &mut registry()).unwrap();
    use LayerKind::*;
    use Side::*;
    assert_eq!(
        kinds(&layers),
        [
            Logo,
            ProfilePicture(Left),
            ProfilePicture(Right),
            BackCard(Left),
            BackCard(Right),
            FrontCard(Left),
            FrontCard(Right),
            Title,
            Subtitle,
            PlayerName(Left),
            PlayerName(Right),
            Versus,
            DeckName(Left),
            DeckName(Right),
        ]
    );

    let LayerOp::Image(back_left) = &layers[3] else {
        panic!("cards are images");
    };
    assert_eq!(
        back_left.source,
        ImageSource::Url("http://mse-modern.com/msem2/images/TWR/251.jpg".to_string())
    );
    assert_eq!(back_left.slot, layout::back_card(Left));
}

#[test]
fn back_card_is_planned_before_front_card() {
    let config = ThumbnailConfig {
        cards_xml_path: Some("cards.xml".to_string()),
        card_url_template: Some("http://host/{setcode}/{setnum}.jpg".to_string()),
        right: SideConfig {
            front_card: Some("Plains_TWR".to_string()),
            back_card: Some("Island_TWR".to_string()),
            ..SideConfig::default()
        },
        ..ThumbnailConfig::default()
    };
    let layers = plan_layers(&config, &mut registry()).unwrap();
    let urls: Vec<_> = layers
        .iter()
        .filter_map(|l| match l {
            LayerOp::Image(ImageLayer {
                source: ImageSource::Url(u),
                ..
            }) => Some(u.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(urls, ["http://host/TWR/251.jpg", "http://host/TWR/250.jpg"]);
}

#[test]
fn card_without_catalog_path_is_config_error() {
    let config = ThumbnailConfig {
        left: SideConfig {
            front_card: Some("Plains_TWR".to_string()),
            ..SideConfig::default()
        },
        ..ThumbnailConfig::default()
    };
    assert!(matches!(
        plan_layers(&config, &mut registry()),
        Err(MsemError::Config(_))
    ));
}

#[test]
fn card_with_blank_catalog_path_is_config_error() {
    let config = ThumbnailConfig {
        cards_xml_path: Some(" ".to_string()),
        right: SideConfig {
            back_card: Some("Plains_TWR".to_string()),
            ..SideConfig::default()
        },
        ..ThumbnailConfig::default()
    };
    assert!(matches!(
        plan_layers(&config, &mut registry()),
        Err(MsemError::Config(_))
    ));
}

#[test]
fn unknown_card_aborts_the_plan() {
    let config = ThumbnailConfig {
        cards_xml_path: Some("cards.xml".to_string()),
        left: SideConfig {
            back_card: Some("Forest_TWR".to_string()),
            ..SideConfig::default()
        },
        ..ThumbnailConfig::default()
    };
    match plan_layers(&config, &mut registry()) {
        Err(MsemError::CardNotFound { name }) => assert_eq!(name, "Forest_TWR"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn catalog_is_parsed_once_for_four_cards() {
    let config = ThumbnailConfig {
        cards_xml_path: Some("cards.xml".to_string()),
        left: SideConfig {
            front_card: Some("Plains_TWR".to_string()),
            back_card: Some("Island_TWR".to_string()),
            ..SideConfig::default()
        },
        right: SideConfig {
            front_card: Some("Swamp_TWR".to_string()),
            back_card: Some("Mountain_TWR".to_string()),
            ..SideConfig::default()
        },
        ..ThumbnailConfig::default()
    };
    let mut catalogs = registry();
    plan_layers(&config, &mut catalogs).unwrap();
    plan_layers(&config, &mut catalogs).unwrap();
    assert_eq!(catalogs.parse_count("cards.xml"), 1);
}
