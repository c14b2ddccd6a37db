use std::path::PathBuf;

use crate::{
    catalog::record::DEFAULT_URL_TEMPLATE,
    catalog::registry::{CatalogRef, CatalogRegistry},
    compose::layout::{self, ImageSlot, Side, TextSlot},
    config::{SideConfig, ThumbnailConfig},
    foundation::core::expand_home,
    foundation::error::{MsemError, MsemResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// What a layer depicts.
pub enum LayerKind {
    Logo,
    ProfilePicture(Side),
    BackCard(Side),
    FrontCard(Side),
    Title,
    Subtitle,
    PlayerName(Side),
    Versus,
    DeckName(Side),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where an image layer's bytes come from.
pub enum ImageSource {
    /// Local file (logo, profile picture).
    File(PathBuf),
    /// Remote card scan.
    Url(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageLayer {
    pub kind: LayerKind,
    pub source: ImageSource,
    pub slot: ImageSlot,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLayer {
    pub kind: LayerKind,
    pub text: String,
    pub slot: TextSlot,
}

#[derive(Clone, Debug, PartialEq)]
/// One entry of a thumbnail plan; later entries are painted over earlier ones.
pub enum LayerOp {
    Image(ImageLayer),
    Text(TextLayer),
}

impl LayerOp {
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerOp::Image(l) => l.kind,
            LayerOp::Text(l) => l.kind,
        }
    }
}

/// Build the ordered layer list for `config`.
///
/// Order: logo, profile pictures, back cards, front cards, title, subtitle, player names, the
/// "vs" marker, deck names. Left precedes right within each group. Card names are resolved to
/// image URLs here, so lookup failures surface before any pixels are fetched. The catalog is
/// only loaded when a card is named.
#[tracing::instrument(skip_all)]
pub fn plan_layers(
    config: &ThumbnailConfig,
    catalogs: &mut CatalogRegistry,
) -> MsemResult<Vec<LayerOp>> {
    let mut layers = Vec::new();

    if let Some(path) = &config.logo_path {
        layers.push(image_file(LayerKind::Logo, path, layout::LOGO));
    }

    for side in Side::BOTH {
        if let Some(path) = &side_config(config, side).pfp_path {
            layers.push(image_file(
                LayerKind::ProfilePicture(side),
                path,
                layout::pfp(side),
            ));
        }
    }

    if config.needs_catalog() {
        let path = config
            .cards_xml_path
            .as_deref()
            .ok_or_else(|| MsemError::config("path to cards.xml not given"))?;
        let catalog = catalogs.load(path)?;
        let template = config
            .card_url_template
            .as_deref()
            .unwrap_or(DEFAULT_URL_TEMPLATE);

        let mut card_layer = |kind: LayerKind, name: &str, slot: ImageSlot| {
            let url = catalogs.resolve_image_url(name, CatalogRef::Loaded(&catalog), template)?;
            Ok::<_, MsemError>(LayerOp::Image(ImageLayer {
                kind,
                source: ImageSource::Url(url),
                slot,
            }))
        };

        for side in Side::BOTH {
            if let Some(name) = &side_config(config, side).back_card {
                layers.push(card_layer(
                    LayerKind::BackCard(side),
                    name,
                    layout::back_card(side),
                )?);
            }
        }
        for side in Side::BOTH {
            if let Some(name) = &side_config(config, side).front_card {
                layers.push(card_layer(
                    LayerKind::FrontCard(side),
                    name,
                    layout::front_card(side),
                )?);
            }
        }
    }

    if let Some(text) = &config.title {
        layers.push(text_layer(LayerKind::Title, text, layout::TITLE));
    }
    if let Some(text) = &config.subtitle {
        layers.push(text_layer(LayerKind::Subtitle, text, layout::SUBTITLE));
    }

    for side in Side::BOTH {
        if let Some(text) = &side_config(config, side).player_name {
            layers.push(text_layer(
                LayerKind::PlayerName(side),
                text,
                layout::player_name(side),
            ));
        }
    }

    layers.push(text_layer(
        LayerKind::Versus,
        layout::VERSUS_TEXT,
        layout::VERSUS,
    ));

    for side in Side::BOTH {
        if let Some(text) = &side_config(config, side).deck_name {
            layers.push(text_layer(
                LayerKind::DeckName(side),
                text,
                layout::deck_name(side),
            ));
        }
    }

    tracing::debug!(layers = layers.len(), "planned thumbnail");
    Ok(layers)
}

fn side_config(config: &ThumbnailConfig, side: Side) -> &SideConfig {
    side.pick(&config.left, &config.right)
}

fn image_file(kind: LayerKind, path: &str, slot: ImageSlot) -> LayerOp {
    LayerOp::Image(ImageLayer {
        kind,
        source: ImageSource::File(expand_home(path)),
        slot,
    })
}

fn text_layer(kind: LayerKind, text: &str, slot: TextSlot) -> LayerOp {
    LayerOp::Text(TextLayer {
        kind,
        text: text.to_string(),
        slot,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/plan.rs"]
mod tests;
