//! Thumbnail configuration document.
//!
//! The JSON shape mirrors what match organisers already write by hand:
//!
//! ```json
//! {
//!   "cardsXmlPath": "~/.local/share/Cockatrice/Cockatrice/cards.xml",
//!   "title": "MSEM Weekly",
//!   "subtitle": "Round 3",
//!   "logoPath": "logo.png",
//!   "left":  { "pfpPath": "a.png", "playerName": "A", "deckName": "Boros", "frontCard": "X", "backCard": "Y" },
//!   "right": { "pfpPath": "b.png", "playerName": "B", "deckName": "Dimir" }
//! }
//! ```
//!
//! Every key is optional. Absent or `null` keys skip the corresponding layer.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{MsemError, MsemResult};

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
/// One player's half of the thumbnail.
pub struct SideConfig {
    /// Profile picture path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pfp_path: Option<String>,
    /// Player name label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    /// Deck name label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_name: Option<String>,
    /// Card drawn on top, by catalog name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_card: Option<String>,
    /// Card drawn underneath, by catalog name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_card: Option<String>,
}

impl SideConfig {
    /// True if this side names at least one card.
    pub fn has_cards(&self) -> bool {
        self.front_card.is_some() || self.back_card.is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
/// Declarative description of one thumbnail.
pub struct ThumbnailConfig {
    /// Path to Cockatrice `cards.xml`; required once any card is named.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards_xml_path: Option<String>,
    /// Headline text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Second line under the headline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Event logo path (raster or SVG).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<String>,
    /// Left player.
    #[serde(default)]
    pub left: SideConfig,
    /// Right player.
    #[serde(default)]
    pub right: SideConfig,
    /// Card image URL template; defaults to [`crate::DEFAULT_URL_TEMPLATE`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_url_template: Option<String>,
    /// Font for title, subtitle and player names; defaults to `HelveticaNeue.ttc`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_font: Option<String>,
    /// Font for deck names and the "vs" marker; defaults to `Impact.ttf`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deckname_font: Option<String>,

    /// Directory of the document this config was read from.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl ThumbnailConfig {
    /// Read and validate a config document.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> MsemResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config json '{}'", path.display()))?;
        let mut config = Self::from_json_str(&text)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parse and validate a config document.
    pub fn from_json_str(text: &str) -> MsemResult<Self> {
        // The left/right objects may be written as `null`.
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| MsemError::serde(e.to_string()))?;
        let value = strip_null_sides(value);
        let config: Self =
            serde_json::from_value(value).map_err(|e| MsemError::serde(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check field contents once up front, before composition starts.
    pub fn validate(&self) -> MsemResult<()> {
        // A blank cardsXmlPath is reported by the catalog loader, and only if a card is named.
        let paths = [
            ("logoPath", &self.logo_path),
            ("left.pfpPath", &self.left.pfp_path),
            ("right.pfpPath", &self.right.pfp_path),
            ("titleFont", &self.title_font),
            ("decknameFont", &self.deckname_font),
        ];
        for (key, value) in paths {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(MsemError::validation(format!("{key} must not be empty")));
            }
        }

        let cards = [
            ("left.frontCard", &self.left.front_card),
            ("left.backCard", &self.left.back_card),
            ("right.frontCard", &self.right.front_card),
            ("right.backCard", &self.right.back_card),
        ];
        for (key, value) in cards {
            if value.as_deref().is_some_and(|v| v.is_empty()) {
                return Err(MsemError::validation(format!("{key} must not be empty")));
            }
        }

        if let Some(t) = &self.card_url_template {
            if !t.contains("{setcode}") && !t.contains("{setnum}") {
                return Err(MsemError::validation(
                    "cardUrlTemplate must contain {setcode} or {setnum}",
                ));
            }
        }

        Ok(())
    }

    /// True if any side names a card, i.e. the catalog must be loaded.
    pub fn needs_catalog(&self) -> bool {
        self.left.has_cards() || self.right.has_cards()
    }
}

fn strip_null_sides(mut value: serde_json::Value) -> serde_json::Value {
    if let Some(obj) = value.as_object_mut() {
        for key in ["left", "right"] {
            if obj.get(key).is_some_and(serde_json::Value::is_null) {
                obj.remove(key);
            }
        }
    }
    value
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
