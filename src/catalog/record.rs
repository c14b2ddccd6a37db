use std::collections::HashMap;

use anyhow::Context;

use crate::foundation::error::{MsemError, MsemResult};

/// Default image host for MSEM card scans.
pub const DEFAULT_URL_TEMPLATE: &str = "http://mse-modern.com/msem2/images/{setcode}/{setnum}.jpg";

#[derive(Clone, Debug, PartialEq, Eq)]
/// Printing of a card within a set: `<set num="250">TWR</set>`.
pub struct SetEntry {
    /// Set code, the element text.
    pub code: String,
    /// Collector number within the set, the `num` attribute.
    pub number: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One `<card>` record of a Cockatrice `cards.xml` catalog.
pub struct CardRecord {
    /// Unique card name, the lookup key.
    pub name: String,
    /// First `<set>` entry of the card, if the document carried a usable one.
    pub set: Option<SetEntry>,
}

impl CardRecord {
    /// Set code of the record's printing.
    pub fn set_code(&self) -> Option<&str> {
        self.set.as_ref().map(|s| s.code.as_str())
    }

    /// Collector number of the record's printing.
    pub fn set_number(&self) -> Option<&str> {
        self.set.as_ref().map(|s| s.number.as_str())
    }

    /// Substitute `{setcode}` and `{setnum}` into `template`.
    pub fn image_url(&self, template: &str) -> MsemResult<String> {
        let set = self.set.as_ref().ok_or_else(|| {
            MsemError::validation(format!(
                "card '{}' has no <set> entry with a num attribute",
                self.name
            ))
        })?;
        Ok(template
            .replace("{setcode}", &set.code)
            .replace("{setnum}", &set.number))
    }
}

#[derive(Clone, Debug, Default)]
/// Parsed catalog: records in document order plus a name index.
pub struct Catalog {
    records: Vec<CardRecord>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Parse a `cards.xml` document.
    ///
    /// Every `<card>` element anywhere in the tree becomes a record keyed by its `<name>` text.
    /// When a name repeats, the first record in document order wins.
    pub fn parse(xml: &str) -> MsemResult<Self> {
        let doc = roxmltree::Document::parse(xml).context("parse cards.xml document")?;

        let mut out = Self::default();
        for card in doc.descendants().filter(|n| n.has_tag_name("card")) {
            let Some(name) = child_text(card, "name") else {
                tracing::debug!("skipping <card> without <name>");
                continue;
            };

            if out.by_name.contains_key(name) {
                tracing::warn!(name, "duplicate card name in catalog, keeping the first");
                continue;
            }

            let set = card
                .children()
                .find(|c| c.has_tag_name("set"))
                .and_then(|s| {
                    let number = s.attribute("num")?;
                    let code = s.text()?.trim();
                    Some(SetEntry {
                        code: code.to_string(),
                        number: number.to_string(),
                    })
                });

            out.by_name.insert(name.to_string(), out.records.len());
            out.records.push(CardRecord {
                name: name.to_string(),
                set,
            });
        }

        Ok(out)
    }

    /// Exact-match lookup.
    pub fn get(&self, name: &str) -> Option<&CardRecord> {
        self.by_name.get(name).map(|&i| &self.records[i])
    }

    /// Exact-match lookup that fails with [`MsemError::CardNotFound`].
    pub fn find(&self, name: &str) -> MsemResult<&CardRecord> {
        self.get(name).ok_or_else(|| MsemError::card_not_found(name))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in document order.
    pub fn iter(&self) -> impl Iterator<Item = &CardRecord> {
        self.records.iter()
    }
}

fn child_text<'a>(node: roxmltree::Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|c| c.has_tag_name(tag))
        .and_then(|c| c.text())
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/record.rs"]
mod tests;
