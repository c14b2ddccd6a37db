use std::{cell::Cell, rc::Rc};

use super::*;

const CARDS_XML: &str = r#"<cockatrice_carddatabase version="4">
  <cards>
    <card>
      <name>Plains_TWR</name>
      <set num="250" rarity="basic land">TWR</set>
    </card>
    <card>
      <name>Island_TWR</name>
      <set num="251" rarity="basic land">TWR</set>
    </card>
  </cards>
</cockatrice_carddatabase>"#;

struct CountingSource {
    reads: Rc<Cell<u32>>,
}

impl CatalogSource for CountingSource {
    fn read_to_string(&self, _path: &Path) -> MsemResult<String> {
        self.reads.set(self.reads.get() + 1);
        Ok(CARDS_XML.to_string())
    }
}

fn counting_registry() -> (CatalogRegistry, Rc<Cell<u32>>) {
    let reads = Rc::new(Cell::new(0));
    let registry = CatalogRegistry::with_source(CountingSource {
        reads: Rc::clone(&reads),
    });
    (registry, reads)
}

#[test]
fn load_same_path_parses_once() {
    let (mut registry, reads) = counting_registry();

    let a = registry.load("cards.xml").unwrap();
    let b = registry.load("cards.xml").unwrap();

    assert_eq!(reads.get(), 1);
    assert_eq!(registry.parse_count("cards.xml"), 1);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.find("Plains_TWR").unwrap(), b.find("Plains_TWR").unwrap());
}

#[test]
fn distinct_paths_are_cached_separately() {
    let (mut registry, reads) = counting_registry();

    registry.load("a/cards.xml").unwrap();
    registry.load("b/cards.xml").unwrap();
    registry.load("a/cards.xml").unwrap();

    assert_eq!(reads.get(), 2);
    assert_eq!(registry.parse_count("a/cards.xml"), 1);
    assert_eq!(registry.parse_count("c/cards.xml"), 0);
}

#[test]
fn empty_path_is_config_error() {
    let (mut registry, reads) = counting_registry();
    for path in ["", "   "] {
        assert!(matches!(registry.load(path), Err(MsemError::Config(_))));
    }
    assert_eq!(reads.get(), 0);
}

#[test]
fn find_card_accepts_path_or_loaded_catalog() {
    let (mut registry, reads) = counting_registry();

    let by_path = registry.find_card("Island_TWR", "cards.xml").unwrap();
    assert_eq!(by_path.set_number(), Some("251"));

    let catalog = Catalog::parse(CARDS_XML).unwrap();
    let by_catalog = registry.find_card("Island_TWR", &catalog).unwrap();
    assert_eq!(by_path, by_catalog);

    registry.find_card("Plains_TWR", "cards.xml").unwrap();
    assert_eq!(reads.get(), 1);
}

#[test]
fn unknown_card_is_card_not_found_through_registry() {
    let (mut registry, _) = counting_registry();
    let err = registry
        .resolve_image_url("Swamp_TWR", "cards.xml", "http://host/{setcode}/{setnum}.jpg")
        .unwrap_err();
    match err {
        MsemError::CardNotFound { name } => assert_eq!(name, "Swamp_TWR"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn resolve_image_url_end_to_end() {
    let (mut registry, _) = counting_registry();
    let url = registry
        .resolve_image_url("Plains_TWR", "cards.xml", "http://host/{setcode}/{setnum}.jpg")
        .unwrap();
    assert_eq!(url, "http://host/TWR/250.jpg");
}

#[test]
fn filesystem_source_reports_missing_file_as_io() {
    let mut registry = CatalogRegistry::new();
    let err = registry
        .load("definitely/not/here/cards.xml")
        .unwrap_err();
    assert!(matches!(err, MsemError::Other(_)));
    assert!(err.to_string().contains("read cards.xml"));
}
