#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use panel_sections::application::i18n::Catalog;
use panel_sections::application::sections::SectionService;
use panel_sections::infra::fixture::ContentFixture;
use panel_sections::infra::panel::DefaultPanel;

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("content.json")
}

pub fn fixture() -> Arc<ContentFixture> {
    Arc::new(ContentFixture::load(&fixture_path()).expect("fixture should load"))
}

pub fn service_with(catalog: Catalog) -> SectionService {
    let fixture = fixture();
    SectionService::new(
        fixture.clone(),
        Arc::new(DefaultPanel::default()),
        fixture,
        Arc::new(catalog),
    )
}

pub fn service() -> SectionService {
    service_with(Catalog::english())
}
