use std::io::Write;

use super::*;
use crate::application::i18n::{Catalog, TranslatableText};
use crate::application::sections::CreateOption;
use crate::domain::types::{ColumnType, Layout, StatusFilter};

fn raw_from_toml(source: &str) -> RawSettings {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    file.write_all(source.as_bytes()).expect("write config");

    Config::builder()
        .add_source(File::from(file.path()).required(true))
        .build()
        .expect("config builds")
        .try_deserialize()
        .expect("raw settings")
}

fn settings_from_toml(source: &str) -> Result<Settings, LoadError> {
    Settings::from_raw(raw_from_toml(source))
}

fn preview_args(extra: &[&str]) -> CliArgs {
    let mut args = vec![
        "panel-sections",
        "preview",
        "gallery",
        "--content",
        "/tmp/content.json",
    ];
    args.extend_from_slice(extra);
    CliArgs::parse_from(args)
}

#[test]
fn defaults_apply_without_sources() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert_eq!(
        settings.panel,
        PanelSettings {
            base_url: String::new(),
            panel_slug: "panel".into(),
            api_slug: "api".into(),
            locale: "en".into(),
        }
    );
    assert!(settings.sections.is_empty());
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("info".to_string());

    let overrides = LoggingOverrides {
        log_level: Some("debug".to_string()),
        log_json: Some(true),
    };

    raw.apply_logging_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());

    let error = Settings::from_raw(raw).expect_err("invalid level");
    assert!(matches!(error, LoadError::Invalid { ref key, .. } if key == "logging.level"));
}

#[test]
fn panel_settings_are_normalised() {
    let settings = settings_from_toml(
        r#"
        [panel]
        base_url = "https://example.com/"
        panel_slug = "/admin/"
        locale = "de"
        "#,
    )
    .expect("valid settings");

    assert_eq!(settings.panel.base_url, "https://example.com");
    assert_eq!(settings.panel.panel_slug, "admin");
    assert_eq!(settings.panel.api_slug, "api");
    assert_eq!(settings.panel.locale, "de");

    let error = settings_from_toml(
        r#"
        [panel]
        base_url = "example.com"
        "#,
    )
    .expect_err("relative base url");
    assert!(matches!(error, LoadError::Invalid { ref key, .. } if key == "panel.base_url"));
}

#[test]
fn files_section_is_parsed() {
    let settings = settings_from_toml(
        r#"
        [sections.gallery]
        type = "files"
        template = "image"
        layout = "cards"
        size = "enormous"
        limit = 12
        max = 10
        search = true
        image = { ratio = "16/9", cover = true }

        [sections.gallery.headline]
        en = "Gallery"
        de = "Galerie"

        [sections.gallery.columns.caption]
        label = "Caption"

        [sections.gallery.columns.source]
        type = "url"
        value = "{{ file.url }}"
        "#,
    )
    .expect("valid settings");

    let Some(SectionSettings::Files(files)) = settings.section("gallery") else {
        panic!("gallery should be a files section");
    };
    let options = &files.options;
    assert_eq!(files.template.as_deref(), Some("image"));
    assert_eq!(options.layout, Layout::Cards);
    assert_eq!(options.size, Default::default());
    assert_eq!(options.limit.get(), 12);
    assert_eq!(options.bounds.max, Some(10));
    assert_eq!(options.bounds.min, None);
    assert!(options.search);
    assert!(options.sortable);

    let image = options.image.as_ref().expect("image options");
    assert_eq!(image.ratio.as_deref(), Some("16/9"));
    assert!(image.cover);

    let catalog = Catalog::english().with_locale("de");
    assert_eq!(options.headline(&catalog), "Galerie");

    assert_eq!(options.columns["caption"].column_type, ColumnType::Text);
    assert_eq!(
        options.columns["caption"].label,
        Some(TranslatableText::from("Caption"))
    );
    assert_eq!(options.columns["source"].column_type, ColumnType::Url);
    assert_eq!(
        options.columns["source"].value.as_deref(),
        Some("{{ file.url }}")
    );
}

#[test]
fn pages_section_is_parsed() {
    let settings = settings_from_toml(
        r#"
        [sections.drafts]
        type = "pages"
        status = "drafts"
        template = "article"
        create = false
        image = false
        flip = true
        sortBy = "date desc"

        [sections.published]
        type = "pages"
        status = "archived"
        templates = ["article", "note"]
        create = "article"
        "#,
    )
    .expect("valid settings");

    let Some(SectionSettings::Pages(drafts)) = settings.section("drafts") else {
        panic!("drafts should be a pages section");
    };
    assert_eq!(drafts.status, StatusFilter::Draft);
    assert_eq!(drafts.templates, ["article"]);
    assert_eq!(drafts.create, CreateOption::Disabled);
    assert!(drafts.options.image.is_none());
    assert!(drafts.options.flip);
    assert_eq!(drafts.options.sort_by.as_deref(), Some("date desc"));

    let Some(SectionSettings::Pages(published)) = settings.section("published") else {
        panic!("published should be a pages section");
    };
    assert_eq!(published.status, StatusFilter::All);
    assert_eq!(published.templates, ["article", "note"]);
    assert_eq!(
        published.create,
        CreateOption::Templates(vec!["article".into()])
    );
}

#[test]
fn section_type_defaults_to_its_name() {
    let settings = settings_from_toml(
        r#"
        [sections.pages]
        headline = "Subpages"
        "#,
    )
    .expect("valid settings");

    assert!(matches!(
        settings.section("pages"),
        Some(SectionSettings::Pages(_))
    ));
}

#[test]
fn unknown_section_type_is_rejected() {
    let error = settings_from_toml(
        r#"
        [sections.people]
        type = "users"
        "#,
    )
    .expect_err("unknown type");

    assert!(matches!(error, LoadError::Invalid { ref key, .. } if key == "sections.people.type"));
}

#[test]
fn zero_limit_is_rejected() {
    let error = settings_from_toml(
        r#"
        [sections.gallery]
        type = "files"
        limit = 0
        "#,
    )
    .expect_err("zero limit");

    assert!(matches!(error, LoadError::Invalid { ref key, .. } if key == "sections.gallery.limit"));
}

#[test]
fn zero_max_is_kept_as_a_bound() {
    let settings = settings_from_toml(
        r#"
        [sections.gallery]
        type = "files"
        max = 0
        "#,
    )
    .expect("valid settings");

    assert_eq!(settings.section("gallery").map(|s| s.options().bounds.max), Some(Some(0)));
}

#[test]
fn parse_preview_arguments() {
    let args = preview_args(&[
        "--model",
        "blog",
        "--page",
        "3",
        "--query",
        "sunset",
        "--log-json",
        "true",
        "--pretty",
    ]);

    match args.command {
        Command::Preview(preview) => {
            assert_eq!(preview.content.section, "gallery");
            assert_eq!(preview.content.model, "blog");
            assert_eq!(
                preview.content.content,
                std::path::Path::new("/tmp/content.json")
            );
            assert_eq!(preview.page, 3);
            assert_eq!(preview.query.as_deref(), Some("sunset"));
            assert_eq!(preview.content.logging.log_json, Some(true));
            assert!(preview.pretty);
        }
        Command::Blueprints(_) => panic!("wrong command parsed"),
    }
}

#[test]
fn preview_defaults_to_site_and_first_page() {
    let args = preview_args(&[]);
    let Command::Preview(preview) = args.command else {
        panic!("wrong command parsed");
    };
    assert_eq!(preview.content.model, "site");
    assert_eq!(preview.page, 1);
    assert!(!preview.pretty);
}

#[test]
fn parse_blueprints_arguments() {
    let args = CliArgs::parse_from([
        "panel-sections",
        "--config-file",
        "/etc/panel.toml",
        "blueprints",
        "posts",
        "--content",
        "content.json",
        "--locale",
        "fr",
    ]);

    assert_eq!(
        args.config_file.as_deref(),
        Some(std::path::Path::new("/etc/panel.toml"))
    );
    let content = args.command.content();
    assert_eq!(content.section, "posts");
    assert_eq!(content.locale.as_deref(), Some("fr"));
}
