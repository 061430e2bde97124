//! Default panel URL scheme, drag text and preview images.

use crate::application::host::{ImageOptions, ImageView, PanelLinks};
use crate::domain::entities::{ItemRecord, ModelRef};
use crate::domain::types::{Layout, ModelKind};

/// Builds panel and API URLs below a site base URL.
///
/// Page ids use `+` instead of `/` in URLs: `blog/hello` lives at
/// `/panel/pages/blog+hello`, its files at `/panel/pages/blog+hello/files/<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultPanel {
    base_url: String,
    panel_slug: String,
    api_slug: String,
}

impl DefaultPanel {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            panel_slug: "panel".to_string(),
            api_slug: "api".to_string(),
        }
    }

    pub fn with_slugs(mut self, panel: &str, api: &str) -> Self {
        self.panel_slug = panel.trim_matches('/').to_string();
        self.api_slug = api.trim_matches('/').to_string();
        self
    }

    fn prefixed(&self, slug: &str, path: &str, absolute: bool) -> String {
        let base = if absolute { self.base_url.as_str() } else { "" };
        format!("{base}/{slug}/{path}")
    }

    fn item_path(&self, item: &ItemRecord) -> String {
        match item.kind {
            ModelKind::File => format!(
                "{}/files/{}",
                self.model_path(&item.parent),
                item.filename().unwrap_or_else(|| item.slug())
            ),
            _ => model_path_of(item.kind, Some(&item.id)),
        }
    }
}

impl Default for DefaultPanel {
    fn default() -> Self {
        Self::new("")
    }
}

impl PanelLinks for DefaultPanel {
    fn model_url(&self, model: &ModelRef, absolute: bool) -> String {
        self.prefixed(&self.panel_slug, &self.model_path(model), absolute)
    }

    fn model_path(&self, model: &ModelRef) -> String {
        model_path_of(model.kind(), model.id())
    }

    fn api_url(&self, model: &ModelRef, absolute: bool) -> String {
        self.prefixed(&self.api_slug, &self.model_path(model), absolute)
    }

    fn item_url(&self, item: &ItemRecord, absolute: bool) -> String {
        self.prefixed(&self.panel_slug, &self.item_path(item), absolute)
    }

    fn drag_text(&self, item: &ItemRecord, absolute: bool) -> String {
        match item.kind {
            ModelKind::File => {
                let reference = if absolute {
                    item.id.as_str()
                } else {
                    item.filename().unwrap_or_else(|| item.slug())
                };
                let tag = if item.file.as_ref().is_some_and(|file| file.is_image()) {
                    "image"
                } else {
                    "file"
                };
                format!("({tag}: {reference})")
            }
            _ => format!("(link: {} text: {})", item.id, item.title()),
        }
    }

    fn image(&self, item: &ItemRecord, options: &ImageOptions, layout: Layout) -> ImageView {
        let attributes = item.file.as_ref();
        let is_image = attributes.is_some_and(|file| file.is_image());
        let icon = match item.kind {
            ModelKind::File if is_image => "image",
            ModelKind::File => "file",
            ModelKind::User => "user",
            _ => "page",
        };
        let default_ratio = match layout {
            Layout::Cards => "3/2",
            _ => "1/1",
        };

        ImageView {
            src: attributes.filter(|_| is_image).map(|file| file.url.clone()),
            icon: icon.to_string(),
            ratio: options
                .ratio
                .clone()
                .unwrap_or_else(|| default_ratio.to_string()),
            back: options.back.clone().unwrap_or_else(|| "pattern".to_string()),
            cover: options.cover,
        }
    }
}

fn model_path_of(kind: ModelKind, id: Option<&str>) -> String {
    match (kind, id) {
        (ModelKind::Page, Some(id)) => format!("pages/{}", id.replace('/', "+")),
        (ModelKind::User, Some(id)) => format!("users/{id}"),
        (ModelKind::File, Some(id)) => match id.rsplit_once('/') {
            Some((parent, filename)) => {
                format!("pages/{}/files/{filename}", parent.replace('/', "+"))
            }
            None => format!("site/files/{id}"),
        },
        _ => "site".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ContentFields;

    #[test]
    fn page_urls_replace_slashes() {
        let panel = DefaultPanel::new("https://example.com/");
        let page = ModelRef::page("blog/hello");

        assert_eq!(panel.model_path(&page), "pages/blog+hello");
        assert_eq!(panel.model_url(&page, false), "/panel/pages/blog+hello");
        assert_eq!(
            panel.model_url(&page, true),
            "https://example.com/panel/pages/blog+hello"
        );
        assert_eq!(panel.api_url(&ModelRef::site(), false), "/api/site");
        assert_eq!(panel.model_path(&ModelRef::user("ada")), "users/ada");
    }

    #[test]
    fn file_urls_nest_under_the_parent() {
        let panel = DefaultPanel::default();
        let file = ItemRecord::file(&ModelRef::page("blog/hello"), "cover.jpg", "/media/cover.jpg")
            .expect("valid file");

        assert_eq!(
            panel.item_url(&file, true),
            "/panel/pages/blog+hello/files/cover.jpg"
        );
        assert_eq!(
            panel.model_path(&ModelRef::file("logo.svg")),
            "site/files/logo.svg"
        );
    }

    #[test]
    fn drag_text_depends_on_kind_and_absoluteness() {
        let panel = DefaultPanel::default();
        let image = ItemRecord::file(&ModelRef::page("album"), "sunset.jpg", "/media/sunset.jpg")
            .expect("valid file");
        let document = ItemRecord::file(&ModelRef::page("album"), "notes.pdf", "/media/notes.pdf")
            .expect("valid file");
        let page = ItemRecord::page("blog/hello")
            .expect("valid page")
            .with_content(ContentFields::new().with("title", "Hello"));

        assert_eq!(panel.drag_text(&image, false), "(image: sunset.jpg)");
        assert_eq!(panel.drag_text(&image, true), "(image: album/sunset.jpg)");
        assert_eq!(panel.drag_text(&document, false), "(file: notes.pdf)");
        assert_eq!(panel.drag_text(&page, false), "(link: blog/hello text: Hello)");
    }

    #[test]
    fn images_only_have_a_source_for_image_files() {
        let panel = DefaultPanel::default();
        let image = ItemRecord::file(&ModelRef::site(), "logo.png", "/media/logo.png")
            .expect("valid file");
        let page = ItemRecord::page("about").expect("valid page");
        let options = ImageOptions {
            ratio: None,
            back: Some("black".into()),
            cover: true,
        };

        let view = panel.image(&image, &options, Layout::Cards);
        assert_eq!(view.src.as_deref(), Some("/media/logo.png"));
        assert_eq!(view.icon, "image");
        assert_eq!(view.ratio, "3/2");
        assert_eq!(view.back, "black");
        assert!(view.cover);

        let view = panel.image(&page, &ImageOptions::default(), Layout::List);
        assert_eq!(view.src, None);
        assert_eq!(view.icon, "page");
        assert_eq!(view.ratio, "1/1");
        assert_eq!(view.back, "pattern");
    }
}
