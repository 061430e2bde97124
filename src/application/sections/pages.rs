use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{debug, instrument, warn};

use super::{
    CreateOption, METRIC_BUILD_MS, METRIC_VIEWS_TOTAL, PagesSectionSettings, SectionRequest,
    SectionService, to_row,
};
use crate::application::assemble::{addable, parent_link, sortable};
use crate::application::collection::ItemSet;
use crate::application::columns::{append_custom_cells, ucfirst};
use crate::application::error::SectionError;
use crate::application::host::BlueprintInfo;
use crate::application::ordering::order;
use crate::application::pagination::{PageRequest, paginate};
use crate::application::query::{FilterCriteria, active_search, parent_model, resolve};
use crate::application::validate::validate;
use crate::domain::entities::ModelRef;
use crate::domain::template::render_safe;
use crate::domain::types::{Layout, SectionKind};
use crate::presentation::views::{
    LinkCell, PageItemView, PagePermissionsView, PagesOptions, PagesView, SectionData, TableRow,
};

impl SectionService {
    /// Build the payload of a pages section hosted by `model`.
    #[instrument(skip(self, settings), fields(section = %settings.options.name))]
    pub fn pages_view(
        &self,
        settings: &PagesSectionSettings,
        model: &ModelRef,
        request: &SectionRequest,
    ) -> Result<PagesView, SectionError> {
        let started_at = Instant::now();
        let options = &settings.options;
        let translator = self.translator.as_ref();

        let parent = parent_model(
            self.repo.as_ref(),
            model,
            options.parent.as_deref(),
            &options.name,
            SectionKind::Pages,
        )?;

        let criteria = FilterCriteria {
            status: settings.status,
            templates: settings.templates.clone(),
            search: active_search(options.search, request.query.as_deref()),
        };
        let sort = options.sort_spec();
        let pages = resolve(self.repo.as_ref(), self.search.as_ref(), &parent, &criteria);
        let pages = order(pages, &sort, SectionKind::Pages);
        let total = pages.len();
        let slice = paginate(pages, PageRequest::new(request.page, options.limit));

        let headline = options.headline(translator);
        let errors = validate(
            total,
            options.bounds,
            &options.name,
            &headline,
            SectionKind::Pages,
            translator,
        );
        // Drag sorting reorders listed pages only.
        let sortable = sortable(options.sortable, request.query.as_deref(), &sort)
            && settings.status.shows_listed();
        let add = addable(
            settings.create != CreateOption::Disabled,
            settings.status.shows_drafts(),
            options.bounds,
            total,
        );

        let data = if options.layout == Layout::Table {
            SectionData::Rows(self.page_rows(settings, &slice.items)?)
        } else {
            SectionData::Items(self.page_items(settings, &slice.items))
        };

        let link = parent_link(
            &self.panel.model_url(model, true),
            self.panel.model_url(&parent, true),
        );

        counter!(METRIC_VIEWS_TOTAL, "kind" => SectionKind::Pages.as_str()).increment(1);
        histogram!(METRIC_BUILD_MS, "kind" => SectionKind::Pages.as_str())
            .record(started_at.elapsed().as_secs_f64() * 1000.0);
        debug!(
            target = "panel_sections::sections::pages",
            status = settings.status.as_str(),
            total,
            shown = data.len(),
            errors = errors.len(),
            "pages section built"
        );

        Ok(PagesView {
            data,
            errors,
            options: PagesOptions {
                add,
                common: options.common(
                    SectionKind::Pages,
                    headline,
                    link,
                    request.query.clone(),
                    sortable,
                    translator,
                ),
            },
            pagination: slice.pagination,
        })
    }

    /// Templates offered by the "add page" dialog.
    ///
    /// Explicit create templates win over the section templates; with neither,
    /// every known page template is offered. Templates whose blueprint cannot be
    /// loaded are still offered under a title derived from their name.
    pub fn creation_blueprints(&self, settings: &PagesSectionSettings) -> Vec<BlueprintInfo> {
        let mut templates = match &settings.create {
            CreateOption::Templates(templates) if !templates.is_empty() => templates.clone(),
            _ => settings.templates.clone(),
        };
        if templates.is_empty() {
            templates = self.blueprints.page_templates();
        }

        templates
            .iter()
            .map(|template| match self.blueprints.page_blueprint(template) {
                Ok(blueprint) => BlueprintInfo {
                    name: basename(&blueprint.name).to_string(),
                    title: blueprint.title,
                },
                Err(error) => {
                    warn!(
                        target = "panel_sections::sections::pages",
                        template = %template,
                        error = %error,
                        "falling back to a generated blueprint title"
                    );
                    BlueprintInfo {
                        name: basename(template).to_string(),
                        title: ucfirst(template),
                    }
                }
            })
            .collect()
    }

    fn page_items(&self, settings: &PagesSectionSettings, pages: &ItemSet) -> Vec<PageItemView> {
        let options = &settings.options;
        let translator = self.translator.as_ref();
        let text = options.text_template(SectionKind::Pages, translator);
        let info = options.info_template(translator);

        pages
            .iter()
            .map(|page| PageItemView {
                drag_text: self.panel.drag_text(page, false),
                id: page.id.clone(),
                image: options
                    .image
                    .as_ref()
                    .map(|image| self.panel.image(page, image, options.layout)),
                info: info
                    .as_deref()
                    .map(|info| render_safe(info, page))
                    .unwrap_or_default(),
                link: self.panel.item_url(page, true),
                parent: page.parent.id().map(str::to_string),
                permissions: PagePermissionsView {
                    sort: page.permissions.can("sort"),
                    change_slug: page.permissions.can("changeSlug"),
                    change_status: page.permissions.can("changeStatus"),
                    change_title: page.permissions.can("changeTitle"),
                },
                status: page.status,
                template: page.template.clone(),
                text: render_safe(&text, page),
            })
            .collect()
    }

    fn page_rows(
        &self,
        settings: &PagesSectionSettings,
        pages: &ItemSet,
    ) -> Result<Vec<TableRow>, SectionError> {
        let options = &settings.options;
        let items = self.page_items(settings, pages);

        items
            .iter()
            .zip(pages.iter())
            .map(|(item, page)| {
                let mut row = to_row(item)?;
                row.insert(
                    "title".into(),
                    serde_json::to_value(LinkCell {
                        text: item.text.clone(),
                        href: item.link.clone(),
                    })?,
                );
                append_custom_cells(&mut row, page, &options.columns);
                Ok(row)
            })
            .collect()
    }
}

fn basename(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::host::{
        Blueprints, ContentRepository, HostError, ImageOptions, ImageView, PanelLinks,
    };
    use crate::application::i18n::Catalog;
    use crate::application::validate::ValidationBounds;
    use crate::domain::entities::{ContentFields, ItemRecord, Permissions};
    use crate::domain::types::{PageStatus, StatusFilter};

    struct Blog;

    fn post(slug: &str, status: PageStatus) -> ItemRecord {
        let page = ItemRecord::page(&format!("blog/{slug}"))
            .expect("valid page")
            .with_template("article")
            .with_status(status)
            .with_content(
                ContentFields::new()
                    .with("title", ucfirst(slug))
                    .with("author", "Ada"),
            )
            .with_permissions(Permissions::granting(["sort", "changeTitle"]));
        match status {
            PageStatus::Listed => page.with_num(1),
            _ => page,
        }
    }

    impl ContentRepository for Blog {
        fn page(&self, id: &str) -> Option<ModelRef> {
            (id == "blog").then(|| ModelRef::page("blog"))
        }

        fn parent_of(&self, model: &ModelRef) -> Option<ModelRef> {
            model.id().map(ModelRef::parent_of_page)
        }

        fn children(&self, parent: &ModelRef) -> ItemSet {
            if parent.id() != Some("blog") {
                return ItemSet::default();
            }
            ItemSet::new(vec![
                post("first", PageStatus::Listed),
                post("second", PageStatus::Unlisted),
                post("secret", PageStatus::Listed).unreadable(),
                post("notes", PageStatus::Unlisted).with_template("note"),
            ])
        }

        fn drafts(&self, parent: &ModelRef) -> ItemSet {
            if parent.id() != Some("blog") {
                return ItemSet::default();
            }
            ItemSet::new(vec![post("draft", PageStatus::Draft)])
        }

        fn files(&self, _parent: &ModelRef) -> ItemSet {
            ItemSet::default()
        }
    }

    struct Links;

    impl PanelLinks for Links {
        fn model_url(&self, model: &ModelRef, _absolute: bool) -> String {
            format!("/panel/{}", model.id().unwrap_or("site"))
        }

        fn model_path(&self, model: &ModelRef) -> String {
            model.id().unwrap_or("site").to_string()
        }

        fn api_url(&self, model: &ModelRef, _absolute: bool) -> String {
            format!("/api/{}", model.id().unwrap_or("site"))
        }

        fn item_url(&self, item: &ItemRecord, _absolute: bool) -> String {
            format!("/panel/{}", item.id)
        }

        fn drag_text(&self, item: &ItemRecord, _absolute: bool) -> String {
            format!("(link: {})", item.id)
        }

        fn image(&self, _item: &ItemRecord, _options: &ImageOptions, _layout: Layout) -> ImageView {
            ImageView {
                src: None,
                icon: "page".into(),
                ratio: "3/2".into(),
                back: "pattern".into(),
                cover: false,
            }
        }
    }

    struct Templates;

    impl Blueprints for Templates {
        fn accepted_mime(&self, _file_template: &str) -> Option<String> {
            None
        }

        fn page_blueprint(&self, template: &str) -> Result<BlueprintInfo, HostError> {
            match template {
                "article" => Ok(BlueprintInfo {
                    name: "pages/article".into(),
                    title: "Article".into(),
                }),
                other => Err(HostError::BlueprintNotFound { name: other.into() }),
            }
        }

        fn page_templates(&self) -> Vec<String> {
            vec!["article".into(), "note".into()]
        }
    }

    fn service() -> SectionService {
        SectionService::new(
            Arc::new(Blog),
            Arc::new(Links),
            Arc::new(Templates),
            Arc::new(Catalog::english()),
        )
    }

    fn ids(view: &PagesView) -> Vec<String> {
        match &view.data {
            SectionData::Items(items) => items.iter().map(|item| item.id.clone()).collect(),
            SectionData::Rows(rows) => rows
                .iter()
                .map(|row| row["id"].as_str().unwrap_or_default().to_string())
                .collect(),
        }
    }

    #[test]
    fn all_status_merges_children_and_drafts() {
        let view = service()
            .pages_view(
                &PagesSectionSettings::new("posts"),
                &ModelRef::page("blog"),
                &SectionRequest::default(),
            )
            .expect("pages view");

        assert_eq!(ids(&view), ["blog/first", "blog/second", "blog/notes", "blog/draft"]);
        assert!(view.options.add);
        assert!(view.options.common.sortable);
        assert_eq!(view.options.common.headline, "Posts");
    }

    #[test]
    fn status_and_templates_filter_the_set() {
        let mut settings = PagesSectionSettings::new("posts");
        settings.status = StatusFilter::Unlisted;
        settings.templates = vec!["article".into()];

        let view = service()
            .pages_view(&settings, &ModelRef::page("blog"), &SectionRequest::default())
            .expect("pages view");

        assert_eq!(ids(&view), ["blog/second"]);
        assert!(!view.options.add);
        assert!(!view.options.common.sortable);
    }

    #[test]
    fn list_items_carry_permissions_and_parent() {
        let mut settings = PagesSectionSettings::new("posts");
        settings.status = StatusFilter::Listed;

        let view = service()
            .pages_view(&settings, &ModelRef::page("blog"), &SectionRequest::default())
            .expect("pages view");

        let SectionData::Items(items) = &view.data else {
            panic!("expected list items");
        };
        let first = &items[0];
        assert_eq!(first.text, "First");
        assert_eq!(first.parent.as_deref(), Some("blog"));
        assert_eq!(first.drag_text, "(link: blog/first)");
        assert!(first.permissions.sort);
        assert!(first.permissions.change_title);
        assert!(!first.permissions.change_slug);
        assert_eq!(first.status, Some(PageStatus::Listed));
    }

    #[test]
    fn table_rows_add_title_link_and_custom_cells() {
        let mut settings = PagesSectionSettings::new("posts");
        settings.status = StatusFilter::Listed;
        settings.options.layout = Layout::Table;
        settings.options.columns.insert("author".into(), Default::default());

        let view = service()
            .pages_view(&settings, &ModelRef::page("blog"), &SectionRequest::default())
            .expect("pages view");

        let SectionData::Rows(rows) = &view.data else {
            panic!("expected table rows");
        };
        assert_eq!(rows[0]["title"]["text"], "First");
        assert_eq!(rows[0]["title"]["href"], "/panel/blog/first");
        assert_eq!(rows[0]["author"], "Ada");
        assert!(view.options.common.columns.contains_key("authorCell"));
        assert!(view.options.common.columns.contains_key("flag"));
    }

    #[test]
    fn limits_paginate_and_validate_against_the_total() {
        let mut settings = PagesSectionSettings::new("posts");
        settings.options.limit = std::num::NonZeroU32::new(2).expect("non-zero");
        settings.options.bounds = ValidationBounds::new(Some(5), Some(4));

        let view = service()
            .pages_view(&settings, &ModelRef::page("blog"), &SectionRequest::new(2, None))
            .expect("pages view");

        assert_eq!(ids(&view), ["blog/notes", "blog/draft"]);
        assert_eq!(view.pagination.total, 4);
        assert_eq!(view.pagination.pages, 2);
        assert!(!view.options.add);
        let message = &view.errors["posts"].message;
        assert!(message.contains_key("min"));
        assert!(!message.contains_key("max"));
    }

    #[test]
    fn flipped_sections_are_not_sortable() {
        let mut settings = PagesSectionSettings::new("posts");
        settings.options.flip = true;

        let view = service()
            .pages_view(&settings, &ModelRef::page("blog"), &SectionRequest::default())
            .expect("pages view");

        assert_eq!(ids(&view)[0], "blog/draft");
        assert!(!view.options.common.sortable);
    }

    #[test]
    fn user_parent_is_rejected() {
        let error = service()
            .pages_view(
                &PagesSectionSettings::new("posts"),
                &ModelRef::user("ada"),
                &SectionRequest::default(),
            )
            .expect_err("users have no pages");
        assert!(matches!(error, SectionError::InvalidParent { .. }));
    }

    #[test]
    fn creation_blueprints_fall_back_to_generated_titles() {
        let mut settings = PagesSectionSettings::new("posts");
        let service = service();

        let all = service.creation_blueprints(&settings);
        assert_eq!(
            all,
            vec![
                BlueprintInfo {
                    name: "article".into(),
                    title: "Article".into()
                },
                BlueprintInfo {
                    name: "note".into(),
                    title: "Note".into()
                },
            ]
        );

        settings.templates = vec!["note".into()];
        settings.create = CreateOption::Templates(vec!["article".into()]);
        let names: Vec<_> = service
            .creation_blueprints(&settings)
            .into_iter()
            .map(|blueprint| blueprint.name)
            .collect();
        assert_eq!(names, ["article"]);

        settings.create = CreateOption::Disabled;
        let names: Vec<_> = service
            .creation_blueprints(&settings)
            .into_iter()
            .map(|blueprint| blueprint.name)
            .collect();
        assert_eq!(names, ["note"]);
    }
}
