use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{debug, instrument};

use super::{
    FilesSectionSettings, METRIC_BUILD_MS, METRIC_VIEWS_TOTAL, SectionRequest, SectionService,
};
use crate::application::assemble::{UploadTarget, parent_link, sortable, upload};
use crate::application::collection::ItemSet;
use crate::application::columns::append_custom_cells;
use crate::application::error::SectionError;
use crate::application::ordering::order;
use crate::application::pagination::{PageRequest, paginate};
use crate::application::query::{active_search, parent_model, resolve_files};
use crate::application::validate::validate;
use crate::domain::entities::ModelRef;
use crate::domain::template::render_safe;
use crate::domain::types::{Layout, SectionKind};
use crate::presentation::views::{
    FileItemView, FilesOptions, FilesView, LinkCell, SectionData, TableRow,
};

impl SectionService {
    /// Build the payload of a files section hosted by `model`.
    #[instrument(skip(self, settings), fields(section = %settings.options.name))]
    pub fn files_view(
        &self,
        settings: &FilesSectionSettings,
        model: &ModelRef,
        request: &SectionRequest,
    ) -> Result<FilesView, SectionError> {
        let started_at = Instant::now();
        let options = &settings.options;
        let translator = self.translator.as_ref();

        let parent = parent_model(
            self.repo.as_ref(),
            model,
            options.parent.as_deref(),
            &options.name,
            SectionKind::Files,
        )?;

        let search = active_search(options.search, request.query.as_deref());
        let sort = options.sort_spec();
        let files = resolve_files(
            self.repo.as_ref(),
            self.search.as_ref(),
            &parent,
            settings.template.as_deref(),
            search.as_deref(),
        );
        let files = order(files, &sort, SectionKind::Files);
        let total = files.len();
        let slice = paginate(files, PageRequest::new(request.page, options.limit));

        let headline = options.headline(translator);
        let errors = validate(
            total,
            options.bounds,
            &options.name,
            &headline,
            SectionKind::Files,
            translator,
        );
        let sortable = sortable(options.sortable, request.query.as_deref(), &sort);

        let data = if options.layout == Layout::Table {
            SectionData::Rows(self.file_rows(settings, &slice.items)?)
        } else {
            SectionData::Items(self.file_items(settings, model, &parent, &slice.items))
        };

        let accept = settings
            .template
            .as_deref()
            .and_then(|template| self.blueprints.accepted_mime(template));
        let api_url = self.panel.api_url(&parent, true);
        let upload = upload(
            options.bounds,
            total,
            UploadTarget {
                accept: accept.clone(),
                api: format!("{api_url}/files"),
                template: settings.template.clone(),
                sortable,
            },
        );
        let link = parent_link(
            &self.panel.model_url(model, true),
            self.panel.model_url(&parent, true),
        );

        counter!(METRIC_VIEWS_TOTAL, "kind" => SectionKind::Files.as_str()).increment(1);
        histogram!(METRIC_BUILD_MS, "kind" => SectionKind::Files.as_str())
            .record(started_at.elapsed().as_secs_f64() * 1000.0);
        debug!(
            target = "panel_sections::sections::files",
            total,
            shown = data.len(),
            errors = errors.len(),
            "files section built"
        );

        Ok(FilesView {
            data,
            errors,
            options: FilesOptions {
                accept,
                api_url,
                common: options.common(
                    SectionKind::Files,
                    headline,
                    link,
                    request.query.clone(),
                    sortable,
                    translator,
                ),
                upload,
            },
            pagination: slice.pagination,
        })
    }

    fn file_items(
        &self,
        settings: &FilesSectionSettings,
        model: &ModelRef,
        parent: &ModelRef,
        files: &ItemSet,
    ) -> Vec<FileItemView> {
        let options = &settings.options;
        let translator = self.translator.as_ref();
        let text = options.text_template(SectionKind::Files, translator);
        let info = options.info_template(translator);
        // Files of another model need absolute drag text.
        let absolute_drag = model != parent;

        files
            .iter()
            .map(|file| {
                let attributes = file.file.as_ref();
                FileItemView {
                    drag_text: self.panel.drag_text(file, absolute_drag),
                    extension: attributes.map(|a| a.extension()).unwrap_or_default(),
                    filename: file.filename().unwrap_or_default().to_string(),
                    id: file.id.clone(),
                    image: options
                        .image
                        .as_ref()
                        .map(|image| self.panel.image(file, image, options.layout)),
                    info: info
                        .as_deref()
                        .map(|info| render_safe(info, file))
                        .unwrap_or_default(),
                    link: self.panel.item_url(file, true),
                    mime: attributes.and_then(|a| a.mime()),
                    parent: self.panel.model_path(&file.parent),
                    template: file.template.clone(),
                    text: render_safe(&text, file),
                    url: attributes.map(|a| a.url.clone()).unwrap_or_default(),
                }
            })
            .collect()
    }

    fn file_rows(
        &self,
        settings: &FilesSectionSettings,
        files: &ItemSet,
    ) -> Result<Vec<TableRow>, SectionError> {
        let options = &settings.options;
        let translator = self.translator.as_ref();
        let text = options.text_template(SectionKind::Files, translator);
        let info = options.info_template(translator);

        files
            .iter()
            .map(|file| {
                let link = self.panel.item_url(file, true);
                let mut row = TableRow::new();
                row.insert(
                    "filename".into(),
                    serde_json::to_value(LinkCell {
                        text: render_safe(&text, file),
                        href: link.clone(),
                    })?,
                );
                row.insert("id".into(), file.id.clone().into());
                row.insert(
                    "image".into(),
                    serde_json::to_value(
                        options
                            .image
                            .as_ref()
                            .map(|image| self.panel.image(file, image, Layout::List)),
                    )?,
                );
                row.insert(
                    "info".into(),
                    info.as_deref()
                        .map(|info| render_safe(info, file))
                        .unwrap_or_default()
                        .into(),
                );
                row.insert("permissions".into(), serde_json::to_value(&file.permissions)?);
                row.insert("link".into(), link.into());
                append_custom_cells(&mut row, file, &options.columns);
                Ok(row)
            })
            .collect()
    }
}
