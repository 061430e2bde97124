use std::{io::Write, process, sync::Arc};

use panel_sections::{
    application::{
        error::AppError,
        i18n::Catalog,
        query::model_from_path,
        sections::{SectionRequest, SectionService, SectionSettings},
    },
    config::{self, BlueprintsArgs, Command, ContentArgs, PreviewArgs, Settings},
    domain::{entities::ModelRef, types::SectionKind},
    infra::{fixture::ContentFixture, panel::DefaultPanel, telemetry},
};
use serde::Serialize;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

fn main() {
    if let Err(error) = run() {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging)?;

    match cli_args.command {
        Command::Preview(args) => run_preview(&settings, args),
        Command::Blueprints(args) => run_blueprints(&settings, args),
    }
}

struct Context {
    service: SectionService,
    fixture: Arc<ContentFixture>,
}

fn build_context(settings: &Settings, args: &ContentArgs) -> Result<Context, AppError> {
    let fixture = Arc::new(ContentFixture::load(&args.content)?);
    let panel = DefaultPanel::new(settings.panel.base_url.clone())
        .with_slugs(&settings.panel.panel_slug, &settings.panel.api_slug);
    let catalog = Catalog::english().with_locale(settings.panel.locale.clone());

    let service = SectionService::new(
        fixture.clone(),
        Arc::new(panel),
        fixture.clone(),
        Arc::new(catalog),
    );

    Ok(Context { service, fixture })
}

fn section<'a>(settings: &'a Settings, name: &str) -> Result<&'a SectionSettings, AppError> {
    settings
        .section(name)
        .ok_or_else(|| AppError::unknown_section(name))
}

fn host_model(context: &Context, args: &ContentArgs) -> Result<ModelRef, AppError> {
    model_from_path(context.fixture.as_ref(), &args.model)
        .ok_or_else(|| AppError::model_not_found(&args.model))
}

fn run_preview(settings: &Settings, args: PreviewArgs) -> Result<(), AppError> {
    let context = build_context(settings, &args.content)?;
    let model = host_model(&context, &args.content)?;
    let request = SectionRequest::new(args.page, args.query.clone());

    info!(
        target = "panel_sections::preview",
        section = %args.content.section,
        model = %args.content.model,
        page = args.page,
        "building section preview"
    );

    match section(settings, &args.content.section)? {
        SectionSettings::Files(files) => {
            let view = context.service.files_view(files, &model, &request)?;
            print_json(&view, args.pretty)
        }
        SectionSettings::Pages(pages) => {
            let view = context.service.pages_view(pages, &model, &request)?;
            print_json(&view, args.pretty)
        }
    }
}

fn run_blueprints(settings: &Settings, args: BlueprintsArgs) -> Result<(), AppError> {
    let context = build_context(settings, &args.content)?;

    let SectionSettings::Pages(pages) = section(settings, &args.content.section)? else {
        return Err(AppError::wrong_section_kind(
            &args.content.section,
            SectionKind::Pages,
        ));
    };

    let blueprints = context.service.creation_blueprints(pages);
    info!(
        target = "panel_sections::blueprints",
        section = %args.content.section,
        count = blueprints.len(),
        "listing creation blueprints"
    );
    print_json(&blueprints, true)
}

fn print_json(value: &impl Serialize, pretty: bool) -> Result<(), AppError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|err| AppError::unexpected(format!("failed to serialize payload: {err}")))?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")
        .map_err(|err| AppError::unexpected(format!("failed to write payload: {err}")))
}
