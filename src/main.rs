use std::{process, sync::Arc};

use podium::{
    application::error::AppError,
    application::page::PageService,
    application::speakers::{SpeakerService, TalksSource},
    cache::{SpeakerCache, SpeakerListKey},
    config,
    infra::{content, error::InfraError, http, pretalx::PretalxClient, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Speakers(args) => run_speakers(settings, args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let speakers = build_speaker_service(&settings)?;
    let page = load_page_service(&settings)?;

    let router = http::build_router(http::HttpState { speakers, page });

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "podium::startup",
        addr = %settings.server.addr,
        event = %settings.pretalx.event_slug,
        "Serving conference content"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn run_speakers(
    settings: config::Settings,
    args: config::SpeakersArgs,
) -> Result<(), AppError> {
    let service = build_speaker_service(&settings)?;
    let key = if args.keynotes {
        SpeakerListKey::Keynotes
    } else {
        SpeakerListKey::Speakers
    };

    let speakers = service
        .resolve(key)
        .await
        .map_err(|err| AppError::unexpected(err.to_string()))?;
    let rendered = serde_json::to_string_pretty(&speakers)
        .map_err(|err| AppError::unexpected(err.to_string()))?;
    println!("{rendered}");

    Ok(())
}

fn build_speaker_service(settings: &config::Settings) -> Result<Arc<SpeakerService>, AppError> {
    let source: Option<Arc<dyn TalksSource>> = match settings.pretalx.api_token.as_ref() {
        Some(token) => {
            let client = PretalxClient::new(&settings.pretalx.base_url, token.clone())
                .map_err(|err| {
                    AppError::unexpected(format!("failed to build pretalx client: {err}"))
                })?;
            Some(Arc::new(client))
        }
        None => {
            info!(
                target = "podium::startup",
                "No pretalx API token configured; speaker lists will be empty"
            );
            None
        }
    };

    Ok(Arc::new(SpeakerService::new(
        source,
        Arc::new(SpeakerCache::new()),
        settings.pretalx.event_slug.clone(),
        settings.cache.speaker_ttl,
    )))
}

fn load_page_service(settings: &config::Settings) -> Result<PageService, AppError> {
    match settings.content.file.as_ref() {
        Some(path) => {
            info!(
                target = "podium::startup",
                path = %path.display(),
                "Loading page content"
            );
            let page = content::load_page(path).map_err(AppError::from)?;
            Ok(PageService::new(Some(page)))
        }
        None => {
            info!(
                target = "podium::startup",
                "No content file configured; page endpoints will return 404"
            );
            Ok(PageService::new(None))
        }
    }
}
