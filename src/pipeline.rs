use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use pagesnap_browser::VisitSession;
use pagesnap_core::config::AppConfig;
use pagesnap_core::cookie_store::{CookieSource, CookieStore};
use pagesnap_core::{targets_from, SnapError, Target};
use pagesnap_imaging::blur_to_jpeg;
use pagesnap_upload::Uploader;

/// Fan out one independent pipeline per target URL over a shared browser,
/// wait for every pipeline to settle, then let the browser go down.
pub async fn run_pipelines(config: AppConfig) -> Result<()> {
    config.validate_for_run()?;

    let targets = targets_from(&config.general.target_urls)?;
    std::fs::create_dir_all(&config.general.output_dir)?;

    let store = Arc::new(CookieStore::load(
        &config.cookies.cache_file,
        config.cookies.cache_enabled,
    )?);
    let uploader = Arc::new(Uploader::new(config.upload.clone())?);
    let session = Arc::new(VisitSession::launch(&config.browser)?);
    let config = Arc::new(config);

    info!(
        targets = targets.len(),
        cache = store.is_enabled(),
        "starting visits"
    );

    let mut handles = Vec::new();
    for target in targets {
        let session = Arc::clone(&session);
        let store = Arc::clone(&store);
        let uploader = Arc::clone(&uploader);
        let config = Arc::clone(&config);

        handles.push(tokio::spawn(async move {
            if let Err(e) = run_one(&target, &session, &store, &uploader, &config).await {
                error!(url = %target.url, "pipeline failed: {}", e);
            }
        }));
    }

    // One URL's failure never aborts the others; the shared browser only
    // goes down after every pipeline has settled.
    for handle in handles {
        let _ = handle.await;
    }

    drop(session);
    info!("browser closed, run complete");
    Ok(())
}

async fn run_one(
    target: &Target,
    session: &VisitSession,
    store: &CookieStore,
    uploader: &Uploader,
    config: &AppConfig,
) -> Result<(), SnapError> {
    let (cookies, source) = store.resolve(&target.domain, &config.cookies.map);
    match source {
        CookieSource::Cache => info!(domain = %target.domain, "using cached cookies"),
        CookieSource::Environment => info!(domain = %target.domain, "using environment cookies"),
        CookieSource::None => {
            warn!(domain = %target.domain, "no cookies found, visiting unauthenticated")
        }
    }

    let output_dir = PathBuf::from(&config.general.output_dir);
    let outcome = session
        .visit(target, &cookies, &config.browser, &config.interact, &output_dir)
        .await?;

    let blurred = target.blurred_path(&output_dir);
    blur_to_jpeg(
        &outcome.screenshot,
        &blurred,
        config.imaging.blur_sigma,
        config.imaging.jpeg_quality,
    )?;

    // An HTTP-level rejection comes back as None and must not stop the
    // cookie write-back; transport errors propagate like any other step.
    if let Some(url) = uploader.upload(&blurred).await? {
        info!(url = %url, "published");
    }

    store.record(&target.domain, outcome.live_cookies).await?;
    if store.is_enabled() {
        info!(domain = %target.domain, "cookies saved");
    }

    Ok(())
}
