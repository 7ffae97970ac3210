//! Example showing a conditional download refreshed twice
//!
//! The second run sends the stored ETag and Last-Modified back to the
//! server, which usually answers `304 Not Modified`.
//!
//! Run with `RUST_LOG=fetchkit=debug` to see the conditional headers.

use color_eyre::Result;
use fetchkit::dest::FileDest;
use fetchkit::download::DownloadActionBuilder;
use fetchkit::http::{create_engine, EngineKind, HttpClientConfig};
use fetchkit::progress::{ProgressBarOpts, StyleOptions};
use reqwest::Url;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let url = Url::parse("https://www.rust-lang.org/static/images/rust-logo-blk.svg")?;
    let engine = create_engine(EngineKind::Blocking, &HttpClientConfig::default())?;

    let mut action = DownloadActionBuilder::new(engine)
        .url(url.as_str())
        .dest(FileDest::in_directory("downloads", &url)?)
        .use_etag(true)
        .only_if_modified(true)
        .user_agent(concat!("fetchkit-demo/", env!("CARGO_PKG_VERSION")))
        .style_options(StyleOptions::new(
            ProgressBarOpts::with_pip_style(),
            ProgressBarOpts::spinner(),
        ))
        .build();

    for round in 1..=2 {
        let summary = action.execute()?;
        println!(
            "round {}: HTTP {} -> {:?} ({} bytes)",
            round,
            summary.statuscode(),
            summary.status(),
            summary.size()
        );
    }

    Ok(())
}
