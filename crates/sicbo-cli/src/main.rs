use std::sync::Arc;

use anyhow::Context;
use sicbo_core::impls::{HttpFeed, RandomTieBreaker};
use sicbo_core::ports::SystemClock;
use sicbo_core::{Config, Ingestor, Predictor, Store};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // (A) 設定
    let config = Config::from_env().context("invalid configuration")?;
    info!(
        feed_url = %config.feed_url,
        max_history = config.max_history.get(),
        "starting sicbo"
    );

    // (B) 共有状態と取り込みループ（唯一の書き手）
    let store = Store::new(config.source_id.clone(), config.max_history);
    let feed = HttpFeed::new(&config.feed_url, config.feed_timeout, config.feed_retry())
        .context("failed to build feed client")?;
    let ingestor = Ingestor::new(
        Arc::new(feed),
        store.clone(),
        Predictor::new(Arc::new(RandomTieBreaker)),
        Arc::new(SystemClock),
        config.loop_timing(),
    );
    tokio::spawn(ingestor.run());

    // (C) クエリ API（読み手）
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "query server listening");
    axum::serve(listener, routes::router(store))
        .await
        .context("query server failed")?;
    Ok(())
}
