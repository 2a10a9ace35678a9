//! Entry point: loads settings and bundles, then serves JSON-lines commands on stdio.

use std::path::PathBuf;
use std::sync::Arc;

use simple_i18n::config::ConfigManager;
use simple_i18n::server::{
    Session,
    serve,
};
use simple_i18n::{
    bundle,
    instance,
};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout はレスポンス専用
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let workspace_root =
        std::env::args_os().nth(1).map(PathBuf::from).or_else(|| std::env::current_dir().ok());

    let config = ConfigManager::load(workspace_root)?;
    tracing::info!(source = %config.source(), "Settings loaded");

    let i18n = instance(config.settings().clone());
    if let Some(root) = config.workspace_root() {
        bundle::load_bundles(&i18n, root, &i18n.settings().bundles).await?;
    }

    let session = Session::new(Arc::clone(&i18n));
    serve(&session, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;

    Ok(())
}
