use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eventdesk::cache::QueryCache;
use eventdesk::cli::Cli;
use eventdesk::commands::{self, Output};
use eventdesk::config::Config;
use eventdesk::provider::Provider;
use eventdesk::services::{ServiceContext, Services};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventdesk=info,eventdesk_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();

    let provider = if cli.static_data {
        tracing::info!("Using bundled demo data");
        Provider::in_memory(&config)
    } else {
        Provider::http(&config, cli.preview)
    };

    let cache = QueryCache::new(config.query_options());
    let gc = cache.spawn_gc(config.gc_interval());

    let ctx = ServiceContext::new(provider.source, provider.manager, cache)
        .with_content_types(config.content_types.clone())
        .with_page_size(config.page_size)
        .with_fallback(config.read_fallback);
    let services = Services::new(ctx);

    let out = Output {
        format: cli.format,
        quiet: cli.quiet,
    };
    let result = commands::run(cli.command, &services, out).await;

    gc.abort();
    result
}
