use anyhow::Result;
use clap::Parser;
use order_pipeline::cli::{execute_menu, execute_run, Cli, Commands};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        eprintln!("❌ エラー: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // RUST_LOG未指定時はinfo以上を標準エラーへ
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let quiet = args.quiet;
            let summary = execute_run(args).await?;
            if !quiet && summary.dropped_orders > 0 {
                println!(
                    "⚠️  {}個の注文が破棄されました: {}",
                    summary.dropped_orders,
                    summary
                        .dropped_ids
                        .iter()
                        .map(|id| id.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
        Commands::Menu => execute_menu(),
    }

    Ok(())
}
