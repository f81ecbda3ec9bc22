use anyhow::{Context, Result};
use clap::Parser;
use dendron_quartz_export::{Cli, Config, Exporter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load(&cli.config)?;
    if let Some(source) = cli.source {
        config = config.with_source_root(source);
    }
    if let Some(dest) = cli.dest {
        config = config.with_export_root(dest);
    }

    let report = Exporter::new(config)
        .dry_run(cli.dry_run)
        .run()
        .context("export notes")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.dry_run {
        println!(
            "would export {} notes, copy {} assets",
            report.written.len(),
            report.assets.len()
        );
    } else {
        println!(
            "exported {} notes, copied {} assets",
            report.written.len(),
            report.assets.len()
        );
    }

    Ok(())
}
