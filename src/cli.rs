use std::path::PathBuf;

use clap::Parser;

/// dendron-quartz-export - publish a Dendron vault as Quartz content
///
/// ```bash
/// dendron-quartz-export -c export.yaml              # Export using config roots
/// dendron-quartz-export -c export.yaml --dry-run    # Validate without writing
/// dendron-quartz-export -c export.yaml --json       # Machine readable report
/// dendron-quartz-export -c export.yaml --source ~/vault --dest ./content
/// ```
///
/// Only notes with `publish: true` in their frontmatter are exported.
/// Set `RUST_LOG` to control log output (default: info).
#[derive(Parser, Debug)]
#[command(name = "dendron-quartz-export")]
#[command(version)]
#[command(about = "Export publishable Dendron notes into a Quartz content tree")]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, alias = "cfg", value_name = "PATH")]
    pub config: PathBuf,

    /// Source vault root (overrides dendron_notes_path)
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Export root (overrides export_path)
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Run every stage but write no notes and copy no assets
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the run report as JSON
    #[arg(short = 'j', long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::parse_from([
            "dendron-quartz-export",
            "--cfg",
            "export.yaml",
            "--source",
            "vault",
            "--dest",
            "out",
            "--dry-run",
        ]);
        assert_eq!(cli.config, PathBuf::from("export.yaml"));
        assert_eq!(cli.source, Some(PathBuf::from("vault")));
        assert_eq!(cli.dest, Some(PathBuf::from("out")));
        assert!(cli.dry_run);
        assert!(!cli.json);
    }

    #[test]
    fn test_config_is_required() {
        assert!(Cli::try_parse_from(["dendron-quartz-export"]).is_err());
    }
}
