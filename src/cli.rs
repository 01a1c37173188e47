use clap::Parser;
use std::path::PathBuf;

use bit_deps::application::dto::{OutputFormat, DEFAULT_CONCURRENCY};

/// Resolve the dependencies of workspace components
#[derive(Parser, Debug)]
#[command(name = "bit-deps")]
#[command(version)]
#[command(
    about = "Resolve component dependencies from a workspace snapshot",
    long_about = None
)]
pub struct Args {
    /// Workspace snapshot (JSON) holding the components and their raw dependency trees
    #[arg(short, long, value_name = "FILE")]
    pub snapshot: PathBuf,

    /// Config file (defaults to bit-deps.config.yml next to the snapshot)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Resolve only components matching patterns (supports wildcards: *)
    /// Can be specified multiple times: -C "my.scope/button" -C "utils/*"
    #[arg(short = 'C', long = "component", value_name = "PATTERN")]
    pub components: Vec<String>,

    /// Maximum number of components resolved concurrently
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Exit with code 1 when any resolved component has issues
    #[arg(long)]
    pub fail_on_issues: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_arguments() {
        let args = Args::try_parse_from(["bit-deps", "--snapshot", "snapshot.json"]).unwrap();
        assert_eq!(args.snapshot, PathBuf::from("snapshot.json"));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.concurrency, DEFAULT_CONCURRENCY);
        assert!(args.config.is_none());
        assert!(args.components.is_empty());
        assert!(!args.fail_on_issues);
    }

    #[test]
    fn test_all_arguments() {
        let args = Args::try_parse_from([
            "bit-deps",
            "-s",
            "snapshot.json",
            "--config",
            "custom.yml",
            "--format",
            "TEXT",
            "-o",
            "report.txt",
            "-C",
            "my.scope/button",
            "--component",
            "utils/*",
            "--concurrency",
            "2",
            "--fail-on-issues",
        ])
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("custom.yml")));
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.output, Some(PathBuf::from("report.txt")));
        assert_eq!(args.components, vec!["my.scope/button", "utils/*"]);
        assert_eq!(args.concurrency, 2);
        assert!(args.fail_on_issues);
    }

    #[test]
    fn test_snapshot_is_required() {
        assert!(Args::try_parse_from(["bit-deps"]).is_err());
    }

    #[test]
    fn test_invalid_format() {
        let err = Args::try_parse_from(["bit-deps", "-s", "s.json", "-f", "markdown"]).unwrap_err();
        assert!(err.to_string().contains("Invalid format"));
    }
}
