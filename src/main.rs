mod cli;

use bit_deps::adapters::outbound::console::StderrProgressReporter;
use bit_deps::adapters::outbound::filesystem::FileSystemSnapshotReader;
use bit_deps::adapters::outbound::workspace::{
    CachingPackageResolver, InMemoryBitmap, SnapshotPackageResolver, SnapshotPolicyProvider,
};
use bit_deps::application::dto::ResolveRequest;
use bit_deps::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use bit_deps::application::use_cases::ResolveDependenciesUseCase;
use bit_deps::config::load_resolver_config;
use bit_deps::ports::outbound::WorkspaceSnapshotReader;
use bit_deps::shared::error::ExitCode;
use bit_deps::shared::Result;
use cli::Args;
use std::io::IsTerminal;
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    // clap exits with ExitCode::InvalidArguments (2) on its own
    let args = Args::parse_args();

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    // Read the workspace snapshot and the configuration
    let snapshot = FileSystemSnapshotReader::new().read_snapshot(&args.snapshot)?;
    let discovery_dir = args
        .snapshot
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let config = load_resolver_config(args.config.as_deref(), discovery_dir)?;

    // Create adapters (Dependency Injection)
    let bitmap = InMemoryBitmap::new(snapshot.bitmap_entries());
    let packages = CachingPackageResolver::new(SnapshotPackageResolver::new(
        snapshot.installed_packages.clone(),
    ));
    let policies = SnapshotPolicyProvider::new(config.workspace_policy, config.core_aspects)
        .with_snapshot(&snapshot);
    let progress_reporter = StderrProgressReporter::new();

    // Create use case with injected dependencies
    let use_case = ResolveDependenciesUseCase::new(
        bitmap,
        packages,
        policies,
        config.overrides,
        progress_reporter,
    );

    let request = ResolveRequest::new(snapshot.components)
        .with_component_patterns(args.components)
        .with_concurrency(args.concurrency);
    let response = use_case.execute(request).await?;

    eprintln!("{}", FormatterFactory::progress_message(args.format));
    let colored = args.output.is_none() && std::io::stdout().is_terminal();
    let formatter = FormatterFactory::create(args.format, colored);
    let formatted_output = formatter.format(&response)?;

    let presenter = PresenterFactory::create(PresenterType::from_output(args.output));
    presenter.present(&formatted_output)?;

    if args.fail_on_issues && response.has_issues() {
        Ok(ExitCode::IssuesDetected)
    } else {
        Ok(ExitCode::Success)
    }
}
