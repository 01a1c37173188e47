/// Console adapters for user-facing diagnostics on stderr
mod progress_reporter;

pub use progress_reporter::StderrProgressReporter;
