use crate::adapters::outbound::formatters::{JsonFormatter, TextFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::ResolutionFormatter;

/// Factory for creating resolution report formatters
///
/// Selects the formatter adapter for an output format, keeping that choice
/// out of the CLI and the use case.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Arguments
    /// * `format` - The output format to create a formatter for
    /// * `colored` - Whether text output may use ANSI colors; ignored for JSON
    ///
    /// # Examples
    /// ```
    /// use bit_deps::application::dto::OutputFormat;
    /// use bit_deps::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Json, false);
    /// ```
    pub fn create(format: OutputFormat, colored: bool) -> Box<dyn ResolutionFormatter> {
        match format {
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::Text if colored => Box::new(TextFormatter::with_colors()),
            OutputFormat::Text => Box::new(TextFormatter::new()),
        }
    }

    /// Returns the progress message for the specified output format
    ///
    /// # Examples
    /// ```
    /// use bit_deps::application::dto::OutputFormat;
    /// use bit_deps::application::factories::FormatterFactory;
    ///
    /// let message = FormatterFactory::progress_message(OutputFormat::Json);
    /// assert_eq!(message, "📝 Generating JSON resolution report...");
    /// ```
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Json => "📝 Generating JSON resolution report...",
            OutputFormat::Text => "📝 Generating status report...",
        }
    }
}
