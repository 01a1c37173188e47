use crate::application::dto::ResolveResponse;
use crate::shared::Result;

/// ResolutionFormatter port for rendering resolution results
///
/// This port abstracts the output format (JSON, status-style text, etc.).
pub trait ResolutionFormatter {
    /// Formats the resolution results of a batch
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, response: &ResolveResponse) -> Result<String>;
}
