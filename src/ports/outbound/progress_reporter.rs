/// ProgressReporter port for user-facing diagnostics
///
/// Batch resolution reports what it is doing through this port, keeping
/// stdout free for the formatted results.
pub trait ProgressReporter {
    /// Reports an informational message
    fn report(&self, message: &str);

    /// Reports how many components of a batch are resolved
    ///
    /// # Arguments
    /// * `current` - Components resolved so far
    /// * `total` - Components in the batch
    /// * `message` - Optional label, usually the component id
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a warning or a failure
    fn report_error(&self, message: &str);

    /// Reports the end of an operation
    fn report_completion(&self, message: &str);
}
