/// One unit of work handed over by the job queue.
///
/// The queue client owns the concrete type; the executor only reads the
/// identity and payload and reports back through the two `emit_*` methods.
pub trait Job {
    /// Queue-assigned identifier, used for logging.
    fn unique_id(&self) -> &str;

    /// Opaque payload bytes.
    fn payload(&self) -> &[u8];

    /// Report one line of diagnostic output. Called once per line, in order.
    fn emit_warning(&mut self, line: &[u8]);

    /// Report the job's result data. Called at most once.
    fn emit_result(&mut self, data: &[u8]);
}

/// A [`Job`] that records everything it is told.
///
/// Used by the `jobwrap run` command for local execution and by tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedJob {
    id: String,
    payload: Vec<u8>,
    warnings: Vec<Vec<u8>>,
    result: Option<Vec<u8>>,
}

impl RecordedJob {
    #[must_use]
    pub fn new(id: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
            warnings: Vec::new(),
            result: None,
        }
    }

    #[must_use]
    pub fn warnings(&self) -> &[Vec<u8>] {
        &self.warnings
    }

    /// Warnings decoded lossily, for display.
    #[must_use]
    pub fn warning_strings(&self) -> Vec<String> {
        self.warnings
            .iter()
            .map(|w| String::from_utf8_lossy(w).into_owned())
            .collect()
    }

    #[must_use]
    pub fn result(&self) -> Option<&[u8]> {
        self.result.as_deref()
    }
}

impl Job for RecordedJob {
    fn unique_id(&self) -> &str {
        &self.id
    }

    fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn emit_warning(&mut self, line: &[u8]) {
        self.warnings.push(line.to_vec());
    }

    fn emit_result(&mut self, data: &[u8]) {
        self.result = Some(data.to_vec());
    }
}
