use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Line-oriented destination for progress notes emitted during a load
///
/// Observability only: nothing about a load's result depends on the sink.
pub trait DiagnosticSink {
    fn note(&mut self, line: &str);
}

/// The default sink, one line per note to stderr
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn note(&mut self, line: &str) {
        let _ = writeln!(io::stderr(), "{}", line);
    }
}

/// Discards every note
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn note(&mut self, _line: &str) {}
}

/// Collects notes in memory so tests can assert on them
///
/// Clones share one buffer, so a clone boxed into a `Source` can still be
/// read after the load consumed it.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Snapshot of every note recorded so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn note(&mut self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
