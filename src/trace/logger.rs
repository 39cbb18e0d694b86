use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::Path,
    sync::Mutex,
};

use tracing::warn;

use crate::trace::trace::FillTraceEvent;

/// Append-only JSONL sink for fill traces. Failures are logged and
/// swallowed; tracing never affects a fill.
pub struct TraceLogger {
    sink: Option<Mutex<File>>,
}

impl TraceLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self {
                sink: Some(Mutex::new(file)),
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not open trace file");
                Self::disabled()
            }
        }
    }

    /// A logger that drops everything.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn log(&self, event: &FillTraceEvent) {
        let Some(sink) = &self.sink else {
            return;
        };
        if let Err(e) = append(sink, event) {
            warn!(step = event.step, error = %e, "dropped trace event");
        }
    }
}

fn append(sink: &Mutex<File>, event: &FillTraceEvent) -> io::Result<()> {
    let line = serde_json::to_string(event)?;
    let mut file = sink
        .lock()
        .map_err(|_| io::Error::other("trace sink lock poisoned"))?;
    writeln!(file, "{}", line)
}
