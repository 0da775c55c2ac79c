//! Caller-supplied progress output.
//!
//! Provisioning reports human-readable status lines so an interactive
//! caller can show live progress. The sink is separate from `tracing`,
//! which still receives structured events.

use std::io::Write;

/// Receives one progress line at a time.
pub trait ProgressSink: Send {
    fn line(&mut self, line: &str);
}

impl ProgressSink for Vec<String> {
    fn line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Discards every line.
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn line(&mut self, _line: &str) {}
}

/// Writes each line, newline-terminated, to an [`std::io::Write`].
///
/// Write failures are logged and otherwise ignored: losing progress output
/// must not fail a provisioning call.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ProgressSink for WriterSink<W> {
    fn line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.writer, "{line}").and_then(|()| self.writer.flush()) {
            tracing::warn!(error = %e, "Failed to write progress line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_lines() {
        let mut sink: Vec<String> = Vec::new();
        sink.line("one");
        sink.line("two");
        assert_eq!(sink, ["one", "two"]);
    }

    #[test]
    fn writer_sink_terminates_lines() {
        let mut sink = WriterSink::new(Vec::<u8>::new());
        sink.line("starting");
        sink.line("done");
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "starting\ndone\n");
    }
}
