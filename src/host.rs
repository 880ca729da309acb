/// Abstract capability substituted for `java.io.PrintStream` (§4.I).
/// Implementations decide where the text actually goes.
pub trait PrintSink {
    fn write(&mut self, text: &str);
    fn writeln(&mut self, text: &str);
}

/// Writes to the process's real standard output, used by the CLI.
#[derive(Default)]
pub struct StdoutSink;

impl PrintSink for StdoutSink {
    fn write(&mut self, text: &str) {
        use std::io::Write;
        print!("{text}");
        let _ = std::io::stdout().flush();
    }

    fn writeln(&mut self, text: &str) {
        println!("{text}");
    }
}

/// Captures output in memory instead of touching process stdout, so tests
/// can assert on what an interpreted program printed.
#[derive(Default)]
pub struct RecordingSink {
    pub buffer: String,
}

impl PrintSink for RecordingSink {
    fn write(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn writeln(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_appends_newline_only_on_writeln() {
        let mut sink = RecordingSink::default();
        sink.write("a");
        sink.writeln("b");
        sink.write("c");
        assert_eq!(sink.buffer, "ab\nc");
    }
}
