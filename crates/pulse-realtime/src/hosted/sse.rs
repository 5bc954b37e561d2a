//! Incremental parser for `text/event-stream` bodies.

/// A single server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SseEvent {
    /// Value of the `event:` field, if any.
    pub event: Option<String>,
    /// Joined `data:` lines.
    pub data: String,
}

/// Parser fed with raw body chunks as they arrive.
///
/// Events may be split across chunk boundaries, so unfinished lines stay
/// buffered until the next chunk completes them. CRLF and bare LF line
/// endings are both accepted.
#[derive(Debug, Default)]
pub(crate) struct SseParser {
    buf: Vec<u8>,
    event: Option<String>,
    data_lines: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every event it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buf.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let mut line = String::from_utf8_lossy(&raw).into_owned();
            while line.ends_with('\n') || line.ends_with('\r') {
                line.pop();
            }
            if let Some(event) = self.consume_line(&line) {
                events.push(event);
            }
        }

        events
    }

    fn consume_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            // Blank line terminates the pending event
            if self.data_lines.is_empty() {
                self.event = None;
                return None;
            }
            let data = self.data_lines.join("\n");
            self.data_lines.clear();
            return Some(SseEvent {
                event: self.event.take(),
                data,
            });
        }

        // Lines starting with a colon are comments (used as keep-alives)
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data_lines.push(value.to_string()),
            // id and retry are not used by this consumer
            _ => {}
        }

        None
    }
}
