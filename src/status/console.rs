//! Terminal rendering of status events

use std::io::Write;
use std::str::FromStr;

use tracing::warn;

use crate::events::StatusEvent;

use super::dispatch::StatusSink;

/// Line format for printed status events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFormat {
    /// `[State] message`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for StatusFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(StatusFormat::Text),
            "json" => Ok(StatusFormat::Json),
            other => Err(format!("unknown status format {:?} (expected text or json)", other)),
        }
    }
}

/// Writes each status event as one line
pub struct ConsoleSink<W> {
    out: W,
    format: StatusFormat,
}

impl ConsoleSink<std::io::Stdout> {
    pub fn stdout(format: StatusFormat) -> Self {
        Self::new(std::io::stdout(), format)
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, format: StatusFormat) -> Self {
        Self { out, format }
    }

    fn write_event(&mut self, event: &StatusEvent) -> std::io::Result<()> {
        match self.format {
            StatusFormat::Text => writeln!(self.out, "{}", event)?,
            StatusFormat::Json => {
                serde_json::to_writer(&mut self.out, event)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write + Send + 'static> StatusSink for ConsoleSink<W> {
    fn deliver(&mut self, event: &StatusEvent) {
        if let Err(e) = self.write_event(event) {
            warn!(?e, "failed to write status event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lines() {
        let mut sink = ConsoleSink::new(Vec::new(), StatusFormat::Text);
        sink.deliver(&StatusEvent::listening_for_hotword());
        sink.deliver(&StatusEvent::stopped());

        let out = String::from_utf8(sink.out).unwrap();
        assert_eq!(
            out,
            "[ListeningHotword] Listening for Hotword ...\n[Stopped] Idle\n"
        );
    }

    #[test]
    fn test_json_lines() {
        let mut sink = ConsoleSink::new(Vec::new(), StatusFormat::Json);
        sink.deliver(&StatusEvent::secondary_failed());

        let out = String::from_utf8(sink.out).unwrap();
        let event: StatusEvent = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(event, StatusEvent::secondary_failed());
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<StatusFormat>(), Ok(StatusFormat::Json));
        assert!("yaml".parse::<StatusFormat>().is_err());
    }
}
