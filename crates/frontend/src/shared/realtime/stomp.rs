//! Minimal STOMP 1.2 frame codec
//!
//! Only the client side of the protocol that the jobs channel needs:
//! CONNECT / SUBSCRIBE / UNSUBSCRIBE / DISCONNECT out, CONNECTED / MESSAGE /
//! RECEIPT / ERROR in. Heart-beat EOLs between frames are skipped.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Connect,
    Connected,
    Subscribe,
    Unsubscribe,
    Disconnect,
    Message,
    Receipt,
    Error,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::Connected => "CONNECTED",
            Command::Subscribe => "SUBSCRIBE",
            Command::Unsubscribe => "UNSUBSCRIBE",
            Command::Disconnect => "DISCONNECT",
            Command::Message => "MESSAGE",
            Command::Receipt => "RECEIPT",
            Command::Error => "ERROR",
        }
    }

    fn parse(line: &str) -> Option<Self> {
        match line {
            "CONNECT" | "STOMP" => Some(Command::Connect),
            "CONNECTED" => Some(Command::Connected),
            "SUBSCRIBE" => Some(Command::Subscribe),
            "UNSUBSCRIBE" => Some(Command::Unsubscribe),
            "DISCONNECT" => Some(Command::Disconnect),
            "MESSAGE" => Some(Command::Message),
            "RECEIPT" => Some(Command::Receipt),
            "ERROR" => Some(Command::Error),
            _ => None,
        }
    }

    /// CONNECT/CONNECTED headers are never escaped (STOMP 1.2 §"Value Encoding")
    fn escapes_headers(&self) -> bool {
        !matches!(self, Command::Connect | Command::Connected)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StompError {
    #[error("unknown STOMP command: {0}")]
    UnknownCommand(String),
    #[error("malformed header line: {0}")]
    MalformedHeader(String),
    #[error("frame has no header terminator")]
    Truncated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Frame {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// First value of a header; repeated headers keep the first occurrence
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn connect(token: &str) -> Self {
        Frame::new(Command::Connect)
            .header("accept-version", "1.2")
            .header("heart-beat", "0,0")
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn subscribe(id: &str, destination: &str) -> Self {
        Frame::new(Command::Subscribe)
            .header("id", id)
            .header("destination", destination)
            .header("ack", "auto")
    }

    pub fn unsubscribe(id: &str) -> Self {
        Frame::new(Command::Unsubscribe).header("id", id)
    }

    pub fn disconnect() -> Self {
        Frame::new(Command::Disconnect)
    }

    pub fn encode(&self) -> String {
        let escape = self.command.escapes_headers();
        let mut out = String::with_capacity(64 + self.body.len());
        out.push_str(self.command.as_str());
        out.push('\n');
        for (name, value) in &self.headers {
            if escape {
                out.push_str(&escape_header(name));
                out.push(':');
                out.push_str(&escape_header(value));
            } else {
                out.push_str(name);
                out.push(':');
                out.push_str(value);
            }
            out.push('\n');
        }
        if !self.body.is_empty() {
            out.push_str(&format!("content-length:{}\n", self.body.len()));
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push('\0');
        out
    }

    fn decode(raw: &str) -> Result<Self, StompError> {
        let (head, body) = match raw.find("\n\n") {
            Some(pos) => (&raw[..pos], &raw[pos + 2..]),
            None => match raw.find("\r\n\r\n") {
                Some(pos) => (&raw[..pos], &raw[pos + 4..]),
                None => return Err(StompError::Truncated),
            },
        };

        let mut lines = head.lines();
        let command_line = lines.next().unwrap_or_default().trim_end_matches('\r');
        let command = Command::parse(command_line)
            .ok_or_else(|| StompError::UnknownCommand(command_line.to_string()))?;

        let unescape = command.escapes_headers();
        let mut headers = Vec::new();
        for line in lines {
            let line = line.trim_end_matches('\r');
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| StompError::MalformedHeader(line.to_string()))?;
            if unescape {
                headers.push((unescape_header(name), unescape_header(value)));
            } else {
                headers.push((name.to_string(), value.to_string()));
            }
        }

        Ok(Frame {
            command,
            headers,
            body: body.to_string(),
        })
    }
}

/// Split a WebSocket text payload into frames.
///
/// A payload may carry several NUL-terminated frames and heart-beat EOLs.
pub fn parse_frames(payload: &str) -> Vec<Result<Frame, StompError>> {
    payload
        .split('\0')
        .map(|chunk| chunk.trim_start_matches(['\r', '\n']))
        .filter(|chunk| !chunk.is_empty())
        .map(Frame::decode)
        .collect()
}

fn escape_header(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ':' => out.push_str("\\c"),
            other => out.push(other),
        }
    }
    out
}

fn unescape_header(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('c') => out.push(':'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_frame_carries_bearer() {
        let encoded = Frame::connect("abc.def").encode();
        assert!(encoded.starts_with("CONNECT\n"));
        assert!(encoded.contains("\nAuthorization:Bearer abc.def\n"));
        assert!(encoded.ends_with("\n\n\0"));
    }

    #[test]
    fn test_parse_message_frame() {
        let payload = "MESSAGE\ndestination:/user/5/jobs\nsubscription:sub-3\nmessage-id:42\ncontent-type:application/json\n\n{\"action\":\"deleted\"}\0";
        let frames = parse_frames(payload);
        assert_eq!(frames.len(), 1);
        let frame = frames[0].as_ref().unwrap();
        assert_eq!(frame.command, Command::Message);
        assert_eq!(frame.get("subscription"), Some("sub-3"));
        assert_eq!(frame.body, "{\"action\":\"deleted\"}");
    }

    #[test]
    fn test_heartbeats_and_multiple_frames() {
        let payload = "\n\nCONNECTED\nversion:1.2\n\n\0\nRECEIPT\nreceipt-id:7\n\n\0\n";
        let frames: Vec<_> = parse_frames(payload)
            .into_iter()
            .map(|f| f.unwrap().command)
            .collect();
        assert_eq!(frames, vec![Command::Connected, Command::Receipt]);
        assert!(parse_frames("\n").is_empty());
    }

    #[test]
    fn test_header_escaping() {
        let frame = Frame::subscribe("sub-1", "/topic/a:b");
        let encoded = frame.encode();
        assert!(encoded.contains("destination:/topic/a\\cb\n"));

        let decoded = parse_frames(&encoded).remove(0).unwrap();
        assert_eq!(decoded.get("destination"), Some("/topic/a:b"));
    }

    #[test]
    fn test_bad_frames_are_reported() {
        assert_eq!(
            parse_frames("HELLO\n\n\0").remove(0),
            Err(StompError::UnknownCommand("HELLO".into()))
        );
        assert_eq!(
            parse_frames("MESSAGE\nno-colon\n\nbody\0").remove(0),
            Err(StompError::MalformedHeader("no-colon".into()))
        );
        assert_eq!(parse_frames("MESSAGE\n").remove(0), Err(StompError::Truncated));
    }
}
