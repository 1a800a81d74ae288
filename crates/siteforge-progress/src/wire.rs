//! `CHAIN:<json>` encoding of a [`GenerationLog`].
//!
//! The payload is `{"log": [...steps], "isComplete": bool}`. Decoders locate
//! the prefix by substring search and also accept bare JSON that starts with
//! `{"log":`. [`LogStreamDecoder`] reconstructs steps from arbitrary byte
//! chunks and yields each step as soon as its object closes.

use serde::Serialize;
use tracing::debug;

use siteforge_utils::WireError;

use crate::log::GenerationLog;
use crate::step::GenerationLogStep;

pub const WIRE_PREFIX: &str = "CHAIN:";

const BARE_PAYLOAD_START: &str = r#"{"log":"#;

/// Encode a log into its wire string.
pub fn encode(log: &GenerationLog) -> Result<String, WireError> {
    let json = serde_json::to_string(log).map_err(|e| WireError::Malformed(e.to_string()))?;
    Ok(format!("{WIRE_PREFIX}{json}"))
}

/// Slice of `input` where the JSON payload begins.
///
/// Whichever marker comes first wins; a bare payload may carry the prefix
/// text inside a step message.
fn locate_payload(input: &str) -> Option<&str> {
    let prefixed = input.find(WIRE_PREFIX);
    let bare = input.find(BARE_PAYLOAD_START);
    match (prefixed, bare) {
        (Some(p), Some(b)) if b < p => Some(&input[b..]),
        (Some(p), _) => Some(&input[p + WIRE_PREFIX.len()..]),
        (None, Some(b)) => Some(&input[b..]),
        (None, None) => None,
    }
}

/// Decode a complete wire string.
///
/// Trailing text after the JSON object is ignored.
pub fn decode(input: &str) -> Result<GenerationLog, WireError> {
    let payload = locate_payload(input).ok_or(WireError::MissingPayload)?;
    let mut stream =
        serde_json::Deserializer::from_str(payload.trim_start()).into_iter::<GenerationLog>();
    match stream.next() {
        Some(Ok(log)) => Ok(log),
        Some(Err(e)) => Err(WireError::Malformed(e.to_string())),
        None => Err(WireError::MissingPayload),
    }
}

/// Steps recovered from a possibly truncated payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialLog {
    pub steps: Vec<GenerationLogStep>,
    /// True only once `"isComplete": true` was seen after the step array.
    pub is_complete: bool,
}

impl From<PartialLog> for GenerationLog {
    fn from(partial: PartialLog) -> Self {
        GenerationLog::from_parts(partial.steps, partial.is_complete)
    }
}

/// Decode every complete step from a possibly truncated wire string.
pub fn decode_partial(input: &str) -> Result<PartialLog, WireError> {
    let mut decoder = LogStreamDecoder::new();
    let mut steps = decoder.push(input.as_bytes())?;
    steps.extend(decoder.finish()?);
    Ok(PartialLog {
        steps,
        is_complete: decoder.is_complete(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Looking for the `"log"` key and its opening bracket.
    Seeking,
    /// Inside the step array.
    Steps,
    /// Step array closed; looking for the completion flag.
    Trailer,
    Done,
}

/// Incremental decoder over byte chunks of a wire string.
///
/// Feeding the same bytes in any split yields the same steps in the same
/// order. Multi-byte characters split across chunks are held back until
/// complete.
#[derive(Debug, Clone)]
pub struct LogStreamDecoder {
    pending: Vec<u8>,
    buffer: String,
    phase: Phase,
    /// Byte offset in `buffer` up to which input has been scanned.
    cursor: usize,
    depth: usize,
    in_string: bool,
    escaped: bool,
    object_start: usize,
    complete: bool,
    emitted: usize,
}

impl Default for LogStreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LogStreamDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            buffer: String::new(),
            phase: Phase::Seeking,
            cursor: 0,
            depth: 0,
            in_string: false,
            escaped: false,
            object_start: 0,
            complete: false,
            emitted: 0,
        }
    }

    /// Feed a chunk and return the steps it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<GenerationLogStep>, WireError> {
        self.pending.extend_from_slice(chunk);
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(text) => text.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                return Err(WireError::Malformed(format!(
                    "invalid UTF-8 at byte {}",
                    e.valid_up_to()
                )));
            }
        };
        let rest = self.pending.split_off(valid);
        let decoded = std::mem::replace(&mut self.pending, rest);
        let text = String::from_utf8(decoded).map_err(|e| WireError::Malformed(e.to_string()))?;
        self.buffer.push_str(&text);
        self.scan()
    }

    /// Finish the stream; fails if no payload was ever found.
    pub fn finish(&mut self) -> Result<Vec<GenerationLogStep>, WireError> {
        if !self.pending.is_empty() {
            debug!(bytes = self.pending.len(), "Dropping incomplete UTF-8 tail");
            self.pending.clear();
        }
        if self.phase == Phase::Seeking {
            return Err(WireError::MissingPayload);
        }
        Ok(Vec::new())
    }

    /// Whether the completion flag has been seen as `true`.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Number of steps yielded so far.
    #[must_use]
    pub fn steps_emitted(&self) -> usize {
        self.emitted
    }

    fn scan(&mut self) -> Result<Vec<GenerationLogStep>, WireError> {
        let mut out = Vec::new();
        loop {
            let progressed = match self.phase {
                Phase::Seeking => self.seek_array(),
                Phase::Steps => self.scan_steps(&mut out)?,
                Phase::Trailer => self.scan_trailer(),
                Phase::Done => false,
            };
            if !progressed {
                break;
            }
        }
        self.emitted += out.len();
        Ok(out)
    }

    fn seek_array(&mut self) -> bool {
        let Some(payload) = locate_payload(&self.buffer) else {
            return false;
        };
        let Some(key) = payload.find("\"log\"") else {
            return false;
        };
        let Some(value) = payload[key + "\"log\"".len()..]
            .trim_start()
            .strip_prefix(':')
            .map(str::trim_start)
        else {
            return false;
        };
        if !value.starts_with('[') {
            return false;
        }
        self.cursor = self.buffer.len() - value.len() + 1;
        self.phase = Phase::Steps;
        true
    }

    fn scan_steps(&mut self, out: &mut Vec<GenerationLogStep>) -> Result<bool, WireError> {
        let bytes = self.buffer.as_bytes();
        while self.cursor < bytes.len() {
            let b = bytes[self.cursor];
            let at = self.cursor;
            self.cursor += 1;

            if self.depth == 0 {
                match b {
                    b'{' => {
                        self.depth = 1;
                        self.object_start = at;
                    }
                    b']' => {
                        self.phase = Phase::Trailer;
                        return Ok(true);
                    }
                    _ => {}
                }
                continue;
            }

            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if b == b'\\' {
                    self.escaped = true;
                } else if b == b'"' {
                    self.in_string = false;
                }
                continue;
            }

            match b {
                b'"' => self.in_string = true,
                b'{' | b'[' => self.depth += 1,
                b'}' | b']' => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        let raw = &self.buffer[self.object_start..self.cursor];
                        let step = serde_json::from_str(raw).map_err(|e| {
                            WireError::Malformed(format!(
                                "step {} is not a valid log step: {e}",
                                self.emitted + out.len()
                            ))
                        })?;
                        out.push(step);
                    }
                }
                _ => {}
            }
        }
        Ok(false)
    }

    fn scan_trailer(&mut self) -> bool {
        let rest = &self.buffer[self.cursor..];
        let Some(key) = rest.find("\"isComplete\"") else {
            return false;
        };
        let value = rest[key + "\"isComplete\"".len()..].trim_start();
        let Some(value) = value.strip_prefix(':') else {
            return false;
        };
        let value = value.trim_start();
        if value.starts_with("true") {
            self.complete = true;
        } else if !value.starts_with("false") {
            return false;
        }
        self.phase = Phase::Done;
        true
    }
}
