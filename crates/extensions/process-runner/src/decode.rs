//! Line decoding with an encoding fallback chain.

use encoding_rs::{Encoding, UTF_8};
use tracing::warn;

/// Decodes raw output lines.
///
/// UTF-8 is always tried first, then each configured encoding in order, then
/// lossy UTF-8. Decoding never fails.
#[derive(Debug, Clone)]
pub struct OutputDecoder {
    fallbacks: Vec<&'static Encoding>,
}

impl OutputDecoder {
    /// Build a decoder from WHATWG encoding labels (`shift_jis`, `sjis`,
    /// `windows-1252`, ...). Unknown labels are skipped.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fallbacks = Vec::new();
        for label in labels {
            let label = label.as_ref();
            match Encoding::for_label(label.trim().as_bytes()) {
                Some(encoding) if encoding == UTF_8 => {}
                Some(encoding) => {
                    if !fallbacks.contains(&encoding) {
                        fallbacks.push(encoding);
                    }
                }
                None => warn!("Ignoring unknown output encoding '{}'", label),
            }
        }
        Self { fallbacks }
    }

    /// Names of the non-UTF-8 encodings tried, in order.
    pub fn fallback_names(&self) -> Vec<&'static str> {
        self.fallbacks.iter().map(|e| e.name()).collect()
    }

    /// Decode one line, dropping the trailing line terminator.
    pub fn decode(&self, raw: &[u8]) -> String {
        let line = trim_line_end(raw);

        if let Ok(text) = std::str::from_utf8(line) {
            return text.to_string();
        }

        for encoding in &self.fallbacks {
            if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(line) {
                return text.into_owned();
            }
        }

        String::from_utf8_lossy(line).into_owned()
    }
}

impl Default for OutputDecoder {
    fn default() -> Self {
        Self::new(["utf-8", "shift_jis", "windows-1252"])
    }
}

fn trim_line_end(raw: &[u8]) -> &[u8] {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    raw.strip_suffix(b"\r").unwrap_or(raw)
}
