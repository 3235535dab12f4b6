//! Payload bytes to display text
use crate::models::DecodedSymbol;

/// Character set used to render payload bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8, invalid sequences replaced
    Utf8,
    /// ISO-8859-1: every byte is the code point of the same value
    Latin1,
}

impl TextEncoding {
    /// Encoding named by an ECI designator, when it is one we render
    pub fn from_eci(designator: u32) -> Option<Self> {
        match designator {
            1 | 3 => Some(TextEncoding::Latin1),
            26 => Some(TextEncoding::Utf8),
            _ => None,
        }
    }
}

/// Render payload bytes as text.
///
/// Without an explicit encoding, valid UTF-8 is taken as UTF-8 and anything
/// else as ISO-8859-1.
pub fn payload_to_text(payload: &[u8], encoding: Option<TextEncoding>) -> String {
    match encoding {
        Some(TextEncoding::Utf8) => String::from_utf8_lossy(payload).into_owned(),
        Some(TextEncoding::Latin1) => latin1(payload),
        None => match std::str::from_utf8(payload) {
            Ok(text) => text.to_owned(),
            Err(_) => latin1(payload),
        },
    }
}

fn latin1(payload: &[u8]) -> String {
    payload.iter().map(|&b| b as char).collect()
}

/// Join several symbols' text: one symbol prints bare, several get
/// `QR Code n` headers.
pub fn format_payloads(symbols: &[DecodedSymbol]) -> String {
    match symbols {
        [single] => single.text(),
        _ => symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| format!("QR Code {}\n{}", i + 1, symbol.text()))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

impl DecodedSymbol {
    /// Payload as text, honouring the symbol's ECI designator when known
    pub fn text(&self) -> String {
        payload_to_text(&self.payload, self.eci.and_then(TextEncoding::from_eci))
    }
}
