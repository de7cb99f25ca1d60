//! NMEA 0183 side of the bridge: rendering outbound sentences with their
//! checksum and parsing inbound ones into typed fields.
//!
//! Line termination (CR/LF) is left to the transport writing the text.
use alloc::string::String;
use alloc::vec::Vec;

pub mod parser;
pub mod sentence;

pub use parser::ParsedSentence;
pub use sentence::Sentence;

/// Talker id used when the configuration does not provide one.
pub const DEFAULT_TALKER: &str = "II";
/// Longest sentence allowed on the wire, delimiters included.
pub const MAX_SENTENCE_LEN: usize = 82;

/// XOR of every byte between the start delimiter and the `*`.
pub fn checksum(body: &str) -> u8 {
    body.bytes().fold(0, |acc, b| acc ^ b)
}

/// Receiver of the sentences produced while decoding PGNs.
pub trait SentenceSink {
    fn emit(&mut self, sentence: String);
}

impl SentenceSink for Vec<String> {
    fn emit(&mut self, sentence: String) {
        self.push(sentence);
    }
}

/// Sink discarding everything, for callers only interested in decoded records.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SentenceSink for NullSink {
    fn emit(&mut self, _sentence: String) {}
}
