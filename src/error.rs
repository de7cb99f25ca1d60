//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (CAN ID construction, bit access,
//! serialization/deserialization, sentence parsing, AIS transcoding, encoding and
//! the bridge service).
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur while building a 29-bit CAN identifier.
pub enum CanIdBuildError {
    /// PGN does not fit in the 17 bits available in the identifier.
    #[error("PGN out of range: {pgn:#x}")]
    PgnOutOfRange { pgn: u32 },
}

//==================================================================================FAST_PACKET_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors raised while splitting a payload into CAN frames.
pub enum FragmentError {
    /// Payload exceeds the fast packet capacity.
    #[error("Payload too long: {len} bytes, max {max}")]
    PayloadTooLong { len: usize, max: usize },
    /// Nothing to send.
    #[error("Payload is empty: unable to build")]
    EmptyPayload,
    /// Identifier could not be built.
    #[error(transparent)]
    Header(#[from] CanIdBuildError),
}

//================================================================================CODEC_ERROR

#[derive(Debug, Error, Clone, PartialEq)]
/// Issues encountered while serializing a field set into a payload.
pub enum SerializationError {
    /// Value cannot be represented by the field (range or sentinel collision).
    #[error("Value out of range for field {field_id}")]
    ValueOutOfRange { field_id: &'static str },
    /// Value type is incompatible with the field kind.
    #[error("Type mismatch for field {field_id}")]
    TypeMismatch { field_id: &'static str },
    /// Field length is not an acceptable bit multiple.
    #[error("Invalid field bit length for {field_name}")]
    InvalidFieldBits { field_name: &'static str },
    /// Layout does not fit in the output buffer.
    #[error("BitWrite error: {err}")]
    BitWriteError { err: BitWriterError },
}

#[derive(Error, Debug, Clone, PartialEq)]
/// Errors raised while deserializing a payload into a field set.
pub enum DeserializationError {
    /// Payload is shorter than the layout requires.
    #[error("Invalid data length: expected at least {expected} bytes, got {actual}")]
    InvalidDataLength { expected: usize, actual: usize },
    /// Field descriptor defines an invalid bit length.
    #[error("Invalid field bit length for {field_name}")]
    InvalidFieldBits { field_name: &'static str },
    /// Mandatory field carries its "not available" value.
    #[error("Missing mandatory field {field_id}")]
    MissingField { field_id: &'static str },
    /// Bit-level access on the buffer failed.
    #[error("BitReader error: {err}")]
    BitReaderError { err: BitReaderError },
}

//==================================================================================BITREADER_ERRORS
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Errors raised during bitwise buffer reads.
pub enum BitReaderError {
    /// Attempted to read past the end of the buffer.
    #[error("Attempted to read out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Requested more bits than the target type can hold.
    #[error("Cannot read more than {max} bits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
    /// Cursor is not aligned on a byte boundary when required.
    #[error("Non aligned bit. Cursor: {cursor}")]
    NonAlignedBit { cursor: usize },
}
//==================================================================================BITWRITER_ERRORS
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Errors raised during bitwise writes into a buffer.
pub enum BitWriterError {
    /// Attempted to write beyond the provided capacity.
    #[error("Attempted to write out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Field is too large for the provided type.
    #[error("Cannot write more than {max} bits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
    /// Cursor is not aligned on a byte boundary when the operation requires it.
    #[error("Non aligned bit. Cursor: {cursor}")]
    NonAlignedBit { cursor: usize },
}

//==================================================================================SENTENCE_ERROR
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Errors raised while parsing an NMEA 0183 sentence.
pub enum SentenceError {
    /// Sentence does not start with `$` or `!`.
    #[error("Missing start delimiter")]
    MissingDelimiter,
    /// Address field is not a 5-character talker + formatter pair.
    #[error("Invalid address field")]
    InvalidAddress,
    /// Checksum is not two hexadecimal digits.
    #[error("Malformed checksum")]
    MalformedChecksum,
    /// Computed checksum differs from the transmitted one.
    #[error("Checksum mismatch: expected {expected:#04x}, found {found:#04x}")]
    ChecksumMismatch { expected: u8, found: u8 },
    /// Field content cannot be interpreted.
    #[error("Invalid field at index {index}")]
    InvalidField { index: usize },
}

//==================================================================================AIS_ERROR
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Errors raised by the AIS 6-bit codec.
pub enum AisError {
    /// Character outside of the armor alphabet.
    #[error("Invalid armor character {ch:#04x}")]
    InvalidArmor { ch: u8 },
    /// Fill bit count outside 0..=5.
    #[error("Invalid fill bits {fill}")]
    InvalidFillBits { fill: u8 },
    /// Message type has no layout.
    #[error("Unsupported AIS message type {kind}")]
    UnsupportedMessageType { kind: u8 },
    /// Bit vector shorter than the layout minimum.
    #[error("AIS payload too short: {bits} bits, need {needed}")]
    TooShort { bits: usize, needed: usize },
    /// Fragment header fields are inconsistent.
    #[error("Invalid AIS fragment")]
    InvalidFragment,
    /// Bit access failed.
    #[error("BitReader error: {err}")]
    Bits { err: BitReaderError },
}

//==================================================================================ENCODE_ERROR
#[derive(Debug, Error, Clone, PartialEq)]
/// Errors returned to callers of the NMEA 0183 → NMEA 2000 path.
pub enum EncodeError {
    /// Sentence could not be parsed.
    #[error("Sentence error: {0}")]
    Sentence(#[from] SentenceError),
    /// No encoder is registered for this formatter.
    #[error("Unsupported sentence formatter")]
    UnsupportedSentence,
    /// The PGN family is disabled for transmission.
    #[error("PGN family disabled for transmission")]
    FamilyDisabled,
    /// The sentence lacks a field required by the target PGN.
    #[error("Missing sentence field {index}")]
    MissingField { index: usize },
    /// Field set could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),
    /// AIS payload could not be transcoded.
    #[error("AIS error: {0}")]
    Ais(#[from] AisError),
    /// Frames could not be produced.
    #[error("Fragment error: {0}")]
    Fragment(#[from] FragmentError),
}

//==================================================================================SERVICE_ERRORS
#[derive(Debug, Error)]
/// Errors encountered when transmitting an encoded sentence (encode + send).
pub enum TransmitError<E: core::fmt::Debug> {
    /// Sentence could not be turned into frames.
    #[error("Encode failed: {0}")]
    Encode(EncodeError),
    /// CAN layer refused or failed to send the frame.
    #[error("CAN bus send error: {0:?}")]
    Send(E),
}

#[derive(Debug, Error)]
/// Fatal errors stopping the bridge runner.
pub enum BridgeRunError<E: core::fmt::Debug> {
    /// Unable to receive frames from the bus.
    #[error("CAN bus receive error: {0:?}")]
    Receive(E),
    /// Unable to transmit frames on the bus.
    #[error("CAN bus send error: {0:?}")]
    Send(E),
}
