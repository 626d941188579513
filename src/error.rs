use thiserror::Error;

use crate::types::{Access, Domain, Operation};

/// Every way a build or a decode can fail.
///
/// All variants are recoverable; the caller decides whether to retry, report
/// or drop the frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
	#[error("unknown command id {0}")]
	UnknownCommand(u8),

	#[error("{command} is {access}, cannot {operation}")]
	AccessViolation {
		command: &'static str,
		access: Access,
		operation: Operation,
	},

	#[error("{command}: value {value} outside {domain}")]
	ValueOutOfRange {
		command: &'static str,
		value: i64,
		domain: Domain,
	},

	#[error("malformed frame: {0}")]
	MalformedFrame(Malformed),

	#[error("{field} address mismatch: expected {expected:#04x}, got {found:#04x}")]
	AddressMismatch {
		field: AddressField,
		expected: u8,
		found: u8,
	},

	#[error("device returned abnormal status flag {flag:#04x}")]
	AbnormalReturn { flag: u8 },

	#[error("checksum mismatch: expected {expected:#04x}, got {found:#04x}")]
	ChecksumMismatch { expected: u8, found: u8 },

	#[error("{command}: reply {reply} outside {expected}")]
	ReplyOutOfRange {
		command: &'static str,
		reply: String,
		expected: String,
	},

	#[error("{command}: expected acknowledgement 0x01, got {value:#x}")]
	UnexpectedAcknowledgement { command: &'static str, value: u64 },
}

/// Structural faults found before any address is looked at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformed {
	#[error("{len} bytes is shorter than the {min} byte minimum")]
	TooShort { len: usize, min: usize },

	#[error("begin byte {0:#04x} is not 0xf0")]
	BadBegin(u8),

	#[error("size byte {0:#04x} leaves no room for a payload")]
	PayloadTooSmall(u8),

	#[error("size declares a {declared} byte payload but frame carries {actual}")]
	LengthMismatch { declared: usize, actual: usize },

	#[error("end byte {0:#04x} is not 0xff")]
	BadEnd(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AddressField {
	Device,
	Class,
	Subclass,
}

pub type Result<T, E = CodecError> = std::result::Result<T, E>;
