//! Command registry for the TM5X module.
//!
//! Each device setting is one [`CommandDescriptor`] in [`COMMANDS`]. Building
//! a request and interpreting a reply are both driven from the descriptor, so
//! adding a setting means adding a table row.
//!
//! The registry keeps no state between calls: the caller remembers which
//! command it sent and passes that id back in with the reply.

use log::warn;

use crate::consts::{ACK_VALUE, PAYLOAD_WIDTH, VERSION_WIDTH};
use crate::error::{CodecError, Result};
use crate::protocol::packet::decode_reply;
use crate::error::AddressField;
use crate::types::{
	Access, CommandDescriptor, DecodePolicy, Domain, Frame, LabelSet, Operation, Reply, Value,
};

const PERCENT: Domain = Domain::Range { min: 0, max: 100 };

const fn labelled(set: LabelSet) -> Domain {
	Domain::Range {
		min: 0,
		max: (set.count() - 1) as u8,
	}
}

pub static COMMANDS: [CommandDescriptor; 15] = [
	CommandDescriptor {
		id: 1,
		name: "model",
		title: "Module model",
		class_addr: 0x74,
		subclass_addr: 0x02,
		access: Access::ReadOnly,
		width: PAYLOAD_WIDTH,
		domain: Domain::PLACEHOLDER,
		decode: DecodePolicy::Ascii,
	},
	CommandDescriptor {
		id: 2,
		name: "fpga-version",
		title: "FPGA program version",
		class_addr: 0x74,
		subclass_addr: 0x03,
		access: Access::ReadOnly,
		width: PAYLOAD_WIDTH,
		domain: Domain::PLACEHOLDER,
		decode: DecodePolicy::Version,
	},
	CommandDescriptor {
		id: 3,
		name: "save-settings",
		title: "Save current settings",
		class_addr: 0x74,
		subclass_addr: 0x10,
		access: Access::WriteOnly,
		width: PAYLOAD_WIDTH,
		domain: Domain::PLACEHOLDER,
		decode: DecodePolicy::Acknowledge,
	},
	CommandDescriptor {
		id: 4,
		name: "factory-reset",
		title: "Factory reset",
		class_addr: 0x74,
		subclass_addr: 0x0F,
		access: Access::WriteOnly,
		width: PAYLOAD_WIDTH,
		domain: Domain::PLACEHOLDER,
		decode: DecodePolicy::Acknowledge,
	},
	CommandDescriptor {
		id: 5,
		name: "shutter-calibration",
		title: "Manual shutter calibration",
		class_addr: 0x7C,
		subclass_addr: 0x02,
		access: Access::WriteOnly,
		width: PAYLOAD_WIDTH,
		domain: Domain::PLACEHOLDER,
		decode: DecodePolicy::Acknowledge,
	},
	CommandDescriptor {
		id: 6,
		name: "background-correction",
		title: "Manual background correction",
		class_addr: 0x7C,
		subclass_addr: 0x03,
		access: Access::WriteOnly,
		width: PAYLOAD_WIDTH,
		domain: Domain::PLACEHOLDER,
		decode: DecodePolicy::Acknowledge,
	},
	// Published address table gives this the same address as shutter
	// calibration; see `shared_addresses`.
	CommandDescriptor {
		id: 7,
		name: "vignetting-correction",
		title: "Vignetting correction",
		class_addr: 0x7C,
		subclass_addr: 0x02,
		access: Access::WriteOnly,
		width: PAYLOAD_WIDTH,
		domain: Domain::PLACEHOLDER,
		decode: DecodePolicy::Acknowledge,
	},
	CommandDescriptor {
		id: 8,
		name: "auto-shutter",
		title: "Automatic shutter control",
		class_addr: 0x7C,
		subclass_addr: 0x04,
		access: Access::ReadWrite,
		width: PAYLOAD_WIDTH,
		domain: labelled(LabelSet::ShutterMode),
		decode: DecodePolicy::Label(LabelSet::ShutterMode),
	},
	CommandDescriptor {
		id: 9,
		name: "brightness",
		title: "Brightness",
		class_addr: 0x78,
		subclass_addr: 0x02,
		access: Access::ReadWrite,
		width: PAYLOAD_WIDTH,
		domain: PERCENT,
		decode: DecodePolicy::Numeric,
	},
	CommandDescriptor {
		id: 10,
		name: "contrast",
		title: "Contrast",
		class_addr: 0x78,
		subclass_addr: 0x03,
		access: Access::ReadWrite,
		width: PAYLOAD_WIDTH,
		domain: PERCENT,
		decode: DecodePolicy::Numeric,
	},
	CommandDescriptor {
		id: 11,
		name: "detail-enhancement",
		title: "Image detail digital enhancement",
		class_addr: 0x78,
		subclass_addr: 0x10,
		access: Access::ReadWrite,
		width: PAYLOAD_WIDTH,
		domain: PERCENT,
		decode: DecodePolicy::Numeric,
	},
	CommandDescriptor {
		id: 12,
		name: "static-denoise",
		title: "Static denoising level",
		class_addr: 0x78,
		subclass_addr: 0x15,
		access: Access::ReadWrite,
		width: PAYLOAD_WIDTH,
		domain: PERCENT,
		decode: DecodePolicy::Numeric,
	},
	CommandDescriptor {
		id: 13,
		name: "dynamic-denoise",
		title: "Dynamic denoising level",
		class_addr: 0x78,
		subclass_addr: 0x16,
		access: Access::ReadWrite,
		width: PAYLOAD_WIDTH,
		domain: PERCENT,
		decode: DecodePolicy::Numeric,
	},
	CommandDescriptor {
		id: 14,
		name: "palette",
		title: "Palette",
		class_addr: 0x78,
		subclass_addr: 0x20,
		access: Access::ReadWrite,
		width: PAYLOAD_WIDTH,
		domain: labelled(LabelSet::Palette),
		decode: DecodePolicy::Label(LabelSet::Palette),
	},
	CommandDescriptor {
		id: 15,
		name: "mirroring",
		title: "Image mirroring",
		class_addr: 0x70,
		subclass_addr: 0x11,
		access: Access::ReadWrite,
		width: PAYLOAD_WIDTH,
		domain: labelled(LabelSet::Mirroring),
		decode: DecodePolicy::Label(LabelSet::Mirroring),
	},
];

pub fn descriptor(id: u8) -> Result<&'static CommandDescriptor> {
	COMMANDS.iter().find(|d| d.id == id).ok_or(CodecError::UnknownCommand(id))
}

/// Looks a command up by numeric id or by name.
pub fn find(key: &str) -> Option<&'static CommandDescriptor> {
	let key = key.trim();
	match key.parse::<u8>() {
		Ok(id) => descriptor(id).ok(),
		Err(_) => COMMANDS.iter().find(|d| d.name.eq_ignore_ascii_case(key)),
	}
}

/// Every command using the given class/subclass pair.
pub fn by_address(
	class_addr: u8,
	subclass_addr: u8,
) -> impl Iterator<Item = &'static CommandDescriptor> {
	COMMANDS
		.iter()
		.filter(move |d| d.address() == (class_addr, subclass_addr))
}

/// Address pairs claimed by more than one command.
pub fn shared_addresses() -> Vec<(u8, u8)> {
	let mut shared: Vec<(u8, u8)> = COMMANDS
		.iter()
		.map(CommandDescriptor::address)
		.filter(|&(class_addr, subclass_addr)| {
			by_address(class_addr, subclass_addr).count() > 1
		})
		.collect();
	shared.sort_unstable();
	shared.dedup();
	shared
}

fn warn_if_shared(desc: &CommandDescriptor) {
	let (class_addr, subclass_addr) = desc.address();
	let others: Vec<&str> = by_address(class_addr, subclass_addr)
		.filter(|d| d.id != desc.id)
		.map(|d| d.name)
		.collect();
	if !others.is_empty() {
		warn!(
			"{} shares address {class_addr:#04x}/{subclass_addr:#04x} with {}; \
			the device cannot tell them apart",
			desc.name,
			others.join(", ")
		);
	}
}

/// Encodes a request for command `id`.
///
/// Reads must pass `0`; writes must pass a value inside the command's domain.
pub fn build(id: u8, operation: Operation, value: i64) -> Result<Frame> {
	let desc = descriptor(id)?;
	if !desc.access.allows(operation) {
		return Err(CodecError::AccessViolation {
			command: desc.name,
			access: desc.access,
			operation,
		});
	}

	let domain = match operation {
		Operation::Read => Domain::PLACEHOLDER,
		Operation::Write => desc.domain,
	};
	if !domain.contains(value) {
		return Err(CodecError::ValueOutOfRange {
			command: desc.name,
			value,
			domain,
		});
	}

	warn_if_shared(desc);
	// Every domain is a subset of 0..=255.
	Ok(Frame::new(
		desc.class_addr,
		desc.subclass_addr,
		operation.flag(),
		value as u64,
		desc.width,
	))
}

/// Applies command `id`'s decode policy to a query reply.
///
/// The reply must come from the command's own class/subclass address.
pub fn interpret(id: u8, outcome: Result<Reply>) -> Result<Value> {
	let reply = outcome?;
	let desc = descriptor(id)?;
	check_address(desc, &reply)?;
	warn_if_shared(desc);

	match desc.decode {
		DecodePolicy::Numeric => match reply.value() {
			Some(value) if desc.domain.contains(value as i64) => Ok(Value::Number(value)),
			_ => Err(out_of_range(desc, &reply, desc.domain.to_string())),
		},
		DecodePolicy::Label(set) => {
			let label = reply
				.value()
				.and_then(|v| u8::try_from(v).ok())
				.and_then(|index| set.label(index).map(|label| (index, label)));
			match label {
				Some((index, label)) => Ok(Value::Label { index, label }),
				None => Err(out_of_range(desc, &reply, desc.domain.to_string())),
			}
		}
		DecodePolicy::Ascii => decode_ascii(&reply.data)
			.map(Value::Text)
			.ok_or_else(|| out_of_range(desc, &reply, "printable ASCII".to_string())),
		DecodePolicy::Version => decode_version(&reply.data)
			.map(|[major, minor, patch]| Value::Version { major, minor, patch })
			.ok_or_else(|| out_of_range(desc, &reply, "three BCD bytes".to_string())),
		DecodePolicy::Acknowledge => acknowledge(desc, &reply),
	}
}

/// Interprets the reply to a write: every write is answered with the
/// acknowledgement value, whatever the command reports when queried.
pub fn interpret_write_reply(id: u8, outcome: Result<Reply>) -> Result<Value> {
	let reply = outcome?;
	let desc = descriptor(id)?;
	if !desc.access.allows(Operation::Write) {
		return Err(CodecError::AccessViolation {
			command: desc.name,
			access: desc.access,
			operation: Operation::Write,
		});
	}
	check_address(desc, &reply)?;
	warn_if_shared(desc);
	acknowledge(desc, &reply)
}

/// Strictly decodes `buf` against command `id`'s address and interprets it.
pub fn decode(id: u8, buf: &[u8]) -> Result<Value> {
	let desc = descriptor(id)?;
	interpret(id, decode_reply(buf, desc.class_addr, desc.subclass_addr))
}

/// Parses a write argument given as a number (decimal or `0x` hex) or, for
/// labelled settings, as label text.
pub fn parse_value(desc: &CommandDescriptor, text: &str) -> Option<i64> {
	let text = text.trim();
	let number = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
		Some(hex) => i64::from_str_radix(hex, 16).ok(),
		None => text.parse::<i64>().ok(),
	};
	number.or_else(|| match desc.decode {
		DecodePolicy::Label(set) => set.parse(text).map(i64::from),
		_ => None,
	})
}

fn check_address(desc: &CommandDescriptor, reply: &Reply) -> Result<()> {
	if reply.class_addr != desc.class_addr {
		return Err(CodecError::AddressMismatch {
			field: AddressField::Class,
			expected: desc.class_addr,
			found: reply.class_addr,
		});
	}
	if reply.subclass_addr != desc.subclass_addr {
		return Err(CodecError::AddressMismatch {
			field: AddressField::Subclass,
			expected: desc.subclass_addr,
			found: reply.subclass_addr,
		});
	}
	Ok(())
}

fn acknowledge(desc: &CommandDescriptor, reply: &Reply) -> Result<Value> {
	match reply.value() {
		Some(ACK_VALUE) => Ok(Value::Acknowledged),
		Some(value) => Err(CodecError::UnexpectedAcknowledgement {
			command: desc.name,
			value,
		}),
		None => Err(out_of_range(desc, reply, format!("{ACK_VALUE:#04x}"))),
	}
}

// Leading zero bytes are padding, not text.
fn decode_ascii(data: &[u8]) -> Option<String> {
	let start = data.iter().position(|&b| b != 0)?;
	let text = &data[start..];
	if !text.iter().all(|&b| b.is_ascii_graphic() || b == b' ') {
		return None;
	}
	Some(text.iter().map(|&b| b as char).collect())
}

fn decode_version(data: &[u8]) -> Option<[u8; VERSION_WIDTH]> {
	let bytes: [u8; VERSION_WIDTH] = data.try_into().ok()?;
	let mut fields = [0u8; VERSION_WIDTH];
	for (field, byte) in fields.iter_mut().zip(bytes) {
		*field = bcd_to_decimal(byte)?;
	}
	Some(fields)
}

fn bcd_to_decimal(byte: u8) -> Option<u8> {
	let (tens, units) = (byte >> 4, byte & 0x0F);
	if tens > 9 || units > 9 {
		return None;
	}
	Some(tens * 10 + units)
}

fn out_of_range(desc: &CommandDescriptor, reply: &Reply, expected: String) -> CodecError {
	let reply: Vec<String> = reply.data.iter().map(|b| format!("{b:02X}")).collect();
	CodecError::ReplyOutOfRange {
		command: desc.name,
		reply: format!("0x{}", reply.concat()),
		expected,
	}
}
