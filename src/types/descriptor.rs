use std::fmt;

use crate::consts::{READ_FLAG, WRITE_FLAG};
use crate::types::LabelSet;

/// Which directions a setting supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Access {
	ReadOnly,
	WriteOnly,
	ReadWrite,
}

impl Access {
	pub fn allows(self, operation: Operation) -> bool {
		matches!(
			(self, operation),
			(Access::ReadWrite, _)
				| (Access::ReadOnly, Operation::Read)
				| (Access::WriteOnly, Operation::Write)
		)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
	Read,
	Write,
}

impl Operation {
	pub fn flag(self) -> u8 {
		match self {
			Operation::Read => READ_FLAG,
			Operation::Write => WRITE_FLAG,
		}
	}
}

/// Legal argument values for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
	Range { min: u8, max: u8 },
	OneOf(&'static [u8]),
}

impl Domain {
	/// The zero byte carried by reads and by trigger-style writes.
	pub const PLACEHOLDER: Domain = Domain::OneOf(&[0]);

	pub fn contains(&self, value: i64) -> bool {
		match *self {
			Domain::Range { min, max } => (min as i64..=max as i64).contains(&value),
			Domain::OneOf(values) => values.iter().any(|&v| v as i64 == value),
		}
	}
}

impl fmt::Display for Domain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Domain::Range { min, max } => write!(f, "{min}..={max}"),
			Domain::OneOf([only]) => write!(f, "{{{only}}}"),
			Domain::OneOf(values) => {
				let list: Vec<String> = values.iter().map(u8::to_string).collect();
				write!(f, "{{{}}}", list.join(", "))
			}
		}
	}
}

/// How the raw reply payload of a query is turned into a [`crate::types::Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePolicy {
	/// Integer bounded by the command's domain.
	Numeric,
	/// Index into a fixed list of labels.
	Label(LabelSet),
	/// Payload bytes read as ASCII text.
	Ascii,
	/// Three BCD bytes rendered as `major.minor.patch`.
	Version,
	/// Only the acknowledgement value is legal.
	Acknowledge,
}

/// Static description of one device setting.
#[derive(Debug)]
pub struct CommandDescriptor {
	pub id: u8,
	pub name: &'static str,
	pub title: &'static str,
	pub class_addr: u8,
	pub subclass_addr: u8,
	pub access: Access,
	pub width: usize,
	pub domain: Domain,
	pub decode: DecodePolicy,
}

impl CommandDescriptor {
	pub fn address(&self) -> (u8, u8) {
		(self.class_addr, self.subclass_addr)
	}
}
