use std::fmt;

/// An interpreted reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
	Number(u64),
	Label { index: u8, label: &'static str },
	Text(String),
	Version { major: u8, minor: u8, patch: u8 },
	Acknowledged,
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Number(n) => write!(f, "{n}"),
			Value::Label { index, label } => write!(f, "{label} ({index})"),
			Value::Text(text) => write!(f, "{text}"),
			Value::Version { major, minor, patch } => write!(f, "{major}.{minor}.{patch}"),
			Value::Acknowledged => write!(f, "acknowledged"),
		}
	}
}
