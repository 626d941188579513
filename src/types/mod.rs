mod descriptor;
mod frame;
mod labels;
mod value;

pub use descriptor::{Access, CommandDescriptor, DecodePolicy, Domain, Operation};
pub use frame::{checksum, Frame, Reply};
pub use labels::LabelSet;
pub use value::Value;
