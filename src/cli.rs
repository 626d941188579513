use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
	name = "tm5x-ctl",
	about = "Encode and decode HM-TM5X thermal camera module commands"
)]
pub struct Cli {
	#[arg(
		short,
		long,
		global = true,
		action = ArgAction::Count,
		help = "Increase log verbosity (-v, -vv, -vvv)"
	)]
	pub verbose: u8,

	#[arg(long, global = true, help = "Print frames as 0x-prefixed hex without spaces")]
	pub compact: bool,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
	#[command(about = "List every command with its address, access and value range")]
	List,
	#[command(about = "Encode a query frame")]
	Read {
		#[arg(help = "Command id (1-15) or name, e.g. palette")]
		command: String,
	},
	#[command(about = "Encode a write frame")]
	Write {
		#[arg(help = "Command id (1-15) or name, e.g. brightness")]
		command: String,

		#[arg(
			allow_negative_numbers = true,
			help = "Value, or label text for labelled settings (defaults to 0 for trigger commands)"
		)]
		value: Option<String>,
	},
	#[command(about = "Decode a reply frame given as hex")]
	Decode {
		#[arg(
			required = true,
			help = "Reply bytes, e.g. 0xF0053678020301B4FF or F0 05 36 ..."
		)]
		hex: Vec<String>,

		#[arg(
			short,
			long,
			help = "Command the reply answers; without it the reply is routed by address"
		)]
		command: Option<String>,

		#[arg(
			long,
			requires = "command",
			help = "The reply answers a write, expect an acknowledgement"
		)]
		write: bool,
	},
}
