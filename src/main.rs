mod cli;
mod consts;
mod error;
mod protocol;
mod types;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use cli::{Cli, Commands};
use consts::ERROR_RETURN;
use error::CodecError;
use protocol::commands::{self, COMMANDS};
use protocol::hex::{format_hex, parse_hex};
use protocol::packet::{decode_reply, decode_unrouted};
use types::{CommandDescriptor, DecodePolicy, Domain, Frame, Operation};

fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match cli.command {
		Commands::List => cmd_list(),
		Commands::Read { command } => cmd_read(&command, cli.compact),
		Commands::Write { command, value } => cmd_write(&command, value.as_deref(), cli.compact),
		Commands::Decode { hex, command, write } => {
			cmd_decode(&hex.join(" "), command.as_deref(), write)
		}
	}
}

fn init_logging(verbose: u8) {
	let level = match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
		.format_timestamp(None)
		.init();
}

fn resolve(key: &str) -> Result<&'static CommandDescriptor> {
	match commands::find(key) {
		Some(desc) => Ok(desc),
		None => bail!("unknown command {key:?}; run `tm5x-ctl list` for the command table"),
	}
}

fn cmd_list() -> Result<()> {
	println!(
		"{:>3}  {:<22} {:<6} {:<9} {:<11} Values",
		"ID", "Name", "Class", "Subclass", "Access"
	);
	for desc in &COMMANDS {
		let values = match desc.decode {
			DecodePolicy::Ascii => "text".to_string(),
			DecodePolicy::Version => "major.minor.patch".to_string(),
			DecodePolicy::Acknowledge => "trigger".to_string(),
			DecodePolicy::Numeric | DecodePolicy::Label(_) => desc.domain.to_string(),
		};
		println!(
			"{:>3}  {:<22} {:<6} {:<9} {:<11} {values}",
			desc.id,
			desc.name,
			format!("{:#04x}", desc.class_addr),
			format!("{:#04x}", desc.subclass_addr),
			desc.access.to_string(),
		);
		if let DecodePolicy::Label(set) = desc.decode {
			for (i, label) in set.labels().iter().enumerate() {
				println!("{:>40}{i:>2}: {label}", "");
			}
		}
	}

	for (class_addr, subclass_addr) in commands::shared_addresses() {
		let names: Vec<&str> = commands::by_address(class_addr, subclass_addr)
			.map(|d| d.name)
			.collect();
		println!();
		println!(
			"Note: {} share address {class_addr:#04x}/{subclass_addr:#04x}; \
			replies cannot be told apart.",
			names.join(" and ")
		);
	}
	Ok(())
}

fn cmd_read(key: &str, compact: bool) -> Result<()> {
	let desc = resolve(key)?;
	let frame = commands::build(desc.id, Operation::Read, 0)?;
	log_frame(desc, &frame);
	println!("{}", format_hex(frame.as_bytes(), compact));
	Ok(())
}

fn cmd_write(key: &str, value: Option<&str>, compact: bool) -> Result<()> {
	let desc = resolve(key)?;
	let value = match value {
		Some(text) => match commands::parse_value(desc, text) {
			Some(v) => v,
			None => bail!("{}: cannot parse {text:?} as a value in {}", desc.name, desc.domain),
		},
		None if desc.domain == Domain::PLACEHOLDER => 0,
		None => bail!("{} needs a value in {}", desc.name, desc.domain),
	};
	let frame = commands::build(desc.id, Operation::Write, value)?;
	log_frame(desc, &frame);
	println!("{}", format_hex(frame.as_bytes(), compact));
	Ok(())
}

fn cmd_decode(hex: &str, key: Option<&str>, write: bool) -> Result<()> {
	let buf = parse_hex(hex)?;

	let Some(key) = key else {
		let reply = decode_unrouted(&buf).map_err(device_error)?;
		println!("Class:    {:#04x}", reply.class_addr);
		println!("Subclass: {:#04x}", reply.subclass_addr);
		println!("Data:     {}", format_hex(&reply.data, true));
		let candidates: Vec<&CommandDescriptor> =
			commands::by_address(reply.class_addr, reply.subclass_addr).collect();
		match candidates.as_slice() {
			[] => println!("Command:  unknown address"),
			[desc] => match commands::interpret(desc.id, Ok(reply)) {
				Ok(value) => println!("Command:  {} = {value}", desc.name),
				Err(e) => println!("Command:  {} ({e})", desc.name),
			},
			many => {
				let names: Vec<&str> = many.iter().map(|d| d.name).collect();
				println!("Command:  ambiguous, one of {}", names.join(", "));
			}
		}
		return Ok(());
	};

	let desc = resolve(key)?;
	let value = if write {
		let outcome = decode_reply(&buf, desc.class_addr, desc.subclass_addr);
		commands::interpret_write_reply(desc.id, outcome)
	} else {
		commands::decode(desc.id, &buf)
	}
	.map_err(device_error)?;
	println!("{}: {value}", desc.title);
	Ok(())
}

fn log_frame(desc: &CommandDescriptor, frame: &Frame) {
	info!(
		"{}: class {:#04x} subclass {:#04x} flag {:#04x} data {:02x?} check {:#04x}",
		desc.title,
		frame.class_addr(),
		frame.subclass_addr(),
		frame.flag(),
		frame.data(),
		frame.check()
	);
}

fn device_error(err: CodecError) -> anyhow::Error {
	match err {
		CodecError::AbnormalReturn { flag: ERROR_RETURN } => {
			anyhow::anyhow!("device answered with its error flag; the command was not applied")
		}
		other => other.into(),
	}
}
