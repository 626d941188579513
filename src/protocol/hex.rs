use anyhow::{bail, Result};

/// Parses hex text such as `0xF0053678020301B4FF` or `F0 05 36 ...`.
///
/// An optional leading `0x` is the framing the device tooling prints frames
/// with; whitespace between digits is ignored.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
	let text = text.trim();
	let body = text
		.strip_prefix("0x")
		.or_else(|| text.strip_prefix("0X"))
		.unwrap_or(text);
	let digits: Vec<u8> = body.bytes().filter(|b| !b.is_ascii_whitespace()).collect();

	if digits.is_empty() {
		bail!("no hex digits given");
	}
	if digits.len() % 2 != 0 {
		bail!("odd number of hex digits ({})", digits.len());
	}

	digits
		.chunks(2)
		.map(|pair| -> Result<u8> { Ok((nibble(pair[0])? << 4) | nibble(pair[1])?) })
		.collect()
}

fn nibble(digit: u8) -> Result<u8> {
	match digit {
		b'0'..=b'9' => Ok(digit - b'0'),
		b'a'..=b'f' => Ok(digit - b'a' + 10),
		b'A'..=b'F' => Ok(digit - b'A' + 10),
		_ => bail!("invalid hex digit {:?}", digit as char),
	}
}

/// Renders bytes as upper-case hex, `F0 05 36` or compact `0xF00536`.
pub fn format_hex(bytes: &[u8], compact: bool) -> String {
	let digits: Vec<String> = bytes.iter().map(|b| format!("{b:02X}")).collect();
	if compact {
		format!("0x{}", digits.concat())
	} else {
		digits.join(" ")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_prefixed_and_spaced() {
		let expected = vec![0xF0, 0x05, 0x36, 0x78, 0x02, 0x03, 0x01, 0xB4, 0xFF];
		assert_eq!(parse_hex("0xF0053678020301B4FF").unwrap(), expected);
		assert_eq!(parse_hex("f0 05 36 78 02 03 01 b4 ff").unwrap(), expected);
		assert_eq!(parse_hex("  0XF005 3678 0203 01B4 FF\n").unwrap(), expected);
	}

	#[test]
	fn rejects_bad_text() {
		assert!(parse_hex("").is_err());
		assert!(parse_hex("0x").is_err());
		assert!(parse_hex("F00").is_err());
		assert!(parse_hex("F0 0G").is_err());
	}

	#[test]
	fn formats_both_styles() {
		let frame = [0xF0, 0x05, 0x36, 0x78, 0x02, 0x00, 0x64, 0x14, 0xFF];
		assert_eq!(format_hex(&frame, false), "F0 05 36 78 02 00 64 14 FF");
		assert_eq!(format_hex(&frame, true), "0xF005367802006414FF");
		assert_eq!(parse_hex(&format_hex(&frame, true)).unwrap(), frame);
	}
}
