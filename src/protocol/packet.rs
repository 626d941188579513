use log::{debug, trace};

use crate::consts::*;
use crate::error::{AddressField, CodecError, Malformed, Result};
use crate::types::{checksum, Reply};

/// Decodes a reply that must come from `class_addr`/`subclass_addr`.
pub fn decode_reply(buf: &[u8], class_addr: u8, subclass_addr: u8) -> Result<Reply> {
	decode(buf, Some((class_addr, subclass_addr)))
}

/// Decodes a reply from any class/subclass; the observed address is
/// returned in the [`Reply`] for the caller to route.
pub fn decode_unrouted(buf: &[u8]) -> Result<Reply> {
	decode(buf, None)
}

fn decode(buf: &[u8], route: Option<(u8, u8)>) -> Result<Reply> {
	trace!("decoding frame {buf:02x?}");
	let reply = parse(buf, route);
	if let Err(e) = &reply {
		debug!("rejected frame {buf:02x?}: {e}");
	}
	reply
}

// Checks run in wire order and stop at the first failure.
fn parse(buf: &[u8], route: Option<(u8, u8)>) -> Result<Reply> {
	if buf.len() < MIN_FRAME_LEN {
		return Err(malformed(Malformed::TooShort {
			len: buf.len(),
			min: MIN_FRAME_LEN,
		}));
	}
	if buf[OFFSET_BEGIN] != BEGIN {
		return Err(malformed(Malformed::BadBegin(buf[OFFSET_BEGIN])));
	}

	let size = buf[OFFSET_SIZE];
	let width = match (size as usize).checked_sub(SIZE_OVERHEAD) {
		Some(n) if n >= 1 => n,
		_ => return Err(malformed(Malformed::PayloadTooSmall(size))),
	};
	let actual = buf.len() - FRAME_OVERHEAD;
	if actual != width {
		return Err(malformed(Malformed::LengthMismatch {
			declared: width,
			actual,
		}));
	}

	let device_addr = buf[OFFSET_DEVICE];
	if device_addr != DEVICE_ADDR {
		return Err(CodecError::AddressMismatch {
			field: AddressField::Device,
			expected: DEVICE_ADDR,
			found: device_addr,
		});
	}

	let class_addr = buf[OFFSET_CLASS];
	let subclass_addr = buf[OFFSET_SUBCLASS];
	if let Some((expected_class, expected_subclass)) = route {
		if class_addr != expected_class {
			return Err(CodecError::AddressMismatch {
				field: AddressField::Class,
				expected: expected_class,
				found: class_addr,
			});
		}
		if subclass_addr != expected_subclass {
			return Err(CodecError::AddressMismatch {
				field: AddressField::Subclass,
				expected: expected_subclass,
				found: subclass_addr,
			});
		}
	}

	let flag = buf[OFFSET_FLAG];
	if flag != NORMAL_RETURN {
		return Err(CodecError::AbnormalReturn { flag });
	}

	let data = &buf[OFFSET_DATA..OFFSET_DATA + width];
	let check = buf[OFFSET_DATA + width];
	let expected = checksum(class_addr, subclass_addr, flag, data);
	if check != expected {
		return Err(CodecError::ChecksumMismatch {
			expected,
			found: check,
		});
	}

	let end = buf[OFFSET_DATA + width + 1];
	if end != END {
		return Err(malformed(Malformed::BadEnd(end)));
	}

	Ok(Reply {
		class_addr,
		subclass_addr,
		data: data.to_vec(),
	})
}

fn malformed(reason: Malformed) -> CodecError {
	CodecError::MalformedFrame(reason)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::Frame;

	const BRIGHTNESS_ACK: [u8; 9] = [0xF0, 0x05, 0x36, 0x78, 0x02, 0x03, 0x01, 0xB4, 0xFF];

	/// Turns an outbound frame into the reply the device would send with the
	/// same payload, patching the checksum for the new flag.
	fn as_normal_return(frame: &Frame) -> Vec<u8> {
		let mut buf = frame.buf.clone();
		let flag = buf[OFFSET_FLAG];
		buf[OFFSET_FLAG] = NORMAL_RETURN;
		let check = buf.len() - 2;
		buf[check] = buf[check].wrapping_add(NORMAL_RETURN.wrapping_sub(flag));
		buf
	}

	fn malformed_err(reason: Malformed) -> Result<Reply> {
		Err(CodecError::MalformedFrame(reason))
	}

	// ---------------------------------------------------------------
	// Successful decodes
	// ---------------------------------------------------------------

	#[test]
	fn decodes_brightness_ack() {
		let reply = decode_reply(&BRIGHTNESS_ACK, 0x78, 0x02).unwrap();
		assert_eq!(reply.data, [0x01]);
		assert_eq!(reply.value(), Some(1));
	}

	#[test]
	fn unrouted_reports_address() {
		let reply = decode_unrouted(&BRIGHTNESS_ACK).unwrap();
		assert_eq!((reply.class_addr, reply.subclass_addr), (0x78, 0x02));
		assert_eq!(reply.value(), Some(1));
	}

	#[test]
	fn decodes_multi_byte_payload() {
		let frame = Frame::new(0x74, 0x02, NORMAL_RETURN, 0x544D_3558, 4);
		let reply = decode_reply(&frame.buf, 0x74, 0x02).unwrap();
		assert_eq!(reply.data, b"TM5X");
	}

	#[test]
	fn encode_decode_symmetry() {
		for class_addr in [0x70u8, 0x74, 0x78, 0x7C] {
			for subclass_addr in [0x02u8, 0x10, 0x20] {
				for data in 0..=u8::MAX as u64 {
					let frame = Frame::new(class_addr, subclass_addr, WRITE_FLAG, data, 1);
					let buf = as_normal_return(&frame);
					let reply = decode_reply(&buf, class_addr, subclass_addr).unwrap();
					assert_eq!(reply.value(), Some(data));
				}
			}
		}
	}

	#[test]
	fn checksum_reproduces_transmitted_byte() {
		for flag in [WRITE_FLAG, READ_FLAG, NORMAL_RETURN] {
			for data in 0..=u8::MAX as u64 {
				let frame = Frame::new(0x78, 0x15, flag, data, 1);
				let check = checksum(
					frame.class_addr(),
					frame.subclass_addr(),
					frame.flag(),
					frame.data(),
				);
				assert_eq!(check, frame.check());
			}
		}
	}

	// ---------------------------------------------------------------
	// Structural failures
	// ---------------------------------------------------------------

	#[test]
	fn rejects_short_buffer() {
		assert_eq!(
			decode_reply(&BRIGHTNESS_ACK[..8], 0x78, 0x02),
			malformed_err(Malformed::TooShort { len: 8, min: 9 })
		);
		assert_eq!(
			decode_unrouted(&[]),
			malformed_err(Malformed::TooShort { len: 0, min: 9 })
		);
	}

	#[test]
	fn rejects_bad_begin() {
		let mut buf = BRIGHTNESS_ACK;
		buf[0] = 0xF1;
		assert_eq!(
			decode_reply(&buf, 0x78, 0x02),
			malformed_err(Malformed::BadBegin(0xF1))
		);
	}

	#[test]
	fn rejects_empty_payload_size() {
		let mut buf = BRIGHTNESS_ACK;
		buf[1] = 0x04;
		assert_eq!(
			decode_reply(&buf, 0x78, 0x02),
			malformed_err(Malformed::PayloadTooSmall(0x04))
		);
		buf[1] = 0x00;
		assert_eq!(
			decode_reply(&buf, 0x78, 0x02),
			malformed_err(Malformed::PayloadTooSmall(0x00))
		);
	}

	#[test]
	fn rejects_size_length_disagreement() {
		let mut buf = BRIGHTNESS_ACK;
		buf[1] = 0x06;
		assert_eq!(
			decode_reply(&buf, 0x78, 0x02),
			malformed_err(Malformed::LengthMismatch {
				declared: 2,
				actual: 1
			})
		);

		let mut long = BRIGHTNESS_ACK.to_vec();
		long.push(0xFF);
		assert_eq!(
			decode_reply(&long, 0x78, 0x02),
			malformed_err(Malformed::LengthMismatch {
				declared: 1,
				actual: 2
			})
		);
	}

	#[test]
	fn rejects_flipped_end() {
		let mut buf = BRIGHTNESS_ACK;
		buf[8] = 0xFE;
		assert_eq!(
			decode_reply(&buf, 0x78, 0x02),
			malformed_err(Malformed::BadEnd(0xFE))
		);
	}

	// ---------------------------------------------------------------
	// Address, flag and checksum failures
	// ---------------------------------------------------------------

	#[test]
	fn rejects_foreign_device() {
		let mut buf = BRIGHTNESS_ACK;
		buf[2] = 0x37;
		let expected = CodecError::AddressMismatch {
			field: AddressField::Device,
			expected: 0x36,
			found: 0x37,
		};
		assert_eq!(decode_reply(&buf, 0x78, 0x02), Err(expected.clone()));
		assert_eq!(decode_unrouted(&buf), Err(expected));
	}

	#[test]
	fn strict_decode_checks_class_then_subclass() {
		assert_eq!(
			decode_reply(&BRIGHTNESS_ACK, 0x74, 0x03),
			Err(CodecError::AddressMismatch {
				field: AddressField::Class,
				expected: 0x74,
				found: 0x78,
			})
		);
		assert_eq!(
			decode_reply(&BRIGHTNESS_ACK, 0x78, 0x03),
			Err(CodecError::AddressMismatch {
				field: AddressField::Subclass,
				expected: 0x03,
				found: 0x02,
			})
		);
	}

	#[test]
	fn error_return_is_a_failure() {
		let reply = Frame::new(0x78, 0x02, ERROR_RETURN, 0x01, 1);
		assert_eq!(
			decode_reply(&reply.buf, 0x78, 0x02),
			Err(CodecError::AbnormalReturn { flag: ERROR_RETURN })
		);

		let echoed = Frame::new(0x78, 0x02, WRITE_FLAG, 0x64, 1);
		assert_eq!(
			decode_unrouted(&echoed.buf),
			Err(CodecError::AbnormalReturn { flag: WRITE_FLAG })
		);
	}

	#[test]
	fn every_data_bit_is_covered_by_checksum() {
		for bit in 0..8 {
			let mut buf = BRIGHTNESS_ACK;
			buf[OFFSET_DATA] ^= 1 << bit;
			let result = decode_reply(&buf, 0x78, 0x02);
			assert!(
				matches!(result, Err(CodecError::ChecksumMismatch { found: 0xB4, .. })),
				"bit {bit}"
			);
		}
	}

	#[test]
	fn checksum_checked_before_end() {
		let mut buf = BRIGHTNESS_ACK;
		buf[7] = 0x00;
		buf[8] = 0x00;
		assert_eq!(
			decode_reply(&buf, 0x78, 0x02),
			Err(CodecError::ChecksumMismatch {
				expected: 0xB4,
				found: 0x00
			})
		);
	}
}
