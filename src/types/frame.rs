use crate::consts::*;

/// An encoded outbound frame, ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
	pub buf: Vec<u8>,
}

impl Frame {
	/// Lays out `data` as a `width` byte big-endian payload between the
	/// fixed header and trailer.
	///
	/// Range checks belong to the caller: `data` must fit in `width` bytes,
	/// otherwise only its low `width` bytes are sent.
	///
	/// # Panics
	///
	/// If `width` is zero or larger than the size byte can describe
	/// ([`MAX_PAYLOAD_WIDTH`]).
	pub fn new(class_addr: u8, subclass_addr: u8, flag: u8, data: u64, width: usize) -> Self {
		assert!(
			(1..=MAX_PAYLOAD_WIDTH).contains(&width),
			"payload width {width} outside 1..={MAX_PAYLOAD_WIDTH}"
		);
		debug_assert!(
			width >= 8 || data >> (8 * width) == 0,
			"data does not fit in {width} bytes"
		);

		let mut buf = Vec::with_capacity(FRAME_OVERHEAD + width);
		buf.push(BEGIN);
		buf.push((width + SIZE_OVERHEAD) as u8);
		buf.push(DEVICE_ADDR);
		buf.push(class_addr);
		buf.push(subclass_addr);
		buf.push(flag);

		let be = data.to_be_bytes();
		if width > be.len() {
			buf.resize(buf.len() + width - be.len(), 0);
			buf.extend_from_slice(&be);
		} else {
			buf.extend_from_slice(&be[be.len() - width..]);
		}

		let check = checksum(class_addr, subclass_addr, flag, &buf[OFFSET_DATA..]);
		buf.push(check);
		buf.push(END);
		debug_assert_eq!(buf.len(), buf[OFFSET_SIZE] as usize + SIZE_FRAMING);
		Frame { buf }
	}

	pub fn class_addr(&self) -> u8 {
		self.buf[OFFSET_CLASS]
	}

	pub fn subclass_addr(&self) -> u8 {
		self.buf[OFFSET_SUBCLASS]
	}

	pub fn flag(&self) -> u8 {
		self.buf[OFFSET_FLAG]
	}

	pub fn data(&self) -> &[u8] {
		&self.buf[OFFSET_DATA..self.buf.len() - 2]
	}

	pub fn check(&self) -> u8 {
		self.buf[self.buf.len() - 2]
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.buf
	}
}

/// Sum of the addressed fields and the payload, modulo 256.
///
/// The payload is added as a single big-endian integer, so only its least
/// significant byte contributes to the result.
pub fn checksum(class_addr: u8, subclass_addr: u8, flag: u8, data: &[u8]) -> u8 {
	let low = data.last().copied().unwrap_or(0);
	DEVICE_ADDR
		.wrapping_add(class_addr)
		.wrapping_add(subclass_addr)
		.wrapping_add(flag)
		.wrapping_add(low)
}

/// A structurally valid reply, as returned by the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
	pub class_addr: u8,
	pub subclass_addr: u8,
	pub data: Vec<u8>,
}

impl Reply {
	/// Payload as a big-endian integer, or `None` if it needs more than 64 bits.
	pub fn value(&self) -> Option<u64> {
		let start = self.data.iter().position(|&b| b != 0).unwrap_or(self.data.len());
		let significant = &self.data[start..];
		if significant.len() > 8 {
			return None;
		}
		Some(significant.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
	}
}
