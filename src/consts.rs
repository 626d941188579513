pub const BEGIN: u8 = 0xF0;
pub const END: u8 = 0xFF;
pub const DEVICE_ADDR: u8 = 0x36;

pub const WRITE_FLAG: u8 = 0x00;
pub const READ_FLAG: u8 = 0x01;
pub const NORMAL_RETURN: u8 = 0x03;
pub const ERROR_RETURN: u8 = 0x04;

/// Acknowledgement value returned for a completed write.
pub const ACK_VALUE: u64 = 0x01;

/// BEGIN, SIZE, DEV, CLASS, SUBCLASS, FLAG, CHECK, END.
pub const FRAME_OVERHEAD: usize = 8;
/// SIZE counts DEV, CLASS, SUBCLASS, FLAG and the payload.
pub const SIZE_OVERHEAD: usize = 4;
/// BEGIN, SIZE, CHECK, END sit outside of SIZE.
pub const SIZE_FRAMING: usize = 4;

pub const PAYLOAD_WIDTH: usize = 1;
pub const MAX_PAYLOAD_WIDTH: usize = u8::MAX as usize - SIZE_OVERHEAD;
pub const MIN_FRAME_LEN: usize = FRAME_OVERHEAD + PAYLOAD_WIDTH;

pub const OFFSET_BEGIN: usize = 0;
pub const OFFSET_SIZE: usize = 1;
pub const OFFSET_DEVICE: usize = 2;
pub const OFFSET_CLASS: usize = 3;
pub const OFFSET_SUBCLASS: usize = 4;
pub const OFFSET_FLAG: usize = 5;
pub const OFFSET_DATA: usize = 6;

pub const VERSION_WIDTH: usize = 3;
