pub mod commands;
pub mod hex;
pub mod packet;
