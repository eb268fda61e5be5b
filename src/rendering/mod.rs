pub mod png_io;
pub mod requantize;

pub use png_io::{decode_png, encode_png, read_png, write_png};
pub use requantize::{requantize_buffer, requantize_channel, requantize_samples};
