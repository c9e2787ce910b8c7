pub mod reader;
pub mod writer;

pub use reader::{CommandReader, DeviceReader, FileReader};
pub use writer::PrivilegedTeeWriter;
