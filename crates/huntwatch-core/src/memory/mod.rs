pub mod layout;
mod process;
mod reader;

#[cfg(test)]
pub mod mock;

pub use process::*;
pub use reader::{ByteBuffer, ReadMemory};

#[cfg(test)]
pub use mock::{MockMemory, MockMemoryBuilder, MockProcessProvider};
