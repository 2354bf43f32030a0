//! Serial log reading for the Arduino sketch
//!
//! - Resolving the port (explicit or auto-detected)
//! - Opening it at a given baud rate and read timeout
//! - Printing timestamped lines until Ctrl+C

pub mod interrupt;
pub mod monitor;
pub mod port;

pub use monitor::{decode_line, format_line, tail, LineReader, TailSummary};
pub use port::{choose_port, PortConfig, PortInfo, PortKind};

#[cfg(feature = "serial")]
pub use port::{list_ports, print_ports, resolve_port, SerialConnection};
