//! Sketch Tools
//!
//! Helpers for developing an Arduino-class sketch:
//!
//! - **apply-env**: fill `<<KEY>>` placeholders in `sketch/sketch.ino` from
//!   `python/.env`, writing `sketch/processed_sketch.ino`
//! - **read-logs**: print timestamped lines from the board's serial port
//!   (requires the `serial` feature and libudev on Linux)
//!
//! # Usage
//!
//! ```bash
//! # Write the processed sketch for the project in the current directory
//! apply-env
//!
//! # Same, for another checkout
//! apply-env --root ~/src/weather-station
//!
//! # Auto-detect the board and read logs at 9600 baud
//! read-logs
//!
//! # Explicit port, baud rate and read timeout
//! read-logs -p /dev/ttyACM0 -b 115200 -t 0.5
//! ```

pub mod config;
pub mod error;
pub mod serial;
pub mod sketch;

pub use error::{Error, FileKind, Result};
