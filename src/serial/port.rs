//! Serial port discovery, selection and connection
//!
//! Port selection is plain data and always available. Opening and
//! enumerating real devices needs the `serial` feature.

use crate::config::{DEFAULT_BAUD, DEFAULT_TIMEOUT_SECS};
use std::fmt;
use std::time::Duration;

#[cfg(feature = "serial")]
use crate::error::{Error, Result};
#[cfg(feature = "serial")]
use colored::Colorize;
#[cfg(feature = "serial")]
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
#[cfg(feature = "serial")]
use std::io::{self, Read};

/// Description keywords that mark a likely Arduino connection
const PORT_HINTS: &[&str] = &["Arduino", "USB"];

/// Configuration for serial port connection
#[derive(Debug, Clone, PartialEq)]
pub struct PortConfig {
    /// Serial port path (e.g., /dev/ttyACM0, COM3)
    pub port_path: String,
    /// Baud rate (default: 9600)
    pub baud_rate: u32,
    /// Upper bound on a single blocking read
    pub timeout: Duration,
}

impl PortConfig {
    pub fn new(port_path: &str) -> Self {
        Self {
            port_path: port_path.to_string(),
            baud_rate: DEFAULT_BAUD,
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Information about a detected serial port
#[derive(Debug, Clone, PartialEq)]
pub struct PortInfo {
    pub path: String,
    pub kind: PortKind,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    UsbSerial,
    PciSerial,
    Bluetooth,
    Unknown,
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortKind::UsbSerial => write!(f, "USB Serial"),
            PortKind::PciSerial => write!(f, "PCI Serial"),
            PortKind::Bluetooth => write!(f, "Bluetooth"),
            PortKind::Unknown => write!(f, "Unknown"),
        }
    }
}

impl PortInfo {
    /// Port with no USB details
    pub fn new(path: &str, kind: PortKind) -> Self {
        Self {
            path: path.to_string(),
            kind,
            manufacturer: None,
            product: None,
            serial_number: None,
            vid: None,
            pid: None,
        }
    }

    /// Human readable description: product, then manufacturer, then kind
    pub fn description(&self) -> String {
        self.product
            .clone()
            .or_else(|| self.manufacturer.clone())
            .unwrap_or_else(|| self.kind.to_string())
    }

    /// Whether this port looks like an Arduino-class or USB device
    pub fn looks_like_arduino(&self) -> bool {
        if self.kind == PortKind::UsbSerial {
            return true;
        }
        let description = self.description();
        PORT_HINTS.iter().any(|hint| description.contains(hint))
    }
}

/// Pick the first Arduino/USB-looking port, else the first port at all
pub fn choose_port(ports: &[PortInfo]) -> Option<&PortInfo> {
    ports
        .iter()
        .find(|p| p.looks_like_arduino())
        .or_else(|| ports.first())
}

/// Open serial connection. The port is closed when this is dropped.
#[cfg(feature = "serial")]
pub struct SerialConnection {
    port: Box<dyn SerialPort>,
    config: PortConfig,
}

#[cfg(feature = "serial")]
impl SerialConnection {
    /// Open at the configured baud rate and timeout, 8N1, no flow control
    pub fn open(config: PortConfig) -> Result<Self> {
        let port = serialport::new(&config.port_path, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.timeout)
            .open()
            .map_err(|e| Error::PortOpen {
                port: config.port_path.clone(),
                source: e.into(),
            })?;

        log::info!(
            "Opened {} at {} baud (timeout {:?})",
            config.port_path,
            config.baud_rate,
            config.timeout
        );
        Ok(Self { port, config })
    }
}

#[cfg(feature = "serial")]
impl Read for SerialConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}

#[cfg(feature = "serial")]
impl Drop for SerialConnection {
    fn drop(&mut self) {
        log::debug!("Closing serial port {}", self.config.port_path);
    }
}

/// List all available serial ports
#[cfg(feature = "serial")]
pub fn list_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports().map_err(|e| Error::PortEnumeration(e.into()))?;

    let port_infos = ports
        .into_iter()
        .map(|p| match p.port_type {
            serialport::SerialPortType::UsbPort(info) => PortInfo {
                path: p.port_name,
                kind: PortKind::UsbSerial,
                manufacturer: info.manufacturer,
                product: info.product,
                serial_number: info.serial_number,
                vid: Some(info.vid),
                pid: Some(info.pid),
            },
            serialport::SerialPortType::PciPort => PortInfo::new(&p.port_name, PortKind::PciSerial),
            serialport::SerialPortType::BluetoothPort => {
                PortInfo::new(&p.port_name, PortKind::Bluetooth)
            }
            serialport::SerialPortType::Unknown => PortInfo::new(&p.port_name, PortKind::Unknown),
        })
        .collect();

    Ok(port_infos)
}

/// Use the explicit port if given, otherwise auto-detect one
#[cfg(feature = "serial")]
pub fn resolve_port(explicit: Option<&str>) -> Result<String> {
    if let Some(port) = explicit {
        return Ok(port.to_string());
    }

    let ports = list_ports()?;
    log::debug!("Enumerated {} serial ports", ports.len());

    let chosen = choose_port(&ports).ok_or(Error::NoPortFound)?;
    log::info!("Auto-detected {} ({})", chosen.path, chosen.description());
    Ok(chosen.path.clone())
}

/// Print formatted list of available serial ports
#[cfg(feature = "serial")]
pub fn print_ports() -> Result<()> {
    let ports = list_ports()?;

    if ports.is_empty() {
        println!("{}", "No serial ports found".yellow());
        println!("\n{}", "Troubleshooting tips:".cyan().bold());
        println!("  1. Connect the board over USB");
        println!("  2. Check if the device is recognized: ls -la /dev/ttyUSB* /dev/ttyACM*");
        println!("  3. Add your user to the 'dialout' group: sudo usermod -aG dialout $USER");
        return Ok(());
    }

    let suggested = choose_port(&ports).map(|p| p.path.clone());

    println!("{}", "Available Serial Ports:".green().bold());
    println!("{}", "=".repeat(60));

    for port in &ports {
        let marker = if suggested.as_deref() == Some(port.path.as_str()) {
            " (auto-detect)".cyan().to_string()
        } else {
            String::new()
        };
        println!("\n{}: {}{}", "Port".cyan(), port.path.white().bold(), marker);
        println!("  Type: {}", port.kind);

        if let Some(ref mfg) = port.manufacturer {
            println!("  Manufacturer: {}", mfg);
        }
        if let Some(ref prod) = port.product {
            println!("  Product: {}", prod);
        }
        if let Some(ref sn) = port.serial_number {
            println!("  Serial: {}", sn);
        }
        if let (Some(vid), Some(pid)) = (port.vid, port.pid) {
            println!("  VID:PID: {:04x}:{:04x}", vid, pid);
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("{}", "Use: read-logs -p <PORT> to start reading".yellow());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usb(path: &str, product: &str) -> PortInfo {
        PortInfo {
            product: Some(product.to_string()),
            vid: Some(0x2341),
            pid: Some(0x0043),
            ..PortInfo::new(path, PortKind::UsbSerial)
        }
    }

    #[test]
    fn test_config_builder() {
        let config = PortConfig::new("/dev/ttyACM0")
            .with_baud_rate(115200)
            .with_timeout(Duration::from_millis(500));

        assert_eq!(config.port_path, "/dev/ttyACM0");
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_config_defaults() {
        let config = PortConfig::new("COM3");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_description_fallbacks() {
        assert_eq!(usb("/dev/ttyACM0", "Arduino Uno").description(), "Arduino Uno");

        let mut port = PortInfo::new("/dev/ttyS0", PortKind::PciSerial);
        assert_eq!(port.description(), "PCI Serial");
        port.manufacturer = Some("Acme".to_string());
        assert_eq!(port.description(), "Acme");
    }

    #[test]
    fn test_choose_prefers_arduino_or_usb() {
        let ports = vec![
            PortInfo::new("/dev/ttyS0", PortKind::Unknown),
            usb("/dev/ttyACM0", "Arduino Uno"),
            usb("/dev/ttyUSB0", "CP2102"),
        ];
        assert_eq!(choose_port(&ports).unwrap().path, "/dev/ttyACM0");
    }

    #[test]
    fn test_choose_by_description_hint() {
        let mut bt = PortInfo::new("/dev/rfcomm0", PortKind::Bluetooth);
        bt.product = Some("USB bridge".to_string());
        let ports = vec![PortInfo::new("/dev/ttyS0", PortKind::Unknown), bt];
        assert_eq!(choose_port(&ports).unwrap().path, "/dev/rfcomm0");
    }

    #[test]
    fn test_choose_falls_back_to_first() {
        let ports = vec![
            PortInfo::new("/dev/ttyS0", PortKind::PciSerial),
            PortInfo::new("/dev/ttyS1", PortKind::Unknown),
        ];
        assert_eq!(choose_port(&ports).unwrap().path, "/dev/ttyS0");
    }

    #[test]
    fn test_choose_none_when_empty() {
        assert!(choose_port(&[]).is_none());
    }
}
