//! Simple serial logger for the Arduino sketch.
//!
//! Continuously reads lines from the serial port and prints them to stdout,
//! prefixed with a timestamp. Stops gracefully on Ctrl+C.

use clap::Parser;
use colored::Colorize;
use std::io;
use std::path::{Path, PathBuf};

use sketch_tools::config::Config;
use sketch_tools::serial::{self, interrupt, PortConfig, SerialConnection};

/// Read Arduino serial logs
#[derive(Parser)]
#[command(name = "read-logs")]
#[command(version)]
#[command(about = "Read Arduino serial logs")]
struct Cli {
    /// Serial port (e.g. COM3 on Windows, /dev/ttyUSB0 on Linux).
    /// If omitted, tries to auto-detect an Arduino or USB port.
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate (default: 9600)
    #[arg(short, long)]
    baud: Option<u32>,

    /// Read timeout in seconds (default: 1.0)
    #[arg(short, long)]
    timeout: Option<f64>,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Config file with [serial] defaults (default: ./sketch-tools.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "[ERROR]".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> sketch_tools::Result<()> {
    if cli.list_ports {
        return serial::print_ports();
    }

    let config = Config::discover(Path::new("."), cli.config.as_deref())?;
    let settings = config
        .serial
        .with_overrides(cli.port, cli.baud, cli.timeout)?;
    let baud_rate = settings.baud;
    let port_path = serial::resolve_port(settings.port.as_deref())?;

    let port_config = PortConfig::new(&port_path)
        .with_baud_rate(baud_rate)
        .with_timeout(settings.timeout);
    let connection = SerialConnection::open(port_config)?;
    let stop = interrupt::install()?;

    println!(
        "Listening on {} @ {} baud (Ctrl-C to quit)…",
        port_path, baud_rate
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = serial::tail(connection, &mut out, stop)?;
    log::info!("Read {} lines from {}", summary.lines, port_path);

    Ok(())
}
