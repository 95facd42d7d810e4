use std::path::PathBuf;

use analyzer::{Analyzer, BridgeMeasurement, DetectorReading};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::{warn, Level};
use transport::{CommandChannel, SerialTransport, Transport};

mod config;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML file with serial settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Serial port for the analyzer
    #[arg(short, long)]
    port: Option<String>,
    /// Baud rate
    #[arg(long)]
    baud: Option<u32>,
    /// Read window per command in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Maximum bytes read back per command
    #[arg(long)]
    max_read: Option<usize>,
    /// More log output (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Gets or sets the DDS frequency in Hz
    Freq { hz: Option<i64> },
    /// Gets or sets the bridge switch (1 = reference, 2 = antenna)
    Switch { position: Option<i64> },
    /// Reads the detector at the current switch position
    Raw,
    /// Measures the antenna impedance
    Measure {
        /// Number of measurements to take
        #[arg(short, long, default_value_t = 1)]
        count: u32,
        /// Put the switch back on the reference node afterwards
        #[arg(long)]
        reset: bool,
    },
    /// Sends a raw command line and prints the reply
    Send { text: String },
    /// Prints the firmware help banner
    Usage,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn print_reading(label: &str, r: &DetectorReading) {
    println!(
        "{label}: vmag={} vphs={} ratio={:.4} phase={:.2} deg",
        r.vmag, r.vphs, r.ratio, r.degrees
    );
}

fn print_measurement(m: &BridgeMeasurement) {
    print_reading("ref", &m.reference);
    print_reading("ant", &m.antenna);
    println!("Z = {:.2} {:+.2}j ohm", m.resistance(), m.reactance());
}

fn frequency<T: Transport>(analyzer: &Analyzer<T>, hz: Option<i64>) -> Result<()> {
    if let Some(hz) = hz {
        analyzer.set_frequency(hz)?;
    }
    println!("{}", analyzer.get_frequency()?);
    Ok(())
}

fn switch<T: Transport>(analyzer: &Analyzer<T>, position: Option<i64>) -> Result<()> {
    if let Some(position) = position {
        analyzer.set_switch(position)?;
    }
    println!("{}", analyzer.get_switch()?);
    Ok(())
}

fn raw<T: Transport>(analyzer: &Analyzer<T>) -> Result<()> {
    let position = analyzer.get_switch()?;
    print_reading(&format!("switch {position}"), &analyzer.read_detector()?);
    Ok(())
}

fn measure<T: Transport>(analyzer: &Analyzer<T>, count: u32, reset: bool) -> Result<()> {
    let outcome = (0..count).try_for_each(|_| {
        print_measurement(&analyzer.measure()?);
        Ok(())
    });
    if reset {
        if let Err(e) = analyzer.reset() {
            // Report the measurement failure first if there was one
            if outcome.is_ok() {
                return Err(e).context("Failed to reset the bridge switch");
            }
            warn!("Failed to reset the bridge switch: {e}");
        }
    }
    outcome
}

fn send<T: Transport>(channel: &CommandChannel<T>, text: &str) -> Result<()> {
    for line in channel.send(text)? {
        println!("{line}");
    }
    Ok(())
}

fn usage<T: Transport>(analyzer: &Analyzer<T>) -> Result<()> {
    for line in analyzer.help()? {
        println!("{line}");
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse the CLI
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let cfg = config::load(
        cli.config.as_deref(),
        config::Overrides {
            port: cli.port,
            baud_rate: cli.baud,
            read_timeout_ms: cli.timeout_ms,
            max_read_bytes: cli.max_read,
        },
    )?;
    // Try to open the serial port
    let port = SerialTransport::open(&cfg)
        .with_context(|| format!("Failed to open serial port {}", cfg.port))?;
    let channel = CommandChannel::with_config(port, &cfg);
    // Swallow the banner and any stale prompt
    channel.drain().context("Failed to read from the analyzer")?;
    let analyzer = Analyzer::new(&channel);
    // Dispatch on action
    let outcome = match cli.command {
        Command::Freq { hz } => frequency(&analyzer, hz),
        Command::Switch { position } => switch(&analyzer, position),
        Command::Raw => raw(&analyzer),
        Command::Measure { count, reset } => measure(&analyzer, count, reset),
        Command::Send { text } => send(&channel, &text),
        Command::Usage => usage(&analyzer),
    };
    let closed = channel.close();
    outcome?;
    Ok(closed?)
}
