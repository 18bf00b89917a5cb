use askwave_core::bits::{bits_to_bytes, format_bits, parse_bits};
use askwave_core::resample::resample_audio;
use askwave_core::{AudioSink, LinkConfig, ModemError, Receiver, Transmitter};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

mod settings;
mod wav;

use settings::Settings;
use wav::{read_wav, WavSink, WavSource};

/// Payload sent when neither --bits nor --input is given
const DEFAULT_BITS: &str = "10101010";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Config file error: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Modem(#[from] ModemError),

    #[error("Unsupported audio: {0}")]
    Unsupported(String),
}

#[derive(Parser)]
#[command(name = "askwave")]
#[command(about = "Acoustic ASK modem with UART-style start/stop framing")]
struct Cli {
    #[command(flatten)]
    link: LinkArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Link parameters; override values from --config
#[derive(Args, Debug, Default)]
struct LinkArgs {
    /// JSON file with link parameters
    #[arg(long, global = true, value_name = "FILE.JSON")]
    config: Option<PathBuf>,

    /// Sample rate in Hz (default: 44100)
    #[arg(long, global = true)]
    sample_rate: Option<u32>,

    /// Carrier frequency in Hz (default: 18000)
    #[arg(long, global = true)]
    carrier: Option<f64>,

    /// Bit duration in seconds (default: 0.1)
    #[arg(long, global = true)]
    bit_duration: Option<f64>,

    /// Amplitude for logic 0 (default: 0)
    #[arg(long, global = true)]
    amplitude_low: Option<f32>,

    /// Amplitude for logic 1 (default: 1.2)
    #[arg(long, global = true)]
    amplitude_high: Option<f32>,

    /// Fixed detection threshold on raw sample magnitude
    #[arg(long, global = true, conflicts_with = "threshold_fraction")]
    threshold: Option<f32>,

    /// Detection threshold as a fraction of peak magnitude (default: 0.3)
    #[arg(long, global = true)]
    threshold_fraction: Option<f32>,

    /// Logic-high idle time after each frame in seconds (default: 0.5)
    #[arg(long, global = true)]
    idle_gap: Option<f64>,

    /// Payload bits per frame (default: 8)
    #[arg(long, global = true)]
    payload_length: Option<usize>,

    /// Number of times the message is sent (default: 1)
    #[arg(long, global = true)]
    repeat: Option<usize>,
}

impl LinkArgs {
    fn settings(&self) -> Settings {
        Settings {
            sample_rate: self.sample_rate,
            carrier_frequency: self.carrier,
            bit_duration: self.bit_duration,
            amplitude_low: self.amplitude_low,
            amplitude_high: self.amplitude_high,
            threshold: self.threshold,
            threshold_fraction: self.threshold_fraction,
            idle_gap_duration: self.idle_gap,
            payload_length: self.payload_length,
            frame_repeat_count: self.repeat,
        }
    }

    fn link_config(&self) -> Result<LinkConfig, CliError> {
        let base = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        base.overlay(self.settings()).to_link_config()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Modulate bits into a WAV audio file
    Transmit {
        /// Payload bits, e.g. 10101010 (default when no input is given)
        #[arg(long, conflicts_with = "input")]
        bits: Option<String>,

        /// Binary file to send, framed payload_length bits at a time
        #[arg(short, long, value_name = "INPUT.BIN")]
        input: Option<PathBuf>,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,
    },

    /// Recover framed bits from a WAV recording
    Receive {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Write decoded payload bits, packed MSB first, to this file
        #[arg(short, long, value_name = "OUTPUT.BIN")]
        output: Option<PathBuf>,

        /// Only use the first SECONDS of the recording (padded with silence if shorter)
        #[arg(long, value_name = "SECONDS")]
        duration: Option<f64>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.link.link_config()?;

    match cli.command {
        Commands::Transmit { bits, input, output } => {
            transmit_command(&config, bits.as_deref(), input.as_deref(), &output)
        }
        Commands::Receive { input, output, duration } => {
            receive_command(&config, &input, output.as_deref(), duration)
        }
    }
}

fn transmit_command(
    config: &LinkConfig,
    bits: Option<&str>,
    input: Option<&Path>,
    output: &Path,
) -> Result<(), CliError> {
    let transmitter = Transmitter::new(*config)?;

    let samples = match input {
        Some(path) => {
            let data = std::fs::read(path)?;
            println!("Read {} bytes from {}", data.len(), path.display());
            transmitter.transmit_bytes(&data)?
        }
        None => {
            let payload = parse_bits(bits.unwrap_or(DEFAULT_BITS))?;
            println!("Payload: {}", format_bits(&payload));
            transmitter.transmit_repeated(&payload)?
        }
    };

    let sample_rate = config.modulation.sample_rate;
    println!(
        "Encoded to {} audio samples ({:.2} s at {} Hz, carrier {} Hz)",
        samples.len(),
        samples.len() as f64 / sample_rate as f64,
        sample_rate,
        config.modulation.carrier_frequency
    );

    WavSink::new(output).play(&samples, sample_rate)?;
    println!("Wrote {}", output.display());
    Ok(())
}

fn receive_command(
    config: &LinkConfig,
    input: &Path,
    output: Option<&Path>,
    duration: Option<f64>,
) -> Result<(), CliError> {
    let receiver = Receiver::new(*config)?;
    let sample_rate = config.modulation.sample_rate;

    let report = match duration {
        Some(seconds) => receiver.capture(&mut WavSource::new(input), seconds)?,
        None => {
            let (samples, file_rate) = read_wav(input)?;
            if file_rate != sample_rate {
                tracing::info!("Resampling {} Hz recording to {} Hz", file_rate, sample_rate);
            }
            let samples = resample_audio(&samples, file_rate, sample_rate);
            println!("Extracted {} samples", samples.len());
            receiver.receive(&samples)?
        }
    };

    for (i, frame) in report.frames.iter().enumerate() {
        println!("Frame {}: {}", i, format_bits(&frame.payload));
    }
    for error in &report.sync_errors {
        tracing::warn!("{}", error);
    }
    if let Some(truncated) = &report.truncated {
        tracing::warn!("{}", truncated);
    }
    println!(
        "Decoded {} frames from {} bits ({} framing errors)",
        report.frames.len(),
        report.bit_count,
        report.sync_errors.len()
    );

    if let Some(path) = output {
        let bits: Vec<bool> = report.payloads().flatten().copied().collect();
        let data = bits_to_bytes(&bits);
        std::fs::write(path, &data)?;
        println!("Wrote {} bytes to {}", data.len(), path.display());
    }

    Ok(())
}
