//! openlst-framer: frame OpenLST packets and pace them out to a radio.
//!
//! The driver simulates the host side of the encoder:
//! - Packets arrive every `arrival_ticks` scheduling ticks
//! - Each tick offers the encoder `capacity` bytes of downstream room
//! - Emitted bytes are appended to the output file as the radio would see them

mod config;
mod input_gen;

use config::Config;
use openlst_framer_core::{Encoder, Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Err(e) = run(&args) {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let config = Config::from_args(args).map_err(Error::Config)?;
    init_logging(&config.log_level);

    if config.print_config {
        config.print();
    }

    let packets = match &config.input_file {
        Some(path) => input_gen::read_packet_file(path)?,
        None => input_gen::generate_packets(
            config.seed,
            config.packet_count,
            config.hwid,
            config.max_payload,
        ),
    };
    tracing::info!(packets = packets.len(), seed = config.seed, "starting run");

    let mut encoder = Encoder::new(config.frame)?;
    let mut out = BufWriter::new(File::create(&config.output_file)?);
    let mut tick_buf = vec![0u8; config.capacity];

    let mut arrivals = packets.iter();
    let mut remaining = packets.len();
    let mut tick: u64 = 0;

    while remaining > 0 || !encoder.is_idle() {
        if tick % config.arrival_ticks == 0 {
            if let Some(raw) = arrivals.next() {
                remaining -= 1;
                // Rejections are counted in the metrics; the run continues
                if let Err(e) = encoder.push_packet(raw) {
                    tracing::debug!(tick, "skipping packet: {}", e);
                }
            }
        }

        let (n, _discard) = encoder.emit_into(&mut tick_buf);
        out.write_all(&tick_buf[..n])?;
        tick += 1;
    }

    out.flush()?;
    encoder.metrics_mut().complete();

    let metrics = encoder.metrics();
    tracing::info!(
        ticks = metrics.ticks,
        bytes = metrics.bytes_emitted,
        output = %config.output_file.display(),
        "run complete"
    );

    if config.print_metrics {
        metrics.print_summary();
    }
    metrics.print_result();

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
