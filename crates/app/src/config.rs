//! Configuration for the openlst-framer application.
//!
//! Handles parsing command-line arguments and generating sensible defaults
//! (including randomized defaults that are reproducible with a seed).
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments, using intelligent defaults.
//! All defaults are printed so runs are reproducible.

use openlst_framer_core::FrameConfig;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Complete configuration for an encoding run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Files ===
    /// Packet file, one hex-encoded packet per line (None = generate packets)
    pub input_file: Option<PathBuf>,

    /// Output file for the transmitted byte stream
    pub output_file: PathBuf,

    // === Packet generation ===
    /// Seed for generated packets and randomized defaults
    pub seed: u64,

    /// Number of packets to generate
    pub packet_count: usize,

    /// Largest generated application payload in bytes
    pub max_payload: usize,

    /// HWID used for generated packets
    pub hwid: u16,

    // === Pacing ===
    /// Bytes the simulated radio accepts per tick
    pub capacity: usize,

    /// A new packet arrives every this many ticks
    pub arrival_ticks: u64,

    // === Framing ===
    pub frame: FrameConfig,

    // === Behavior ===
    /// tracing level filter (overridden by RUST_LOG)
    pub log_level: String,

    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print detailed metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Parse configuration from command-line arguments.
    ///
    /// If no arguments provided, generates randomized defaults using a time-based seed.
    /// If --seed is provided, uses that seed for all randomness (fully deterministic).
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut input_file: Option<PathBuf> = None;
        let mut output_file: Option<PathBuf> = None;
        let mut seed: Option<u64> = None;
        let mut packet_count: Option<usize> = None;
        let mut max_payload: Option<usize> = None;
        let mut hwid: Option<u16> = None;
        let mut capacity: Option<usize> = None;
        let mut arrival_ticks: Option<u64> = None;
        let mut frame = FrameConfig::default();
        let mut log_level = String::from("info");
        let mut print_config = false;
        let mut print_metrics = true;

        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--in" => input_file = Some(PathBuf::from(value(args, &mut i, flag)?)),
                "--out" => output_file = Some(PathBuf::from(value(args, &mut i, flag)?)),
                "--seed" => seed = Some(number(args, &mut i, flag)?),
                "--packets" => packet_count = Some(number(args, &mut i, flag)?),
                "--max-payload" => max_payload = Some(number(args, &mut i, flag)?),
                "--hwid" => hwid = Some(number(args, &mut i, flag)?),
                "--capacity" => capacity = Some(number(args, &mut i, flag)?),
                "--arrival-ticks" => arrival_ticks = Some(number(args, &mut i, flag)?),
                "--preamble-bytes" => frame.preamble_bytes = number(args, &mut i, flag)?,
                "--sync-words" => frame.sync_words = number(args, &mut i, flag)?,
                "--sync-high" => frame.sync_byte_high = number(args, &mut i, flag)?,
                "--sync-low" => frame.sync_byte_low = number(args, &mut i, flag)?,
                "--flags" => frame.flags = number(args, &mut i, flag)?,
                "--no-fec" => frame.fec_enabled = false,
                "--no-whitening" => frame.whitening_enabled = false,
                "--log-level" => {
                    let level = value(args, &mut i, flag)?.to_ascii_lowercase();
                    if !LOG_LEVELS.contains(&level.as_str()) {
                        return Err(format!("invalid log level: {}", level));
                    }
                    log_level = level;
                }
                "--print-config" => print_config = true,
                "--no-metrics" => print_metrics = false,
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => return Err(format!("unknown argument: {}", flag)),
            }
            i += 1;
        }

        if capacity == Some(0) {
            return Err("--capacity must be at least 1".to_string());
        }
        if arrival_ticks == Some(0) {
            return Err("--arrival-ticks must be at least 1".to_string());
        }
        if let Some(max) = max_payload {
            if max > crate::input_gen::MAX_PAYLOAD {
                return Err(format!(
                    "--max-payload must be at most {}",
                    crate::input_gen::MAX_PAYLOAD
                ));
            }
        }
        frame.validate().map_err(|e| e.to_string())?;

        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|t| t.as_millis() as u64)
                .unwrap_or(0)
        });

        // Generate defaults using seed
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let config = Config {
            input_file,
            output_file: output_file.unwrap_or_else(|| PathBuf::from("./tx.bin")),
            seed,
            packet_count: packet_count.unwrap_or(16),
            max_payload: max_payload.unwrap_or(32),
            hwid: hwid.unwrap_or_else(|| rng.gen()),
            capacity: capacity.unwrap_or_else(|| rng.gen_range(8..=64)),
            arrival_ticks: arrival_ticks.unwrap_or_else(|| rng.gen_range(1..=8)),
            frame,
            log_level,
            print_config,
            print_metrics,
        };

        Ok(config)
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.input_file {
            Some(path) => println!("Input file:  {}", path.display()),
            None => println!("Input file:  (generate packets)"),
        }
        println!("Output file: {}", self.output_file.display());
        println!();
        println!("=== Packets ===");
        println!("Seed: {}", self.seed);
        println!("Count: {}", self.packet_count);
        println!("Max payload: {} bytes", self.max_payload);
        println!("HWID: {:#06x}", self.hwid);
        println!();
        println!("=== Framing ===");
        println!("Preamble: {} bytes", self.frame.preamble_bytes);
        println!(
            "Sync word: {:#04x} {:#04x} x {}",
            self.frame.sync_byte_high, self.frame.sync_byte_low, self.frame.sync_words
        );
        println!("Flags: {:#04x}", self.frame.flags);
        println!("Whitening: {}", on_off(self.frame.whitening_enabled));
        println!("FEC: {}", on_off(self.frame.fec_enabled));
        println!();
        println!("=== Pacing ===");
        println!("Capacity: {} bytes/tick", self.capacity);
        println!("Arrival: one packet every {} ticks", self.arrival_ticks);
        println!();
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

/// Advance to the flag's value.
fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires a value", flag))
}

/// Parse the flag's value as an unsigned number, decimal or 0x-prefixed hex.
fn number<T: ParseUnsigned>(args: &[String], i: &mut usize, flag: &str) -> Result<T, String> {
    let raw = value(args, i, flag)?;
    T::parse_unsigned(raw)
        .ok_or_else(|| format!("invalid {}: {}", flag.trim_start_matches("--"), raw))
}

trait ParseUnsigned: Sized {
    fn parse_unsigned(s: &str) -> Option<Self>;
}

macro_rules! impl_parse_unsigned {
    ($($t:ty),*) => {
        $(impl ParseUnsigned for $t {
            fn parse_unsigned(s: &str) -> Option<Self> {
                match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                    Some(hex) => <$t>::from_str_radix(hex, 16).ok(),
                    None => s.parse().ok(),
                }
            }
        })*
    };
}

impl_parse_unsigned!(u8, u16, u32, u64, usize);

fn print_help() {
    println!("openlst-framer: Frame OpenLST packets and pace the transmit byte stream");
    println!();
    println!("USAGE:");
    println!("    openlst-framer [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --in <PATH>             Packet file, one hex packet per line (default: generate)");
    println!("    --out <PATH>            Output byte stream (default: ./tx.bin)");
    println!("    --seed <N>              Random seed for determinism");
    println!();
    println!("    --packets <N>           Packets to generate (default: 16)");
    println!("    --max-payload <N>       Largest generated payload (default: 32)");
    println!("    --hwid <N>              HWID for generated packets (default: random)");
    println!();
    println!("    --capacity <N>          Bytes accepted per tick (default: random 8-64)");
    println!("    --arrival-ticks <N>     Ticks between packet arrivals (default: random 1-8)");
    println!();
    println!("    --preamble-bytes <N>    Preamble length (default: 4)");
    println!("    --sync-words <N>        Sync word repetitions (default: 2)");
    println!("    --sync-high <N>         First sync byte (default: 0xd3)");
    println!("    --sync-low <N>          Second sync byte (default: 0x91)");
    println!("    --flags <N>             Flags byte (default: 0xc0)");
    println!("    --no-fec                Disable forward error correction");
    println!("    --no-whitening          Disable PN9 whitening");
    println!();
    println!("    --log-level <LEVEL>     error|warn|info|debug|trace (default: info)");
    println!("    --print-config          Print resolved configuration");
    println!("    --no-metrics            Don't print metrics summary");
    println!("    --help, -h              Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    openlst-framer                                  # Run with random defaults");
    println!("    openlst-framer --seed 42                        # Deterministic run");
    println!("    openlst-framer --in packets.hex --out tx.bin    # Frame specific packets");
    println!("    openlst-framer --no-fec --no-whitening          # Plain frames");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_with_seed() {
        let config = Config::from_args(&args(&["--seed", "42"])).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.packet_count, 16);
        assert_eq!(config.frame, FrameConfig::default());
        assert!((8..=64).contains(&config.capacity));
        assert!((1..=8).contains(&config.arrival_ticks));
    }

    #[test]
    fn test_seed_makes_defaults_reproducible() {
        let a = Config::from_args(&args(&["--seed", "7"])).unwrap();
        let b = Config::from_args(&args(&["--seed", "7"])).unwrap();
        assert_eq!(a.hwid, b.hwid);
        assert_eq!(a.capacity, b.capacity);
    }

    #[test]
    fn test_framing_flags() {
        let config = Config::from_args(&args(&[
            "--seed",
            "1",
            "--preamble-bytes",
            "8",
            "--sync-words",
            "1",
            "--sync-high",
            "0x2d",
            "--sync-low",
            "0xD4",
            "--flags",
            "0x40",
            "--no-fec",
            "--no-whitening",
        ]))
        .unwrap();

        assert_eq!(config.frame.preamble_bytes, 8);
        assert_eq!(config.frame.sync_words, 1);
        assert_eq!(config.frame.sync_byte_high, 0x2D);
        assert_eq!(config.frame.sync_byte_low, 0xD4);
        assert_eq!(config.frame.flags, 0x40);
        assert!(!config.frame.fec_enabled);
        assert!(!config.frame.whitening_enabled);
    }

    #[test]
    fn test_negative_count_rejected() {
        let err = Config::from_args(&args(&["--preamble-bytes", "-1"])).unwrap_err();
        assert!(err.contains("preamble-bytes"));
    }

    #[test]
    fn test_oversized_byte_rejected() {
        assert!(Config::from_args(&args(&["--flags", "256"])).is_err());
    }

    #[test]
    fn test_prefix_limit_rejected() {
        assert!(Config::from_args(&args(&["--preamble-bytes", "5000"])).is_err());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(Config::from_args(&args(&["--capacity", "0"])).is_err());
    }

    #[test]
    fn test_missing_value() {
        let err = Config::from_args(&args(&["--out"])).unwrap_err();
        assert_eq!(err, "--out requires a value");
    }

    #[test]
    fn test_unknown_argument() {
        assert!(Config::from_args(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_log_level() {
        let config = Config::from_args(&args(&["--seed", "1", "--log-level", "DEBUG"])).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(Config::from_args(&args(&["--log-level", "loud"])).is_err());
    }
}
