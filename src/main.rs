//! mphash CLI - lookup3 hashing and minimal perfect hash generation.
//!
//! This is the main entry point for the mphash command-line application.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use mphash::prelude::*;

/// mphash - Jenkins lookup3 hashing and minimal perfect hash tool
#[derive(Parser)]
#[command(name = "mphash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "MPHASH_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a string or file with lookup3
    Hash {
        /// String to hash
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        input: Option<String>,

        /// Hash the contents of a file instead
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Primary seed (decimal or 0x-prefixed hex)
        #[arg(short, long, default_value = "0", value_parser = parse_seed)]
        seed: u32,

        /// Secondary seed, only used with --double
        #[arg(long, default_value = "0", value_parser = parse_seed)]
        seed2: u32,

        /// Print both hashlittle2 outputs
        #[arg(short, long)]
        double: bool,
    },

    /// Build a minimal perfect hash function from a key file
    Build {
        /// Newline-separated keys; lines starting with '"' are C string literals
        keyfile: PathBuf,

        /// Write the function as JSON instead of printing key indices
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Salt triples to try before giving up
        #[arg(long, default_value_t = mphash::mphf::DEFAULT_MAX_ATTEMPTS)]
        max_attempts: usize,
    },

    /// Look up keys in a function written by `build --output`
    Lookup {
        /// JSON function file
        function: PathBuf,

        /// Keys to look up
        #[arg(required = true)]
        keys: Vec<String>,

        /// Treat keys as C string literals
        #[arg(short, long)]
        quoted: bool,
    },

    /// Build a perfect hash table from a dictionary and look up keys in it
    Table {
        /// `key value` lines; keys and values starting with '"' are C string literals
        dict: PathBuf,

        /// Keys to look up
        #[arg(required = true)]
        keys: Vec<String>,

        /// Treat keys as C string literals
        #[arg(short, long)]
        quoted: bool,

        /// Salt triples to try before giving up
        #[arg(long, default_value_t = mphash::mphf::DEFAULT_MAX_ATTEMPTS)]
        max_attempts: usize,
    },

    /// Show version and hash algorithm
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Hash {
            input,
            file,
            seed,
            seed2,
            double,
        } => {
            cmd_hash(input.as_deref(), file.as_deref(), seed, seed2, double)?;
        }
        Commands::Build {
            keyfile,
            output,
            max_attempts,
        } => {
            cmd_build(&keyfile, output.as_deref(), max_attempts)?;
        }
        Commands::Lookup {
            function,
            keys,
            quoted,
        } => {
            cmd_lookup(&function, &keys, quoted)?;
        }
        Commands::Table {
            dict,
            keys,
            quoted,
            max_attempts,
        } => {
            cmd_table(&dict, &keys, quoted, max_attempts)?;
        }
        Commands::Info => {
            println!("mphash {}", mphash::VERSION);
            println!("algorithm: {}", ALGORITHM);
        }
    }

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")
}

fn parse_seed(s: &str) -> std::result::Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|e| format!("seed must be an unsigned 32-bit integer: {}", e))
}

fn cmd_hash(
    input: Option<&str>,
    file: Option<&Path>,
    seed: u32,
    seed2: u32,
    double: bool,
) -> Result<()> {
    let data = match (file, input) {
        (Some(path), _) => fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, Some(s)) => s.as_bytes().to_vec(),
        (None, None) => anyhow::bail!("Nothing to hash"),
    };
    debug!(bytes = data.len(), seed, seed2, "hashing");

    if double {
        let (first, second) = hash_double(&data, seed, seed2);
        println!("{:08x} {:08x}", first, second);
    } else {
        println!("{:08x}", hash_single(&data, seed));
    }

    Ok(())
}

fn cmd_build(keyfile: &Path, output: Option<&Path>, max_attempts: usize) -> Result<()> {
    let data = fs::read(keyfile)
        .with_context(|| format!("Failed to read key file {}", keyfile.display()))?;
    let keys = parse_key_file(&data)?;
    info!(keys = keys.len(), "loaded key file");

    let start = Instant::now();
    let mphf = MphfBuilder::new()
        .max_attempts(max_attempts)
        .build(&keys)
        .context("Failed to build perfect hash function")?;
    info!(
        keys = mphf.len(),
        vertices = mphf.vertex_count(),
        elapsed = ?start.elapsed(),
        "built perfect hash function"
    );

    match output {
        Some(path) => {
            let json = save_function(&mphf)?;
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {} keys to {}", mphf.len(), path.display());
        }
        None => {
            for key in &keys {
                if let Some(index) = mphf.hashcode(key) {
                    println!("{} {}", index, escape_c_string(key));
                }
            }
        }
    }

    Ok(())
}

fn cmd_lookup(function: &Path, keys: &[String], quoted: bool) -> Result<()> {
    let json = fs::read_to_string(function)
        .with_context(|| format!("Failed to read {}", function.display()))?;
    let mphf = load_function(&json)?;

    for key in keys {
        match mphf.hashcode(&cli_key(key, quoted)?) {
            Some(index) => println!("{}", index),
            None => println!("not-found"),
        }
    }

    Ok(())
}

fn cmd_table(dict: &Path, keys: &[String], quoted: bool, max_attempts: usize) -> Result<()> {
    let data = fs::read(dict)
        .with_context(|| format!("Failed to read dictionary {}", dict.display()))?;
    let entries = parse_dict_file(&data)?;
    info!(entries = entries.len(), "loaded dictionary");

    let table = build_table(entries, max_attempts)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for key in keys {
        match table.get(&cli_key(key, quoted)?) {
            Some(value) => out.write_all(value)?,
            None => out.write_all(b"not-found")?,
        }
        out.write_all(b"\n")?;
    }

    Ok(())
}

fn build_table(
    entries: Vec<(Vec<u8>, Vec<u8>)>,
    max_attempts: usize,
) -> Result<PerfectTable<Vec<u8>>> {
    let builder = MphfBuilder::new().max_attempts(max_attempts);
    PerfectTable::with_builder(entries, &builder).context("Failed to build perfect hash table")
}

fn cli_key(key: &str, quoted: bool) -> Result<Vec<u8>> {
    if quoted {
        undump_c_string(key).with_context(|| format!("Invalid key {}", key))
    } else {
        Ok(key.as_bytes().to_vec())
    }
}

fn save_function(mphf: &Mphf) -> Result<String> {
    serde_json::to_string(mphf).context("Failed to serialize function")
}

fn load_function(json: &str) -> Result<Mphf> {
    serde_json::from_str(json).context("Failed to load function")
}

/// Non-blank lines with their 1-based line numbers, `\r\n` endings stripped.
fn lines(data: &[u8]) -> impl Iterator<Item = (usize, &[u8])> {
    let mut start = 0;
    memchr::memchr_iter(b'\n', data)
        .chain(std::iter::once(data.len()))
        .enumerate()
        .filter_map(move |(line_number, end)| {
            let mut line = &data[start..end];
            start = end + 1;
            if let [rest @ .., b'\r'] = line {
                line = rest;
            }
            (!line.is_empty()).then_some((line_number + 1, line))
        })
}

/// Undump a field if it is a C string literal, otherwise take it verbatim.
fn parse_field(field: &[u8], line_number: usize) -> Result<Vec<u8>> {
    if field.first() != Some(&b'"') {
        return Ok(field.to_vec());
    }
    let text = std::str::from_utf8(field)
        .with_context(|| format!("Line {}: quoted field is not UTF-8", line_number))?;
    undump_c_string(text).with_context(|| format!("Line {}: invalid quoted field", line_number))
}

/// Split a key file into keys. Blank lines are skipped; use `""` for the
/// empty key.
fn parse_key_file(data: &[u8]) -> Result<Vec<Vec<u8>>> {
    lines(data)
        .map(|(line_number, line)| parse_field(line, line_number))
        .collect()
}

/// Split a dictionary into `(key, value)` pairs.
///
/// Each line is a key, one space, and the rest of the line as value. A key
/// starting with '"' runs to its closing quote, so it may contain spaces.
fn parse_dict_file(data: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
    lines(data)
        .map(|(line_number, line)| -> Result<(Vec<u8>, Vec<u8>)> {
            let key_end = match line.first() {
                Some(b'"') => quoted_end(line)
                    .with_context(|| format!("Line {}: unterminated quoted key", line_number))?,
                _ => memchr::memchr(b' ', line).unwrap_or(line.len()),
            };
            let (key, rest) = line.split_at(key_end);
            let Some(value) = rest.strip_prefix(b" ") else {
                anyhow::bail!("Line {}: expected a space between key and value", line_number);
            };
            Ok((parse_field(key, line_number)?, parse_field(value, line_number)?))
        })
        .collect()
}

/// Position just past the closing quote of a literal starting at `line[0]`.
fn quoted_end(line: &[u8]) -> Option<usize> {
    let mut i = 1;
    while i < line.len() {
        match line[i] {
            b'\\' => i += 2,
            b'"' => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}
