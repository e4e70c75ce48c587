use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use songtitle::models::BatchStats;
use songtitle::progress::{format_duration, is_log_only, set_log_only, PhaseProgress};
use songtitle::safety::validate_output_path;
use songtitle::{parse_batch, parse_bytes_with, parse_pipelined, ParseOptions, Song};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "songtitle")]
#[command(about = "Extract artist, title and tags from song title strings")]
struct Args {
    /// Titles to parse. When none are given, titles are read one per line
    /// from --input or stdin.
    titles: Vec<String>,

    /// File with one title per line ("-" for stdin)
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Write results here instead of stdout (.jsonl, .json or .txt)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Number of rayon worker threads (0 = rayon default)
    #[arg(long, default_value = "0")]
    workers: usize,

    /// Skip tags that are empty once trimmed
    #[arg(long)]
    drop_empty_tags: bool,

    /// Scan on a separate thread, handing tokens to the parser one at a time
    #[arg(long)]
    pipelined: bool,

    /// Hide progress bars and log progress lines instead
    #[arg(long)]
    log_only: bool,

    /// Write batch statistics as JSON to this file
    #[arg(long)]
    stats: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// "Artist - Title" followed by indented tags
    Text,
    /// One JSON object per line
    Json,
}

const BATCH_SIZE: usize = 10_000;

/// Show a progress bar only for inputs at least this large.
const PROGRESS_THRESHOLD: usize = 50_000;

/// Initialize tracing when RUST_LOG is set, e.g. `RUST_LOG=songtitle=debug`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true).with_level(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

/// Read one title per line, keeping raw bytes so invalid UTF-8 reaches the
/// scanner untouched.
fn read_lines(reader: impl BufRead) -> Result<Vec<Vec<u8>>> {
    let mut lines = Vec::new();
    for line in reader.split(b'\n') {
        let mut line = line.context("Failed to read input line")?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        lines.push(line);
    }
    Ok(lines)
}

fn read_inputs(args: &Args) -> Result<Vec<Vec<u8>>> {
    if !args.titles.is_empty() {
        return Ok(args.titles.iter().map(|t| t.clone().into_bytes()).collect());
    }

    match args.input.as_deref() {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file {:?}", path))?;
            read_lines(BufReader::new(file))
        }
        _ => read_lines(io::stdin().lock()),
    }
}

fn parse_all(inputs: &[Vec<u8>], options: &ParseOptions, pipelined: bool) -> Vec<Song> {
    let mut progress = if inputs.len() >= PROGRESS_THRESHOLD {
        PhaseProgress::new("Parsing titles", inputs.len() as u64, BATCH_SIZE as u64 * 10)
    } else {
        PhaseProgress::hidden("Parsing titles", inputs.len() as u64)
    };

    let mut songs = Vec::with_capacity(inputs.len());
    for chunk in inputs.chunks(BATCH_SIZE) {
        if pipelined {
            songs.extend(chunk.iter().map(|input| match std::str::from_utf8(input) {
                Ok(text) => parse_pipelined(text, options),
                Err(_) => parse_bytes_with(input, options),
            }));
        } else {
            songs.extend(parse_batch(chunk, options));
        }
        progress.inc(chunk.len() as u64);
    }

    progress.finish(format!("Parsed {} titles", songs.len()));
    songs
}

fn write_songs(out: &mut impl Write, songs: &[Song], format: Format) -> Result<()> {
    for song in songs {
        match format {
            Format::Text => writeln!(out, "{}", song)?,
            Format::Json => {
                serde_json::to_writer(&mut *out, song)?;
                writeln!(out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();
    set_log_only(args.log_only);

    if args.workers > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.workers)
            .build_global()
            .context("Failed to set thread pool size")?;
    }

    if let Some(ref output) = args.output {
        let inputs: Vec<&Path> = args.input.iter().map(PathBuf::as_path).collect();
        validate_output_path(output, &inputs)?;
    }

    let start = Instant::now();
    let inputs = read_inputs(&args)?;
    let options = ParseOptions {
        keep_empty_tags: !args.drop_empty_tags,
    };

    let songs = parse_all(&inputs, &options, args.pipelined);

    match args.output {
        Some(ref path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {:?}", path))?;
            write_songs(&mut BufWriter::new(file), &songs, args.format)?;
        }
        None => write_songs(&mut io::stdout().lock(), &songs, args.format)?,
    }

    let mut stats = BatchStats::default();
    for song in &songs {
        stats.record(song);
    }
    stats.truncated_inputs = inputs
        .iter()
        .filter(|input| std::str::from_utf8(input).is_err())
        .count();
    stats.elapsed_seconds = start.elapsed().as_secs_f64();

    if is_log_only() {
        stats.log_phase("parse");
    }
    if stats.truncated_inputs > 0 {
        eprintln!(
            "Warning: {} input(s) contained invalid UTF-8 and were parsed up to the bad byte",
            stats.truncated_inputs
        );
    }
    if let Some(ref path) = args.stats {
        stats
            .write_to_file(path)
            .with_context(|| format!("Failed to write stats to {:?}", path))?;
        eprintln!(
            "Parsed {} titles in {} ({:.1}% split into artist and title)",
            stats.total_inputs,
            format_duration(start.elapsed()),
            stats.split_rate()
        );
    }

    Ok(())
}
