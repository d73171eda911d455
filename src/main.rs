use std::env;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const SUFFIX: &str = ".compressed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Compress,
    Decompress,
}

impl Mode {
    fn parse(arg: &str) -> Option<Self> {
        match arg.to_lowercase().as_str() {
            "compress" | "encode" | "enc" | "c" | "e" | "-c" | "-e" => Some(Mode::Compress),
            "decompress" | "decode" | "dec" | "d" | "-d" => Some(Mode::Decompress),
            _ => None,
        }
    }

    fn default_output(self, input: &Path) -> PathBuf {
        let input = input.to_string_lossy();
        match self {
            Mode::Compress => PathBuf::from(format!("{input}{SUFFIX}")),
            Mode::Decompress => match input.strip_suffix(SUFFIX) {
                Some(stripped) if !stripped.is_empty() => PathBuf::from(stripped),
                _ => PathBuf::from(format!("{input}.decompressed")),
            },
        }
    }
}

#[derive(Debug)]
struct Args {
    mode: Mode,
    input: PathBuf,
    output: PathBuf,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Option<Self> {
        let mode = Mode::parse(&args.next()?)?;
        let input = PathBuf::from(args.next()?);
        let output = args
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| mode.default_output(&input));

        Some(Args {
            mode,
            input,
            output,
        })
    }
}

fn run(args: &Args) -> Result<(), huffstream::CompressionError> {
    let input = BufReader::new(File::open(&args.input)?);
    let mut output = BufWriter::new(File::create(&args.output)?);

    match args.mode {
        Mode::Compress => huffstream::compress(input, &mut output)?,
        Mode::Decompress => huffstream::decompress(input, &mut output)?,
    }
    output.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(args) = Args::parse(env::args().skip(1)) else {
        eprintln!("usage: huffstream <compress|decompress> <input> [output]");
        return ExitCode::from(2);
    };

    match run(&args) {
        Ok(()) => {
            log::info!("{} -> {}", args.input.display(), args.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{:?} of {} failed: {e}", args.mode, args.input.display());
            ExitCode::FAILURE
        }
    }
}
