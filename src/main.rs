//! Command-line front end: resolves a file below the data root, materializes up to
//! `--limit` rows and prints them as JSON on stdout.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::LevelFilter;

use parquet_rows::encoder::write_rows;
use parquet_rows::{ErrorKind, OutputEncoding, ReaderConfig, RowService, RowsError};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Pretty,
    Compact,
    Lines,
}

impl From<FormatArg> for OutputEncoding {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pretty => OutputEncoding::PrettyJson,
            FormatArg::Compact => OutputEncoding::CompactJson,
            FormatArg::Lines => OutputEncoding::JsonLines,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "parquet-rows", version, about = "Print the rows of a columnar file as JSON")]
struct Cli {
    /// File name, relative to the data root.
    filename: String,

    /// Maximum number of rows to print (defaults to the configured limit, 1000).
    #[arg(short, long)]
    limit: Option<usize>,

    /// Data root directory (overrides the config file).
    #[arg(long)]
    root: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output encoding (overrides the config file).
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Print the file schema instead of rows.
    #[arg(long)]
    schema: bool,

    /// Log decoder and transposer activity.
    #[arg(short, long)]
    verbose: bool,

    /// Append log output to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(verbose: bool, log_file: Option<&PathBuf>) -> io::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    builder.parse_default_env();

    // Custom formatter: just print the level and message
    builder.format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()));

    if let Some(path) = log_file {
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    let _ = builder.try_init();
    Ok(())
}

fn run(cli: &Cli) -> Result<(), RowsError> {
    let mut config = match &cli.config {
        Some(path) => ReaderConfig::from_json_file(path)?,
        None => ReaderConfig::default(),
    };
    if let Some(root) = &cli.root {
        config.data_root = root.clone();
    }
    if let Some(format) = cli.format {
        config.output = format.into();
    }

    log::debug!("parquet-rows {} reading from '{}'", parquet_rows::VERSION, config.data_root.display());
    let service = RowService::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.schema {
        let schema = service.read_schema(&cli.filename)?;
        serde_json::to_writer_pretty(&mut out, &schema)?;
        writeln!(out)?;
        return Ok(());
    }

    let rows = service.read_rows(&cli.filename, cli.limit)?;
    write_rows(&mut out, &rows, service.config().output)?;
    if service.config().output != OutputEncoding::JsonLines {
        writeln!(out)?;
    }
    Ok(())
}

fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::NotFound => 2,
        ErrorKind::InvalidRequest | ErrorKind::Config => 64,
        ErrorKind::Decode | ErrorKind::MalformedSegment => 65,
        ErrorKind::Encode => 70,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.verbose, cli.log_file.as_ref()) {
        eprintln!("{} cannot open log file: {}", "warning:".yellow().bold(), err);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::from(exit_code(err.kind()))
        }
    }
}
