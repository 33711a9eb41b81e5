use clap::Parser;
use log::{debug, info, LevelFilter};
use projarrange_core::xml::{parse_bytes, serialize_pretty};
use projarrange_core::{arrange_document, ArrangeError, ArrangeOptions, ArrangeSettings, Result};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

#[derive(Parser, Debug)]
#[command(name = "projarrange")]
#[command(version = VERSION)]
#[command(about = "Sorts and normalizes MSBuild project files", long_about = None)]
struct Cli {
    /// Input file. Standard input is the default.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file. Defaults to the input file, or standard output when
    /// reading standard input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Comma separated element names stuck to the top, in order.
    #[arg(short, long, value_delimiter = ',')]
    sticky: Option<Vec<String>>,

    /// Comma separated element names whose children are not sorted.
    #[arg(short, long = "keeporder", value_delimiter = ',')]
    keep_order: Option<Vec<String>>,

    /// Comma separated attribute names to sort on.
    #[arg(short, long, value_delimiter = ',')]
    attributes: Option<Vec<String>>,

    /// Comma separated arrange options, e.g. "SortRootElements, SplitItemGroups".
    #[arg(short = 'p', long)]
    options: Option<ArrangeOptions>,

    /// JSON settings file. Flags given on the command line take precedence.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> Result<ArrangeSettings> {
        let mut settings = match &self.config {
            Some(path) => ArrangeSettings::from_json_file(path)?,
            None => ArrangeSettings::new().with_options(ArrangeOptions::ALL),
        };

        if let Some(names) = &self.sticky {
            settings = settings.with_sticky_element_names(names.iter().cloned());
        }
        if let Some(names) = &self.keep_order {
            settings = settings.with_keep_order_element_names(names.iter().cloned());
        }
        if let Some(names) = &self.attributes {
            settings = settings.with_sort_attributes(names.iter().cloned());
        }
        if let Some(options) = self.options {
            settings = settings.with_options(options);
        }
        Ok(settings)
    }

    fn output_path(&self) -> Option<&Path> {
        self.output.as_deref().or(self.input.as_deref())
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();
}

fn read_input(input: Option<&Path>) -> Result<Vec<u8>> {
    match input {
        Some(path) => Ok(fs::read(path)?),
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn backup_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

fn run(cli: &Cli) -> Result<()> {
    let settings = cli.settings()?;
    debug!("settings: {:?}", settings);

    let input = read_input(cli.input.as_deref())?;
    let mut doc = parse_bytes(&input)?;
    arrange_document(&mut doc, &settings)?;
    let arranged = serialize_pretty(&doc)?;

    match cli.output_path() {
        Some(output) => {
            if let Some(input) = cli.input.as_deref().filter(|input| *input == output) {
                let backup = backup_path(input);
                info!("backing up {} to {}", input.display(), backup.display());
                fs::copy(input, &backup)?;
            }
            fs::write(output, arranged)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(arranged.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("projarrange: {}", err);
            if let ArrangeError::Config { .. } = err {
                eprintln!("Try `projarrange --help` for more information.");
            }
            ExitCode::FAILURE
        }
    }
}
