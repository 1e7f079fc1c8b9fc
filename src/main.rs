use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use shaftdraft::{
    config::{Config, ConfigStore, FileConfigStore},
    corpus, report,
    report::OutputFormat,
    search, FrequencyTable, SearchConfig,
};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::{error::Error, io, path::PathBuf};

/// search a corpus for a balanced four-shaft draft coding of its letters
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Splits the letters of a text corpus into shafts at random and reports one split whose mean letter frequencies are nearly equal."
)]
pub struct Cli {
    /// the filepath of the input file
    input: PathBuf,

    /// number of random drafts to try
    #[clap(short = 'n', long)]
    trials: Option<usize>,

    /// number of shafts to split the letters into
    #[clap(short = 'k', long)]
    shafts: Option<usize>,

    /// largest accepted spread between shaft mean frequencies
    #[clap(short = 't', long)]
    threshold: Option<f64>,

    /// stop searching after this many seconds
    #[clap(long)]
    time_limit_secs: Option<f64>,

    /// seed for a reproducible search
    #[clap(long)]
    seed: Option<u64>,

    /// output format for the chosen draft
    #[clap(short = 'f', long, value_enum)]
    format: Option<OutputFormat>,

    /// config file to load defaults from
    #[clap(long)]
    config: Option<PathBuf>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,

    /// log more detail to stderr (repeat for more)
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Overlay command line flags on the loaded config
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(trials) = self.trials {
            cfg.trials = trials;
        }
        if let Some(shafts) = self.shafts {
            cfg.shafts = shafts;
        }
        if let Some(threshold) = self.threshold {
            cfg.threshold = threshold;
        }
        if let Some(secs) = self.time_limit_secs {
            cfg.time_limit_secs = Some(secs);
        }
        if let Some(format) = self.format {
            cfg.format = format;
        }
        cfg
    }

    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    TermLogger::init(
        cli.log_level(),
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let store = cli.config_store();
    let config = cli.apply(store.load());
    let search_config = SearchConfig::try_from(&config)?;
    if cli.save_config {
        store.save(&config)?;
        log::info!("saved settings to {}", store.path().display());
    }

    let corpus = corpus::load(&cli.input)?;
    let table = FrequencyTable::build(&corpus);
    log::info!(
        "{} distinct letters in {} characters",
        table.len(),
        table.corpus_len()
    );

    let mut rng = cli.rng();
    let outcome = search(&table, search_config, &mut rng)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::render(&outcome, config.format, &mut out)?;

    Ok(())
}
