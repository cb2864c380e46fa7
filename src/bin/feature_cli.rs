use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use speech_music_features::analysis::features::FeatureKind;
use speech_music_features::corpus::{AudioDecoder, WavDecoder};
use speech_music_features::{
    aggregate, AggregatedFeatures, AppConfig, CorpusBuilder, CorpusMatrix, FeatureExtractor,
    FeatureMatrix,
};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "feature_cli",
    about = "Low-level speech/music feature extraction for WAV corpora"
)]
struct Cli {
    /// JSON configuration file (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the block size in samples
    #[arg(long, global = true)]
    block_size: Option<usize>,
    /// Override the hop size in samples
    #[arg(long, global = true)]
    hop_size: Option<usize>,
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract per-block features and file statistics for one WAV file
    Extract {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Build the stacked feature matrix for class folders under a root
    Corpus {
        #[arg(long)]
        root: PathBuf,
        /// Class folder to include (repeatable; defaults to the config list)
        #[arg(long = "folder")]
        folders: Vec<String>,
        /// Z-score each feature column across files
        #[arg(long)]
        normalize: bool,
        /// Skip files that fail to decode instead of stopping
        #[arg(long)]
        skip_failures: bool,
        /// Process files on a single thread
        #[arg(long)]
        sequential: bool,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = cli
        .config
        .as_ref()
        .map(AppConfig::load_from_file)
        .unwrap_or_default();
    if let Some(block_size) = cli.block_size {
        config.features.block_size = block_size;
    }
    if let Some(hop_size) = cli.hop_size {
        config.features.hop_size = hop_size;
    }

    match cli.command {
        Commands::Extract { file, output } => run_extract(&config, &file, output),
        Commands::Corpus {
            root,
            folders,
            normalize,
            skip_failures,
            sequential,
            output,
        } => {
            if !folders.is_empty() {
                config.corpus.folders = folders;
            }
            if skip_failures {
                config.corpus.on_decode_failure =
                    speech_music_features::config::DecodeFailurePolicy::SkipAndWarn;
            }
            if sequential {
                config.corpus.parallel = false;
            }
            run_corpus(&config, &root, normalize, output)
        }
    }
}

fn run_extract(config: &AppConfig, file: &Path, output: Option<PathBuf>) -> Result<ExitCode> {
    let extractor = FeatureExtractor::new(config.features.clone())?;
    let sample_rate = config.corpus.target_sample_rate;
    let samples = WavDecoder
        .decode(file, sample_rate)
        .with_context(|| format!("decoding {}", file.display()))?;

    let features = extractor
        .extract(&samples, sample_rate)
        .with_context(|| format!("extracting features from {}", file.display()))?;
    let statistics =
        aggregate(&features).with_context(|| format!("aggregating {}", file.display()))?;

    let report = ExtractReport {
        file,
        sample_rate,
        block_size: config.features.block_size,
        hop_size: config.features.hop_size,
        num_blocks: features.num_blocks(),
        aggregate: labeled(&statistics),
        features: &features,
    };
    emit_json(&report, output)?;
    Ok(ExitCode::from(0))
}

fn run_corpus(
    config: &AppConfig,
    root: &Path,
    normalize: bool,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let builder = CorpusBuilder::new(config)?;
    let corpus = builder
        .build_labeled(root)
        .with_context(|| format!("building corpus under {}", root.display()))?;
    let corpus = if normalize {
        corpus.normalized()
    } else {
        corpus
    };

    let report = CorpusReport {
        root,
        normalized: normalize,
        file_count: corpus.len(),
        columns: AggregatedFeatures::labels().to_vec(),
        rows: corpus_rows(&corpus),
    };
    emit_json(&report, output)?;
    Ok(ExitCode::from(0))
}

fn emit_json<T: Serialize>(payload: &T, output_path: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(payload)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

fn labeled(statistics: &AggregatedFeatures) -> Vec<LabeledStatistic> {
    FeatureKind::ALL
        .into_iter()
        .map(|kind| LabeledStatistic {
            feature: kind.name(),
            mean: statistics.mean(kind),
            std: statistics.std(kind),
        })
        .collect()
}

fn corpus_rows(corpus: &CorpusMatrix) -> Vec<CorpusRow<'_>> {
    corpus
        .entries
        .iter()
        .map(|entry| CorpusRow {
            file: &entry.path,
            label: &entry.label,
            values: entry.features.as_slice(),
        })
        .collect()
}

#[derive(Serialize)]
struct LabeledStatistic {
    feature: &'static str,
    mean: f32,
    std: f32,
}

#[derive(Serialize)]
struct ExtractReport<'a> {
    file: &'a Path,
    sample_rate: u32,
    block_size: usize,
    hop_size: usize,
    num_blocks: usize,
    aggregate: Vec<LabeledStatistic>,
    features: &'a FeatureMatrix,
}

#[derive(Serialize)]
struct CorpusReport<'a> {
    root: &'a Path,
    normalized: bool,
    file_count: usize,
    columns: Vec<String>,
    rows: Vec<CorpusRow<'a>>,
}

#[derive(Serialize)]
struct CorpusRow<'a> {
    file: &'a Path,
    label: &'a str,
    values: &'a [f32],
}
