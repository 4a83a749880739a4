//! Command line interface for the tweet sentiment pipeline
//!
//! Usage:
//! ```bash
//! cargo run -- run --input data/tweets.csv --output results
//! cargo run -- score --text "Great job everybody!"
//! cargo run -- bucket --timestamp 2017-03-05T02:15:00
//! cargo run -- words --input data/tweets.csv --top 20
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tweet_sentiment::{
    bucket::{classify_datetime, season},
    sentiment::PolarityScorer,
    utils::{init_logging, LabelerKind},
    FieldNormalizer, Pipeline, PipelineConfig, ReportWriter, SentimentLabeler,
};

#[derive(Parser)]
#[command(name = "tweet-sentiment")]
#[command(version)]
#[command(about = "Sentiment of a tweet archive by time of day", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (.toml, .json or .yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level, overrides the configuration file
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write the report tables
    Run {
        /// Tweet archive CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Report directory
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Stop after this many data rows
        #[arg(long)]
        limit: Option<usize>,

        /// Labeling strategy
        #[arg(long, value_enum)]
        labeler: Option<LabelerArg>,

        /// External lexicon file
        #[arg(long)]
        lexicon: Option<PathBuf>,
    },

    /// Score a single text
    Score {
        /// Text to score
        #[arg(short, long)]
        text: String,
    },

    /// Show the buckets of a timestamp
    Bucket {
        /// Timestamp in the configured format
        #[arg(short, long)]
        timestamp: String,
    },

    /// Train the word classifier and list the most sentiment-bearing words
    Words {
        /// Tweet archive CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Words per direction
        #[arg(long, default_value = "20")]
        top: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LabelerArg {
    Lexicon,
    Classifier,
}

impl From<LabelerArg> for LabelerKind {
    fn from(arg: LabelerArg) -> Self {
        match arg {
            LabelerArg::Lexicon => LabelerKind::Lexicon,
            LabelerArg::Classifier => LabelerKind::Classifier,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => tweet_sentiment::load_config(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    let level = cli.log_level.clone().unwrap_or_else(|| config.logging.level.clone());
    init_logging(&level)?;

    match cli.command {
        Commands::Run {
            input,
            output,
            limit,
            labeler,
            lexicon,
        } => {
            let mut config = config;
            if limit.is_some() {
                config.input.row_limit = limit;
            }
            if let Some(labeler) = labeler {
                config.sentiment.labeler = labeler.into();
            }
            if lexicon.is_some() {
                config.sentiment.lexicon_path = lexicon;
            }
            run_pipeline(config, &input, &output)?;
        }
        Commands::Score { text } => {
            run_score(config, &text)?;
        }
        Commands::Bucket { timestamp } => {
            run_bucket(&config, &timestamp)?;
        }
        Commands::Words { input, top } => {
            run_words(config, &input, top)?;
        }
    }

    Ok(())
}

fn run_pipeline(config: PipelineConfig, input: &Path, output_dir: &Path) -> Result<()> {
    let pipeline = Pipeline::new(config)?;
    let output = pipeline.run(input)?;

    let written = ReportWriter::new(output_dir).write(&output)?;

    println!("\nTweets labeled: {}", output.records.len());
    println!("Rows rejected:  {}", output.rejection_count());
    for (reason, count) in output.rejections_by_reason() {
        println!("  {:<18} {}", reason, count);
    }
    println!("Labeler:        {} ({})", output.labeler, output.labeler_version);
    if let Some(accuracy) = output.classifier_accuracy {
        println!("Accuracy:       {:.2}%", accuracy * 100.0);
    }

    println!("\n{:<10} {:>9} {:>9} {:>9}", "category", "positive", "neutral", "negative");
    for chunk in output.category_table.chunks(3) {
        println!(
            "{:<10} {:>9} {:>9} {:>9}",
            chunk[0].category, chunk[0].count, chunk[1].count, chunk[2].count
        );
    }

    println!("\nWrote {} files to {}", written.len(), output_dir.display());
    Ok(())
}

fn run_score(config: PipelineConfig, text: &str) -> Result<()> {
    let pipeline = Pipeline::new(config)?;
    let labeler = pipeline.lexicon_labeler()?;
    let normalized = pipeline.normalizer().normalize_text(text);

    let assessment = labeler.assess(&normalized);
    let detail = labeler.scorer().score(&normalized);

    println!("Text:    {}", normalized);
    println!("Score:   {:.4}", assessment.score);
    println!("Label:   {}", assessment.label);
    println!("Lexicon: {}", labeler.scorer().version());

    if !detail.key_words.is_empty() {
        println!("\nKey words:");
        for word in &detail.key_words {
            let sign = if word.score > 0.0 { "+" } else { "" };
            println!("  {} ({}{:.2})", word.word, sign, word.score);
        }
    }

    Ok(())
}

fn run_bucket(config: &PipelineConfig, timestamp: &str) -> Result<()> {
    let normalizer =
        FieldNormalizer::new().with_timestamp_format(config.input.timestamp_format.clone());
    let parsed = normalizer.parse_timestamp(timestamp).with_context(|| {
        format!(
            "'{}' does not match format '{}'",
            timestamp,
            normalizer.timestamp_format()
        )
    })?;

    println!("Timestamp: {}", parsed);
    println!("Category:  {}", classify_datetime(&parsed));
    println!("Season:    {}", season(&parsed));
    Ok(())
}

fn run_words(config: PipelineConfig, input: &Path, top: usize) -> Result<()> {
    let pipeline = Pipeline::new(config)?;
    let archive = pipeline.load(input)?;

    info!("Training word classifier on {} tweets", archive.records.len());
    let trained = pipeline.train_classifier(&archive.records)?;
    let top_words = trained.top_words(top)?;

    let (positive, negative) = trained.class_counts();
    println!(
        "\nLabeled tweets: {} ({} positive, {} negative)",
        trained.n_labeled(),
        positive,
        negative
    );
    match trained.accuracy() {
        Some(accuracy) => println!("Accuracy:       {:.2}%", accuracy * 100.0),
        None => println!("Accuracy:       n/a"),
    }

    println!("\nTop positive words:");
    for word in &top_words.positive {
        println!("  {:<20} {:>8.4}", word.word, word.score);
    }

    println!("\nTop negative words:");
    for word in &top_words.negative {
        println!("  {:<20} {:>8.4}", word.word, word.score);
    }

    if !top_words.overlap.is_empty() {
        println!("\nIn both lists: {}", top_words.overlap.join(", "));
    }

    Ok(())
}
