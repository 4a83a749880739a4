//! Pipeline driver
//!
//! Wires the stages together: load → normalize → bucket → label → aggregate.
//! Each stage takes the previous stage's output by value or reference and
//! returns a new value; nothing is shared or mutated across stages.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::{cross_tab, label_distribution, word_tables, LabelCount, WordTables};
use crate::bucket::{classify_datetime, season};
use crate::data::{
    detect_outliers_iqr, text_features, FieldNormalizer, LoadStats, LoadedRow, OutlierSummary,
    RecordStream, TweetLoader,
};
use crate::error::{RejectReason, Rejection, Result};
use crate::models::{AggregateRow, Category, CleanRecord, LabeledRecord, Season};
use crate::sentiment::{
    ClassifierLabeler, LexiconLabeler, LexiconScorer, SentimentLabeler, SentimentLexicon,
    TrainedClassifier, TweetLexicon, WordClassifier,
};
use crate::utils::{LabelerKind, PipelineConfig};

/// Clean records of an archive and everything that was excluded
#[derive(Debug, Clone)]
pub struct LoadedArchive {
    pub records: Vec<CleanRecord>,
    pub rejections: Vec<Rejection>,
    /// Counters of the CSV reader alone
    pub stats: LoadStats,
}

/// Everything a run produces
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub records: Vec<LabeledRecord>,
    #[serde(skip)]
    pub rejections: Vec<Rejection>,
    pub load_stats: LoadStats,
    /// Time-of-day × label, always 9 rows
    pub category_table: Vec<AggregateRow<Category>>,
    /// Season × label, always 12 rows
    pub season_table: Vec<AggregateRow<Season>>,
    pub distribution: Vec<LabelCount>,
    pub words: WordTables,
    /// IQR check over tweet length in characters
    pub length_outliers: OutlierSummary,
    /// Strategy name of the labeler
    pub labeler: String,
    /// Lexicon or model version behind the labels
    pub labeler_version: String,
    /// Held-out accuracy when the labeler is a trained classifier
    pub classifier_accuracy: Option<f64>,
}

impl PipelineOutput {
    pub fn rejection_count(&self) -> usize {
        self.rejections.len()
    }

    /// Rejections per reason key
    pub fn rejections_by_reason(&self) -> BTreeMap<&'static str, usize> {
        count_by_reason(&self.rejections)
    }
}

fn count_by_reason(rejections: &[Rejection]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for rejection in rejections {
        *counts.entry(rejection.reason.kind()).or_insert(0) += 1;
    }
    counts
}

/// Tweet sentiment pipeline
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline from a validated configuration
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalizer configured for this run
    pub fn normalizer(&self) -> FieldNormalizer {
        FieldNormalizer::new()
            .with_timestamp_format(self.config.input.timestamp_format.clone())
            .with_strip_mentions(self.config.cleaning.strip_mentions)
            .with_decode_entities(self.config.cleaning.decode_entities)
    }

    /// Lexicon labeler from the embedded or configured lexicon
    pub fn lexicon_labeler(&self) -> Result<LexiconLabeler<LexiconScorer>> {
        let settings = &self.config.sentiment;

        let lexicon = match &settings.lexicon_path {
            Some(path) => TweetLexicon::from_file(path, settings.lexicon_version.as_deref())?,
            None => {
                let lexicon = TweetLexicon::embedded()?;
                if let Some(pinned) = settings.lexicon_version.as_deref() {
                    lexicon.ensure_version(pinned)?;
                }
                lexicon
            }
        };
        info!("Lexicon {} with {} entries", lexicon.version(), lexicon.len());

        Ok(LexiconLabeler::new(LexiconScorer::new(lexicon)).with_thresholds(settings.thresholds))
    }

    /// Stages 1 and 2: read the archive and keep the records that validate
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadedArchive> {
        let stream = TweetLoader::open(path, self.config.input.loader_options())?;
        let normalizer = self.normalizer();
        self.collect_records(stream, &normalizer)
    }

    fn collect_records<R: Read>(
        &self,
        mut rows: RecordStream<R>,
        normalizer: &FieldNormalizer,
    ) -> Result<LoadedArchive> {
        let mut records = Vec::new();
        let mut rejections = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut seen_texts = HashSet::new();

        for row in rows.by_ref() {
            let raw = match row? {
                LoadedRow::Record(raw) => raw,
                LoadedRow::Rejected(rejection) => {
                    rejections.push(rejection);
                    continue;
                }
            };

            let record = match normalizer.normalize(&raw) {
                Ok(record) => record,
                Err(rejection) => {
                    log_rejection(&rejection);
                    rejections.push(rejection);
                    continue;
                }
            };

            let duplicate = if !seen_ids.insert(record.id.clone()) {
                Some(RejectReason::DuplicateId)
            } else if self.config.cleaning.drop_duplicate_text && !seen_texts.insert(record.text.clone()) {
                Some(RejectReason::DuplicateText)
            } else {
                None
            };

            match duplicate {
                Some(reason) => {
                    let rejection = Rejection::new(raw.line, Some(record.id), reason);
                    log_rejection(&rejection);
                    rejections.push(rejection);
                }
                None => records.push(record),
            }
        }

        let stats = rows.stats();
        info!(
            "Loaded {} records from {} rows, {} rejected",
            records.len(),
            stats.rows_read,
            rejections.len()
        );
        for (reason, count) in count_by_reason(&rejections) {
            warn!(reason, count, "Rows rejected");
        }

        Ok(LoadedArchive {
            records,
            rejections,
            stats,
        })
    }

    /// Stages 3 and 4: bucket and label each record
    pub fn label<L: SentimentLabeler + ?Sized>(
        &self,
        records: Vec<CleanRecord>,
        labeler: &L,
    ) -> Vec<LabeledRecord> {
        info!(
            "Labeling {} records with {} ({})",
            records.len(),
            labeler.name(),
            labeler.version()
        );

        records
            .into_iter()
            .map(|record| {
                let assessment = labeler.assess(&record.text);
                LabeledRecord {
                    category: classify_datetime(&record.timestamp),
                    season: season(&record.timestamp),
                    score: assessment.score,
                    label: assessment.label,
                    features: text_features(&record.text),
                    record,
                }
            })
            .collect()
    }

    /// Train the word classifier on the clean texts
    pub fn train_classifier(&self, records: &[CleanRecord]) -> Result<TrainedClassifier> {
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        Ok(WordClassifier::new(self.config.classifier.clone()).train(&texts)?)
    }

    /// Run every stage with the configured labeler
    pub fn run<P: AsRef<Path>>(&self, path: P) -> Result<PipelineOutput> {
        // resolve the lexicon before touching the archive so a bad pin fails fast
        let lexicon_labeler = match self.config.sentiment.labeler {
            LabelerKind::Lexicon => Some(self.lexicon_labeler()?),
            LabelerKind::Classifier => None,
        };

        let archive = self.load(path)?;

        match lexicon_labeler {
            Some(labeler) => Ok(self.finish(archive, &labeler, None)),
            None => {
                let trained = self.train_classifier(&archive.records)?;
                let accuracy = trained.accuracy();
                let labeler = ClassifierLabeler::new(trained, self.config.classifier.neutral_margin);
                Ok(self.finish(archive, &labeler, accuracy))
            }
        }
    }

    /// Run every stage with a caller-supplied labeler
    pub fn run_with<P, L>(&self, path: P, labeler: &L) -> Result<PipelineOutput>
    where
        P: AsRef<Path>,
        L: SentimentLabeler + ?Sized,
    {
        let archive = self.load(path)?;
        Ok(self.finish(archive, labeler, None))
    }

    fn finish<L: SentimentLabeler + ?Sized>(
        &self,
        archive: LoadedArchive,
        labeler: &L,
        classifier_accuracy: Option<f64>,
    ) -> PipelineOutput {
        let LoadedArchive {
            records,
            rejections,
            stats,
        } = archive;

        let records = self.label(records, labeler);

        let category_table = cross_tab(records.iter().map(|r| (r.category, r.label)));
        let season_table = cross_tab(records.iter().map(|r| (r.season, r.label)));
        let distribution = label_distribution(records.iter().map(|r| r.label));
        let words = word_tables(&records, self.config.output.top_words);

        let lengths: Vec<f64> = records.iter().map(|r| r.features.length as f64).collect();
        let length_outliers = detect_outliers_iqr(&lengths, self.config.output.outlier_multiplier);

        info!(
            "Aggregated {} records, {} length outliers",
            records.len(),
            length_outliers.outlier_count
        );

        PipelineOutput {
            records,
            rejections,
            load_stats: stats,
            category_table,
            season_table,
            distribution,
            words,
            length_outliers,
            labeler: labeler.name().to_string(),
            labeler_version: labeler.version(),
            classifier_accuracy,
        }
    }
}

fn log_rejection(rejection: &Rejection) {
    debug!(
        line = rejection.line,
        id = rejection.id.as_deref().unwrap_or("-"),
        reason = %rejection.reason,
        "Rejected record"
    );
}
