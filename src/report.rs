//! Report writer
//!
//! Writes the tables of a [`PipelineOutput`] as CSV files and a JSON run
//! summary into one directory. Rendering charts from them is left to other
//! tools.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::aggregate::{LabelCount, WordCount};
use crate::data::{LoadStats, OutlierSummary};
use crate::error::Result;
use crate::models::{AggregateRow, Bucket, SentimentLabel};
use crate::pipeline::PipelineOutput;

pub const CATEGORY_TABLE: &str = "category_sentiment.csv";
pub const SEASON_TABLE: &str = "season_sentiment.csv";
pub const DISTRIBUTION_TABLE: &str = "sentiment_counts.csv";
pub const LABELED_RECORDS: &str = "labeled_tweets.csv";
pub const REJECTIONS: &str = "rejections.csv";
pub const SUMMARY: &str = "summary.json";

/// File name of the word table for a label
pub fn words_file(label: SentimentLabel) -> String {
    format!("words_{}.csv", label.name())
}

/// Run summary written as JSON
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary<'a> {
    pub crate_version: &'static str,
    pub labeler: &'a str,
    pub labeler_version: &'a str,
    pub records: usize,
    pub rejected: usize,
    pub load: LoadStats,
    pub rejections_by_reason: BTreeMap<&'static str, usize>,
    pub distribution: &'a [LabelCount],
    pub length_outliers: &'a OutlierSummary,
    pub classifier_accuracy: Option<f64>,
}

impl<'a> RunSummary<'a> {
    pub fn from_output(output: &'a PipelineOutput) -> Self {
        Self {
            crate_version: env!("CARGO_PKG_VERSION"),
            labeler: &output.labeler,
            labeler_version: &output.labeler_version,
            records: output.records.len(),
            rejected: output.rejection_count(),
            load: output.load_stats,
            rejections_by_reason: output.rejections_by_reason(),
            distribution: &output.distribution,
            length_outliers: &output.length_outliers,
            classifier_accuracy: output.classifier_accuracy,
        }
    }
}

/// Writes report files into a directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write every report file, returning their paths
    pub fn write(&self, output: &PipelineOutput) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)?;

        let mut written = vec![
            self.write_crosstab(CATEGORY_TABLE, "category", &output.category_table)?,
            self.write_crosstab(SEASON_TABLE, "season", &output.season_table)?,
            self.write_distribution(&output.distribution)?,
        ];

        for label in SentimentLabel::ALL {
            written.push(self.write_words(&words_file(label), output.words.for_label(label))?);
        }

        written.push(self.write_records(output)?);
        written.push(self.write_rejections(output)?);
        written.push(self.write_summary(output)?);

        info!("Wrote {} report files to {}", written.len(), self.dir.display());
        Ok(written)
    }

    fn write_crosstab<B: Bucket>(
        &self,
        name: &str,
        bucket_column: &str,
        rows: &[AggregateRow<B>],
    ) -> Result<PathBuf> {
        let path = self.dir.join(name);
        let mut wtr = csv::Writer::from_path(&path)?;

        wtr.write_record([bucket_column, "label", "count"])?;
        for row in rows {
            wtr.write_record([row.category.name(), row.label.name(), row.count.to_string().as_str()])?;
        }
        wtr.flush()?;

        Ok(path)
    }

    fn write_distribution(&self, distribution: &[LabelCount]) -> Result<PathBuf> {
        let path = self.dir.join(DISTRIBUTION_TABLE);
        let mut wtr = csv::Writer::from_path(&path)?;

        let total: usize = distribution.iter().map(|c| c.count).sum();
        wtr.write_record(["label", "count", "share"])?;
        for entry in distribution {
            let share = if total == 0 {
                0.0
            } else {
                entry.count as f64 / total as f64
            };
            wtr.write_record([
                entry.label.name(),
                entry.count.to_string().as_str(),
                format!("{:.4}", share).as_str(),
            ])?;
        }
        wtr.flush()?;

        Ok(path)
    }

    fn write_words(&self, name: &str, words: &[WordCount]) -> Result<PathBuf> {
        let path = self.dir.join(name);
        let mut wtr = csv::Writer::from_path(&path)?;

        wtr.write_record(["word", "count"])?;
        for word in words {
            wtr.write_record([word.word.as_str(), word.count.to_string().as_str()])?;
        }
        wtr.flush()?;

        Ok(path)
    }

    fn write_records(&self, output: &PipelineOutput) -> Result<PathBuf> {
        let path = self.dir.join(LABELED_RECORDS);
        let mut wtr = csv::Writer::from_path(&path)?;

        wtr.write_record([
            "id",
            "timestamp",
            "category",
            "season",
            "score",
            "label",
            "length",
            "word_count",
            "text",
        ])?;
        for r in &output.records {
            wtr.write_record([
                r.record.id.as_str(),
                r.record.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string().as_str(),
                r.category.name(),
                r.season.name(),
                format!("{:.4}", r.score).as_str(),
                r.label.name(),
                r.features.length.to_string().as_str(),
                r.features.word_count.to_string().as_str(),
                r.record.text.as_str(),
            ])?;
        }
        wtr.flush()?;

        Ok(path)
    }

    fn write_rejections(&self, output: &PipelineOutput) -> Result<PathBuf> {
        let path = self.dir.join(REJECTIONS);
        let mut wtr = csv::Writer::from_path(&path)?;

        wtr.write_record(["line", "id", "reason", "detail"])?;
        for rejection in &output.rejections {
            wtr.write_record([
                rejection.line.to_string().as_str(),
                rejection.id.as_deref().unwrap_or(""),
                rejection.reason.kind(),
                rejection.reason.to_string().as_str(),
            ])?;
        }
        wtr.flush()?;

        Ok(path)
    }

    fn write_summary(&self, output: &PipelineOutput) -> Result<PathBuf> {
        let path = self.dir.join(SUMMARY);
        let file = fs::File::create(&path)?;
        serde_json::to_writer_pretty(file, &RunSummary::from_output(output))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use std::io::Write;

    fn run_sample() -> PipelineOutput {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "id,timestamp,url,text").unwrap();
        writeln!(file, "1,2017-03-05T02:15:00,http://x,Great job everybody!").unwrap();
        writeln!(file, "2,2017-03-05T11:00:00,http://y,Fake news is a disaster").unwrap();
        writeln!(file, "3,bad,http://z,Great").unwrap();
        file.flush().unwrap();

        Pipeline::default().run(file.path()).unwrap()
    }

    #[test]
    fn test_writes_every_file() {
        let output = run_sample();
        let dir = tempfile::tempdir().unwrap();

        let written = ReportWriter::new(dir.path()).write(&output).unwrap();

        assert_eq!(written.len(), 9);
        for name in [
            CATEGORY_TABLE,
            SEASON_TABLE,
            DISTRIBUTION_TABLE,
            "words_positive.csv",
            "words_neutral.csv",
            "words_negative.csv",
            LABELED_RECORDS,
            REJECTIONS,
            SUMMARY,
        ] {
            assert!(dir.path().join(name).exists(), "{} missing", name);
        }
    }

    #[test]
    fn test_category_table_has_nine_rows() {
        let output = run_sample();
        let dir = tempfile::tempdir().unwrap();
        ReportWriter::new(dir.path()).write(&output).unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(CATEGORY_TABLE)).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 9);
        assert_eq!(&rows[0][0], "overnight");
        assert_eq!(&rows[0][1], "positive");
        assert_eq!(&rows[0][2], "1");
        let total: usize = rows.iter().map(|r| r[2].parse::<usize>().unwrap()).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_summary_reports_lexicon_version() {
        let output = run_sample();
        let dir = tempfile::tempdir().unwrap();
        ReportWriter::new(dir.path()).write(&output).unwrap();

        let content = fs::read_to_string(dir.path().join(SUMMARY)).unwrap();
        let summary: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(summary["labeler_version"], crate::sentiment::LEXICON_VERSION);
        assert_eq!(summary["records"], 2);
        assert_eq!(summary["rejected"], 1);
        assert_eq!(summary["rejections_by_reason"]["invalid_timestamp"], 1);
    }
}
