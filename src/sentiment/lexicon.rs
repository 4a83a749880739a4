//! Valence lexicon
//!
//! Token valences on a -4..4 scale plus the booster and negation word lists
//! used by the scoring heuristics. A lexicon always carries a version string
//! so that labels can be reproduced.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::LexiconError;

/// Version of the lexicon compiled into the crate
pub const LEXICON_VERSION: &str = "tweet-lexicon-1.0";

const EMBEDDED_LEXICON: &str = include_str!("../../assets/tweet_lexicon.tsv");

/// Increment applied by intensifiers
pub const BOOSTER_INCREMENT: f64 = 0.293;
/// Decrement applied by dampeners
pub const BOOSTER_DECREMENT: f64 = -0.293;

const INTENSIFIERS: &[&str] = &[
    "absolutely", "amazingly", "completely", "deeply", "enormously", "entirely", "especially",
    "exceptionally", "extremely", "fully", "greatly", "highly", "hugely", "incredibly",
    "particularly", "purely", "quite", "really", "so", "strongly", "substantially", "thoroughly",
    "totally", "tremendously", "truly", "unbelievably", "utterly", "very", "most", "more",
];

const DAMPENERS: &[&str] = &[
    "almost", "barely", "hardly", "kinda", "less", "little", "marginally", "occasionally",
    "partly", "scarcely", "slightly", "somewhat", "sorta",
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "nowhere", "cannot",
    "without", "aint", "dont", "doesnt", "didnt", "isnt", "arent", "wasnt", "werent", "wont",
    "wouldnt", "cant", "couldnt", "shouldnt", "hasnt", "havent", "hadnt", "neednt", "mustnt",
];

/// Read access to token valences
pub trait SentimentLexicon {
    /// Valence of a lowercase token
    fn valence(&self, word: &str) -> Option<f64>;

    /// Booster scalar of a lowercase token
    fn booster(&self, word: &str) -> Option<f64>;

    /// Whether a lowercase token negates what follows
    fn is_negation(&self, word: &str) -> bool;

    /// Version identifier of the word list
    fn version(&self) -> &str;
}

/// Lexicon for tweet text
#[derive(Debug, Clone)]
pub struct TweetLexicon {
    version: String,
    valences: HashMap<String, f64>,
    boosters: HashMap<String, f64>,
    negations: HashSet<String>,
}

impl TweetLexicon {
    /// The lexicon shipped with the crate
    pub fn embedded() -> Result<Self, LexiconError> {
        Self::parse(EMBEDDED_LEXICON)
    }

    /// Load a lexicon file, requiring a version when `pinned` is given
    pub fn from_file<P: AsRef<Path>>(path: P, pinned: Option<&str>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LexiconError::Missing {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| LexiconError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let lexicon = Self::parse(&content)?;
        if let Some(expected) = pinned {
            lexicon.ensure_version(expected)?;
        }
        Ok(lexicon)
    }

    /// Parse `token<TAB>valence` lines with a `# version:` header
    ///
    /// Extra tab-separated columns are ignored.
    pub fn parse(content: &str) -> Result<Self, LexiconError> {
        let mut version = None;
        let mut valences = HashMap::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(comment) = line.strip_prefix('#') {
                if let Some(v) = comment.trim().strip_prefix("version:") {
                    version = Some(v.trim().to_string());
                }
                continue;
            }

            let mut fields = line.split('\t');
            let token = fields.next().map(str::trim).filter(|t| !t.is_empty());
            let valence = fields.next().and_then(|v| v.trim().parse::<f64>().ok());

            match (token, valence) {
                (Some(token), Some(valence)) if valence.is_finite() => {
                    valences.insert(token.to_lowercase(), valence);
                }
                _ => {
                    return Err(LexiconError::Malformed {
                        line: idx + 1,
                        entry: line.to_string(),
                    })
                }
            }
        }

        let version = version.ok_or(LexiconError::MissingVersion)?;

        let boosters = INTENSIFIERS
            .iter()
            .map(|w| (w.to_string(), BOOSTER_INCREMENT))
            .chain(DAMPENERS.iter().map(|w| (w.to_string(), BOOSTER_DECREMENT)))
            .collect();

        let negations = NEGATIONS.iter().map(|w| w.to_string()).collect();

        Ok(Self {
            version,
            valences,
            boosters,
            negations,
        })
    }

    /// Fail unless this lexicon has the pinned version
    pub fn ensure_version(&self, expected: &str) -> Result<(), LexiconError> {
        if self.version == expected {
            Ok(())
        } else {
            Err(LexiconError::VersionMismatch {
                expected: expected.to_string(),
                found: self.version.clone(),
            })
        }
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

impl SentimentLexicon for TweetLexicon {
    fn valence(&self, word: &str) -> Option<f64> {
        self.valences.get(word).copied()
    }

    fn booster(&self, word: &str) -> Option<f64> {
        self.boosters.get(word).copied()
    }

    fn is_negation(&self, word: &str) -> bool {
        if self.negations.contains(word) {
            return true;
        }
        // contractions such as "don't" and "won't"
        word.ends_with("n't") || self.negations.contains(&word.replace('\'', ""))
    }

    fn version(&self) -> &str {
        &self.version
    }
}
