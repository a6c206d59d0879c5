//! TF-IDF vectorizer exported from a trained scikit-learn `TfidfVectorizer`.
//!
//! Vocabulary and IDF weights are fixed at training time. `transform` is a
//! pure function of the document: unknown terms are dropped and nothing is
//! refit.

use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Analyzer {
    #[default]
    Word,
    /// Whitespace-bounded character n-grams.
    CharWb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    None,
}

/// On-disk form of the vectorizer.
#[derive(Debug, Deserialize)]
pub struct ExportedVectorizer {
    #[serde(default)]
    pub analyzer: Analyzer,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: [usize; 2],
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default)]
    pub binary: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
    #[serde(default)]
    pub token_pattern: Option<String>,
    #[serde(default)]
    pub stop_words: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> [usize; 2] {
    [1, 1]
}

/// Sparse feature row: `(column, value)` pairs sorted by column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    pub entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(idx, val)| val * dense.get(idx).copied().unwrap_or(0.0))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Validated, ready-to-use vectorizer.
#[derive(Debug)]
pub struct TfidfVectorizer {
    analyzer: Analyzer,
    ngram_range: [usize; 2],
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    lowercase: bool,
    binary: bool,
    sublinear_tf: bool,
    norm: Norm,
    token_pattern: Regex,
    stop_words: HashSet<String>,
}

impl TfidfVectorizer {
    /// Validate an exported vectorizer. Errors describe what is inconsistent.
    pub fn from_exported(exported: ExportedVectorizer) -> Result<Self, String> {
        let [lo, hi] = exported.ngram_range;
        if lo == 0 || lo > hi {
            return Err(format!("invalid ngram_range [{lo}, {hi}]"));
        }
        let width = exported.idf.len();
        if let Some((term, idx)) = exported.vocabulary.iter().find(|&(_, &idx)| idx >= width) {
            return Err(format!("vocabulary term {term:?} maps to column {idx}, but idf has {width} entries"));
        }
        let columns: HashSet<usize> = exported.vocabulary.values().copied().collect();
        if columns.len() != exported.vocabulary.len() {
            return Err(format!(
                "vocabulary maps {} terms onto {} columns",
                exported.vocabulary.len(),
                columns.len()
            ));
        }
        if columns.len() != width {
            return Err(format!("idf has {width} entries for {} vocabulary columns", columns.len()));
        }
        let pattern = exported.token_pattern.as_deref().unwrap_or(DEFAULT_TOKEN_PATTERN);
        let token_pattern = Regex::new(pattern).map_err(|e| format!("token_pattern: {e}"))?;

        Ok(Self {
            analyzer: exported.analyzer,
            ngram_range: exported.ngram_range,
            vocabulary: exported.vocabulary,
            idf: exported.idf,
            lowercase: exported.lowercase,
            binary: exported.binary,
            sublinear_tf: exported.sublinear_tf,
            norm: exported.norm,
            token_pattern,
            stop_words: exported.stop_words.into_iter().collect(),
        })
    }

    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    pub fn transform(&self, document: &str) -> FeatureVector {
        let text = if self.lowercase {
            document.to_lowercase()
        } else {
            document.to_string()
        };
        let [lo, hi] = self.ngram_range;
        let ngrams = match self.analyzer {
            Analyzer::Word => word_ngrams(&self.tokenize(&text), lo, hi),
            Analyzer::CharWb => char_wb_ngrams(&text, lo, hi),
        };
        self.weigh(&ngrams)
    }

    fn tokenize<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.token_pattern
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect()
    }

    /// TF-IDF weights for in-vocabulary n-grams, then optional L2 normalization.
    fn weigh(&self, ngrams: &HashMap<String, u32>) -> FeatureVector {
        let mut entries: Vec<(usize, f64)> = Vec::new();

        for (gram, &count) in ngrams {
            if let Some(&idx) = self.vocabulary.get(gram) {
                let tf = if self.binary {
                    1.0
                } else if self.sublinear_tf {
                    (count as f64).ln() + 1.0
                } else {
                    count as f64
                };
                entries.push((idx, tf * self.idf[idx]));
            }
        }

        // Column order keeps the norm and later dot products reproducible.
        entries.sort_by_key(|&(idx, _)| idx);

        if self.norm == Norm::L2 {
            let norm_sq: f64 = entries.iter().map(|(_, v)| v * v).sum();
            if norm_sq > 0.0 {
                let norm = norm_sq.sqrt();
                for (_, v) in &mut entries {
                    *v /= norm;
                }
            }
        }

        FeatureVector { entries }
    }
}

/// Word n-grams joined by a single space, with occurrence counts.
fn word_ngrams(tokens: &[&str], lo: usize, hi: usize) -> HashMap<String, u32> {
    let mut ngrams = HashMap::new();

    for n in lo..=hi {
        if n > tokens.len() {
            continue;
        }
        for window in tokens.windows(n) {
            *ngrams.entry(window.join(" ")).or_insert(0) += 1;
        }
    }

    ngrams
}

/// Character n-grams inside each whitespace-separated word padded with spaces.
fn char_wb_ngrams(text: &str, lo: usize, hi: usize) -> HashMap<String, u32> {
    let mut ngrams = HashMap::new();

    for word in text.split_whitespace() {
        let padded = format!(" {word} ");
        let chars: Vec<char> = padded.chars().collect();

        for n in lo..=hi {
            if n >= chars.len() {
                // Short word: the whole padded word, counted once.
                *ngrams.entry(padded).or_insert(0) += 1;
                break;
            }
            for window in chars.windows(n) {
                let gram: String = window.iter().collect();
                *ngrams.entry(gram).or_insert(0) += 1;
            }
        }
    }

    ngrams
}
