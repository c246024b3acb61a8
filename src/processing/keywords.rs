//! Keyword extraction and normalization

use crate::config::ScoringConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

/// Parameters controlling which tokens count as keywords
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOptions {
    pub min_token_len: usize,
    pub include_bigrams: bool,
    /// Combined character count of both words, excluding the separator
    pub min_bigram_len: usize,
    pub min_frequency: usize,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            min_token_len: 3,
            include_bigrams: false,
            min_bigram_len: 8,
            min_frequency: 1,
        }
    }
}

impl From<&ScoringConfig> for ExtractionOptions {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            min_token_len: config.min_token_len.max(1),
            include_bigrams: config.include_bigrams,
            min_bigram_len: config.min_bigram_len,
            min_frequency: config.min_frequency.max(1),
        }
    }
}

/// Ordered set of lowercase keywords
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSet(BTreeSet<String>);

impl KeywordSet {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(words.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.0.contains(keyword)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// Keywords present in both sets, sorted
    pub fn intersection(&self, other: &KeywordSet) -> Vec<String> {
        self.0.intersection(&other.0).cloned().collect()
    }

    /// Keywords of `self` that `other` lacks, sorted
    pub fn missing_from(&self, other: &KeywordSet) -> Vec<String> {
        self.0.difference(&other.0).cloned().collect()
    }

    /// Fraction of `job` keywords that also appear in `self`
    pub fn overlap_ratio(&self, job: &KeywordSet) -> f64 {
        if job.is_empty() {
            return 0.0;
        }
        let matched = job.0.intersection(&self.0).count();
        matched as f64 / job.len() as f64
    }
}

impl FromIterator<String> for KeywordSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub struct KeywordExtractor {
    options: ExtractionOptions,
    stop_words: HashSet<String>,
    non_alphanumeric: Regex,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(ExtractionOptions::default())
    }
}

impl KeywordExtractor {
    pub fn new(options: ExtractionOptions) -> Self {
        let non_alphanumeric = Regex::new(r"[^\p{L}\p{N}\s]+")
            .expect("Invalid non-alphanumeric regex");

        Self {
            options,
            stop_words: Self::create_stop_words(),
            non_alphanumeric,
        }
    }

    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    /// Extract the keyword set of `text`
    pub fn extract(&self, text: &str) -> KeywordSet {
        let words = self.normalize(text);
        if words.is_empty() {
            return KeywordSet::default();
        }

        let mut counts: HashMap<String, usize> = HashMap::new();

        for word in &words {
            if self.is_content_word(word) && word.chars().count() >= self.options.min_token_len {
                *counts.entry(word.clone()).or_insert(0) += 1;
            }
        }

        if self.options.include_bigrams {
            for pair in words.windows(2) {
                let (first, second) = (&pair[0], &pair[1]);
                if !self.is_content_word(first) || !self.is_content_word(second) {
                    continue;
                }
                if first.chars().count() + second.chars().count() < self.options.min_bigram_len {
                    continue;
                }
                *counts.entry(format!("{} {}", first, second)).or_insert(0) += 1;
            }
        }

        counts
            .into_iter()
            .filter(|(_, count)| *count >= self.options.min_frequency)
            .map(|(keyword, _)| keyword)
            .collect()
    }

    /// Lowercase, replace punctuation with spaces and split on whitespace
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.non_alphanumeric
            .replace_all(&lowered, " ")
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// Number of Unicode words in `text`
    pub fn word_count(text: &str) -> usize {
        text.unicode_words().count()
    }

    fn is_content_word(&self, word: &str) -> bool {
        !self.stop_words.contains(word) && !word.chars().all(|c| c.is_numeric())
    }

    fn create_stop_words() -> HashSet<String> {
        let stop_words = [
            "a", "an", "and", "are", "as", "at", "be", "by", "for", "from",
            "has", "have", "had", "in", "is", "it", "its", "of", "on", "or",
            "that", "the", "this", "these", "those", "to", "was", "were", "will",
            "with", "we", "you", "your", "our", "they", "their", "them", "who",
            "which", "what", "when", "where", "how", "all", "any", "can", "not",
            "but", "into", "than", "then", "there", "also", "such", "very",
            "been", "being", "about", "over", "per", "via", "etc", "her", "his",
            "she", "him", "would", "should", "could", "may", "must", "shall",
        ];

        stop_words.iter().map(|&s| s.to_string()).collect()
    }
}
