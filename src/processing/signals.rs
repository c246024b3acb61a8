//! Structural signals detected in resume text

use crate::error::{Result, ResumeScorerError};
use crate::processing::keywords::KeywordExtractor;
use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;
use std::collections::BTreeSet;

/// Resumes shorter than this are flagged as thin
pub const SHORT_RESUME_WORDS: usize = 150;
/// Resumes longer than this are flagged as overlong
pub const LONG_RESUME_WORDS: usize = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKind {
    Experience,
    Education,
    Skills,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateStyle {
    /// "Jan 2020", "September 2019"
    MonthName,
    /// "01/2020"
    NumericSlash,
    /// "2020-01"
    IsoMonth,
    /// "2018 - 2020", "2019 to present"
    YearRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormatting {
    Missing,
    Inconsistent,
    Consistent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeSignals {
    pub word_count: usize,
    pub has_experience: bool,
    pub has_education: bool,
    pub has_skills: bool,
    /// Any of the section headings that mark a document as a resume
    pub has_section_keywords: bool,
    pub has_achievement_verbs: bool,
    pub has_quantified_metrics: bool,
    pub date_styles: BTreeSet<DateStyle>,
}

impl ResumeSignals {
    /// Validity gate: long enough and shaped like a resume
    pub fn is_resume_like(&self, min_word_count: usize) -> bool {
        self.word_count >= min_word_count && self.has_section_keywords
    }

    pub fn date_formatting(&self) -> DateFormatting {
        match self.date_styles.len() {
            0 => DateFormatting::Missing,
            1 => DateFormatting::Consistent,
            _ => DateFormatting::Inconsistent,
        }
    }

    pub fn is_too_short(&self) -> bool {
        self.word_count < SHORT_RESUME_WORDS
    }

    pub fn is_too_long(&self) -> bool {
        self.word_count > LONG_RESUME_WORDS
    }
}

pub struct SignalDetector {
    section_matcher: AhoCorasick,
    section_kinds: Vec<SectionKind>,
    /// Whether each section pattern counts toward the validity gate
    section_gates: Vec<bool>,
    verb_matcher: AhoCorasick,
    metric_regex: Regex,
    date_patterns: Vec<(DateStyle, Regex)>,
}

impl SignalDetector {
    pub fn new() -> Result<Self> {
        let sections = Self::section_keywords();
        let section_kinds = sections.iter().map(|(_, kind, _)| *kind).collect();
        let section_gates = sections.iter().map(|(_, _, gate)| *gate).collect();
        let section_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(sections.iter().map(|(pattern, _, _)| *pattern))
            .map_err(|e| ResumeScorerError::Processing(format!("Failed to build section matcher: {}", e)))?;

        let verb_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(Self::achievement_verbs())
            .map_err(|e| ResumeScorerError::Processing(format!("Failed to build verb matcher: {}", e)))?;

        let metric_regex = Regex::new(
            r"(?i)(\d+(\.\d+)?\s*%)|(\$\s?\d)|(\b\d+[km]?\+?\s+(users|customers|clients|people|engineers|developers|projects|members|servers|requests|hours|days|weeks|months)\b)",
        )
        .map_err(|e| ResumeScorerError::Processing(format!("Invalid metric regex: {}", e)))?;

        let date_patterns = vec![
            (
                DateStyle::MonthName,
                r"(?i)\b(jan(uary)?|feb(ruary)?|mar(ch)?|apr(il)?|may|june?|july?|aug(ust)?|sep(t(ember)?)?|oct(ober)?|nov(ember)?|dec(ember)?)\.?\s+(19|20)\d{2}\b",
            ),
            (DateStyle::NumericSlash, r"\b(0?[1-9]|1[0-2])/(19|20)\d{2}\b"),
            (DateStyle::IsoMonth, r"\b(19|20)\d{2}-(0[1-9]|1[0-2])\b"),
            (
                DateStyle::YearRange,
                r"(?i)\b(19|20)\d{2}\s*(-|–|to)\s*((19|20)\d{2}|present|current)\b",
            ),
        ]
        .into_iter()
        .map(|(style, pattern)| {
            Regex::new(pattern)
                .map(|regex| (style, regex))
                .map_err(|e| ResumeScorerError::Processing(format!("Invalid date regex: {}", e)))
        })
        .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            section_matcher,
            section_kinds,
            section_gates,
            verb_matcher,
            metric_regex,
            date_patterns,
        })
    }

    pub fn detect(&self, text: &str) -> ResumeSignals {
        let mut sections = BTreeSet::new();
        let mut has_section_keywords = false;
        for pattern_idx in whole_word_matches(&self.section_matcher, text) {
            sections.insert(self.section_kinds[pattern_idx]);
            has_section_keywords |= self.section_gates[pattern_idx];
        }

        let has_achievement_verbs = whole_word_matches(&self.verb_matcher, text).next().is_some();

        let date_styles = self
            .date_patterns
            .iter()
            .filter(|(_, regex)| regex.is_match(text))
            .map(|(style, _)| *style)
            .collect();

        ResumeSignals {
            word_count: KeywordExtractor::word_count(text),
            has_experience: sections.contains(&SectionKind::Experience),
            has_education: sections.contains(&SectionKind::Education),
            has_skills: sections.contains(&SectionKind::Skills),
            has_section_keywords,
            has_achievement_verbs,
            has_quantified_metrics: self.metric_regex.is_match(text),
            date_styles,
        }
    }

    /// (pattern, section, counts toward the validity gate)
    fn section_keywords() -> Vec<(&'static str, SectionKind, bool)> {
        vec![
            ("experience", SectionKind::Experience, true),
            ("employment", SectionKind::Experience, true),
            ("work history", SectionKind::Experience, true),
            ("education", SectionKind::Education, true),
            ("skills", SectionKind::Skills, true),
            ("projects", SectionKind::Other, true),
            ("summary", SectionKind::Other, true),
            ("certifications", SectionKind::Other, true),
            // Presence hints only
            ("university", SectionKind::Education, false),
            ("bachelor", SectionKind::Education, false),
            ("degree", SectionKind::Education, false),
            ("competencies", SectionKind::Skills, false),
            ("tech stack", SectionKind::Skills, false),
        ]
    }

    fn achievement_verbs() -> Vec<&'static str> {
        vec![
            "led", "managed", "developed", "built", "designed", "implemented",
            "improved", "increased", "reduced", "launched", "delivered",
            "achieved", "created", "optimized", "spearheaded", "architected",
            "mentored", "automated", "streamlined", "drove", "established",
        ]
    }
}

/// Pattern indices of matches that are not embedded inside a longer word
fn whole_word_matches<'a>(matcher: &'a AhoCorasick, text: &'a str) -> impl Iterator<Item = usize> + 'a {
    matcher
        .find_iter(text)
        .filter(move |mat| is_word_boundary(text, mat.start(), mat.end()))
        .map(|mat| mat.pattern().as_usize())
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.map_or(false, char::is_alphanumeric) && !after.map_or(false, char::is_alphanumeric)
}
