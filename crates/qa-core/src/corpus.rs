//! The question/answer corpus and its CSV loader.
//!
//! Rows are validated once at the boundary: both the `question` and the
//! `answer` column must be present in the header, and rows where either field
//! is blank after trimming are dropped. Everything downstream works over the
//! resulting fixed-shape [`Corpus`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};

const QUESTION_COLUMN: &str = "question";
const ANSWER_COLUMN: &str = "answer";

/// Index-aligned questions and answers. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    questions: Vec<String>,
    answers: Vec<String>,
}

impl Corpus {
    /// Build a corpus from `(question, answer)` pairs, trimming both fields and
    /// skipping pairs where either is blank.
    pub fn from_pairs<I, Q, A>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Q, A)>,
        Q: AsRef<str>,
        A: AsRef<str>,
    {
        let mut corpus = Self::default();
        for (q, a) in pairs {
            corpus.push(q.as_ref(), a.as_ref());
        }
        corpus
    }

    /// Parse CSV text with a header row from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::None)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| Error::DataSource(format!("unreadable header row: {e}")))?
            .clone();
        let q_col = column_index(&headers, QUESTION_COLUMN)?;
        let a_col = column_index(&headers, ANSWER_COLUMN)?;

        let mut corpus = Self::default();
        let mut skipped = 0usize;
        for (row, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| Error::DataSource(format!("row {}: {e}", row + 1)))?;
            let question = record.get(q_col).unwrap_or("");
            let answer = record.get(a_col).unwrap_or("");
            if !corpus.push(question, answer) {
                skipped += 1;
            }
        }
        if skipped > 0 {
            debug!(skipped, "dropped rows with a blank question or answer");
        }
        Ok(corpus)
    }

    fn push(&mut self, question: &str, answer: &str) -> bool {
        let (question, answer) = (question.trim(), answer.trim());
        if question.is_empty() || answer.is_empty() {
            return false;
        }
        self.questions.push(question.to_string());
        self.answers.push(answer.to_string());
        true
    }

    pub fn len(&self) -> usize { self.questions.len() }

    pub fn is_empty(&self) -> bool { self.questions.is_empty() }

    pub fn questions(&self) -> &[String] { &self.questions }

    pub fn answers(&self) -> &[String] { &self.answers }

    pub fn question(&self, index: usize) -> Option<&str> { self.questions.get(index).map(String::as_str) }

    pub fn answer(&self, index: usize) -> Option<&str> { self.answers.get(index).map(String::as_str) }

    pub fn get(&self, index: usize) -> Option<(&str, &str)> {
        Some((self.question(index)?, self.answer(index)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.questions.iter().zip(self.answers.iter()).map(|(q, a)| (q.as_str(), a.as_str()))
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::DataSource(format!("missing required column '{name}'")))
}

/// Load a corpus from a CSV file with `question` and `answer` columns.
///
/// A missing or unparseable file is [`Error::DataSource`]. An empty result is
/// not an error here; engines reject it with [`Error::EmptyCorpus`].
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let file = File::open(path).map_err(|e| Error::DataSource(format!("{}: {e}", path.display())))?;
    let corpus = Corpus::from_reader(file)
        .map_err(|e| match e {
            Error::DataSource(msg) => Error::DataSource(format!("{}: {msg}", path.display())),
            other => other,
        })?;
    info!(pairs = corpus.len(), path = %path.display(), "loaded question/answer corpus");
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_pairs_are_dropped() {
        let corpus = Corpus::from_pairs([("  q1 ", " a1"), ("", "a2"), ("q3", "   "), ("q4", "a4")]);
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(0), Some(("q1", "a1")));
        assert_eq!(corpus.get(1), Some(("q4", "a4")));
    }

    #[test]
    fn header_lookup_is_case_insensitive_and_tolerates_bom() {
        let csv = "\u{feff}ID,Question,ANSWER\n1,hello,world\n";
        let corpus = Corpus::from_reader(csv.as_bytes()).expect("parse");
        assert_eq!(corpus.get(0), Some(("hello", "world")));
    }
}
