//! Bag-of-words tokenization for topic modelling.

use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;

/// Words of two or more word characters, like a classic count vectorizer.
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"))
}

/// A corpus mapped onto a shared vocabulary.
#[derive(Debug, Clone)]
pub struct Corpus {
    /// Vocabulary in sorted order; a word's id is its index here.
    pub vocabulary: Vec<String>,
    /// Each document as a sequence of word ids, in reading order.
    pub documents: Vec<Vec<usize>>,
}

impl Corpus {
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Lowercases, tokenizes and drops stop words.
#[derive(Debug, Clone, Default)]
pub struct CountVectorizer {
    stop_words: HashSet<String>,
}

impl CountVectorizer {
    pub fn new<I, S>(stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: stop_words
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Split a text into its kept tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        token_pattern()
            .find_iter(&lower)
            .map(|m| m.as_str().to_string())
            .filter(|t| !self.stop_words.contains(t))
            .collect()
    }

    /// Build the vocabulary over all texts and encode each text against it.
    pub fn fit_transform(&self, texts: &[String]) -> Corpus {
        let tokenized: Vec<Vec<String>> = texts.iter().map(|t| self.tokenize(t)).collect();

        let vocabulary: Vec<String> = tokenized
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, w)| (w.as_str(), i))
            .collect();

        let documents = tokenized
            .iter()
            .map(|tokens| tokens.iter().map(|t| index[t.as_str()]).collect())
            .collect();

        Corpus {
            vocabulary,
            documents,
        }
    }
}
