//! TF-IDF keyword ranking.
//!
//! Tokens are lowercased runs of two or more word characters. English stop
//! words are dropped, IDF is smoothed (`ln((1 + n) / (1 + df)) + 1`) and each
//! document's vector is L2-normalized before scores are summed per term.
//! With a one-document corpus the IDF is uniform, so the ranking reduces to
//! stop-word-filtered term frequency.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Number of keywords returned by default.
pub const DEFAULT_KEYWORD_COUNT: usize = 5;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeywordError {
    #[error("empty vocabulary; the input contains only stop words or no words")]
    EmptyVocabulary,
    #[error("corpus has no documents")]
    EmptyCorpus,
}

/// A term with its aggregated TF-IDF score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTerm {
    pub term: String,
    pub score: f64,
}

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

static ENGLISH_STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
        "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
        "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
        "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
        "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
        "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
        "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
        "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg", "eight",
        "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even", "ever",
        "every", "everyone", "everything", "everywhere", "except", "few", "fifteen", "fifty",
        "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty", "found",
        "four", "from", "front", "full", "further", "get", "give", "go", "had", "has", "hasnt",
        "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon",
        "hers", "herself", "him", "himself", "his", "how", "however", "hundred", "i", "ie", "if",
        "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself", "keep", "last",
        "latter", "latterly", "least", "less", "ltd", "made", "many", "may", "me", "meanwhile",
        "might", "mill", "mine", "more", "moreover", "most", "mostly", "move", "much", "must",
        "my", "myself", "name", "namely", "neither", "never", "nevertheless", "next", "nine",
        "no", "nobody", "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off",
        "often", "on", "once", "one", "only", "onto", "or", "other", "others", "otherwise",
        "our", "ours", "ourselves", "out", "over", "own", "part", "per", "perhaps", "please",
        "put", "rather", "re", "same", "see", "seem", "seemed", "seeming", "seems", "serious",
        "several", "she", "should", "show", "side", "since", "sincere", "six", "sixty", "so",
        "some", "somehow", "someone", "something", "sometime", "sometimes", "somewhere",
        "still", "such", "system", "take", "ten", "than", "that", "the", "their", "them",
        "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore",
        "therein", "thereupon", "these", "they", "thick", "thin", "third", "this", "those",
        "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
        "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up",
        "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
        "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein",
        "whereupon", "wherever", "whether", "which", "while", "whither", "who", "whoever",
        "whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet",
        "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Whether `word` (already lowercased) is an English stop word.
pub fn is_stop_word(word: &str) -> bool {
    ENGLISH_STOP_WORDS.contains(word)
}

/// Lowercased, stop-word-filtered tokens of `text`, in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|w| !is_stop_word(w))
        .collect()
}

/// TF-IDF ranker over a small in-memory corpus.
#[derive(Debug, Clone)]
pub struct TfidfRanker {
    max_terms: usize,
}

impl Default for TfidfRanker {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORD_COUNT)
    }
}

impl TfidfRanker {
    pub fn new(max_terms: usize) -> Self {
        Self { max_terms }
    }

    /// Score every term of the corpus and return the best `max_terms`,
    /// highest score first. Ties are broken by ascending term, which also
    /// decides which tied terms survive the limit.
    pub fn rank(&self, documents: &[&str]) -> Result<Vec<ScoredTerm>, KeywordError> {
        if documents.is_empty() {
            return Err(KeywordError::EmptyCorpus);
        }

        let term_counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut counts = HashMap::new();
                for token in tokenize(doc) {
                    *counts.entry(token).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for counts in &term_counts {
            for term in counts.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        if doc_freq.is_empty() {
            return Err(KeywordError::EmptyVocabulary);
        }

        let n_docs = documents.len() as f64;
        let idf = |term: &str| -> f64 {
            let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
            ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
        };

        let mut scores: HashMap<String, f64> = HashMap::new();
        for counts in &term_counts {
            let weights: Vec<(&String, f64)> = counts
                .iter()
                .map(|(term, &count)| (term, count as f64 * idf(term)))
                .collect();
            let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm == 0.0 {
                continue;
            }
            for (term, weight) in weights {
                *scores.entry(term.clone()).or_insert(0.0) += weight / norm;
            }
        }

        let mut ranked: Vec<ScoredTerm> = scores
            .into_iter()
            .map(|(term, score)| ScoredTerm { term, score })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.term.cmp(&b.term))
        });
        ranked.truncate(self.max_terms);
        Ok(ranked)
    }

    /// Rank a single text treated as the entire corpus.
    pub fn rank_text(&self, text: &str) -> Result<Vec<ScoredTerm>, KeywordError> {
        self.rank(&[text])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(ranked: &[ScoredTerm]) -> Vec<&str> {
        ranked.iter().map(|t| t.term.as_str()).collect()
    }

    #[test]
    fn pangram_drops_stop_words() {
        let ranked = TfidfRanker::default()
            .rank_text("The quick brown fox jumps over the lazy dog.")
            .unwrap();
        assert_eq!(terms(&ranked), vec!["brown", "dog", "fox", "jumps", "lazy"]);
    }

    #[test]
    fn limit_keeps_highest_scores_with_lexical_tie_break() {
        // checker ties with borrow and loses on the lexical tie-break.
        let ranked = TfidfRanker::new(3)
            .rank_text("rust compiler rust borrow checker rust compiler")
            .unwrap();
        assert_eq!(terms(&ranked), vec!["rust", "compiler", "borrow"]);
        assert!(ranked[0].score > ranked[1].score);
        assert!(ranked[1].score > ranked[2].score);
    }

    #[test]
    fn single_letter_tokens_are_ignored() {
        let ranked = TfidfRanker::default().rank_text("x y z alpha").unwrap();
        assert_eq!(terms(&ranked), vec!["alpha"]);
    }

    #[test]
    fn case_is_folded() {
        let ranked = TfidfRanker::default().rank_text("Parser parser PARSER").unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].term, "parser");
    }

    #[test]
    fn only_stop_words_is_empty_vocabulary() {
        let err = TfidfRanker::default()
            .rank_text("the and of to it")
            .unwrap_err();
        assert_eq!(err, KeywordError::EmptyVocabulary);
    }

    #[test]
    fn empty_corpus_is_an_error() {
        assert_eq!(
            TfidfRanker::default().rank(&[]).unwrap_err(),
            KeywordError::EmptyCorpus
        );
    }

    #[test]
    fn rare_terms_get_higher_idf_across_documents() {
        let ranked = TfidfRanker::new(10)
            .rank(&["shared unique", "shared common"])
            .unwrap();
        let score = |t: &str| ranked.iter().find(|s| s.term == t).unwrap().score;
        assert!(score("unique") > score("shared") / 2.0);
        assert!(score("unique") > 0.0);
    }

    #[test]
    fn result_has_no_duplicates_and_respects_limit() {
        let text = "alpha beta gamma delta epsilon zeta eta theta alpha beta";
        let ranked = TfidfRanker::default().rank_text(text).unwrap();
        assert!(ranked.len() <= DEFAULT_KEYWORD_COUNT);
        let unique: HashSet<&str> = ranked.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(unique.len(), ranked.len());
    }
}
