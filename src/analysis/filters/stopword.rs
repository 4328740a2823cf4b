use std::collections::HashSet;

use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

/// Configurable English stopword filter (spec §4.1). The inverted index
/// must never store a stopword as a term, so this filter runs before any
/// text reaches the index.
pub struct StopWordFilter {
    pub stop_words: HashSet<String>,
}

impl StopWordFilter {
    pub fn new(stop_words: Vec<String>) -> Self {
        StopWordFilter { stop_words: stop_words.into_iter().collect() }
    }

    pub fn english() -> Self {
        let words = [
            "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in",
            "is", "it", "its", "of", "on", "that", "the", "to", "was", "were", "will", "with",
            "this", "but", "they", "have", "had", "not", "or", "can", "do", "does",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        StopWordFilter::new(words)
    }
}

impl TokenFilter for StopWordFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens.into_iter().filter(|token| !self.stop_words.contains(&token.text)).collect()
    }

    fn name(&self) -> &str {
        "stop_words"
    }

    fn clone_box(&self) -> Box<dyn TokenFilter> {
        Box::new(StopWordFilter { stop_words: self.stop_words.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};

    #[test]
    fn drops_common_stopwords() {
        let tokens = StandardTokenizer.tokenize("Engineer at TechCorp");
        let filtered = StopWordFilter::english().filter(tokens);
        let texts: Vec<_> = filtered.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["engineer", "techcorp"]);
    }
}
