use crate::analysis::token::Token;

/// Deterministic, total tokenizer (spec §4.1): lowercase, replace runs of
/// non-alphanumeric characters with a single separator, split on the
/// separator, drop empty tokens. Stopword removal happens in a downstream
/// filter so the raw tokenizer stays reusable for contexts (e.g. phrase
/// term extraction) that want stopwords retained.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
    fn name(&self) -> &str;
    fn clone_box(&self) -> Box<dyn Tokenizer>;
}

#[derive(Clone, Default)]
pub struct StandardTokenizer;

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let lowered = text.to_lowercase();
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut position = 0u32;

        for ch in lowered.chars() {
            if ch.is_alphanumeric() {
                current.push(ch);
            } else if !current.is_empty() {
                tokens.push(Token::new(std::mem::take(&mut current), position));
                position += 1;
            }
        }
        if !current.is_empty() {
            tokens.push(Token::new(current, position));
        }

        tokens
    }

    fn name(&self) -> &str {
        "standard"
    }

    fn clone_box(&self) -> Box<dyn Tokenizer> {
        Box::new(StandardTokenizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_lowercases() {
        let tokens = StandardTokenizer.tokenize("Alice's Engineer, at TechCorp!");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["alice", "s", "engineer", "at", "techcorp"]);
    }

    #[test]
    fn empty_text_yields_no_tokens() {
        assert!(StandardTokenizer.tokenize("").is_empty());
        assert!(StandardTokenizer.tokenize("   !!! ,,, ").is_empty());
    }

    #[test]
    fn positions_are_sequential() {
        let tokens = StandardTokenizer.tokenize("a b c");
        let positions: Vec<_> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }
}
