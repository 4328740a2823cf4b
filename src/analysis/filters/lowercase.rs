use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

/// Redundant with `StandardTokenizer`'s own lowercasing, but kept so an
/// analyzer pipeline built over a different tokenizer still normalizes
/// case deterministically.
pub struct LowercaseFilter;

impl TokenFilter for LowercaseFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .map(|mut token| {
                token.text = token.text.to_lowercase();
                token
            })
            .collect()
    }

    fn name(&self) -> &str {
        "lowercase"
    }

    fn clone_box(&self) -> Box<dyn TokenFilter> {
        Box::new(LowercaseFilter)
    }
}
