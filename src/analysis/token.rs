use serde::{Deserialize, Serialize};

/// A single token produced by the tokenizer. `position` is the token's
/// ordinal index within the analyzed text (used for phrase/proximity
/// matching in the boolean layer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub position: u32,
}

impl Token {
    pub fn new(text: String, position: u32) -> Self {
        Token { text, position }
    }
}
