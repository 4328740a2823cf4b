/// Boolean query AST: terms, quoted phrases, and AND/OR/NOT combinators
/// with parenthesized grouping (spec §4.9's "structured lexical" case).
#[derive(Debug, Clone, PartialEq)]
pub enum BoolExpr {
    Term(String),
    Phrase(Vec<String>),
    And(Box<BoolExpr>, Box<BoolExpr>),
    Or(Box<BoolExpr>, Box<BoolExpr>),
    Not(Box<BoolExpr>),
}

impl BoolExpr {
    /// Every literal term/phrase word appearing anywhere in the tree, for
    /// cost estimation and cache-key normalization.
    pub fn terms(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_terms(&mut out);
        out
    }

    fn collect_terms(&self, out: &mut Vec<String>) {
        match self {
            BoolExpr::Term(t) => out.push(t.clone()),
            BoolExpr::Phrase(words) => out.extend(words.iter().cloned()),
            BoolExpr::And(l, r) | BoolExpr::Or(l, r) => {
                l.collect_terms(out);
                r.collect_terms(out);
            }
            BoolExpr::Not(inner) => inner.collect_terms(out),
        }
    }
}
