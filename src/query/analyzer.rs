use crate::core::types::SymbolicFilters;
use crate::query::parser::looks_boolean;

/// Query shape, classified to steer which layers the planner includes
/// (spec §4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryClass {
    ShortKeyword,
    NaturalLanguage,
    StructuredLexical,
    SymbolicOnly,
}

const PRONOUNS: &[&str] = &["i", "you", "he", "she", "it", "we", "they", "who", "what", "which"];
const PRESENT_VERB_HINTS: &[&str] =
    &["is", "are", "am", "has", "have", "does", "do", "can", "will", "should", "would"];

pub struct QueryAnalyzer;

impl QueryAnalyzer {
    /// Classify `raw_query` combined with whatever symbolic filters were
    /// supplied alongside it.
    pub fn classify(raw_query: &str, filters: &SymbolicFilters) -> QueryClass {
        let trimmed = raw_query.trim();
        if trimmed.is_empty() {
            return QueryClass::SymbolicOnly;
        }

        if looks_boolean(trimmed) {
            return QueryClass::StructuredLexical;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let lower_tokens: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        if tokens.len() < 4 {
            return QueryClass::ShortKeyword;
        }

        let has_pronoun = lower_tokens.iter().any(|t| PRONOUNS.contains(&t.as_str()));
        let has_present_verb = lower_tokens.iter().any(|t| PRESENT_VERB_HINTS.contains(&t.as_str()));

        if tokens.len() > 6 && (has_pronoun || has_present_verb) {
            return QueryClass::NaturalLanguage;
        }

        QueryClass::ShortKeyword
    }

    /// `filters` is unused once we already know this is a real text
    /// query; kept as a parameter for symmetry with `classify`.
    #[allow(unused_variables)]
    pub fn has_filters(filters: &SymbolicFilters) -> bool {
        !filters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_short_keyword() {
        let c = QueryAnalyzer::classify("rust engineer", &SymbolicFilters::default());
        assert_eq!(c, QueryClass::ShortKeyword);
    }

    #[test]
    fn classifies_natural_language() {
        let c = QueryAnalyzer::classify(
            "who is the engineer that has worked on the backend",
            &SymbolicFilters::default(),
        );
        assert_eq!(c, QueryClass::NaturalLanguage);
    }

    #[test]
    fn classifies_structured_lexical() {
        let c = QueryAnalyzer::classify("rust AND backend", &SymbolicFilters::default());
        assert_eq!(c, QueryClass::StructuredLexical);
    }

    #[test]
    fn classifies_symbolic_only_when_query_empty() {
        let mut filters = SymbolicFilters::default();
        filters.entity_types = Some(vec!["person".to_string()]);
        let c = QueryAnalyzer::classify("", &filters);
        assert_eq!(c, QueryClass::SymbolicOnly);
    }
}
