use chrono::{DateTime, Utc};

use crate::core::types::{Entity, SymbolicFilters};

/// AND-combined metadata predicate evaluator (spec §4.7). Score is
/// `matched / total` over the predicates actually supplied; an empty
/// filter set scores 0.5 and matches everything.
pub struct SymbolicEvaluator<'a> {
    filters: &'a SymbolicFilters,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolicResult {
    pub matches: bool,
    pub score: f32,
}

impl<'a> SymbolicEvaluator<'a> {
    pub fn new(filters: &'a SymbolicFilters) -> Self {
        SymbolicEvaluator { filters }
    }

    pub fn evaluate(&self, entity: &Entity) -> SymbolicResult {
        if self.filters.is_empty() {
            return SymbolicResult { matches: true, score: 0.5 };
        }

        let mut total = 0u32;
        let mut matched = 0u32;

        if let Some(tags) = &self.filters.tags {
            total += 1;
            if tags.iter().all(|t| entity.has_tag(t)) {
                matched += 1;
            }
        }

        if let Some(types) = &self.filters.entity_types {
            total += 1;
            if types.iter().any(|t| t.eq_ignore_ascii_case(&entity.entity_type)) {
                matched += 1;
            }
        }

        if let Some(range) = &self.filters.date_range {
            total += 1;
            if let Ok(created) = DateTime::parse_from_rfc3339(&entity.created_at) {
                let created: DateTime<Utc> = created.with_timezone(&Utc);
                let after_start = range.start.is_none_or(|s| created >= s);
                let before_end = range.end.is_none_or(|e| created <= e);
                if after_start && before_end {
                    matched += 1;
                }
            }
            // entity lacking a parseable date is excluded: not counted as matched
        }

        if let Some(range) = &self.filters.importance {
            total += 1;
            let importance = entity.importance.unwrap_or(5.0);
            let above_min = range.min.is_none_or(|m| importance >= m);
            let below_max = range.max.is_none_or(|m| importance <= m);
            if above_min && below_max {
                matched += 1;
            }
        }

        if let Some(parent_id) = &self.filters.parent_id {
            total += 1;
            if entity.parent_id.as_deref() == Some(parent_id.as_str()) {
                matched += 1;
            }
        }

        if let Some(required) = self.filters.has_observations {
            total += 1;
            if (!entity.observations.is_empty()) == required {
                matched += 1;
            }
        }

        let score = if total == 0 { 0.5 } else { matched as f32 / total as f32 };
        SymbolicResult { matches: total > 0 && matched == total, score }
    }
}
