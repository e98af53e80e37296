use std::collections::BTreeMap;

use serde::Serialize;

use crate::job_titles::job_title_label;
use crate::models::question::AggregatedEncounters;

/// Encounter counts ready for display: labels resolved, largest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EncounterSummary {
    pub company_counts: Vec<(String, u32)>,
    pub country_counts: Vec<(String, u32)>,
    pub role_counts: Vec<(String, u32)>,
}

impl EncounterSummary {
    pub fn total(&self) -> u32 {
        self.company_counts.iter().map(|(_, n)| n).sum()
    }
}

/// Relabels role slugs to job titles and orders every count list for display.
/// Unknown role slugs keep their slug; slugs sharing a label are merged.
pub fn relabel_question_aggregates(aggregates: &AggregatedEncounters) -> EncounterSummary {
    let mut roles: BTreeMap<String, u32> = BTreeMap::new();
    for (slug, count) in &aggregates.role_counts {
        let label = job_title_label(slug).unwrap_or(slug.as_str());
        *roles.entry(label.to_string()).or_default() += count;
    }

    EncounterSummary {
        company_counts: sorted_counts(aggregates.company_counts.clone()),
        country_counts: sorted_counts(aggregates.country_counts.clone()),
        role_counts: sorted_counts(roles),
    }
}

fn sorted_counts(counts: BTreeMap<String, u32>) -> Vec<(String, u32)> {
    let mut counts: Vec<(String, u32)> = counts.into_iter().collect();
    counts.sort_by(|(a_label, a), (b_label, b)| b.cmp(a).then_with(|| a_label.cmp(b_label)));
    counts
}
