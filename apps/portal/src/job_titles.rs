//! Job title slugs used for roles, with their display labels.

pub const JOB_TITLES: &[(&str, &str)] = &[
    ("software-engineer", "Software Engineer"),
    ("back-end-engineer", "Back End Engineer"),
    ("front-end-engineer", "Front End Engineer"),
    ("full-stack-engineer", "Full Stack Engineer"),
    ("ios-engineer", "iOS Engineer"),
    ("android-engineer", "Android Engineer"),
    ("data-engineer", "Data Engineer"),
    ("data-scientist", "Data Scientist"),
    ("machine-learning-engineer", "Machine Learning (ML) Engineer"),
    ("devops-engineer", "DevOps Engineer"),
    ("site-reliability-engineer", "Site Reliability Engineer (SRE)"),
    ("security-engineer", "Security Engineer"),
    ("embedded-engineer", "Embedded Engineer"),
    ("test-engineer", "Test Engineer"),
    ("engineering-manager", "Engineering Manager"),
    ("product-manager", "Product Manager"),
    ("product-designer", "Product Designer"),
    ("technical-program-manager", "Technical Program Manager"),
];

pub fn job_title_label(slug: &str) -> Option<&'static str> {
    JOB_TITLES
        .iter()
        .find(|(s, _)| *s == slug)
        .map(|(_, label)| *label)
}

/// A selectable typeahead entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeaheadOption {
    pub id: String,
    pub label: String,
    pub value: String,
}

/// Job titles whose label contains `query`, ignoring case, in table order.
pub fn search_job_titles(query: &str) -> Vec<TypeaheadOption> {
    let query = query.to_lowercase();
    JOB_TITLES
        .iter()
        .filter(|(_, label)| label.to_lowercase().contains(&query))
        .map(|(slug, label)| TypeaheadOption {
            id: slug.to_string(),
            label: label.to_string(),
            value: slug.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_returns_all() {
        assert_eq!(search_job_titles("").len(), JOB_TITLES.len());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let results = search_job_titles("ENGINEER");
        assert!(results.iter().all(|o| o.label.contains("Engineer")));
        let ios = search_job_titles("ios");
        assert_eq!(ios.len(), 1);
        assert_eq!(ios[0].value, "ios-engineer");
    }

    #[test]
    fn test_label_lookup() {
        assert_eq!(job_title_label("data-scientist"), Some("Data Scientist"));
        assert_eq!(job_title_label("wizard"), None);
    }
}
