use std::collections::BTreeMap;

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    Coding,
    SystemDesign,
    Behavioral,
    Theory,
}

impl QuestionType {
    pub const ALL: [QuestionType; 4] = [
        QuestionType::Coding,
        QuestionType::SystemDesign,
        QuestionType::Behavioral,
        QuestionType::Theory,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Coding => "CODING",
            QuestionType::SystemDesign => "SYSTEM_DESIGN",
            QuestionType::Behavioral => "BEHAVIORAL",
            QuestionType::Theory => "THEORY",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuestionType::Coding => "Coding",
            QuestionType::SystemDesign => "Design",
            QuestionType::Behavioral => "Behavioral",
            QuestionType::Theory => "Theory",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionAge {
    LastMonth,
    #[serde(rename = "last-6-months")]
    LastSixMonths,
    LastYear,
    All,
}

impl QuestionAge {
    pub const ALL: [QuestionAge; 4] = [
        QuestionAge::LastMonth,
        QuestionAge::LastSixMonths,
        QuestionAge::LastYear,
        QuestionAge::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionAge::LastMonth => "last-month",
            QuestionAge::LastSixMonths => "last-6-months",
            QuestionAge::LastYear => "last-year",
            QuestionAge::All => "all",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuestionAge::LastMonth => "Last month",
            QuestionAge::LastSixMonths => "Last 6 months",
            QuestionAge::LastYear => "Last year",
            QuestionAge::All => "All",
        }
    }

    /// Earliest seen-at date included by this age window, or `None` when unbounded.
    pub fn start_date(self, today: NaiveDate) -> Option<NaiveDate> {
        let months = match self {
            QuestionAge::LastMonth => 1,
            QuestionAge::LastSixMonths => 6,
            QuestionAge::LastYear => 12,
            QuestionAge::All => return None,
        };
        today.checked_sub_months(Months::new(months))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortType {
    Top,
    New,
}

/// A typeahead location: a country, optionally narrowed to a state and city.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub country_id: String,
    #[serde(default)]
    pub state_id: Option<String>,
    #[serde(default)]
    pub city_id: Option<String>,
    pub id: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedEncounters {
    #[serde(default)]
    pub company_counts: BTreeMap<String, u32>,
    #[serde(default)]
    pub country_counts: BTreeMap<String, u32>,
    #[serde(default)]
    pub role_counts: BTreeMap<String, u32>,
    #[serde(default)]
    pub latest_seen_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub seen_at: DateTime<Utc>,
    #[serde(default)]
    pub received_count: u32,
    #[serde(default)]
    pub num_votes: i32,
    #[serde(default)]
    pub num_answers: u32,
    #[serde(default)]
    pub aggregated_question_encounters: AggregatedEncounters,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_question_age_windows() {
        let today = date(2024, 3, 31);
        assert_eq!(QuestionAge::LastMonth.start_date(today), Some(date(2024, 2, 29)));
        assert_eq!(
            QuestionAge::LastSixMonths.start_date(today),
            Some(date(2023, 9, 30))
        );
        assert_eq!(QuestionAge::LastYear.start_date(today), Some(date(2023, 3, 31)));
        assert_eq!(QuestionAge::All.start_date(today), None);
    }

    #[test]
    fn test_question_deserializes_wire_shape() {
        let json = r#"{
            "id": "q1",
            "content": "Reverse a linked list",
            "type": "CODING",
            "seenAt": "2024-01-01T00:00:00Z",
            "receivedCount": 3,
            "numVotes": 2,
            "numAnswers": 1,
            "aggregatedQuestionEncounters": {
                "companyCounts": {"Google": 2},
                "countryCounts": {"Singapore": 1},
                "roleCounts": {"software-engineer": 3}
            }
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.question_type, QuestionType::Coding);
        assert_eq!(q.aggregated_question_encounters.company_counts["Google"], 2);
        assert!(q.aggregated_question_encounters.latest_seen_at.is_none());
    }

    #[test]
    fn test_sort_enums_serialize_uppercase() {
        assert_eq!(serde_json::to_string(&SortOrder::Asc).unwrap(), "\"ASC\"");
        assert_eq!(serde_json::to_string(&SortType::New).unwrap(), "\"NEW\"");
        assert_eq!(
            serde_json::to_string(&QuestionAge::LastSixMonths).unwrap(),
            "\"last-6-months\""
        );
    }
}
