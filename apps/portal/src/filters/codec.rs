//! Conversion of individual filter values to and from URL query values.
//!
//! Every codec is total on decode: anything unrecognised becomes `None`
//! and the filter is treated as unset.

use crate::models::question::{Location, QuestionAge, QuestionType, SortOrder, SortType};

const LOCATION_DELIMITER: char = '-';
const COMPANY_DELIMITER: char = '_';

pub trait FilterCodec: Sized {
    fn encode(&self) -> String;
    fn decode(raw: &str) -> Option<Self>;
}

/// Role slugs and other free-form values pass through verbatim.
/// Blank values decode to `None`.
impl FilterCodec for String {
    fn encode(&self) -> String {
        self.clone()
    }

    fn decode(raw: &str) -> Option<Self> {
        (!raw.trim().is_empty()).then(|| raw.to_string())
    }
}

/// A selected company, persisted as `"{id}_{label}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompanySlug {
    pub id: String,
    pub label: String,
}

impl CompanySlug {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl FilterCodec for CompanySlug {
    fn encode(&self) -> String {
        format!("{}{COMPANY_DELIMITER}{}", self.id, self.label)
    }

    fn decode(raw: &str) -> Option<Self> {
        let (id, label) = raw.split_once(COMPANY_DELIMITER).unwrap_or((raw, ""));
        if id.is_empty() {
            return None;
        }
        Some(CompanySlug::new(id, label))
    }
}

fn match_ignore_case<T: Copy>(raw: &str, all: &[T], as_str: fn(T) -> &'static str) -> Option<T> {
    all.iter()
        .copied()
        .find(|candidate| as_str(*candidate).eq_ignore_ascii_case(raw.trim()))
}

impl FilterCodec for QuestionType {
    fn encode(&self) -> String {
        self.as_str().to_string()
    }

    fn decode(raw: &str) -> Option<Self> {
        match_ignore_case(raw, &QuestionType::ALL, QuestionType::as_str)
    }
}

impl FilterCodec for QuestionAge {
    fn encode(&self) -> String {
        self.as_str().to_string()
    }

    fn decode(raw: &str) -> Option<Self> {
        match_ignore_case(raw, &QuestionAge::ALL, QuestionAge::as_str)
    }
}

impl FilterCodec for SortOrder {
    fn encode(&self) -> String {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
        .to_string()
    }

    fn decode(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ASC" => Some(SortOrder::Asc),
            "DESC" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

impl FilterCodec for SortType {
    fn encode(&self) -> String {
        match self {
            SortType::Top => "TOP",
            SortType::New => "NEW",
        }
        .to_string()
    }

    fn decode(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "TOP" => Some(SortType::Top),
            "NEW" => Some(SortType::New),
            _ => None,
        }
    }
}

/// Locations are persisted as `countryId-stateId-cityId-id-label-value`.
///
/// Missing state/city ids become empty segments. The label may itself
/// contain the delimiter: it is everything between the fourth and the
/// last delimiter. Ids and value must not contain it.
impl FilterCodec for Location {
    fn encode(&self) -> String {
        [
            self.country_id.as_str(),
            self.state_id.as_deref().unwrap_or(""),
            self.city_id.as_deref().unwrap_or(""),
            self.id.as_str(),
            self.label.as_str(),
            self.value.as_str(),
        ]
        .join(&LOCATION_DELIMITER.to_string())
    }

    fn decode(raw: &str) -> Option<Self> {
        let mut head = raw.splitn(5, LOCATION_DELIMITER);
        let country_id = head.next()?;
        let state_id = head.next()?;
        let city_id = head.next()?;
        let id = head.next()?;
        let rest = head.next()?;
        let (label, value) = rest.rsplit_once(LOCATION_DELIMITER)?;

        if country_id.is_empty() || id.is_empty() {
            return None;
        }

        let optional = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Some(Location {
            country_id: country_id.to_string(),
            state_id: optional(state_id),
            city_id: optional(city_id),
            id: id.to_string(),
            label: label.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singapore() -> Location {
        Location {
            country_id: "sg".to_string(),
            state_id: Some("sg01".to_string()),
            city_id: Some("c42".to_string()),
            id: "c42".to_string(),
            label: "Singapore".to_string(),
            value: "c42".to_string(),
        }
    }

    #[test]
    fn test_enums_round_trip() {
        for t in QuestionType::ALL {
            assert_eq!(QuestionType::decode(&t.encode()), Some(t));
        }
        for a in QuestionAge::ALL {
            assert_eq!(QuestionAge::decode(&a.encode()), Some(a));
        }
        for o in [SortOrder::Asc, SortOrder::Desc] {
            assert_eq!(SortOrder::decode(&o.encode()), Some(o));
        }
        for t in [SortType::Top, SortType::New] {
            assert_eq!(SortType::decode(&t.encode()), Some(t));
        }
    }

    #[test]
    fn test_decode_is_case_insensitive() {
        assert_eq!(SortOrder::decode("asc"), Some(SortOrder::Asc));
        assert_eq!(SortType::decode("nEw"), Some(SortType::New));
        assert_eq!(
            QuestionType::decode("system_design"),
            Some(QuestionType::SystemDesign)
        );
        assert_eq!(
            QuestionAge::decode("LAST-6-MONTHS"),
            Some(QuestionAge::LastSixMonths)
        );
    }

    #[test]
    fn test_unrecognized_tokens_decode_to_none() {
        for raw in ["", "ascending", "TOPS", "🙂", "--", "a-b"] {
            assert_eq!(SortOrder::decode(raw), None);
            assert_eq!(SortType::decode(raw), None);
            assert_eq!(QuestionType::decode(raw), None);
            assert_eq!(QuestionAge::decode(raw), None);
        }
        assert_eq!(Location::decode("sg-sg01"), None);
        assert_eq!(Location::decode("-----"), None);
        assert_eq!(CompanySlug::decode("_Google"), None);
        assert_eq!(String::decode("   "), None);
    }

    #[test]
    fn test_free_form_values_keep_whitespace() {
        for value in [" x", "software-engineer", "a b "] {
            let value = value.to_string();
            assert_eq!(String::decode(&value.encode()), Some(value));
        }
    }

    #[test]
    fn test_location_round_trip() {
        let loc = singapore();
        assert_eq!(loc.encode(), "sg-sg01-c42-c42-Singapore-c42");
        assert_eq!(Location::decode(&loc.encode()), Some(loc));
    }

    #[test]
    fn test_location_country_only_round_trip() {
        let loc = Location {
            country_id: "us".to_string(),
            state_id: None,
            city_id: None,
            id: "us".to_string(),
            label: "United States".to_string(),
            value: "us".to_string(),
        };
        assert_eq!(loc.encode(), "us---us-United States-us");
        assert_eq!(Location::decode(&loc.encode()), Some(loc));
    }

    #[test]
    fn test_location_label_may_contain_delimiter() {
        let loc = Location {
            label: "Winston-Salem, North Carolina".to_string(),
            ..singapore()
        };
        assert_eq!(Location::decode(&loc.encode()), Some(loc));
    }

    #[test]
    fn test_company_slug_round_trip() {
        let company = CompanySlug::new("cl9abc", "Jane_Street");
        assert_eq!(company.encode(), "cl9abc_Jane_Street");
        assert_eq!(CompanySlug::decode(&company.encode()), Some(company));
        assert_eq!(
            CompanySlug::decode("cl9abc"),
            Some(CompanySlug::new("cl9abc", ""))
        );
    }
}
