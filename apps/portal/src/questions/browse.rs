//! Browse page state: the URL-synchronized filter set and the question
//! query derived from it.

use chrono::NaiveDate;

use crate::api::QuestionsByFilterInput;
use crate::errors::PortalError;
use crate::filters::{CompanySlug, QuerySync, SearchParam, SearchParamSingle, UrlHistory, UrlParam};
use crate::models::question::{Location, QuestionAge, QuestionType, SortOrder, SortType};

pub const QUESTIONS_PAGE_SIZE: u32 = 10;

/// One checkbox/radio entry of a fixed filter section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption<T> {
    pub value: T,
    pub label: &'static str,
    pub checked: bool,
}

/// Every filter the browse page persists in its URL, in query-string order.
#[derive(Debug, Clone)]
pub struct BrowseFilters {
    pub companies: SearchParam<CompanySlug>,
    pub question_types: SearchParam<QuestionType>,
    pub question_age: SearchParamSingle<QuestionAge>,
    pub roles: SearchParam<String>,
    pub locations: SearchParam<Location>,
    pub sort_order: SearchParamSingle<SortOrder>,
    pub sort_type: SearchParamSingle<SortType>,
}

impl Default for BrowseFilters {
    fn default() -> Self {
        Self {
            companies: SearchParam::new("companies"),
            question_types: SearchParam::new("questionTypes"),
            question_age: SearchParamSingle::new("questionAge", QuestionAge::All),
            roles: SearchParam::new("roles"),
            locations: SearchParam::new("locations"),
            sort_order: SearchParamSingle::new("sortOrder", SortOrder::Desc),
            sort_type: SearchParamSingle::new("sortType", SortType::Top),
        }
    }
}

impl BrowseFilters {
    pub fn params(&self) -> [&dyn UrlParam; 7] {
        [
            &self.companies,
            &self.question_types,
            &self.question_age,
            &self.roles,
            &self.locations,
            &self.sort_order,
            &self.sort_type,
        ]
    }

    pub fn params_mut(&mut self) -> [&mut dyn UrlParam; 7] {
        [
            &mut self.companies,
            &mut self.question_types,
            &mut self.question_age,
            &mut self.roles,
            &mut self.locations,
            &mut self.sort_order,
            &mut self.sort_type,
        ]
    }

    pub fn is_initialized(&self) -> bool {
        self.params().iter().all(|p| p.is_initialized())
    }

    /// True when anything narrows the result set. Sorting does not count;
    /// question age counts unless it is `all`.
    pub fn has_filters(&self) -> bool {
        !self.companies.is_empty()
            || !self.question_types.is_empty()
            || !self.question_age.is_default()
            || !self.roles.is_empty()
            || !self.locations.is_empty()
    }

    /// Resets every filter except sorting.
    pub fn clear(&mut self) {
        self.companies.set(Vec::new());
        self.question_types.set(Vec::new());
        self.question_age.reset();
        self.roles.set(Vec::new());
        self.locations.set(Vec::new());
    }

    pub fn question_type_options(&self) -> Vec<FilterOption<QuestionType>> {
        QuestionType::ALL
            .iter()
            .map(|&value| FilterOption {
                value,
                label: value.label(),
                checked: self.question_types.contains(&value),
            })
            .collect()
    }

    pub fn question_age_options(&self) -> Vec<FilterOption<QuestionAge>> {
        QuestionAge::ALL
            .iter()
            .map(|&value| FilterOption {
                value,
                label: value.label(),
                checked: *self.question_age.value() == value,
            })
            .collect()
    }

    /// The first-page question query for these filters, as of `today`.
    pub fn question_query(&self, today: NaiveDate) -> QuestionsByFilterInput {
        QuestionsByFilterInput {
            city_ids: self
                .locations
                .values()
                .iter()
                .filter_map(|l| l.city_id.clone())
                .collect(),
            company_ids: self.companies.values().iter().map(|c| c.id.clone()).collect(),
            // Country and state narrowing is not offered by the browse filters.
            country_ids: Vec::new(),
            state_ids: Vec::new(),
            question_types: self.question_types.values().to_vec(),
            roles: self.roles.values().to_vec(),
            start_date: self.question_age.value().start_date(today),
            end_date: today,
            sort_order: *self.sort_order.value(),
            sort_type: *self.sort_type.value(),
            limit: QUESTIONS_PAGE_SIZE,
            cursor: None,
        }
    }
}

/// Browse page filters bound to the page URL.
/// Every setter writes the new state back with a history replace.
pub struct BrowsePage<H> {
    filters: BrowseFilters,
    sync: QuerySync<H>,
}

impl<H: UrlHistory> BrowsePage<H> {
    /// Mounts the page: reads the URL once, then canonicalizes it.
    pub fn mount(history: H) -> Self {
        let mut page = Self {
            filters: BrowseFilters::default(),
            sync: QuerySync::new(history),
        };
        page.sync.initialize(&mut page.filters.params_mut());
        page.write_url();
        page
    }

    pub fn filters(&self) -> &BrowseFilters {
        &self.filters
    }

    pub fn history(&self) -> &H {
        self.sync.history()
    }

    pub fn history_mut(&mut self) -> &mut H {
        self.sync.history_mut()
    }

    pub fn is_ready(&self) -> bool {
        self.filters.is_initialized()
    }

    /// The question query, withheld until every filter has been read from the URL.
    pub fn question_query(&self, today: NaiveDate) -> Result<QuestionsByFilterInput, PortalError> {
        if !self.is_ready() {
            return Err(PortalError::FiltersNotInitialized);
        }
        Ok(self.filters.question_query(today))
    }

    /// Applies an arbitrary change and writes it to the URL.
    pub fn update(&mut self, change: impl FnOnce(&mut BrowseFilters)) -> bool {
        change(&mut self.filters);
        self.write_url()
    }

    pub fn toggle_company(&mut self, company: CompanySlug, checked: bool) -> bool {
        self.update(|f| f.companies.toggle(company, checked))
    }

    pub fn toggle_role(&mut self, role: impl Into<String>, checked: bool) -> bool {
        let role = role.into();
        self.update(|f| f.roles.toggle(role, checked))
    }

    pub fn toggle_question_type(&mut self, question_type: QuestionType, checked: bool) -> bool {
        self.update(|f| f.question_types.toggle(question_type, checked))
    }

    /// Locations are matched by id when unchecked.
    pub fn toggle_location(&mut self, location: Location, checked: bool) -> bool {
        self.update(|f| {
            if checked {
                f.locations.toggle(location, true);
            } else {
                let kept = f
                    .locations
                    .values()
                    .iter()
                    .filter(|l| l.id != location.id)
                    .cloned()
                    .collect();
                f.locations.set(kept);
            }
        })
    }

    pub fn set_question_age(&mut self, age: QuestionAge) -> bool {
        self.update(|f| f.question_age.set(age))
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> bool {
        self.update(|f| f.sort_order.set(order))
    }

    pub fn set_sort_type(&mut self, sort_type: SortType) -> bool {
        self.update(|f| f.sort_type.set(sort_type))
    }

    pub fn clear_filters(&mut self) -> bool {
        self.update(BrowseFilters::clear)
    }

    fn write_url(&mut self) -> bool {
        self.sync.sync(&self.filters.params())
    }
}
