use tracing::debug;

use crate::filters::codec::FilterCodec;

/// A filter parameter as seen by the synchronizer, independent of its value type.
pub trait UrlParam {
    fn key(&self) -> &'static str;
    fn is_initialized(&self) -> bool;
    /// Loads the raw values found under this key in the URL.
    /// Marks the parameter initialized even when nothing decodes.
    fn initialize(&mut self, raw: &[String]);
    fn query_values(&self) -> Vec<String>;
}

/// A multi-valued filter, persisted as repeated query keys.
#[derive(Debug, Clone)]
pub struct SearchParam<T> {
    key: &'static str,
    values: Vec<T>,
    initialized: bool,
}

impl<T: FilterCodec + PartialEq + Clone> SearchParam<T> {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            values: Vec::new(),
            initialized: false,
        }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Replaces the selection. Duplicates are dropped, first occurrence wins.
    pub fn set(&mut self, values: Vec<T>) {
        let mut unique: Vec<T> = Vec::with_capacity(values.len());
        for value in values {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
        self.values = unique;
    }

    /// Checked adds the value if absent; unchecked removes it.
    pub fn toggle(&mut self, value: T, checked: bool) {
        if checked {
            if !self.values.contains(&value) {
                self.values.push(value);
            }
        } else {
            self.values.retain(|v| v != &value);
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.values.contains(value)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T: FilterCodec + PartialEq + Clone> UrlParam for SearchParam<T> {
    fn key(&self) -> &'static str {
        self.key
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn initialize(&mut self, raw: &[String]) {
        let decoded: Vec<T> = raw
            .iter()
            .filter_map(|r| {
                let value = T::decode(r);
                if value.is_none() {
                    debug!("Ignoring unrecognized '{}' value: {r}", self.key);
                }
                value
            })
            .collect();
        self.set(decoded);
        self.initialized = true;
    }

    fn query_values(&self) -> Vec<String> {
        self.values.iter().map(T::encode).collect()
    }
}

/// A single-valued filter with a default used when the URL has no usable value.
#[derive(Debug, Clone)]
pub struct SearchParamSingle<T> {
    key: &'static str,
    value: T,
    default: T,
    initialized: bool,
}

impl<T: FilterCodec + PartialEq + Clone> SearchParamSingle<T> {
    pub fn new(key: &'static str, default: T) -> Self {
        Self {
            key,
            value: default.clone(),
            default,
            initialized: false,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    pub fn reset(&mut self) {
        self.value = self.default.clone();
    }

    pub fn is_default(&self) -> bool {
        self.value == self.default
    }
}

impl<T: FilterCodec + PartialEq + Clone> UrlParam for SearchParamSingle<T> {
    fn key(&self) -> &'static str {
        self.key
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn initialize(&mut self, raw: &[String]) {
        // First decodable value wins; repeated keys beyond it are ignored.
        self.value = raw
            .iter()
            .find_map(|r| T::decode(r))
            .unwrap_or_else(|| self.default.clone());
        self.initialized = true;
    }

    fn query_values(&self) -> Vec<String> {
        vec![self.value.encode()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{QuestionType, SortOrder};

    fn raw(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_multi_initialize_skips_unrecognized() {
        let mut param = SearchParam::<QuestionType>::new("questionTypes");
        assert!(!param.is_initialized());
        param.initialize(&raw(&["coding", "bogus", "THEORY", "CODING"]));
        assert!(param.is_initialized());
        assert_eq!(
            param.values(),
            &[QuestionType::Coding, QuestionType::Theory]
        );
        assert_eq!(param.query_values(), raw(&["CODING", "THEORY"]));
    }

    #[test]
    fn test_multi_initialized_when_absent() {
        let mut param = SearchParam::<String>::new("roles");
        param.initialize(&[]);
        assert!(param.is_initialized());
        assert!(param.is_empty());
        assert!(param.query_values().is_empty());
    }

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut param = SearchParam::<String>::new("roles");
        param.toggle("software-engineer".to_string(), true);
        param.toggle("software-engineer".to_string(), true);
        param.toggle("data-scientist".to_string(), true);
        assert_eq!(param.values().len(), 2);
        param.toggle("software-engineer".to_string(), false);
        assert_eq!(param.values(), &["data-scientist".to_string()]);
    }

    #[test]
    fn test_single_falls_back_to_default() {
        let mut param = SearchParamSingle::new("sortOrder", SortOrder::Desc);
        param.initialize(&raw(&["sideways"]));
        assert!(param.is_initialized());
        assert_eq!(param.value(), &SortOrder::Desc);
        assert!(param.is_default());
    }

    #[test]
    fn test_single_first_decodable_value_wins() {
        let mut param = SearchParamSingle::new("sortOrder", SortOrder::Desc);
        param.initialize(&raw(&["nope", "asc", "desc"]));
        assert_eq!(param.value(), &SortOrder::Asc);
        assert_eq!(param.query_values(), raw(&["ASC"]));
        param.reset();
        assert_eq!(param.value(), &SortOrder::Desc);
    }
}
