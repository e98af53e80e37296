use std::collections::HashMap;

use reqwest::Url;
use tracing::{debug, info, warn};

use crate::filters::params::UrlParam;

// Only used to lean on `Url` for query parsing and form encoding.
const BASE_URL: &str = "http://portal.invalid";

/// The page's history stack, as far as the synchronizer needs it.
pub trait UrlHistory {
    /// Path and query of the current entry, e.g. `/questions/browse?sortType=TOP`.
    fn current(&self) -> String;
    /// Overwrites the current entry without adding a new one.
    fn replace(&mut self, location: &str);
}

/// In-process history stack with browser push/replace/back semantics.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    pub fn push(&mut self, location: impl Into<String>) {
        self.entries.truncate(self.index + 1);
        self.entries.push(location.into());
        self.index = self.entries.len() - 1;
    }

    /// Steps back one entry. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl UrlHistory for MemoryHistory {
    fn current(&self) -> String {
        self.entries[self.index].clone()
    }

    fn replace(&mut self, location: &str) {
        self.entries[self.index] = location.to_string();
    }
}

/// Keeps a set of filter parameters and the URL query string in step.
pub struct QuerySync<H> {
    history: H,
    pathname: String,
}

impl<H: UrlHistory> QuerySync<H> {
    pub fn new(history: H) -> Self {
        let pathname = parse_location(&history.current())
            .map(|url| url.path().to_string())
            .unwrap_or_else(|| "/".to_string());
        Self { history, pathname }
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    /// Reads the current URL once and initializes every parameter from it.
    pub fn initialize(&self, params: &mut [&mut dyn UrlParam]) {
        let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
        match parse_location(&self.history.current()) {
            Some(url) => {
                for (key, value) in url.query_pairs() {
                    grouped
                        .entry(key.into_owned())
                        .or_default()
                        .push(value.into_owned());
                }
            }
            None => debug!("Current location is not a valid URL, starting unfiltered"),
        }

        for param in params.iter_mut() {
            let raw = grouped.get(param.key()).map(Vec::as_slice).unwrap_or(&[]);
            param.initialize(raw);
        }
    }

    /// Writes the parameters back to the URL, replacing the current entry.
    /// Does nothing until every parameter is initialized, or when the URL
    /// already holds exactly this state. Returns whether history changed.
    pub fn sync(&mut self, params: &[&dyn UrlParam]) -> bool {
        if !params.iter().all(|p| p.is_initialized()) {
            return false;
        }

        let Some(location) = self.location_for(params) else {
            warn!("Could not encode search parameters for {}", self.pathname);
            return false;
        };
        if location == self.history.current() {
            return false;
        }

        self.history.replace(&location);
        info!("Replaced search location with {location}");
        true
    }

    /// Path plus the canonical query string for the given parameter state.
    pub fn location_for(&self, params: &[&dyn UrlParam]) -> Option<String> {
        let mut url = Url::parse(BASE_URL).ok()?;
        url.set_path(&self.pathname);
        {
            let mut pairs = url.query_pairs_mut();
            for param in params {
                for value in param.query_values() {
                    pairs.append_pair(param.key(), &value);
                }
            }
        }
        match url.query() {
            Some(query) if !query.is_empty() => Some(format!("{}?{query}", url.path())),
            _ => Some(url.path().to_string()),
        }
    }
}

fn parse_location(location: &str) -> Option<Url> {
    Url::parse(BASE_URL).ok()?.join(location).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::params::{SearchParam, SearchParamSingle};
    use crate::models::question::{SortOrder, SortType};

    #[test]
    fn test_memory_history_replace_keeps_length() {
        let mut history = MemoryHistory::new("/a");
        history.push("/b");
        history.replace("/c");
        assert_eq!(history.len(), 2);
        assert_eq!(history.current(), "/c");
        assert!(history.back());
        assert_eq!(history.current(), "/a");
        assert!(!history.back());
    }

    #[test]
    fn test_sync_waits_for_initialization() {
        let mut sync = QuerySync::new(MemoryHistory::new("/questions/browse"));
        let roles = SearchParam::<String>::new("roles");
        assert!(!sync.sync(&[&roles]));
        assert_eq!(sync.history().current(), "/questions/browse");
    }

    #[test]
    fn test_initialize_and_encode_repeated_keys() {
        let mut sync = QuerySync::new(MemoryHistory::new(
            "/questions/browse?roles=software-engineer&roles=data-scientist&sortOrder=asc&sortType=new",
        ));
        let mut roles = SearchParam::<String>::new("roles");
        let mut order = SearchParamSingle::new("sortOrder", SortOrder::Desc);
        let mut kind = SearchParamSingle::new("sortType", SortType::Top);
        sync.initialize(&mut [&mut roles, &mut order, &mut kind]);

        assert_eq!(roles.values().len(), 2);
        assert_eq!(order.value(), &SortOrder::Asc);
        assert_eq!(kind.value(), &SortType::New);

        assert!(sync.sync(&[&roles, &order, &kind]));
        assert_eq!(
            sync.history().current(),
            "/questions/browse?roles=software-engineer&roles=data-scientist&sortOrder=ASC&sortType=NEW"
        );
        // Already canonical: nothing to do.
        assert!(!sync.sync(&[&roles, &order, &kind]));
        assert_eq!(sync.history().len(), 1);
    }

    #[test]
    fn test_values_are_form_encoded() {
        let mut sync = QuerySync::new(MemoryHistory::new("/questions/browse"));
        let mut roles = SearchParam::<String>::new("roles");
        sync.initialize(&mut [&mut roles]);
        roles.set(vec!["a&b c".to_string()]);
        assert!(sync.sync(&[&roles]));
        assert_eq!(sync.history().current(), "/questions/browse?roles=a%26b+c");

        let mut reread = SearchParam::<String>::new("roles");
        sync.initialize(&mut [&mut reread]);
        assert_eq!(reread.values(), &["a&b c".to_string()]);
    }

    #[test]
    fn test_empty_state_has_bare_path() {
        let mut sync = QuerySync::new(MemoryHistory::new("/questions/browse?roles=x"));
        let mut roles = SearchParam::<String>::new("roles");
        sync.initialize(&mut [&mut roles]);
        roles.set(Vec::new());
        assert!(sync.sync(&[&roles]));
        assert_eq!(sync.history().current(), "/questions/browse");
    }
}
