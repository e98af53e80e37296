use std::future::Future;

use tracing::warn;

use crate::errors::PortalError;
use crate::models::Page;

/// Pages of a cursor-paginated list, accumulated in request order.
#[derive(Debug, Clone)]
pub struct InfiniteList<T> {
    pages: Vec<Page<T>>,
}

impl<T> Default for InfiniteList<T> {
    fn default() -> Self {
        Self { pages: Vec::new() }
    }
}

impl<T> InfiniteList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Page<T>] {
        &self.pages
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.pages.iter().flat_map(|p| p.data.iter())
    }

    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|p| p.data.len()).sum()
    }

    pub fn is_loaded(&self) -> bool {
        !self.pages.is_empty()
    }

    /// Cursor the next request must carry. `None` for the first page.
    pub fn next_cursor(&self) -> Option<&str> {
        self.pages.last().and_then(|p| p.next_cursor.as_deref())
    }

    pub fn has_next_page(&self) -> bool {
        match self.pages.last() {
            None => true,
            Some(page) => page.next_cursor.is_some(),
        }
    }

    /// Appends a page fetched with `requested_cursor`.
    /// A page that does not continue from the current tail is dropped.
    pub fn push_page(&mut self, requested_cursor: Option<&str>, page: Page<T>) -> bool {
        if !self.has_next_page() || requested_cursor != self.next_cursor() {
            warn!(
                "Dropping out-of-order page (requested cursor {:?}, expected {:?})",
                requested_cursor,
                self.next_cursor()
            );
            return false;
        }
        self.pages.push(page);
        true
    }

    pub fn reset(&mut self) {
        self.pages.clear();
    }

    /// Fetches and appends the next page. Returns `Ok(false)` when the list
    /// is exhausted.
    pub async fn load_next<F, Fut>(&mut self, fetch: F) -> Result<bool, PortalError>
    where
        F: FnOnce(Option<String>) -> Fut,
        Fut: Future<Output = Result<Page<T>, PortalError>>,
    {
        if !self.has_next_page() {
            return Ok(false);
        }
        let cursor = self.next_cursor().map(str::to_string);
        let page = fetch(cursor.clone()).await?;
        Ok(self.push_page(cursor.as_deref(), page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: &[u32], next: Option<&str>) -> Page<u32> {
        Page::new(items.to_vec(), next.map(str::to_string))
    }

    #[tokio::test]
    async fn test_load_next_uses_previous_cursor() {
        let mut list = InfiniteList::new();
        assert!(list
            .load_next(|cursor| async move {
                assert_eq!(cursor, None);
                Ok(page(&[1, 2], Some("c1")))
            })
            .await
            .unwrap());
        assert!(list
            .load_next(|cursor| async move {
                assert_eq!(cursor.as_deref(), Some("c1"));
                Ok(page(&[3], None))
            })
            .await
            .unwrap());
        assert_eq!(list.items().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(!list.has_next_page());

        let mut fetched = false;
        let appended = list
            .load_next(|_| {
                fetched = true;
                async { Ok(page(&[], None)) }
            })
            .await
            .unwrap();
        assert!(!appended);
        assert!(!fetched);
    }

    #[test]
    fn test_out_of_order_page_is_dropped() {
        let mut list = InfiniteList::new();
        assert!(list.push_page(None, page(&[1], Some("c1"))));
        assert!(!list.push_page(Some("c7"), page(&[9], None)));
        assert!(!list.push_page(None, page(&[9], None)));
        assert_eq!(list.item_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_pages_untouched() {
        let mut list = InfiniteList::new();
        list.push_page(None, page(&[1], Some("c1")));
        let result = list
            .load_next(|_| async { Err(PortalError::Storage("offline".to_string())) })
            .await;
        assert!(result.is_err());
        assert_eq!(list.item_count(), 1);
        assert_eq!(list.next_cursor(), Some("c1"));
    }
}
