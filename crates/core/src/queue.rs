//! In-process FIFO queue of redirect links.
//!
//! This is the reference data structure behind the in-memory storage backend
//! and the fake backends used in tests. It has no internal locking: callers
//! that share a queue wrap it in a mutex so that [`LinkQueue::consume_next`]
//! stays atomic.

use std::collections::VecDeque;

use crate::types::{LinkId, LinkItem, LinkUrl};

/// Ordered collection of pending redirect targets.
///
/// Insertion order is consumption order.
#[derive(Debug, Clone, Default)]
pub struct LinkQueue {
    items: VecDeque<LinkItem>,
}

impl LinkQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new item at the tail and return it.
    pub fn add(&mut self, url: LinkUrl) -> LinkItem {
        let mut item = LinkItem::new(url);
        // v4 collisions are astronomically unlikely, but ids must stay unique
        while self.contains(item.id) {
            item.id = LinkId::generate();
        }
        self.items.push_back(item.clone());
        item
    }

    /// Remove the item with the given id.
    ///
    /// Returns `false` (and leaves the queue untouched) if no item matches.
    pub fn remove(&mut self, id: LinkId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Remove and return the head item, if any.
    pub fn consume_next(&mut self) -> Option<LinkItem> {
        self.items.pop_front()
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether an item with this id is queued.
    #[must_use]
    pub fn contains(&self, id: LinkId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Ordered copy of the queue contents.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LinkItem> {
        self.items.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn url(s: &str) -> LinkUrl {
        LinkUrl::parse(s).unwrap()
    }

    fn urls(queue: &LinkQueue) -> Vec<String> {
        queue
            .snapshot()
            .into_iter()
            .map(|item| item.url.into_inner())
            .collect()
    }

    #[test]
    fn test_list_preserves_add_order() {
        let mut queue = LinkQueue::new();
        for i in 0..10 {
            queue.add(url(&format!("https://example.com/{i}")));
        }
        let expected: Vec<String> = (0..10).map(|i| format!("https://example.com/{i}")).collect();
        assert_eq!(urls(&queue), expected);
    }

    #[test]
    fn test_consume_each_item_once_in_order() {
        let mut queue = LinkQueue::new();
        let added: Vec<LinkItem> = (0..5)
            .map(|i| queue.add(url(&format!("https://example.com/{i}"))))
            .collect();

        let consumed: Vec<LinkItem> = std::iter::from_fn(|| queue.consume_next()).collect();
        assert_eq!(consumed, added);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_consume_empty_returns_none() {
        let mut queue = LinkQueue::new();
        assert!(queue.consume_next().is_none());
        assert!(queue.consume_next().is_none());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut queue = LinkQueue::new();
        queue.add(url("https://a.example"));
        let before = queue.snapshot();
        assert!(!queue.remove(LinkId::generate()));
        assert_eq!(queue.snapshot(), before);
    }

    #[test]
    fn test_remove_middle_item() {
        let mut queue = LinkQueue::new();
        queue.add(url("https://a.example"));
        let b = queue.add(url("https://b.example"));
        queue.add(url("https://c.example"));

        assert!(queue.remove(b.id));
        assert_eq!(urls(&queue), vec!["https://a.example", "https://c.example"]);
    }

    #[test]
    fn test_consume_add_clear_scenario() {
        let mut queue = LinkQueue::new();
        queue.add(url("https://a.example"));
        queue.add(url("https://b.example"));

        let head = queue.consume_next().unwrap();
        assert_eq!(head.url.as_str(), "https://a.example");
        assert_eq!(urls(&queue), vec!["https://b.example"]);

        queue.add(url("https://c.example"));
        assert_eq!(urls(&queue), vec!["https://b.example", "https://c.example"]);

        queue.clear();
        assert!(queue.snapshot().is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut queue = LinkQueue::new();
        let ids: std::collections::HashSet<LinkId> = (0..100)
            .map(|_| queue.add(url("https://same.example")).id)
            .collect();
        assert_eq!(ids.len(), 100);
    }
}
