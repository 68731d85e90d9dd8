//! Ordered navigation history of container identifiers.
//!
//! The registry is a plain value type owned by the controller — it only
//! records ordering, never touches surfaces. Insertion order is recency of
//! activation: the last entry is the currently active container.
//!
//! **Invariants:**
//! - No identifier appears more than once
//! - Re-activating a registered identifier relocates it to the end,
//!   preserving the relative order of the remainder
//! - Forward navigation never removes entries; only a back-pop does

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registry {
    order: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.order.iter().any(|entry| entry == id)
    }

    /// Record an activation of `id`.
    ///
    /// Returns `true` if the identifier was already registered (and has now
    /// been promoted to the end), `false` if it was appended fresh.
    pub fn activate(&mut self, id: &str) -> bool {
        if let Some(pos) = self.order.iter().position(|entry| entry == id) {
            let entry = self.order.remove(pos);
            self.order.push(entry);
            true
        } else {
            self.order.push(id.to_string());
            false
        }
    }

    /// Remove and return the most recent entry.
    pub fn pop(&mut self) -> Option<String> {
        self.order.pop()
    }

    /// The currently active identifier, if any.
    pub fn active(&self) -> Option<&str> {
        self.order.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All registered identifiers, oldest first.
    pub fn ids(&self) -> &[String] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activate_appends_fresh_id() {
        let mut reg = Registry::new();
        assert!(!reg.activate("a"));
        assert!(!reg.activate("b"));
        assert_eq!(reg.ids(), ["a", "b"]);
        assert_eq!(reg.active(), Some("b"));
    }

    #[test]
    fn activate_promotes_existing_id() {
        let mut reg = Registry::new();
        reg.activate("a");
        reg.activate("b");
        reg.activate("c");
        assert!(reg.activate("a"));
        assert_eq!(reg.ids(), ["b", "c", "a"]);
    }

    #[test]
    fn promotion_preserves_relative_order_of_remainder() {
        let mut reg = Registry::new();
        for id in ["a", "b", "c", "d"] {
            reg.activate(id);
        }
        reg.activate("b");
        assert_eq!(reg.ids(), ["a", "c", "d", "b"]);
    }

    #[test]
    fn no_duplicates_after_any_activation_sequence() {
        let mut reg = Registry::new();
        for id in ["a", "b", "a", "c", "b", "a", "a"] {
            reg.activate(id);
        }
        let mut sorted: Vec<_> = reg.ids().to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), reg.len());
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn pop_removes_most_recent() {
        let mut reg = Registry::new();
        reg.activate("a");
        reg.activate("b");
        assert_eq!(reg.pop(), Some("b".to_string()));
        assert_eq!(reg.active(), Some("a"));
        assert_eq!(reg.pop(), Some("a".to_string()));
        assert_eq!(reg.pop(), None);
        assert!(reg.is_empty());
    }

    #[test]
    fn promote_then_pop_restores_prior_top() {
        let mut reg = Registry::new();
        reg.activate("b");
        reg.activate("a");
        reg.pop();
        assert_eq!(reg.ids(), ["b"]);
        assert_eq!(reg.active(), Some("b"));
    }
}
