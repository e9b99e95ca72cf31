use std::fmt;

/// A sequence kept sorted by descending priority.
///
/// Priority is projected from each item by a function supplied at
/// construction. Inserting scans linearly for the first element whose
/// priority is less than or equal to the new one and lands in front of it,
/// so a new item precedes incumbents of equal priority. Every operation is
/// O(n), which is fine for the open set of a single grid search.
pub struct PriorityOrderedQueue<T, P> {
    items: Vec<T>,
    priority_of: Box<dyn Fn(&T) -> P + Send>,
}

impl<T, P: PartialOrd> PriorityOrderedQueue<T, P> {
    /// An empty queue ordered by `priority_of`.
    pub fn new(priority_of: impl Fn(&T) -> P + Send + 'static) -> Self {
        Self {
            items: Vec::new(),
            priority_of: Box::new(priority_of),
        }
    }

    /// Insert `item` at its priority position.
    pub fn insert(&mut self, item: T) {
        let priority = (self.priority_of)(&item);
        let index = self
            .items
            .iter()
            .position(|existing| (self.priority_of)(existing) <= priority)
            .unwrap_or(self.items.len());
        self.items.insert(index, item);
    }

    /// Remove and return the lowest-priority item.
    pub fn pop_lowest_priority(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Remove and return the highest-priority item.
    pub fn pop_highest_priority(&mut self) -> Option<T> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    /// Position of the first item equal to `item`.
    pub fn index_of_item(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.iter().position(|existing| existing == item)
    }

    /// The item at `index`, highest priority first.
    pub fn item_at_index(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Remove the item at `index`.
    pub fn remove_item_at_index(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items from highest to lowest priority.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T: fmt::Debug, P> fmt::Debug for PriorityOrderedQueue<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityOrderedQueue")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn by_value() -> PriorityOrderedQueue<i32, i32> {
        PriorityOrderedQueue::new(|v: &i32| *v)
    }

    #[test]
    fn pops_in_priority_order() {
        let mut queue = by_value();
        for v in [3, 9, 1, 5] {
            queue.insert(v);
        }
        assert_eq!(queue.pop_highest_priority(), Some(9));
        assert_eq!(queue.pop_lowest_priority(), Some(1));
        assert_eq!(queue.pop_lowest_priority(), Some(3));
        assert_eq!(queue.pop_highest_priority(), Some(5));
        assert!(queue.is_empty());
        assert_eq!(queue.pop_lowest_priority(), None);
        assert_eq!(queue.pop_highest_priority(), None);
    }

    #[test]
    fn new_item_precedes_equal_priority() {
        let mut queue: PriorityOrderedQueue<(u8, &str), u8> =
            PriorityOrderedQueue::new(|item: &(u8, &str)| item.0);
        queue.insert((1, "old"));
        queue.insert((1, "new"));
        queue.insert((0, "low"));
        assert_eq!(queue.item_at_index(0), Some(&(1, "new")));
        assert_eq!(queue.item_at_index(1), Some(&(1, "old")));
        assert_eq!(queue.pop_lowest_priority(), Some((0, "low")));
    }

    #[test]
    fn decrease_key_by_remove_and_insert() {
        let mut queue: PriorityOrderedQueue<(char, f64), f64> =
            PriorityOrderedQueue::new(|item: &(char, f64)| item.1);
        queue.insert(('a', 4.0));
        queue.insert(('b', 2.0));
        queue.insert(('c', 3.0));

        let index = queue.iter().position(|(k, _)| *k == 'a').unwrap();
        assert_eq!(queue.remove_item_at_index(index), Some(('a', 4.0)));
        queue.insert(('a', 1.0));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop_lowest_priority(), Some(('a', 1.0)));
    }

    #[test]
    fn index_lookup_and_out_of_range() {
        let mut queue = by_value();
        queue.insert(10);
        queue.insert(20);
        assert_eq!(queue.index_of_item(&10), Some(1));
        assert_eq!(queue.index_of_item(&30), None);
        assert_eq!(queue.item_at_index(2), None);
        assert_eq!(queue.remove_item_at_index(2), None);
        assert_eq!(queue.len(), 2);
    }

    proptest! {
        #[test]
        fn stays_sorted_descending(values in prop::collection::vec(-1000i32..1000, 0..64)) {
            let mut queue = by_value();
            for v in &values {
                queue.insert(*v);
            }
            let items: Vec<i32> = queue.iter().copied().collect();
            prop_assert!(items.windows(2).all(|w| w[0] >= w[1]));
            prop_assert_eq!(items.len(), values.len());
        }
    }
}
