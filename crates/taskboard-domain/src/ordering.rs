//! Ordered sequences of entity ids.
//!
//! Display order of a board's columns and of a column's cards is always
//! read from one of these, never from the order entities happen to be
//! stored in.

use serde::{Deserialize, Serialize};

/// Move the element at `from` so that it ends up at index `to`.
///
/// `to` is interpreted against the list after removal and clamped to its
/// length. Out-of-range `from` leaves the list untouched.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}

/// Reorder `items` to follow `order`, matching by `key`.
///
/// Items whose key is not in `order` keep their relative order and go
/// after the ordered ones.
pub fn sort_by_order<T, K, F>(items: Vec<T>, order: &[K], key: F) -> Vec<T>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut ranked: Vec<(usize, T)> = items
        .into_iter()
        .map(|item| {
            let rank = order
                .iter()
                .position(|k| *k == key(&item))
                .unwrap_or(usize::MAX);
            (rank, item)
        })
        .collect();
    ranked.sort_by_key(|(rank, _)| *rank);
    ranked.into_iter().map(|(_, item)| item).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedCollection<Id> {
    ids: Vec<Id>,
}

impl<Id: Copy + PartialEq> OrderedCollection<Id> {
    pub fn new() -> Self {
        Self { ids: Vec::new() }
    }

    pub fn from_ids(ids: Vec<Id>) -> Self {
        Self { ids }
    }

    pub fn as_slice(&self) -> &[Id] {
        &self.ids
    }

    pub fn to_vec(&self) -> Vec<Id> {
        self.ids.clone()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.ids.contains(&id)
    }

    pub fn position(&self, id: Id) -> Option<usize> {
        self.ids.iter().position(|candidate| *candidate == id)
    }

    /// Insert at `index`, clamped to the end.
    pub fn insert_at(&mut self, index: usize, id: Id) {
        let index = index.min(self.ids.len());
        self.ids.insert(index, id);
    }

    pub fn push(&mut self, id: Id) {
        self.ids.push(id);
    }

    /// Remove `id`, returning the index it occupied.
    pub fn remove(&mut self, id: Id) -> Option<usize> {
        let index = self.position(id)?;
        self.ids.remove(index);
        Some(index)
    }

    /// Move `id` to `to`. Returns false when `id` is absent.
    pub fn move_id(&mut self, id: Id, to: usize) -> bool {
        match self.position(id) {
            Some(from) => {
                array_move(&mut self.ids, from, to);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Id> {
        self.ids.iter()
    }
}

impl<Id> From<Vec<Id>> for OrderedCollection<Id> {
    fn from(ids: Vec<Id>) -> Self {
        Self { ids }
    }
}

impl<Id> From<OrderedCollection<Id>> for Vec<Id> {
    fn from(collection: OrderedCollection<Id>) -> Self {
        collection.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_move_forward_and_back() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        array_move(&mut items, 0, 2);
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);

        array_move(&mut items, 3, 0);
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
    }

    #[test]
    fn test_array_move_to_same_index_is_noop() {
        let mut items = vec![1, 2, 3];
        array_move(&mut items, 1, 1);
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_array_move_clamps_and_ignores_bad_source() {
        let mut items = vec![1, 2, 3];
        array_move(&mut items, 0, 99);
        assert_eq!(items, vec![2, 3, 1]);

        array_move(&mut items, 7, 0);
        assert_eq!(items, vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_by_order_puts_unknown_last() {
        let items = vec![(3, "c"), (9, "x"), (1, "a"), (2, "b")];
        let sorted = sort_by_order(items, &[1, 2, 3], |(k, _)| *k);
        let keys: Vec<_> = sorted.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![1, 2, 3, 9]);
    }

    #[test]
    fn test_collection_insert_remove_move() {
        let mut order = OrderedCollection::from_ids(vec![10, 20, 30]);

        order.insert_at(1, 15);
        assert_eq!(order.as_slice(), &[10, 15, 20, 30]);

        assert_eq!(order.remove(20), Some(2));
        assert_eq!(order.remove(20), None);

        assert!(order.move_id(10, 2));
        assert_eq!(order.as_slice(), &[15, 30, 10]);
        assert!(!order.move_id(99, 0));

        order.insert_at(100, 40);
        assert_eq!(order.as_slice(), &[15, 30, 10, 40]);
    }
}
