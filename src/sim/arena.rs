/// Index-addressed storage with deferred removal.
///
/// Items are marked dead during a tick and physically removed by `sweep()`
/// once the tick is over, so indices handed out during a tick stay valid
/// until the sweep. Dead items are skipped by the iterators.

#[derive(Clone, Debug)]
struct Entry<T> {
    item: T,
    dead: bool,
}

#[derive(Clone, Debug)]
pub struct Arena<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena { entries: Vec::new() }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item; returns its index for the rest of the tick.
    pub fn insert(&mut self, item: T) -> usize {
        self.entries.push(Entry { item, dead: false });
        self.entries.len() - 1
    }

    pub fn get(&self, id: usize) -> Option<&T> {
        self.entries.get(id).filter(|e| !e.dead).map(|e| &e.item)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut T> {
        self.entries.get_mut(id).filter(|e| !e.dead).map(|e| &mut e.item)
    }

    /// Mark for removal at the next sweep. Returns false if already gone.
    pub fn remove(&mut self, id: usize) -> bool {
        match self.entries.get_mut(id) {
            Some(e) if !e.dead => {
                e.dead = true;
                true
            }
            _ => false,
        }
    }

    /// Drop dead items. Indices of survivors may change.
    pub fn sweep(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.dead);
        before - self.entries.len()
    }

    /// Live items.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| !e.dead).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.dead)
            .map(|(i, e)| (i, &e.item))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.entries
            .iter_mut()
            .enumerate()
            .filter(|(_, e)| !e.dead)
            .map(|(i, e)| (i, &mut e.item))
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.iter().map(|(_, t)| t)
    }
}

impl<T> FromIterator<T> for Arena<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Arena {
            entries: iter.into_iter().map(|item| Entry { item, dead: false }).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_is_deferred_until_sweep() {
        let mut a: Arena<&str> = ["a", "b", "c"].into_iter().collect();
        assert!(a.remove(1));
        assert!(!a.remove(1));
        assert_eq!(a.get(1), None);
        assert_eq!(a.get(2), Some(&"c"), "indices are stable before the sweep");
        assert_eq!(a.len(), 2);

        assert_eq!(a.sweep(), 1);
        assert_eq!(a.get(1), Some(&"c"), "survivors shift down after the sweep");
        assert_eq!(a.items().copied().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn iterators_skip_dead_items() {
        let mut a = Arena::new();
        for i in 0..5 {
            a.insert(i);
        }
        a.remove(0);
        a.remove(3);
        let ids: Vec<usize> = a.iter().map(|(i, _)| i).collect();
        assert_eq!(ids, vec![1, 2, 4]);
        for (_, v) in a.iter_mut() {
            *v *= 10;
        }
        assert_eq!(a.get(4), Some(&40));
        assert!(a.get(3).is_none());
    }

    #[test]
    fn inserts_during_a_tick_are_live() {
        let mut a = Arena::new();
        a.insert(1);
        a.remove(0);
        let id = a.insert(2);
        assert_eq!(id, 1);
        assert_eq!(a.get(id), Some(&2));
        a.sweep();
        assert_eq!(a.get(0), Some(&2));
        assert!(!a.is_empty());
        a.clear();
        assert!(a.is_empty());
    }
}
