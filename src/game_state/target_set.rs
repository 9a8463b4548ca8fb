//! Bitset over the 32 target ids.

use crate::game_state::chess_types::TargetId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TargetSet(pub u32);

impl TargetSet {
    pub const EMPTY: TargetSet = TargetSet(0);

    #[inline]
    pub const fn contains(self, tid: TargetId) -> bool {
        self.0 & (1u32 << tid) != 0
    }

    #[inline]
    pub fn insert(&mut self, tid: TargetId) {
        self.0 |= 1u32 << tid;
    }

    #[inline]
    pub fn remove(&mut self, tid: TargetId) {
        self.0 &= !(1u32 << tid);
    }

    #[inline]
    pub const fn intersection(self, other: TargetSet) -> TargetSet {
        TargetSet(self.0 & other.0)
    }

    #[inline]
    pub const fn union(self, other: TargetSet) -> TargetSet {
        TargetSet(self.0 | other.0)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Lowest id in the set.
    #[inline]
    pub const fn first(self) -> Option<TargetId> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as TargetId)
        }
    }

    /// Remove and return the lowest id.
    #[inline]
    pub fn pop_first(&mut self) -> Option<TargetId> {
        let tid = self.first()?;
        self.0 &= self.0 - 1;
        Some(tid)
    }

    #[inline]
    pub fn iter(self) -> TargetSetIter {
        TargetSetIter(self.0)
    }
}

pub struct TargetSetIter(u32);

impl Iterator for TargetSetIter {
    type Item = TargetId;

    #[inline]
    fn next(&mut self) -> Option<TargetId> {
        if self.0 == 0 {
            return None;
        }
        let tid = self.0.trailing_zeros() as TargetId;
        self.0 &= self.0 - 1;
        Some(tid)
    }
}

impl IntoIterator for TargetSet {
    type Item = TargetId;
    type IntoIter = TargetSetIter;

    fn into_iter(self) -> TargetSetIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::TargetSet;

    #[test]
    fn insert_remove_and_iterate_in_id_order() {
        let mut set = TargetSet::EMPTY;
        set.insert(17);
        set.insert(3);
        set.insert(31);
        assert_eq!(set.len(), 3);
        assert!(set.contains(17));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![3, 17, 31]);

        set.remove(17);
        assert!(!set.contains(17));
        assert_eq!(set.pop_first(), Some(3));
        assert_eq!(set.pop_first(), Some(31));
        assert_eq!(set.pop_first(), None);
        assert!(set.is_empty());
    }
}
