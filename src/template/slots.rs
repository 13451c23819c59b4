use serde::{Deserialize, Serialize};

/// Positional slot array where removal leaves a hole instead of shifting.
///
/// Terminal and parameter identity is the slot index, so it must survive edits
/// to unrelated slots. Serialized as a JSON array with `null` for holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slots<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> Slots<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of positions, holes included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Writes `value` at `index`, growing the array with holes as needed.
    /// Returns the previous occupant.
    pub fn set(&mut self, index: usize, value: T) -> Option<T> {
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index].replace(value)
    }

    /// Empties `index`, leaving a hole.
    pub fn clear(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Occupied slots with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
    }

    /// All positions, holes as `None`.
    pub fn raw(&self) -> &[Option<T>] {
        &self.slots
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

impl<T> From<Vec<Option<T>>> for Slots<T> {
    fn from(slots: Vec<Option<T>>) -> Self {
        Self { slots }
    }
}

impl<T> FromIterator<Option<T>> for Slots<T> {
    fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}
