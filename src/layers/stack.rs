use crate::foundation::error::{Mutation, UnderlayError, UnderlayResult};
use crate::layers::model::{Keyed, LayerId};

/// Ordered layer collection; index order is draw order (last drawn on top).
///
/// New ids are `max(current ids, 0) + 1`. Removing the highest id therefore frees it for reuse,
/// and an emptied stack starts again at 1. The editor relies on this numbering, so it is kept
/// rather than replaced with a monotonic counter.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LayerStack<T> {
    items: Vec<T>,
}

impl<T> Default for LayerStack<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Keyed> LayerStack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from existing entries, keeping their ids. Returns `None` on a duplicate id.
    pub fn from_vec(items: Vec<T>) -> Option<Self> {
        let mut seen = std::collections::HashSet::new();
        if !items.iter().all(|t| seen.insert(t.id())) {
            return None;
        }
        Some(Self { items })
    }

    /// `None` once the highest id is `LayerId::MAX`.
    pub fn next_id(&self) -> Option<LayerId> {
        self.items
            .iter()
            .map(Keyed::id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
    }

    /// Append a copy of `template` under a fresh id; it becomes the topmost entry.
    ///
    /// Fails with a validation error when no id above the current maximum is left.
    pub fn add(&mut self, template: T) -> UnderlayResult<T> {
        let id = self
            .next_id()
            .ok_or_else(|| UnderlayError::validation("layer ids exhausted"))?;
        let mut entry = template;
        entry.set_id(id);
        self.items.push(entry.clone());
        Ok(entry)
    }

    /// Append a clone of `entry` under a fresh id.
    pub fn duplicate(&mut self, entry: &T) -> UnderlayResult<T> {
        self.add(entry.clone())
    }

    /// Change the entry with `id` in place; [`Mutation::Noop`] when absent.
    ///
    /// `f` may not change the id: it is restored after the call.
    pub fn update(&mut self, id: LayerId, f: impl FnOnce(&mut T)) -> Mutation {
        let Some(entry) = self.items.iter_mut().find(|t| t.id() == id) else {
            return Mutation::Noop;
        };
        f(entry);
        entry.set_id(id);
        Mutation::Applied
    }

    pub fn remove(&mut self, id: LayerId) -> Mutation {
        let before = self.items.len();
        self.items.retain(|t| t.id() != id);
        if self.items.len() == before {
            Mutation::Noop
        } else {
            Mutation::Applied
        }
    }

    pub fn get(&self, id: LayerId) -> Option<&T> {
        self.items.iter().find(|t| t.id() == id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.get(id).is_some()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn ids(&self) -> Vec<LayerId> {
        self.items.iter().map(Keyed::id).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a LayerStack<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/stack.rs"]
mod tests;
