//! Per-entity change detection.
//!
//! An entity starts untracked. [`Tracked::reset_check_dirty`] snapshots every
//! registered field and marks them pristine, recursing through owned
//! children. [`Tracked::check_dirty`] compares each field against its
//! snapshot and flips the field and the aggregate to dirty on any difference.
//! Nothing flips back to pristine except another reset.

use super::{fields, Entity};
use crate::stmt::Value;

/// Snapshot and dirty flags of one tracked entity.
#[derive(Debug, Clone)]
pub(crate) struct Overlay {
    snapshot: Vec<Value>,
    dirty: Vec<bool>,
    aggregate: bool,
}

impl Overlay {
    fn new(snapshot: Vec<Value>) -> Overlay {
        let dirty = vec![false; snapshot.len()];
        Overlay {
            snapshot,
            dirty,
            aggregate: false,
        }
    }

    pub(crate) fn is_dirty(&self, index: usize) -> bool {
        self.dirty.get(index).copied().unwrap_or(false)
    }

    fn compare(&mut self, current: &[Value]) {
        for (index, value) in current.iter().enumerate() {
            let changed = match self.snapshot.get(index) {
                Some(snapshot) => !same(snapshot, value),
                None => true,
            };

            if changed {
                self.dirty[index] = true;
                self.aggregate = true;
            }
        }
    }
}

/// Structural equality; floats compare by bit pattern so that a NaN
/// snapshot does not read as a change.
fn same(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits() || a == b,
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| same(a, b))
        }
        (a, b) => a == b,
    }
}

/// Change tracking over an entity and the subtree it owns.
///
/// Implemented for every [`Entity`]; object safe so that heterogeneous
/// children can be walked through [`Entity::children`].
pub trait Tracked {
    /// Snapshots this entity, clears its dirty flags and does the same for
    /// every owned child.
    fn reset_check_dirty(&mut self);

    /// Compares fields against the snapshot, then checks children. Children
    /// that were never tracked (newly attached) are reset first. Does nothing
    /// on an untracked entity.
    fn check_dirty(&mut self);

    /// Drops all tracking state in the subtree.
    fn clear_tracking(&mut self);

    fn is_tracking(&self) -> bool;

    /// True when this entity or anything it owns has a dirty field.
    fn is_dirty(&self) -> bool;

    /// True when this entity or anything it owns is new (`Id == 0`) or dirty.
    fn needs_persisting(&self) -> bool;

    /// True when only this entity (not its children) is tracked and unchanged.
    fn is_pristine(&self) -> bool;
}

impl<E: Entity> Tracked for E {
    fn reset_check_dirty(&mut self) {
        let snapshot = fields::<E>().map(|f| f.get(self)).collect();
        self.base_mut().set_overlay(Some(Overlay::new(snapshot)));

        for child in self.children_mut() {
            child.reset_check_dirty();
        }
    }

    fn check_dirty(&mut self) {
        if !self.is_tracking() {
            return;
        }

        let current = fields::<E>().map(|f| f.get(self)).collect::<Vec<_>>();
        if let Some(overlay) = self.base_mut().overlay_mut() {
            overlay.compare(&current);
        }

        for child in self.children_mut() {
            if !child.is_tracking() {
                child.reset_check_dirty();
            }
            child.check_dirty();
        }
    }

    fn clear_tracking(&mut self) {
        self.base_mut().set_overlay(None);

        for child in self.children_mut() {
            child.clear_tracking();
        }
    }

    fn is_tracking(&self) -> bool {
        self.base().overlay().is_some()
    }

    fn is_dirty(&self) -> bool {
        let own = self
            .base()
            .overlay()
            .map(|overlay| overlay.aggregate)
            .unwrap_or(false);

        own || self.children().iter().any(|child| child.is_dirty())
    }

    fn needs_persisting(&self) -> bool {
        if self.base().is_new() {
            return true;
        }

        let own = self
            .base()
            .overlay()
            .map(|overlay| overlay.aggregate)
            .unwrap_or(false);

        own || self.children().iter().any(|child| child.needs_persisting())
    }

    fn is_pristine(&self) -> bool {
        self.base()
            .overlay()
            .map(|overlay| !overlay.aggregate)
            .unwrap_or(false)
    }
}
