use super::tracker::Overlay;
use crate::Result;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Baseline columns carried by every entity, plus transient load and
/// change-tracking state.
#[derive(Debug, Clone)]
pub struct Base {
    id: i64,
    pub created_date: i64,
    pub modified_date: i64,
    pub is_deleted: bool,

    /// Set when the entity was populated from a store row.
    mapped: bool,

    overlay: Option<Overlay>,
}

impl Base {
    pub fn new() -> Base {
        let now = now_millis();
        Base {
            id: 0,
            created_date: now,
            modified_date: now,
            is_deleted: false,
            mapped: false,
            overlay: None,
        }
    }

    /// Identity; `0` until the entity is first written.
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }

    /// Assigns the identity. Once non-zero it can only be re-assigned the
    /// same value.
    pub fn set_id(&mut self, id: i64) -> Result<()> {
        if self.id != 0 && self.id != id {
            crate::bail!("identity {} is already assigned; refusing {id}", self.id);
        }
        self.id = id;
        Ok(())
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    pub fn set_mapped(&mut self, mapped: bool) {
        self.mapped = mapped;
    }

    pub(crate) fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub(crate) fn overlay_mut(&mut self) -> Option<&mut Overlay> {
        self.overlay.as_mut()
    }

    pub(crate) fn set_overlay(&mut self, overlay: Option<Overlay>) {
        self.overlay = overlay;
    }
}

impl Default for Base {
    fn default() -> Base {
        Base::new()
    }
}
