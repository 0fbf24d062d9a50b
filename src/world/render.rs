//! Coalescing buffer of tile changes for the presentation layer.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::world::{GroupId, Position};

/// Latest visible state of a tile that changed since the last drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderChange {
    /// Normalized tile position.
    pub position: Position,
    /// Owning group id, 0 if unowned.
    pub owner: GroupId,
    /// Group id of the dot standing here, 0 if empty.
    pub occupant: GroupId,
}

/// Pending render records keyed by tile.
///
/// Recording a tile twice overwrites the earlier record, so a drain only
/// ever reports the final state of each tile.
#[derive(Debug, Clone, Default)]
pub struct RenderBuffer {
    pending: BTreeMap<Position, RenderChange>,
}

impl RenderBuffer {
    /// Record the current state of a tile.
    pub fn record(&mut self, position: Position, owner: Option<GroupId>, occupant: Option<GroupId>) {
        self.pending.insert(
            position,
            RenderChange {
                position,
                owner: owner.unwrap_or(0),
                occupant: occupant.unwrap_or(0),
            },
        );
    }

    /// Number of tiles with pending records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing changed since the last drain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending record, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<RenderChange> {
        std::mem::take(&mut self.pending).into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_coalesce_per_tile() {
        let mut buffer = RenderBuffer::default();
        let p = Position::new(2, 3);
        buffer.record(p, Some(1), None);
        buffer.record(p, None, Some(2));
        buffer.record(Position::new(0, 0), Some(4), Some(4));

        assert_eq!(buffer.len(), 2);
        let changes = buffer.drain();
        let change = changes.iter().find(|c| c.position == p).unwrap();
        assert_eq!(change.owner, 0);
        assert_eq!(change.occupant, 2);
    }

    #[test]
    fn test_drain_clears() {
        let mut buffer = RenderBuffer::default();
        buffer.record(Position::new(1, 1), Some(1), Some(1));
        assert_eq!(buffer.drain().len(), 1);
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_empty());
    }
}
