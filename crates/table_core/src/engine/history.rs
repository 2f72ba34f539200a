//! Append-only log of stat commands with point-in-time undo.

use super::ledger::StatLedger;
use crate::error::{Result, TableError};
use crate::models::{ActionId, ActionRecord, PlayerId, StatAction, TeamSide};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionHistory {
    records: Vec<ActionRecord>,
}

impl ActionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ActionRecord>) -> Self {
        Self { records }
    }

    pub fn record(&mut self, record: ActionRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: ActionId) -> Option<&ActionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Most recent record of one stat for one player, the usual undo target.
    pub fn latest_for(
        &self,
        side: TeamSide,
        player: &PlayerId,
        action: StatAction,
    ) -> Option<&ActionRecord> {
        self.records
            .iter()
            .rev()
            .find(|r| r.side == side && &r.player == player && r.action == action)
    }

    /// Reverse a record through the ledger and drop it from the log. Nothing
    /// changes if the ledger rejects the inverse.
    pub fn undo(&mut self, id: ActionId, ledger: &mut StatLedger) -> Result<ActionRecord> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(TableError::ActionNotFound(id))?;
        ledger.revert(&self.records[index])?;
        Ok(self.records.remove(index))
    }
}
