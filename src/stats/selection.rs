use serde::{Deserialize, Serialize};

use super::{
    models::{ContactType, Detail, MainStat, Outcome},
    StatsError,
};

/// Main stat and contact chosen so far for the next entry.
///
/// Entries are only produced once both are set; the ledger never sees a
/// partial selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSelection {
    pub main: Option<MainStat>,
    pub contact: Option<ContactType>,
}

impl PendingSelection {
    pub fn new(main: Option<MainStat>, contact: Option<ContactType>) -> Self {
        Self { main, contact }
    }

    pub fn select_main(&mut self, main: MainStat) {
        self.main = Some(main);
    }

    pub fn select_contact(&mut self, contact: ContactType) {
        self.contact = Some(contact);
    }

    pub fn is_complete(&self) -> bool {
        self.main.is_some() && self.contact.is_some()
    }

    /// Turns the selection plus a terminal detail into an outcome.
    ///
    /// Returns `Ok(None)` and keeps the selection when main stat or contact is
    /// missing. Clears the selection once an outcome is produced.
    pub fn finish(&mut self, detail: Detail) -> Result<Option<Outcome>, StatsError> {
        let (Some(main), Some(contact)) = (self.main, self.contact) else {
            return Ok(None);
        };

        let outcome = Outcome::from_parts(main, contact, detail)?;
        *self = Self::default();
        Ok(Some(outcome))
    }
}
