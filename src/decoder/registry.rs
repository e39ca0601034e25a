use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};

/// Result of registering a decoded message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// First well to report this message
    Winner,
    /// Message already owned by another well
    Duplicate {
        /// Index of the owning well
        owner: usize,
    },
}

impl Registration {
    /// True when this well owns its message
    pub fn is_winner(&self) -> bool {
        matches!(self, Registration::Winner)
    }
}

/// Snapshot of a finished registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryEntries {
    /// Message to the index of the well that first decoded it
    pub by_message: HashMap<String, usize>,
    /// Label to the index of every well that decoded anything
    pub by_label: BTreeMap<String, usize>,
}

impl RegistryEntries {
    /// Index of the well that owns `message`
    pub fn owner_of(&self, message: &str) -> Option<usize> {
        self.by_message.get(message).copied()
    }

    /// Index of the decoded well labelled `label`
    pub fn well_for_label(&self, label: &str) -> Option<usize> {
        self.by_label.get(label).copied()
    }

    /// Number of distinct messages
    pub fn len(&self) -> usize {
        self.by_message.len()
    }

    /// True when nothing was registered
    pub fn is_empty(&self) -> bool {
        self.by_message.is_empty()
    }
}

/// Run-scoped record of decoded messages shared by all workers
///
/// The first well to register a message owns it; later wells with the same
/// message are told who the owner is. Every decoded well is also indexed by
/// its label regardless of ownership.
#[derive(Debug, Default)]
pub struct BarcodeRegistry {
    entries: Mutex<RegistryEntries>,
}

impl BarcodeRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that well `index` labelled `label` decoded `message`
    pub fn register(&self, message: &str, label: &str, index: usize) -> Registration {
        // Both maps are updated together, so a poisoned lock still guards
        // consistent data.
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.by_label.insert(label.to_string(), index);
        match entries.by_message.get(message) {
            Some(&owner) => Registration::Duplicate { owner },
            None => {
                entries.by_message.insert(message.to_string(), index);
                Registration::Winner
            }
        }
    }

    /// Number of distinct messages registered so far
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .by_message
            .len()
    }

    /// True when nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the registry into its final entries
    pub fn into_entries(self) -> RegistryEntries {
        self.entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
