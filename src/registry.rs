//! The fixed table of builtin commands.

use crate::builtin::{BuiltinCommand, Cd, Exit, Help};
use crate::command::CommandFactory;
use crate::interpreter::Factory;

/// A builtin name paired with the factory that creates its handler.
pub struct BuiltinEntry {
    pub name: &'static str,
    pub factory: Box<dyn CommandFactory>,
}

/// Ordered, immutable mapping from builtin name to handler.
///
/// Built once before the loop starts. Lookup is an exact, case-sensitive
/// match on the command name.
pub struct BuiltinRegistry {
    entries: Vec<BuiltinEntry>,
}

impl BuiltinRegistry {
    pub fn new(entries: Vec<BuiltinEntry>) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, name: &[u8]) -> Option<&BuiltinEntry> {
        self.entries.iter().find(|entry| entry.name.as_bytes() == name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }
}

pub(crate) fn entry<T: BuiltinCommand + 'static>() -> BuiltinEntry {
    BuiltinEntry {
        name: T::name(),
        factory: Box::new(Factory::<T>::default()),
    }
}

impl Default for BuiltinRegistry {
    /// The shell's builtins: `cd`, `help`, `exit`.
    fn default() -> Self {
        Self::new(vec![entry::<Cd>(), entry::<Help>(), entry::<Exit>()])
    }
}
