//! Derived signals.

use std::fmt;

use crate::{Effect, Signal};

/// A cached value computed from other signals.
///
/// Reading a memo inside an effect subscribes to the memo, not to its
/// inputs. The memo stops updating when it is dropped.
pub struct Memo<T> {
    signal: Signal<T>,
    effect: Effect,
}

impl<T: 'static> Memo<T> {
    pub(crate) fn new(signal: Signal<T>, effect: Effect) -> Self {
        Memo { signal, effect }
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.signal.get()
    }

    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.signal.get_untracked()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.signal.with(f)
    }

    /// How many times the value has been computed.
    pub fn compute_count(&self) -> u64 {
        self.effect.run_count() + 1
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Memo").field(&self.signal).finish()
    }
}
