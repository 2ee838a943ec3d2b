//! The reactive tracking context.
//!
//! A [`Runtime`] owns the three pieces of shared state every signal and
//! effect needs:
//! - the active observer (the effect currently collecting dependencies)
//! - the batch depth and the signals written while batching
//! - the microtask queue
//!
//! Signals and effects keep a handle to the runtime they were created in, so
//! two runtimes never see each other's reads.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::effect::{Effect, EffectInner};
use crate::memo::Memo;
use crate::signal::{Notify, ReadSignal, Signal, WriteSignal};

type Microtask = Box<dyn FnOnce()>;

pub(crate) struct RuntimeInner {
    observer: RefCell<Option<Weak<EffectInner>>>,
    batch_depth: Cell<usize>,
    pending: RefCell<Vec<Rc<dyn Notify>>>,
    microtasks: RefCell<VecDeque<Microtask>>,
}

/// Single-threaded reactive context. Clones share the same state.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new() -> Self {
        Runtime {
            inner: Rc::new(RuntimeInner {
                observer: RefCell::new(None),
                batch_depth: Cell::new(0),
                pending: RefCell::new(Vec::new()),
                microtasks: RefCell::new(VecDeque::new()),
            }),
        }
    }

    /// Create a signal split into its read and write halves.
    pub fn create_signal<T: 'static>(&self, initial: T) -> (ReadSignal<T>, WriteSignal<T>) {
        self.signal(initial).split()
    }

    /// Create a signal as a single read/write handle.
    pub fn signal<T: 'static>(&self, initial: T) -> Signal<T> {
        Signal::new(self.clone(), initial)
    }

    /// Run `f` now, and again after every write to a signal it read.
    ///
    /// Dependencies are collected on every run, so a branch that stops
    /// reading a signal keeps its old subscription until the effect is
    /// disposed. Dropping the returned handle disposes the effect.
    #[must_use = "dropping the Effect disposes it"]
    pub fn create_effect(&self, f: impl Fn() + 'static) -> Effect {
        let inner = EffectInner::new(self.clone());
        inner.set_body(Rc::new(f));
        inner.run();
        Effect::from_inner(inner)
    }

    /// A signal derived from `f`, recomputed whenever its inputs change.
    ///
    /// Readers are only notified when the recomputed value differs.
    pub fn create_memo<T, F>(&self, f: F) -> Memo<T>
    where
        T: PartialEq + 'static,
        F: Fn() -> T + 'static,
    {
        let effect = EffectInner::new(self.clone());
        let initial = {
            let _guard = self.observe(Some(Rc::downgrade(&effect)));
            f()
        };
        let signal = self.signal(initial);
        let target = signal.clone();
        effect.set_body(Rc::new(move || {
            let value = f();
            if target.with_untracked(|current| *current != value) {
                target.set(value);
            }
        }));
        Memo::new(signal, Effect::from_inner(effect))
    }

    /// Run `f` with notifications deferred until the outermost batch ends.
    ///
    /// Each written signal then notifies once, in the order it was first
    /// written, with its final value.
    pub fn batch<R>(&self, f: impl FnOnce() -> R) -> R {
        let result = {
            let _guard = BatchGuard::enter(&self.inner);
            f()
        };
        if self.inner.batch_depth.get() == 0 {
            self.flush_pending();
        }
        result
    }

    /// Run `f` without recording any reads as dependencies.
    pub fn untrack<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.observe(None);
        f()
    }

    pub fn is_batching(&self) -> bool {
        self.inner.batch_depth.get() > 0
    }

    /// Queue `f` to run on the next [`Runtime::run_microtasks`].
    pub fn queue_microtask(&self, f: impl FnOnce() + 'static) {
        self.inner.microtasks.borrow_mut().push_back(Box::new(f));
    }

    /// Drain the microtask queue in FIFO order, including tasks queued by
    /// the tasks being run. Returns how many ran.
    pub fn run_microtasks(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.inner.microtasks.borrow_mut().pop_front();
            let Some(task) = task else { break };
            task();
            ran += 1;
        }
        if ran > 0 {
            tracing::trace!(ran, "drained microtasks");
        }
        ran
    }

    pub fn pending_microtasks(&self) -> usize {
        self.inner.microtasks.borrow().len()
    }

    /// The effect collecting dependencies right now, if any.
    pub(crate) fn current_observer(&self) -> Option<Weak<EffectInner>> {
        self.inner.observer.borrow().clone()
    }

    /// Install `observer` until the guard drops.
    pub(crate) fn observe(&self, observer: Option<Weak<EffectInner>>) -> ObserverGuard<'_> {
        let previous = self.inner.observer.replace(observer);
        ObserverGuard {
            runtime: &self.inner,
            previous,
        }
    }

    /// Queue a notification for the end of the open batch.
    pub(crate) fn defer(&self, signal: Rc<dyn Notify>) {
        let mut pending = self.inner.pending.borrow_mut();
        let id = signal.id();
        if !pending.iter().any(|queued| queued.id() == id) {
            pending.push(signal);
        }
    }

    fn flush_pending(&self) {
        let pending = std::mem::take(&mut *self.inner.pending.borrow_mut());
        if pending.is_empty() {
            return;
        }
        tracing::trace!(signals = pending.len(), "flushing batch");
        for signal in pending {
            signal.notify();
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("batch_depth", &self.inner.batch_depth.get())
            .field("pending", &self.inner.pending.borrow().len())
            .field("microtasks", &self.inner.microtasks.borrow().len())
            .finish_non_exhaustive()
    }
}

/// Restores the previous observer on drop, unwinding included.
pub(crate) struct ObserverGuard<'a> {
    runtime: &'a RuntimeInner,
    previous: Option<Weak<EffectInner>>,
}

impl Drop for ObserverGuard<'_> {
    fn drop(&mut self) {
        *self.runtime.observer.borrow_mut() = self.previous.take();
    }
}

struct BatchGuard<'a> {
    runtime: &'a RuntimeInner,
}

impl<'a> BatchGuard<'a> {
    fn enter(runtime: &'a RuntimeInner) -> Self {
        runtime.batch_depth.set(runtime.batch_depth.get() + 1);
        BatchGuard { runtime }
    }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.runtime
            .batch_depth
            .set(self.runtime.batch_depth.get().saturating_sub(1));
    }
}
