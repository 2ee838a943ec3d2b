//! Effects: closures that re-run when the signals they read change.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::Runtime;

type Body = Rc<dyn Fn()>;

pub(crate) struct EffectInner {
    runtime: Runtime,
    body: RefCell<Option<Body>>,
    disposed: Cell<bool>,
    runs: Cell<u64>,
}

impl EffectInner {
    pub(crate) fn new(runtime: Runtime) -> Rc<Self> {
        Rc::new(EffectInner {
            runtime,
            body: RefCell::new(None),
            disposed: Cell::new(false),
            runs: Cell::new(0),
        })
    }

    pub(crate) fn set_body(&self, body: Body) {
        *self.body.borrow_mut() = Some(body);
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Run the body with this effect as the active observer.
    ///
    /// The body is cloned out first, so it may dispose or re-run this
    /// effect without a borrow conflict.
    pub(crate) fn run(self: &Rc<Self>) {
        if self.disposed.get() {
            return;
        }
        let Some(body) = self.body.borrow().clone() else {
            return;
        };
        self.runs.set(self.runs.get() + 1);
        let _guard = self.runtime.observe(Some(Rc::downgrade(self)));
        body();
    }

    fn dispose(&self) {
        if !self.disposed.replace(true) {
            tracing::trace!(runs = self.runs.get(), "effect disposed");
        }
        self.body.borrow_mut().take();
    }
}

/// Owning handle to a running effect. Dropping it disposes the effect.
pub struct Effect {
    inner: Rc<EffectInner>,
}

impl Effect {
    pub(crate) fn from_inner(inner: Rc<EffectInner>) -> Self {
        Effect { inner }
    }

    /// Run the effect now, collecting dependencies again.
    pub fn run(&self) {
        self.inner.run();
    }

    /// Stop the effect. It never runs again and its closure is dropped.
    pub fn dispose(&self) {
        self.inner.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }

    /// How many times the body has run, the initial run included.
    pub fn run_count(&self) -> u64 {
        self.inner.runs.get()
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        self.inner.dispose();
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("runs", &self.inner.runs.get())
            .field("disposed", &self.inner.disposed.get())
            .finish()
    }
}
