//! Per-instance hook slots.
//!
//! Each component instance keeps an ordered list of slots. Every render
//! walks that list from the start through a fresh [`Hooks`] cursor, and each
//! hook call must find the same kind of slot it found last time. A slot is
//! created only when the component has never completed a render, never
//! because the stored value happens to be falsy.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use starlight_reactive::{Runtime, Signal};

use crate::{RenderError, VNode};

/// Teardown returned by a [`Hooks::use_effect`] callback.
pub type Cleanup = Box<dyn FnOnce()>;

pub(crate) type EffectFn = Box<dyn FnOnce() -> Option<Cleanup>>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HookKind {
    State,
    Memo,
    Effect,
    Ref,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HookKind::State => "use_state",
            HookKind::Memo => "use_memo",
            HookKind::Effect => "use_effect",
            HookKind::Ref => "use_ref",
        })
    }
}

pub(crate) enum HookSlot {
    State(Box<dyn Any>),
    Memo {
        deps: Box<dyn Any>,
        value: Box<dyn Any>,
    },
    Effect {
        deps: Box<dyn Any>,
        pending: Option<EffectFn>,
        cleanup: Option<Cleanup>,
    },
    Ref(Box<dyn Any>),
}

impl HookSlot {
    fn kind(&self) -> HookKind {
        match self {
            HookSlot::State(_) => HookKind::State,
            HookSlot::Memo { .. } => HookKind::Memo,
            HookSlot::Effect { .. } => HookKind::Effect,
            HookSlot::Ref(_) => HookKind::Ref,
        }
    }

    /// Take the queued effect callback and the cleanup of its previous run.
    pub(crate) fn take_effect(&mut self) -> Option<(EffectFn, Option<Cleanup>)> {
        match self {
            HookSlot::Effect {
                pending, cleanup, ..
            } => pending.take().map(|f| (f, cleanup.take())),
            _ => None,
        }
    }

    pub(crate) fn store_cleanup(&mut self, new: Option<Cleanup>) {
        if let HookSlot::Effect { cleanup, .. } = self {
            *cleanup = new;
        }
    }

    pub(crate) fn take_cleanup(&mut self) -> Option<Cleanup> {
        match self {
            HookSlot::Effect { cleanup, .. } => cleanup.take(),
            _ => None,
        }
    }
}

/// The hook context handed to a component for one render.
pub struct Hooks<'a> {
    runtime: &'a Runtime,
    component: &'a str,
    children: &'a [VNode],
    slots: &'a mut Vec<HookSlot>,
    cursor: usize,
    first_render: bool,
    pending_effects: Vec<usize>,
}

impl<'a> Hooks<'a> {
    pub(crate) fn new(
        runtime: &'a Runtime,
        component: &'a str,
        children: &'a [VNode],
        slots: &'a mut Vec<HookSlot>,
        first_render: bool,
    ) -> Self {
        Hooks {
            runtime,
            component,
            children,
            slots,
            cursor: 0,
            first_render,
            pending_effects: Vec::new(),
        }
    }

    pub fn runtime(&self) -> &Runtime {
        self.runtime
    }

    /// Children passed to the component by its parent.
    pub fn children(&self) -> &[VNode] {
        self.children
    }

    pub fn component_name(&self) -> &str {
        self.component
    }

    /// A signal that survives re-renders. Reading it during render
    /// subscribes this instance.
    pub fn use_state<T: 'static>(&mut self, initial: T) -> Result<Signal<T>, RenderError> {
        self.use_state_with(|| initial)
    }

    /// Like [`Hooks::use_state`], computing the initial value only on the
    /// first render.
    pub fn use_state_with<T: 'static>(
        &mut self,
        init: impl FnOnce() -> T,
    ) -> Result<Signal<T>, RenderError> {
        let index = self.claim(HookKind::State)?;
        if let Some(HookSlot::State(value)) = self.slots.get(index) {
            return value
                .downcast_ref::<Signal<T>>()
                .cloned()
                .ok_or_else(|| self.type_changed(index));
        }
        let signal = self.runtime.signal(init());
        self.slots.push(HookSlot::State(Box::new(signal.clone())));
        Ok(signal)
    }

    /// Recompute `compute` only when `deps` differs from the last render.
    pub fn use_memo<D, T>(&mut self, deps: D, compute: impl FnOnce(&D) -> T) -> Result<T, RenderError>
    where
        D: PartialEq + 'static,
        T: Clone + 'static,
    {
        let index = self.claim(HookKind::Memo)?;
        let component = self.component;
        if let Some(HookSlot::Memo { deps: old, value }) = self.slots.get_mut(index) {
            let Some(old_deps) = old.downcast_ref::<D>() else {
                return Err(RenderError::hook_type_changed(component, index));
            };
            if *old_deps == deps {
                return value
                    .downcast_ref::<T>()
                    .cloned()
                    .ok_or_else(|| RenderError::hook_type_changed(component, index));
            }
            let fresh = compute(&deps);
            *old = Box::new(deps);
            *value = Box::new(fresh.clone());
            return Ok(fresh);
        }
        let value = compute(&deps);
        self.slots.push(HookSlot::Memo {
            deps: Box::new(deps),
            value: Box::new(value.clone()),
        });
        Ok(value)
    }

    /// Run `effect` after this render is committed, if `deps` changed.
    ///
    /// The cleanup it returns runs before the next run and on unmount.
    pub fn use_effect<D, F>(&mut self, deps: D, effect: F) -> Result<(), RenderError>
    where
        D: PartialEq + 'static,
        F: FnOnce() -> Option<Cleanup> + 'static,
    {
        let index = self.claim(HookKind::Effect)?;
        let component = self.component;
        if let Some(HookSlot::Effect {
            deps: old, pending, ..
        }) = self.slots.get_mut(index)
        {
            let Some(old_deps) = old.downcast_ref::<D>() else {
                return Err(RenderError::hook_type_changed(component, index));
            };
            if *old_deps != deps {
                *old = Box::new(deps);
                *pending = Some(Box::new(effect));
                self.pending_effects.push(index);
            } else if pending.is_some() {
                // Queued by a render that failed before commit.
                *pending = Some(Box::new(effect));
                self.pending_effects.push(index);
            }
            return Ok(());
        }
        self.slots.push(HookSlot::Effect {
            deps: Box::new(deps),
            pending: Some(Box::new(effect)),
            cleanup: None,
        });
        self.pending_effects.push(index);
        Ok(())
    }

    /// A mutable cell that survives re-renders. Writing it never triggers a
    /// render.
    pub fn use_ref<T: 'static>(&mut self, initial: T) -> Result<Rc<RefCell<T>>, RenderError> {
        let index = self.claim(HookKind::Ref)?;
        if let Some(HookSlot::Ref(value)) = self.slots.get(index) {
            return value
                .downcast_ref::<Rc<RefCell<T>>>()
                .cloned()
                .ok_or_else(|| self.type_changed(index));
        }
        let cell = Rc::new(RefCell::new(initial));
        self.slots.push(HookSlot::Ref(Box::new(Rc::clone(&cell))));
        Ok(cell)
    }

    /// Check the hook count and return the slots whose effects must run
    /// after commit.
    pub(crate) fn finish(self) -> Result<Vec<usize>, RenderError> {
        if !self.first_render && self.cursor != self.slots.len() {
            return Err(RenderError::HookCountMismatch {
                component: self.component.to_string(),
                expected: self.slots.len(),
                found: self.cursor,
            });
        }
        Ok(self.pending_effects)
    }

    /// Advance the cursor. Returns the slot index, which is past the end of
    /// the list when the slot must be created.
    fn claim(&mut self, kind: HookKind) -> Result<usize, RenderError> {
        let index = self.cursor;
        self.cursor += 1;
        match self.slots.get(index) {
            Some(slot) if slot.kind() == kind => Ok(index),
            Some(slot) => Err(RenderError::HookOrder {
                component: self.component.to_string(),
                index,
                expected: slot.kind(),
                found: kind,
            }),
            None if self.first_render => Ok(index),
            None => Err(RenderError::HookCountMismatch {
                component: self.component.to_string(),
                expected: self.slots.len(),
                found: index + 1,
            }),
        }
    }

    fn type_changed(&self, index: usize) -> RenderError {
        RenderError::hook_type_changed(self.component, index)
    }
}

impl fmt::Debug for Hooks<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("component", &self.component)
            .field("cursor", &self.cursor)
            .field("slots", &self.slots.len())
            .finish_non_exhaustive()
    }
}
