//! Signals: observable values with a subscriber list.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::effect::EffectInner;
use crate::Runtime;

/// Handle returned by [`Signal::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A signal that can deliver its change notifications later.
pub(crate) trait Notify {
    /// Identity used to coalesce repeated writes inside a batch.
    fn id(&self) -> usize;
    fn notify(&self);
}

enum Subscriber<T> {
    Effect(Weak<EffectInner>),
    Listener(SubscriptionId, Rc<dyn Fn(&T)>),
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        match self {
            Subscriber::Effect(effect) => Subscriber::Effect(effect.clone()),
            Subscriber::Listener(id, callback) => Subscriber::Listener(*id, Rc::clone(callback)),
        }
    }
}

impl<T> Subscriber<T> {
    fn is_live(&self) -> bool {
        match self {
            Subscriber::Effect(effect) => effect
                .upgrade()
                .is_some_and(|effect| !effect.is_disposed()),
            Subscriber::Listener(..) => true,
        }
    }
}

type Subscribers<T> = SmallVec<[Subscriber<T>; 4]>;

pub(crate) struct SignalInner<T> {
    runtime: Runtime,
    value: RefCell<T>,
    subscribers: RefCell<Subscribers<T>>,
    next_listener: Cell<u64>,
}

impl<T> Notify for SignalInner<T> {
    fn id(&self) -> usize {
        std::ptr::from_ref(self).cast::<()>() as usize
    }

    /// One pass over a snapshot of the subscribers, in subscription order.
    /// Subscribers added during the pass wait for the next write.
    fn notify(&self) {
        let snapshot: Subscribers<T> = self.subscribers.borrow().clone();
        tracing::trace!(subscribers = snapshot.len(), "signal changed");

        let mut saw_dead = false;
        for subscriber in &snapshot {
            match subscriber {
                Subscriber::Effect(effect) => match effect.upgrade() {
                    Some(effect) if !effect.is_disposed() => effect.run(),
                    _ => saw_dead = true,
                },
                Subscriber::Listener(_, callback) => callback(&*self.value.borrow()),
            }
        }

        if saw_dead {
            self.subscribers.borrow_mut().retain(|s| s.is_live());
        }
    }
}

/// A reactive value.
///
/// Reading with [`Signal::get`] inside an effect subscribes that effect.
/// Every write notifies every subscriber, even when the new value equals the
/// old one.
///
/// Writing a signal from one of its own subscribers re-enters notification
/// and can recurse without bound. Listeners registered with
/// [`Signal::subscribe`] run while the value is borrowed and must not write
/// the signal they listen to.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Signal {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Signal<T> {
    pub(crate) fn new(runtime: Runtime, value: T) -> Self {
        Signal {
            inner: Rc::new(SignalInner {
                runtime,
                value: RefCell::new(value),
                subscribers: RefCell::new(SmallVec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    /// Read the value and subscribe the active effect.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.track();
        self.inner.value.borrow().clone()
    }

    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.borrow().clone()
    }

    /// Borrow the value and subscribe the active effect.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.track();
        f(&self.inner.value.borrow())
    }

    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Replace the value and notify.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.changed();
    }

    /// Modify the value in place and notify.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.value.borrow_mut());
        self.changed();
    }

    /// Call `callback` with the new value after every write.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push(Subscriber::Listener(id, Rc::new(callback)));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| !matches!(s, Subscriber::Listener(other, _) if *other == id));
        subscribers.len() != before
    }

    /// Live effects and listeners currently subscribed.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .borrow()
            .iter()
            .filter(|s| s.is_live())
            .count()
    }

    pub fn runtime(&self) -> &Runtime {
        &self.inner.runtime
    }

    pub fn split(self) -> (ReadSignal<T>, WriteSignal<T>) {
        (ReadSignal(self.clone()), WriteSignal(self))
    }

    /// Add the active effect to the subscribers, once.
    fn track(&self) {
        let Some(observer) = self.inner.runtime.current_observer() else {
            return;
        };
        let mut subscribers = self.inner.subscribers.borrow_mut();
        let known = subscribers
            .iter()
            .any(|s| matches!(s, Subscriber::Effect(effect) if effect.ptr_eq(&observer)));
        if !known {
            subscribers.push(Subscriber::Effect(observer));
        }
    }

    fn changed(&self) {
        if self.inner.runtime.is_batching() {
            let pending: Rc<dyn Notify> = self.inner.clone();
            self.inner.runtime.defer(pending);
        } else {
            self.inner.notify();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.value.try_borrow() {
            Ok(value) => f.debug_tuple("Signal").field(&*value).finish(),
            Err(_) => f.write_str("Signal(<borrowed>)"),
        }
    }
}

/// The read half of a signal.
pub struct ReadSignal<T>(Signal<T>);

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        ReadSignal(self.0.clone())
    }
}

impl<T: 'static> ReadSignal<T> {
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.get()
    }

    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.0.get_untracked()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.0.with(f)
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> SubscriptionId {
        self.0.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.0.unsubscribe(id)
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The write half of a signal.
pub struct WriteSignal<T>(Signal<T>);

impl<T> Clone for WriteSignal<T> {
    fn clone(&self) -> Self {
        WriteSignal(self.0.clone())
    }
}

impl<T: 'static> WriteSignal<T> {
    pub fn set(&self, value: T) {
        self.0.set(value);
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.0.update(f);
    }
}

impl<T> fmt::Debug for WriteSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WriteSignal")
    }
}
