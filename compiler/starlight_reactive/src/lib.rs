//! Reactive store for the Starlight runtime.
//!
//! Everything hangs off an explicit [`Runtime`]:
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use starlight_reactive::Runtime;
//!
//! let rt = Runtime::new();
//! let count = rt.signal(1);
//! let seen = Rc::new(Cell::new(0));
//!
//! let effect = rt.create_effect({
//!     let count = count.clone();
//!     let seen = Rc::clone(&seen);
//!     move || seen.set(count.get())
//! });
//!
//! count.set(5);
//! assert_eq!(seen.get(), 5);
//! drop(effect);
//! ```
//!
//! Notification is synchronous. [`Runtime::batch`] is the only coalescing
//! primitive, and deferred work goes through the microtask queue, which the
//! host drains with [`Runtime::run_microtasks`].

mod effect;
mod memo;
mod runtime;
mod signal;

pub use effect::Effect;
pub use memo::Memo;
pub use runtime::Runtime;
pub use signal::{ReadSignal, Signal, SubscriptionId, WriteSignal};

#[cfg(test)]
mod tests;
