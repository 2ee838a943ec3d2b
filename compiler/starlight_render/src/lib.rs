//! Tree renderer for the Starlight runtime.
//!
//! Components describe their output as a [`VNode`] tree. The [`Renderer`]
//! mounts that tree into a [`Document`] and, on later renders, patches the
//! document in place by comparing the new tree with the previous one
//! position by position.
//!
//! Each component instance renders inside a reactive effect, so a signal
//! read during render re-renders that instance alone when it changes.
//! State lives in hook slots reached through the [`Hooks`] context.

mod document;
mod error;
mod hooks;
mod renderer;
mod vnode;

pub use document::{Document, Event, EventHandler, NodeId, NodeKind};
pub use error::RenderError;
pub use hooks::{Cleanup, HookKind, Hooks};
pub use renderer::{Renderer, RERENDER_LIMIT};
pub use vnode::{
    create_element, h, Component, ComponentNode, Element, ElementBuilder, ElementType, PropValue,
    Props, VNode,
};
