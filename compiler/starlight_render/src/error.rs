//! Render errors.

use thiserror::Error;

use crate::{HookKind, NodeId};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Raised by a component's own render function.
    #[error("component `{name}` failed: {message}")]
    Component { name: String, message: String },

    #[error(
        "component `{component}` called hooks out of order: slot {index} was {expected} last render, now {found}"
    )]
    HookOrder {
        component: String,
        index: usize,
        expected: HookKind,
        found: HookKind,
    },

    #[error("component `{component}` called {found} hooks, the previous render called {expected}")]
    HookCountMismatch {
        component: String,
        expected: usize,
        found: usize,
    },

    #[error("component `{component}` re-rendered more than {limit} times without settling")]
    TooManyRerenders { component: String, limit: usize },

    #[error("node {parent} has no child at index {index}")]
    NodeNotFound { parent: NodeId, index: usize },
}

impl RenderError {
    pub fn component(name: impl Into<String>, message: impl Into<String>) -> Self {
        RenderError::Component {
            name: name.into(),
            message: message.into(),
        }
    }

    pub(crate) fn hook_type_changed(component: &str, index: usize) -> Self {
        RenderError::component(component, format!("hook {index} changed its value type"))
    }
}
