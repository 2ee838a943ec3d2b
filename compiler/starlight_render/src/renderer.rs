//! Mounting and reconciliation.
//!
//! Every description node maps to exactly one document node:
//! - an element to an element
//! - text, a number, or `Empty` to a text node
//! - a fragment to a fragment node
//! - a component to a fragment "host" node holding its rendered output
//!
//! That one-to-one mapping lets the reconciler address nodes purely by
//! position under their parent.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use starlight_reactive::{Effect, Runtime};
use starlight_stack::ensure_sufficient_stack;

use crate::document::{Document, NodeId};
use crate::hooks::{Cleanup, HookSlot, Hooks};
use crate::vnode::{format_number, Component, ComponentNode, PropValue, Props, VNode};
use crate::RenderError;

/// Re-render passes one instance may replay before giving up.
pub const RERENDER_LIMIT: usize = 25;

struct Instance {
    component: Component,
    host: NodeId,
    props: RefCell<Props>,
    children: RefCell<Vec<VNode>>,
    slots: RefCell<Vec<HookSlot>>,
    rendered: RefCell<Option<VNode>>,
    effect: RefCell<Option<Rc<Effect>>>,
    hooks_committed: Cell<bool>,
    rendering: Cell<bool>,
    rerender_requested: Cell<bool>,
    unmounted: Cell<bool>,
}

impl Instance {
    fn new(node: &ComponentNode, host: NodeId) -> Self {
        Instance {
            component: node.component.clone(),
            host,
            props: RefCell::new(node.props.clone()),
            children: RefCell::new(node.children.clone()),
            slots: RefCell::new(Vec::new()),
            rendered: RefCell::new(None),
            effect: RefCell::new(None),
            hooks_committed: Cell::new(false),
            rendering: Cell::new(false),
            rerender_requested: Cell::new(false),
            unmounted: Cell::new(false),
        }
    }

    fn name(&self) -> &str {
        self.component.name()
    }

    /// Re-run the render effect, so reads are tracked by this instance.
    fn rerender(&self) {
        let effect = self.effect.borrow().clone();
        if let Some(effect) = effect {
            effect.run();
        }
    }
}

struct RendererInner {
    runtime: Runtime,
    document: Document,
    instances: RefCell<FxHashMap<NodeId, Rc<Instance>>>,
    roots: RefCell<FxHashMap<NodeId, VNode>>,
    errors: RefCell<Vec<RenderError>>,
}

/// Renders element descriptions into a [`Document`] and keeps them in sync.
///
/// Cloning gives another handle to the same renderer.
#[derive(Clone)]
pub struct Renderer {
    inner: Rc<RendererInner>,
}

impl Renderer {
    pub fn new(runtime: Runtime, document: Document) -> Self {
        Renderer {
            inner: Rc::new(RendererInner {
                runtime,
                document,
                instances: RefCell::new(FxHashMap::default()),
                roots: RefCell::new(FxHashMap::default()),
                errors: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.inner.runtime
    }

    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    /// Replace everything under `container` with `description`.
    ///
    /// A failing component is replaced by an empty placeholder and the rest
    /// of the tree still renders. The first such failure is returned.
    #[tracing::instrument(level = "debug", skip_all, fields(container = %container))]
    pub fn render(&self, description: &VNode, container: NodeId) -> Result<(), RenderError> {
        let mark = self.inner.errors.borrow().len();
        self.clear(container);
        let result = self.mount(description).map(|node| {
            self.document().append_child(container, node);
        });
        self.inner
            .roots
            .borrow_mut()
            .insert(container, description.clone());
        tracing::debug!(nodes = self.document().len(), "rendered");
        self.settle(mark, result)
    }

    /// Reconcile `description` against the tree last rendered into
    /// `container`, or render it if there is none.
    #[tracing::instrument(level = "debug", skip_all, fields(container = %container))]
    pub fn update(&self, description: &VNode, container: NodeId) -> Result<(), RenderError> {
        let old = self.inner.roots.borrow().get(&container).cloned();
        let Some(old) = old else {
            return self.render(description, container);
        };
        let mark = self.inner.errors.borrow().len();
        let result = self.reconcile(container, Some(description), Some(&old), 0);
        self.inner
            .roots
            .borrow_mut()
            .insert(container, description.clone());
        self.settle(mark, result)
    }

    /// Remove everything rendered into `container`, running cleanups.
    pub fn unmount(&self, container: NodeId) {
        self.clear(container);
    }

    /// Patch the child at `index` of `parent` from `old` to `new`.
    ///
    /// Matching is purely positional: a reordered list replaces nodes.
    pub fn reconcile(
        &self,
        parent: NodeId,
        new: Option<&VNode>,
        old: Option<&VNode>,
        index: usize,
    ) -> Result<(), RenderError> {
        ensure_sufficient_stack(|| match (new, old) {
            (None, None) => Ok(()),
            (Some(new), None) => {
                let node = self.mount(new)?;
                self.document().append_child(parent, node);
                Ok(())
            }
            (None, Some(_)) => {
                let node = self.child(parent, index)?;
                tracing::trace!(%parent, index, "remove");
                self.unmount_subtree(node);
                self.document().remove(node);
                Ok(())
            }
            (Some(new), Some(old)) if !new.same_type(old) => {
                let existing = self.child(parent, index)?;
                tracing::trace!(%parent, index, "replace");
                self.replace(parent, existing, new)
            }
            (Some(new), Some(old)) => self.patch(parent, new, old, index),
        })
    }

    /// Errors from renders triggered by signals rather than by
    /// [`Renderer::render`] or [`Renderer::update`].
    pub fn take_errors(&self) -> Vec<RenderError> {
        std::mem::take(&mut *self.inner.errors.borrow_mut())
    }

    /// Mounted component instances.
    pub fn instance_count(&self) -> usize {
        self.inner.instances.borrow().len()
    }

    fn patch(&self, parent: NodeId, new: &VNode, old: &VNode, index: usize) -> Result<(), RenderError> {
        let node = self.child(parent, index)?;
        match (new, old) {
            (VNode::Element(new), VNode::Element(old)) => {
                self.patch_props(node, &old.props, &new.props);
                self.reconcile_children(node, &new.children, &old.children)
            }
            (VNode::Fragment(new), VNode::Fragment(old)) => {
                self.reconcile_children(node, new, old)
            }
            (VNode::Component(component), VNode::Component(_)) => {
                let instance = self.inner.instances.borrow().get(&node).cloned();
                let Some(instance) = instance else {
                    return self.replace(parent, node, new);
                };
                component.props.clone_into(&mut instance.props.borrow_mut());
                component
                    .children
                    .clone_into(&mut instance.children.borrow_mut());
                instance.rerender();
                Ok(())
            }
            // Equal text, numbers and empties need no work.
            _ => Ok(()),
        }
    }

    fn reconcile_children(&self, node: NodeId, new: &[VNode], old: &[VNode]) -> Result<(), RenderError> {
        for (index, (new, old)) in new.iter().zip(old).enumerate() {
            self.reconcile(node, Some(new), Some(old), index)?;
        }
        for (index, new) in new.iter().enumerate().skip(old.len()) {
            self.reconcile(node, Some(new), None, index)?;
        }
        // Highest index first, so lower indices stay valid.
        for index in (new.len()..old.len()).rev() {
            self.reconcile(node, None, old.get(index), index)?;
        }
        Ok(())
    }

    fn replace(&self, parent: NodeId, existing: NodeId, new: &VNode) -> Result<(), RenderError> {
        let node = self.mount(new)?;
        self.unmount_subtree(existing);
        self.document().replace_child(parent, node, existing);
        self.document().remove(existing);
        Ok(())
    }

    /// Build the document nodes for `vnode`, detached.
    fn mount(&self, vnode: &VNode) -> Result<NodeId, RenderError> {
        ensure_sufficient_stack(|| {
            let doc = self.document();
            match vnode {
                VNode::Element(el) => {
                    let node = doc.create_element(&el.tag);
                    self.patch_props(node, &Props::default(), &el.props);
                    self.mount_children(node, &el.children)?;
                    Ok(node)
                }
                VNode::Fragment(children) => {
                    let node = doc.create_fragment();
                    self.mount_children(node, children)?;
                    Ok(node)
                }
                VNode::Text(text) => Ok(doc.create_text(text)),
                VNode::Number(n) => Ok(doc.create_text(&format_number(*n))),
                VNode::Empty => Ok(doc.create_text("")),
                VNode::Component(component) => Ok(self.mount_component(component)),
            }
        })
    }

    fn mount_children(&self, node: NodeId, children: &[VNode]) -> Result<(), RenderError> {
        for child in children {
            let child = self.mount(child)?;
            self.document().append_child(node, child);
        }
        Ok(())
    }

    /// Create the instance and its render effect. The effect's first run
    /// renders the component into the host node.
    fn mount_component(&self, component: &ComponentNode) -> NodeId {
        let host = self.document().create_fragment();
        let instance = Rc::new(Instance::new(component, host));
        tracing::trace!(component = instance.name(), %host, "mount component");
        self.inner
            .instances
            .borrow_mut()
            .insert(host, Rc::clone(&instance));

        let renderer = Rc::downgrade(&self.inner);
        let weak = Rc::downgrade(&instance);
        let effect = self.runtime().create_effect(move || {
            if let (Some(inner), Some(instance)) = (renderer.upgrade(), weak.upgrade()) {
                Renderer { inner }.run_instance(&instance);
            }
        });
        *instance.effect.borrow_mut() = Some(Rc::new(effect));
        host
    }

    /// Render an instance, replaying re-render requests that arrived while
    /// it was rendering.
    fn run_instance(&self, instance: &Rc<Instance>) {
        if instance.unmounted.get() {
            return;
        }
        if instance.rendering.get() {
            instance.rerender_requested.set(true);
            return;
        }

        let mut passes = 0;
        loop {
            instance.rendering.set(true);
            instance.rerender_requested.set(false);
            let result = self.render_instance(instance);
            instance.rendering.set(false);

            if let Err(err) = result {
                self.fail(instance, err);
                return;
            }
            if !instance.rerender_requested.get() || instance.unmounted.get() {
                return;
            }
            passes += 1;
            if passes >= RERENDER_LIMIT {
                let err = RenderError::TooManyRerenders {
                    component: instance.name().to_string(),
                    limit: RERENDER_LIMIT,
                };
                self.fail(instance, err);
                return;
            }
            tracing::trace!(component = instance.name(), passes, "replaying re-render");
        }
    }

    /// One render pass: call the component, commit its output, then run the
    /// effect hooks whose dependencies changed.
    fn render_instance(&self, instance: &Rc<Instance>) -> Result<(), RenderError> {
        let props = instance.props.borrow().clone();
        let children = instance.children.borrow().clone();
        let (output, pending) = {
            let mut slots = instance.slots.borrow_mut();
            let mut hooks = Hooks::new(
                self.runtime(),
                instance.name(),
                &children,
                &mut slots,
                !instance.hooks_committed.get(),
            );
            let output = instance.component.call(&mut hooks, &props);
            let pending = hooks.finish();
            (output?, pending?)
        };
        instance.hooks_committed.set(true);

        if instance.unmounted.get() {
            // Removed by a parent while rendering.
            self.run_cleanups(instance);
            return Ok(());
        }

        let old = instance.rendered.borrow_mut().take();
        let result = self.reconcile(instance.host, Some(&output), old.as_ref(), 0);
        *instance.rendered.borrow_mut() = Some(output);
        result?;

        self.run_effect_hooks(instance, &pending);
        Ok(())
    }

    fn run_effect_hooks(&self, instance: &Instance, pending: &[usize]) {
        self.runtime().untrack(|| {
            for &index in pending {
                let taken = instance
                    .slots
                    .borrow_mut()
                    .get_mut(index)
                    .and_then(HookSlot::take_effect);
                let Some((effect, previous)) = taken else {
                    continue;
                };
                if let Some(cleanup) = previous {
                    cleanup();
                }
                let cleanup = effect();
                if instance.unmounted.get() {
                    if let Some(cleanup) = cleanup {
                        cleanup();
                    }
                } else if let Some(slot) = instance.slots.borrow_mut().get_mut(index) {
                    slot.store_cleanup(cleanup);
                }
            }
        });
    }

    /// Swap the instance's output for an empty placeholder and record the
    /// error.
    fn fail(&self, instance: &Instance, err: RenderError) {
        tracing::error!(component = instance.name(), error = %err, "component failed to render");
        if instance.unmounted.get() {
            // The host was freed along with its parent.
            self.inner.errors.borrow_mut().push(err);
            return;
        }
        let doc = self.document();
        for child in doc.children(instance.host) {
            self.unmount_subtree(child);
        }
        doc.clear_children(instance.host);
        doc.append_child(instance.host, doc.create_text(""));
        *instance.rendered.borrow_mut() = Some(VNode::Empty);
        self.inner.errors.borrow_mut().push(err);
    }

    fn clear(&self, container: NodeId) {
        for child in self.document().children(container) {
            self.unmount_subtree(child);
        }
        self.document().clear_children(container);
        self.inner.roots.borrow_mut().remove(&container);
    }

    /// Tear down every component instance hosted in the subtree at `node`.
    fn unmount_subtree(&self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let instance = self.inner.instances.borrow_mut().remove(&id);
            if let Some(instance) = instance {
                tracing::trace!(component = instance.name(), host = %id, "unmount component");
                instance.unmounted.set(true);
                if let Some(effect) = instance.effect.borrow_mut().take() {
                    effect.dispose();
                }
                self.run_cleanups(&instance);
            }
            stack.extend(self.document().children(id));
        }
    }

    fn run_cleanups(&self, instance: &Instance) {
        // Still borrowed when the instance is mid-render; that render runs
        // the cleanups itself once the component returns.
        let cleanups: Vec<Cleanup> = match instance.slots.try_borrow_mut() {
            Ok(mut slots) => slots.iter_mut().filter_map(HookSlot::take_cleanup).collect(),
            Err(_) => return,
        };
        self.runtime().untrack(|| {
            for cleanup in cleanups {
                cleanup();
            }
        });
    }

    /// Apply the attribute table to every prop that changed.
    fn patch_props(&self, node: NodeId, old: &Props, new: &Props) {
        for (key, value) in new {
            if key == "children" || old.get(key) == Some(value) {
                continue;
            }
            self.apply_prop(node, key, old.get(key), Some(value));
        }
        for (key, value) in old {
            if key != "children" && !new.contains_key(key) {
                self.apply_prop(node, key, Some(value), None);
            }
        }
    }

    fn apply_prop(&self, node: NodeId, key: &str, previous: Option<&PropValue>, value: Option<&PropValue>) {
        let doc = self.document();
        let event = key.strip_prefix("on").map(str::to_lowercase);
        let is_handler = |v: Option<&PropValue>| matches!(v, Some(PropValue::Handler(_)));
        let is_style = |v: Option<&PropValue>| key == "style" && matches!(v, Some(PropValue::Style(_)));

        if let Some(event) = &event {
            if is_handler(previous) && !is_handler(value) {
                doc.remove_listener(node, event);
            }
        }
        if let Some(PropValue::Style(old_style)) = previous.filter(|_| key == "style") {
            for property in old_style.keys() {
                let kept = matches!(value, Some(PropValue::Style(style)) if style.contains_key(property));
                if !kept {
                    doc.remove_style(node, property);
                }
            }
        }

        let attribute = if key == "className" { "class" } else { key };
        let Some(value) = value else {
            if !(event.is_some() && is_handler(previous)) && !is_style(previous) {
                doc.remove_attribute(node, attribute);
            }
            return;
        };

        match (&event, value) {
            (Some(event), PropValue::Handler(handler)) => {
                doc.set_listener(node, event, Rc::clone(handler));
            }
            (_, PropValue::Style(style)) if key == "style" => {
                for (property, text) in style {
                    doc.set_style(node, property, text);
                }
            }
            _ => match value.to_attribute() {
                Some(text) if !value.is_removal() => doc.set_attribute(node, attribute, &text),
                _ => doc.remove_attribute(node, attribute),
            },
        }
    }

    fn child(&self, parent: NodeId, index: usize) -> Result<NodeId, RenderError> {
        self.document()
            .child_at(parent, index)
            .ok_or(RenderError::NodeNotFound { parent, index })
    }

    /// Return this call's first error and keep the rest for
    /// [`Renderer::take_errors`].
    fn settle(&self, mark: usize, result: Result<(), RenderError>) -> Result<(), RenderError> {
        let mut errors = self.inner.errors.borrow_mut();
        let at = mark.min(errors.len());
        let mut own = errors.split_off(at);
        let first = match result {
            Err(err) => Some(err),
            Ok(()) if own.is_empty() => None,
            Ok(()) => Some(own.remove(0)),
        };
        errors.extend(own);
        first.map_or(Ok(()), Err)
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("instances", &self.instance_count())
            .field("roots", &self.inner.roots.borrow().len())
            .finish_non_exhaustive()
    }
}
