//! High-level controller for a link canvas.
//!
//! The [`CanvasController`] owns everything the canvas derives from the host's
//! nodes: the node and view indexes, the link list, the link selection and the
//! drag gesture. The host forwards content changes, item-view reloads and
//! pointer events, then calls [`flush`](CanvasController::flush) once per
//! event-loop turn.
//!
//! # Example
//!
//! ```ignore
//! use slint_link_canvas::{CanvasController, PointerEvent};
//!
//! let ctrl = CanvasController::new();
//! ctrl.set_surface(MySurface::new(window.as_weak()));
//! ctrl.set_content(ModelRc::new(VecModel::from(nodes)));
//!
//! // After the host has laid out one item view per node
//! ctrl.did_reload(item_views);
//!
//! window.on_pointer_pressed({
//!     let ctrl = ctrl.clone();
//!     move |x, y| {
//!         let view = hit_item_view(x, y);
//!         ctrl.mouse_down(&PointerEvent::new((x, y).into(), PointerEventButton::Left), view);
//!         ctrl.flush();
//!     }
//! });
//! ```

use crate::config::CanvasConfig;
use crate::dedup::collect_links;
use crate::delete::{delete_links, DeleteOutcome};
use crate::drag::DragController;
use crate::geometry::{Point, Rect};
use crate::hit_test::select_link_at;
use crate::link::{DrawingSurface, Link, LinkIdentity};
use crate::node::{IndexedNode, Node, NodeId, NodeIndex, NodeRef};
use crate::position::PositionStore;
use crate::scheduler::Scheduler;
use crate::selection::SelectionModel;
use crate::terminal::{build_view_index, resolve_all, ItemView, ViewIndex};
use slint::platform::PointerEventButton;
use slint::{Model, ModelRc};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub meta: bool,
    pub ctrl: bool,
}

/// A pointer event in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub button: PointerEventButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(position: Point, button: PointerEventButton) -> Self {
        Self {
            position,
            button,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Right button, or ctrl with the left button.
    pub fn is_secondary(&self) -> bool {
        self.button == PointerEventButton::Right
            || (self.modifiers.ctrl && self.button == PointerEventButton::Left)
    }
}

/// Called on a secondary release anywhere on the canvas.
pub type ContextAction = Rc<dyn Fn(&PointerEvent, &CanvasController)>;

/// Called on a secondary press with the selected links, so the host can offer
/// to delete them (see [`CanvasController::delete_link_selection`]).
pub type LinkMenuHandler = Rc<dyn Fn(&PointerEvent, &[LinkIdentity], &CanvasController)>;

/// What a [`CanvasController::flush`] call actually did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    pub content_setup: bool,
    pub rebuilt: bool,
    pub redrawn: bool,
}

/// Controller that manages the link canvas and handles its input.
///
/// Clone this controller to share it across callbacks.
#[derive(Clone)]
pub struct CanvasController {
    content: Rc<RefCell<Option<ModelRc<NodeRef>>>>,
    node_order: Rc<RefCell<Vec<NodeRef>>>,
    nodes: Rc<RefCell<NodeIndex>>,
    views: Rc<RefCell<ViewIndex>>,
    links: Rc<RefCell<Vec<Link>>>,
    selection: Rc<RefCell<SelectionModel>>,
    drag: Rc<RefCell<DragController>>,
    positions: Rc<RefCell<PositionStore>>,
    scheduler: Rc<Scheduler>,
    surface: Rc<RefCell<Option<Box<dyn DrawingSurface>>>>,
    canvas_frame: Rc<Cell<Rect>>,
    link_selection_freedom: Rc<Cell<f32>>,
    editable: Rc<Cell<bool>>,
    is_empty: Rc<Cell<bool>>,
    context_action: Rc<RefCell<Option<ContextAction>>>,
    link_menu_handler: Rc<RefCell<Option<LinkMenuHandler>>>,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasController {
    /// Create a new controller with default settings.
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    pub fn with_config(config: CanvasConfig) -> Self {
        Self {
            content: Rc::new(RefCell::new(None)),
            node_order: Rc::new(RefCell::new(Vec::new())),
            nodes: Rc::new(RefCell::new(NodeIndex::new())),
            views: Rc::new(RefCell::new(ViewIndex::new())),
            links: Rc::new(RefCell::new(Vec::new())),
            selection: Rc::new(RefCell::new(SelectionModel::new(config.allow_multiple_selection))),
            drag: Rc::new(RefCell::new(DragController::new())),
            positions: Rc::new(RefCell::new(PositionStore::new(config.random_region, config.rng_seed))),
            scheduler: Scheduler::new(),
            surface: Rc::new(RefCell::new(None)),
            canvas_frame: Rc::new(Cell::new(Rect::default())),
            link_selection_freedom: Rc::new(Cell::new(config.link_selection_freedom)),
            editable: Rc::new(Cell::new(config.editable)),
            is_empty: Rc::new(Cell::new(true)),
            context_action: Rc::new(RefCell::new(None)),
            link_menu_handler: Rc::new(RefCell::new(None)),
        }
    }

    // === Configuration ===

    pub fn set_surface(&self, surface: impl DrawingSurface + 'static) {
        *self.surface.borrow_mut() = Some(Box::new(surface));
        self.scheduler.request_redraw();
    }

    /// Set the canvas frame in page coordinates.
    ///
    /// Its origin maps page positions into canvas space, its size bounds drags.
    pub fn set_canvas_frame(&self, frame: Rect) {
        self.canvas_frame.set(frame);
        self.scheduler.request_redraw();
    }

    pub fn canvas_frame(&self) -> Rect {
        self.canvas_frame.get()
    }

    pub fn set_editable(&self, editable: bool) {
        self.editable.set(editable);
    }

    pub fn is_editable(&self) -> bool {
        self.editable.get()
    }

    pub fn set_link_selection_freedom(&self, tolerance: f32) {
        self.link_selection_freedom.set(tolerance);
    }

    pub fn set_allow_multiple_selection(&self, allow: bool) {
        let mut links = self.links.borrow_mut();
        self.selection.borrow_mut().set_allow_multiple(allow, &mut links);
        self.scheduler.request_redraw();
    }

    pub fn set_context_action(&self, action: impl Fn(&PointerEvent, &CanvasController) + 'static) {
        *self.context_action.borrow_mut() = Some(Rc::new(action));
    }

    pub fn set_link_menu_handler(
        &self,
        handler: impl Fn(&PointerEvent, &[LinkIdentity], &CanvasController) + 'static,
    ) {
        *self.link_menu_handler.borrow_mut() = Some(Rc::new(handler));
    }

    // === Content ===

    /// Replace the node collection.
    pub fn set_content(&self, content: ModelRc<NodeRef>) {
        *self.content.borrow_mut() = Some(content);
        self.content_did_change();
    }

    /// The node collection changed membership.
    pub fn content_did_change(&self) {
        self.scheduler.request_content();
    }

    /// Some node's link descriptors changed.
    pub fn links_did_change(&self) {
        self.scheduler.request_links();
    }

    /// The host produced a fresh set of item views.
    pub fn did_reload<I>(&self, views: I)
    where
        I: IntoIterator<Item = Rc<dyn ItemView>>,
    {
        let index = build_view_index(views);
        *self.views.borrow_mut() = index;
        self.scheduler.request_links();
    }

    /// Layout for `node`'s item view: stored `x` is the left edge, `y` the top.
    ///
    /// A node with no stored position gets a random one, persisted right away.
    pub fn layout_for_item(&self, node: &dyn Node, width: f32, height: f32) -> Rect {
        self.positions.borrow_mut().layout_for_item(node, width, height)
    }

    /// Run whatever was requested since the last flush, each pass at most once.
    pub fn flush(&self) -> FlushReport {
        let mut report = FlushReport::default();
        if self.scheduler.take_content() {
            self.setup_nodes();
            report.content_setup = true;
        }
        if self.scheduler.take_links() {
            self.rebuild_links();
            report.rebuilt = true;
        }
        if self.scheduler.take_redraw() {
            report.redrawn = self.redraw();
        }
        report
    }

    /// Whether anything is waiting for the next flush.
    pub fn has_pending_work(&self) -> bool {
        !self.scheduler.is_idle()
    }

    fn content_nodes(&self) -> Vec<NodeRef> {
        let content = self.content.borrow();
        let Some(model) = content.as_ref() else {
            return Vec::new();
        };
        (0..model.row_count()).filter_map(|row| model.row_data(row)).collect()
    }

    fn setup_nodes(&self) {
        let nodes = self.content_nodes();
        let mut previous = self.nodes.borrow().clone();
        let mut index = NodeIndex::with_capacity(nodes.len());
        let mut order = Vec::with_capacity(nodes.len());

        for node in nodes {
            let id = node.id();
            if index.contains_key(&id) {
                log::debug!("node {} appears twice in content, keeping the first", id);
                continue;
            }
            let entry = match previous.remove(&id) {
                Some(kept) if Rc::ptr_eq(&kept.node, &node) => kept,
                Some(replaced) => {
                    replaced.node.unregister_invalidation_delegate(replaced.subscription);
                    self.subscribe(&node)
                }
                None => self.subscribe(&node),
            };
            order.push(node);
            index.insert(id, entry);
        }

        for (_, departed) in previous {
            departed.node.unregister_invalidation_delegate(departed.subscription);
        }

        log::debug!("content setup: {} node(s)", index.len());
        self.is_empty.set(index.is_empty());
        *self.node_order.borrow_mut() = order;
        *self.nodes.borrow_mut() = index;
    }

    fn subscribe(&self, node: &NodeRef) -> IndexedNode {
        let subscription = node.register_invalidation_delegate(self.scheduler.links_invalidator());
        IndexedNode {
            node: node.clone(),
            subscription,
        }
    }

    fn rebuild_links(&self) {
        let order = self.node_order.borrow().clone();
        // Endpoints resolve against the indexed content only
        let mut links = collect_links(order.iter());
        let resolved = resolve_all(&mut links, &self.views.borrow());
        self.selection.borrow_mut().reconcile_after_rebuild(&mut links);

        log::debug!("rebuilt {} link(s), {} resolved", links.len(), resolved);
        *self.links.borrow_mut() = links;
    }

    fn redraw(&self) -> bool {
        // Item views may have moved since the last rebuild
        resolve_all(&mut self.links.borrow_mut(), &self.views.borrow());

        let mut surface = self.surface.borrow_mut();
        let Some(surface) = surface.as_mut() else {
            return false;
        };
        let frame = self.canvas_frame.get();
        surface.clear_rect(Rect::new(0.0, 0.0, frame.width, frame.height));
        for link in self.links.borrow().iter() {
            link.draw(surface.as_mut());
        }
        true
    }

    /// Unsubscribe from every indexed node and forget the content.
    pub fn detach(&self) {
        self.drag.borrow_mut().cancel();
        let nodes = std::mem::take(&mut *self.nodes.borrow_mut());
        for (_, entry) in nodes {
            entry.node.unregister_invalidation_delegate(entry.subscription);
        }
        *self.content.borrow_mut() = None;
        self.node_order.borrow_mut().clear();
        self.views.borrow_mut().clear();
        self.links.borrow_mut().clear();
        self.selection.borrow_mut().clear(&mut []);
        self.is_empty.set(true);
    }

    // === Pointer input ===

    fn to_canvas(&self, page: Point) -> Point {
        page - self.canvas_frame.get().origin()
    }

    /// Handle a pointer press. `item_view` is the view under the pointer, if any.
    ///
    /// Always returns `true`: the canvas absorbs every press.
    pub fn mouse_down(&self, event: &PointerEvent, item_view: Option<Rc<dyn ItemView>>) -> bool {
        self.drag.borrow_mut().cancel();

        if event.is_secondary() {
            self.show_link_menu(event);
            return true;
        }

        let append = event.modifiers.meta && self.selection.borrow().allows_multiple();
        let point = self.to_canvas(event.position);
        {
            let mut links = self.links.borrow_mut();
            let mut selection = self.selection.borrow_mut();
            select_link_at(point, append, &mut links, &mut selection, self.link_selection_freedom.get());
        }
        self.scheduler.request_redraw();

        if self.editable.get() {
            let selected_views: Vec<Rc<dyn ItemView>> =
                self.views.borrow().values().filter(|view| view.is_selected()).cloned().collect();
            self.drag
                .borrow_mut()
                .press(item_view, selected_views, event.position, self.canvas_frame.get());
        }
        true
    }

    fn show_link_menu(&self, event: &PointerEvent) {
        if !self.editable.get() {
            return;
        }
        let selected = self.selection.borrow().selected();
        if selected.is_empty() {
            return;
        }
        let host_has_selection = self.views.borrow().values().any(|view| view.is_selected());
        if host_has_selection {
            return;
        }
        let handler = self.link_menu_handler.borrow().clone();
        if let Some(handler) = handler {
            handler(event, &selected[..], self);
        }
    }

    /// Handle pointer motion with a button held.
    pub fn mouse_dragged(&self, event: &PointerEvent) -> bool {
        if self.drag.borrow_mut().drag_to(event.position) {
            self.scheduler.request_redraw();
        }
        true
    }

    /// Handle a pointer release: commit any drag, then fire the context action
    /// on a secondary release.
    pub fn mouse_up(&self, event: &PointerEvent) -> bool {
        let persisted = self.drag.borrow_mut().release(&self.positions.borrow());
        if !persisted.is_empty() {
            self.scheduler.request_redraw();
        }

        if event.is_secondary() {
            let action = self.context_action.borrow().clone();
            if let Some(action) = action {
                action(event, self);
            }
        }
        true
    }

    // === Keyboard / deletion ===

    /// Delete key handler. Deletes the link selection when editable.
    ///
    /// Always returns `true` so the key is reported as handled.
    pub fn delete_selection(&self) -> bool {
        if self.editable.get() {
            self.delete_link_selection();
        }
        true
    }

    /// Ask the start node of each selected link to delete it.
    pub fn delete_link_selection(&self) -> Vec<DeleteOutcome> {
        // Work on copies so node callbacks may read the controller
        let mut links = self.links.borrow().clone();
        let mut selection = self.selection.borrow().clone();
        let nodes = self.nodes.borrow().clone();

        let outcomes = delete_links(&mut links, &mut selection, &nodes, self.editable.get());

        {
            let mut live = self.links.borrow_mut();
            selection.clear(&mut live);
        }
        *self.selection.borrow_mut() = selection;
        self.scheduler.request_links();
        outcomes
    }

    // === Selection ===

    /// Select the given links, applied at the next rebuild.
    pub fn select_objects<I>(&self, identities: I)
    where
        I: IntoIterator<Item = LinkIdentity>,
    {
        self.selection.borrow_mut().select_objects(identities);
        self.scheduler.request_links();
    }

    // === Accessors ===

    /// A copy of the current link list.
    pub fn links(&self) -> Vec<Link> {
        self.links.borrow().clone()
    }

    pub fn link_count(&self) -> usize {
        self.links.borrow().len()
    }

    /// The selected link identities, in selection order.
    pub fn selection(&self) -> Rc<[LinkIdentity]> {
        self.selection.borrow().selected()
    }

    pub fn most_recent_link(&self) -> Option<LinkIdentity> {
        self.selection.borrow().most_recent().cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.is_empty.get()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.borrow().is_dragging()
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef> {
        self.nodes.borrow().get(&id).map(|entry| entry.node.clone())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn item_view_for(&self, id: NodeId) -> Option<Rc<dyn ItemView>> {
        self.views.borrow().get(&id).cloned()
    }
}
