//! Test harness for a two-node canvas.
//!
//! Stands in for the host: owns the content model, creates one item view per
//! node, records drawing and hook invocations, and offers helpers for
//! simulating pointer input.

#![allow(dead_code)]

use super::{CallbackTracker, RecordingSurface, SurfaceLog, TestItemView, TestNode, ITEM_HEIGHT, ITEM_WIDTH};
use slint::platform::PointerEventButton;
use slint::{Model, ModelRc, VecModel};
use slint_link_canvas::{
    CanvasConfig, CanvasController, FlushReport, ItemView, Link, Modifiers, NodeId, NodeRef, Point,
    PointerEvent, Rect,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Canvas frame in page coordinates used by default.
pub const CANVAS_FRAME: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

/// Test harness with nodes A (id 1) and B (id 2) and a link `A.out -> B.in`.
pub struct CanvasHarness {
    pub ctrl: CanvasController,
    pub content: Rc<VecModel<NodeRef>>,
    pub nodes: RefCell<Vec<Rc<TestNode>>>,
    pub views: RefCell<Vec<Rc<TestItemView>>>,
    pub surface: Rc<RefCell<SurfaceLog>>,
    pub tracker: CallbackTracker,
}

impl CanvasHarness {
    /// Node A at (100, 100), node B at (400, 200), linked `A.out -> B.in`.
    pub fn new() -> Self {
        let a = TestNode::at(1, 100.0, 100.0);
        let b = TestNode::at(2, 400.0, 200.0);
        a.link_to("out", &b, "in");
        Self::with_nodes(vec![a, b])
    }

    pub fn with_nodes(nodes: Vec<Rc<TestNode>>) -> Self {
        Self::with_config(CanvasConfig::default().with_seed(7), nodes)
    }

    pub fn with_config(config: CanvasConfig, nodes: Vec<Rc<TestNode>>) -> Self {
        Self::with_config_and_frame(config, CANVAS_FRAME, nodes)
    }

    pub fn with_config_and_frame(config: CanvasConfig, frame: Rect, nodes: Vec<Rc<TestNode>>) -> Self {
        let ctrl = CanvasController::with_config(config);
        let tracker = CallbackTracker::new();
        let surface = Rc::new(RefCell::new(SurfaceLog::default()));

        ctrl.set_canvas_frame(frame);
        ctrl.set_surface(RecordingSurface { log: surface.clone() });

        ctrl.set_context_action({
            let tracker = tracker.clone();
            move |event, _ctrl| {
                tracker.context_actions.borrow_mut().push(event.position);
            }
        });
        ctrl.set_link_menu_handler({
            let tracker = tracker.clone();
            move |_event, selected, _ctrl| {
                tracker.link_menus.borrow_mut().push(selected.to_vec());
            }
        });

        let content = Rc::new(VecModel::from(Self::node_refs(&nodes)));
        ctrl.set_content(ModelRc::from(content.clone()));

        let harness = Self {
            ctrl,
            content,
            nodes: RefCell::new(nodes),
            views: RefCell::new(Vec::new()),
            surface,
            tracker,
        };
        harness.flush();
        harness.reload();
        harness
    }

    fn node_refs(nodes: &[Rc<TestNode>]) -> Vec<NodeRef> {
        nodes.iter().map(|n| n.clone() as NodeRef).collect()
    }

    pub fn flush(&self) -> FlushReport {
        self.ctrl.flush()
    }

    /// Recreate every item view from the current content, laid out from the
    /// stored positions, then flush.
    pub fn reload(&self) -> FlushReport {
        let views: Vec<Rc<TestItemView>> = self
            .nodes
            .borrow()
            .iter()
            .map(|node| {
                let layout = self.ctrl.layout_for_item(node.as_ref(), ITEM_WIDTH, ITEM_HEIGHT);
                TestItemView::new(node.clone(), layout)
            })
            .collect();
        self.ctrl
            .did_reload(views.iter().map(|v| v.clone() as Rc<dyn ItemView>));
        *self.views.borrow_mut() = views;
        self.flush()
    }

    /// Replace the content with `nodes` and reload the views.
    pub fn replace_nodes(&self, nodes: Vec<Rc<TestNode>>) -> FlushReport {
        self.content.set_vec(Self::node_refs(&nodes));
        *self.nodes.borrow_mut() = nodes;
        self.ctrl.content_did_change();
        self.reload()
    }

    /// Drop the node with `id` from the content and reload.
    pub fn remove_node(&self, id: NodeId) -> FlushReport {
        let remaining: Vec<Rc<TestNode>> =
            self.nodes.borrow().iter().filter(|n| n.id != id).cloned().collect();
        self.replace_nodes(remaining)
    }

    pub fn node(&self, id: NodeId) -> Rc<TestNode> {
        self.nodes
            .borrow()
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .unwrap_or_else(|| panic!("no node {}", id))
    }

    pub fn view(&self, id: NodeId) -> Rc<TestItemView> {
        self.views
            .borrow()
            .iter()
            .find(|v| v.node.id == id)
            .cloned()
            .unwrap_or_else(|| panic!("no view for node {}", id))
    }

    pub fn content_len(&self) -> usize {
        self.content.row_count()
    }

    pub fn links(&self) -> Vec<Link> {
        self.ctrl.links()
    }

    /// Midpoint of the link at `index`, in page coordinates.
    pub fn link_midpoint(&self, index: usize) -> Point {
        let links = self.ctrl.links();
        let (start, end) = links[index].endpoints().expect("link should be resolved");
        let origin = self.ctrl.canvas_frame().origin();
        Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0) + origin
    }

    /// The item view under a page position, if any.
    pub fn view_at(&self, page: Point) -> Option<Rc<dyn ItemView>> {
        let canvas = page - self.ctrl.canvas_frame().origin();
        self.views
            .borrow()
            .iter()
            .rev()
            .find(|v| v.contains(canvas))
            .map(|v| v.clone() as Rc<dyn ItemView>)
    }

    // === Pointer simulation ===

    pub fn mouse_down(&self, x: f32, y: f32) {
        self.mouse_down_with(x, y, PointerEventButton::Left, Modifiers::default());
    }

    pub fn mouse_down_with(&self, x: f32, y: f32, button: PointerEventButton, modifiers: Modifiers) {
        let position = Point::new(x, y);
        let event = PointerEvent::new(position, button).with_modifiers(modifiers);
        assert!(self.ctrl.mouse_down(&event, self.view_at(position)));
        self.flush();
    }

    pub fn mouse_move(&self, x: f32, y: f32) {
        let event = PointerEvent::new(Point::new(x, y), PointerEventButton::Left);
        assert!(self.ctrl.mouse_dragged(&event));
        self.flush();
    }

    pub fn mouse_up(&self, x: f32, y: f32) {
        self.mouse_up_with(x, y, PointerEventButton::Left, Modifiers::default());
    }

    pub fn mouse_up_with(&self, x: f32, y: f32, button: PointerEventButton, modifiers: Modifiers) {
        let event = PointerEvent::new(Point::new(x, y), button).with_modifiers(modifiers);
        assert!(self.ctrl.mouse_up(&event));
        self.flush();
    }

    /// Press and release at the same point.
    pub fn click(&self, x: f32, y: f32) {
        self.mouse_down(x, y);
        self.mouse_up(x, y);
    }

    pub fn meta_click(&self, x: f32, y: f32) {
        let meta = Modifiers { meta: true, ctrl: false };
        self.mouse_down_with(x, y, PointerEventButton::Left, meta);
        self.mouse_up_with(x, y, PointerEventButton::Left, meta);
    }

    pub fn right_click(&self, x: f32, y: f32) {
        self.mouse_down_with(x, y, PointerEventButton::Right, Modifiers::default());
        self.mouse_up_with(x, y, PointerEventButton::Right, Modifiers::default());
    }

    /// Press, move in one step and release.
    pub fn drag(&self, start_x: f32, start_y: f32, end_x: f32, end_y: f32) {
        self.mouse_down(start_x, start_y);
        self.mouse_move(end_x, end_y);
        self.mouse_up(end_x, end_y);
    }
}
