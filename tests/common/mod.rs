//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use slint::SharedString;
use slint_link_canvas::{
    DrawingSurface, InvalidationCallback, InvalidationDelegates, ItemView, Link, LinkDescriptor,
    LinkIdentity, Node, NodeId, NodeRef, Point, Positionable, Rect, SubscriptionId, TerminalView,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Item view size used throughout the tests.
pub const ITEM_WIDTH: f32 = 150.0;
pub const ITEM_HEIGHT: f32 = 100.0;

/// A node that keeps its outgoing links and position in plain fields.
pub struct TestNode {
    pub id: NodeId,
    pub outputs: RefCell<Vec<LinkDescriptor>>,
    pub position: RefCell<Option<Point>>,
    pub positionable: bool,
    pub delegates: InvalidationDelegates,
    /// Every link this node was asked to delete
    pub deleted: RefCell<Vec<LinkIdentity>>,
}

impl TestNode {
    pub fn new(id: NodeId) -> Rc<Self> {
        Rc::new(Self {
            id,
            outputs: RefCell::new(Vec::new()),
            position: RefCell::new(None),
            positionable: true,
            delegates: InvalidationDelegates::new(),
            deleted: RefCell::new(Vec::new()),
        })
    }

    pub fn at(id: NodeId, x: f32, y: f32) -> Rc<Self> {
        let node = Self::new(id);
        *node.position.borrow_mut() = Some(Point::new(x, y));
        node
    }

    /// A node without the position capability.
    pub fn fixed(id: NodeId) -> Rc<Self> {
        Rc::new(Self {
            id,
            outputs: RefCell::new(Vec::new()),
            position: RefCell::new(None),
            positionable: false,
            delegates: InvalidationDelegates::new(),
            deleted: RefCell::new(Vec::new()),
        })
    }

    /// Declare a link from `terminal` on this node to `end_terminal` on `end`.
    pub fn link_to(&self, terminal: &str, end: &Rc<TestNode>, end_terminal: &str) {
        self.push_descriptor(LinkDescriptor::new(self.id, terminal, end.id, end_terminal));
    }

    pub fn push_descriptor(&self, descriptor: LinkDescriptor) {
        self.outputs.borrow_mut().push(descriptor);
        self.delegates.notify();
    }

    pub fn stored(&self) -> Option<Point> {
        *self.position.borrow()
    }

    pub fn subscribers(&self) -> usize {
        self.delegates.len()
    }
}

impl Node for TestNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn links_key(&self) -> Option<SharedString> {
        Some("outputs".into())
    }

    fn links(&self, key: &str) -> Vec<LinkDescriptor> {
        assert_eq!(key, "outputs");
        self.outputs.borrow().clone()
    }

    fn as_positionable(&self) -> Option<&dyn Positionable> {
        if self.positionable {
            Some(self)
        } else {
            None
        }
    }

    fn register_invalidation_delegate(&self, callback: InvalidationCallback) -> SubscriptionId {
        self.delegates.register(callback)
    }

    fn unregister_invalidation_delegate(&self, id: SubscriptionId) {
        self.delegates.unregister(id);
    }

    fn delete_link(&self, link: &Link) {
        let identity = link.identity();
        self.deleted.borrow_mut().push(identity.clone());
        self.outputs.borrow_mut().retain(|d| d.identity() != identity);
        self.delegates.notify();
    }
}

impl Positionable for TestNode {
    fn position_key(&self) -> Option<SharedString> {
        Some("location".into())
    }

    fn stored_position(&self, key: &str) -> Option<Point> {
        assert_eq!(key, "location");
        *self.position.borrow()
    }

    fn store_position(&self, key: &str, position: Point) {
        assert_eq!(key, "location");
        *self.position.borrow_mut() = Some(position);
    }
}

pub struct TestTerminal {
    pub frame: Rect,
}

impl TerminalView for TestTerminal {
    fn frame(&self) -> Rect {
        self.frame
    }
}

/// An item view with an `in` terminal centred on its left edge and an `out`
/// terminal centred on its right edge.
pub struct TestItemView {
    pub node: Rc<TestNode>,
    pub layout: Cell<Rect>,
    pub selected: Cell<bool>,
}

impl TestItemView {
    pub fn new(node: Rc<TestNode>, layout: Rect) -> Rc<Self> {
        Rc::new(Self {
            node,
            layout: Cell::new(layout),
            selected: Cell::new(false),
        })
    }

    pub fn contains(&self, point: Point) -> bool {
        let l = self.layout.get();
        point.x >= l.x && point.x < l.x + l.width && point.y >= l.y && point.y < l.y + l.height
    }
}

impl ItemView for TestItemView {
    fn content(&self) -> Option<NodeRef> {
        Some(self.node.clone() as NodeRef)
    }

    fn layout(&self) -> Rect {
        self.layout.get()
    }

    fn adjust_position(&self, position: Point) {
        self.layout.set(self.layout.get().with_origin(position));
    }

    fn terminal_view_for(&self, name: &str) -> Option<Rc<dyn TerminalView>> {
        let l = self.layout.get();
        let frame = match name {
            "in" => Rect::new(-5.0, l.height / 2.0 - 5.0, 10.0, 10.0),
            "out" => Rect::new(l.width - 5.0, l.height / 2.0 - 5.0, 10.0, 10.0),
            _ => return None,
        };
        Some(Rc::new(TestTerminal { frame }) as Rc<dyn TerminalView>)
    }

    fn is_selected(&self) -> bool {
        self.selected.get()
    }
}

/// What a [`RecordingSurface`] was asked to do.
#[derive(Default)]
pub struct SurfaceLog {
    pub clears: Vec<Rect>,
    /// Identities drawn, across all frames
    pub drawn: Vec<LinkIdentity>,
    /// Links drawn in the most recent frame, with their endpoints
    pub last_frame: Vec<(LinkIdentity, Point, Point)>,
}

impl SurfaceLog {
    pub fn frames(&self) -> usize {
        self.clears.len()
    }
}

pub struct RecordingSurface {
    pub log: Rc<RefCell<SurfaceLog>>,
}

impl DrawingSurface for RecordingSurface {
    fn clear_rect(&mut self, rect: Rect) {
        let mut log = self.log.borrow_mut();
        log.clears.push(rect);
        log.last_frame.clear();
    }

    fn draw_link(&mut self, link: &Link) {
        let mut log = self.log.borrow_mut();
        log.drawn.push(link.identity());
        if let Some((start, end)) = link.endpoints() {
            log.last_frame.push((link.identity(), start, end));
        }
    }
}

/// Tracks host hook invocations for testing.
#[derive(Default, Clone)]
pub struct CallbackTracker {
    /// Page positions of context-action invocations
    pub context_actions: Rc<RefCell<Vec<Point>>>,
    /// Selected identities passed to each link-menu invocation
    pub link_menus: Rc<RefCell<Vec<Vec<LinkIdentity>>>>,
}

impl CallbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all recorded callbacks.
    pub fn clear(&self) {
        self.context_actions.borrow_mut().clear();
        self.link_menus.borrow_mut().clear();
    }
}

pub fn identity(start: NodeId, start_terminal: &str, end: NodeId, end_terminal: &str) -> LinkIdentity {
    LinkIdentity::new(start, start_terminal, end, end_terminal)
}
