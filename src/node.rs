//! Contracts for the externally owned nodes the canvas links together.
//!
//! Nodes are never created or destroyed by this crate. The canvas indexes them
//! by [`NodeId`], subscribes to their invalidation callbacks and reads their
//! link descriptors on every rebuild.

use crate::geometry::Point;
use crate::link::{Link, LinkDescriptor};
use slint::SharedString;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Stable identity of a node for the lifetime of the content set.
pub type NodeId = i32;

/// Shared handle to a node.
pub type NodeRef = Rc<dyn Node>;

/// Callback a node fires when data affecting its links or position changes.
pub type InvalidationCallback = Rc<dyn Fn()>;

/// Token returned by [`Node::register_invalidation_delegate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// A node on the canvas.
///
/// # Example
///
/// ```ignore
/// struct Task {
///     id: i32,
///     outputs: RefCell<Vec<LinkDescriptor>>,
///     delegates: InvalidationDelegates,
/// }
///
/// impl Node for Task {
///     fn id(&self) -> NodeId { self.id }
///     fn links_key(&self) -> Option<SharedString> { Some("outputs".into()) }
///     fn links(&self, _key: &str) -> Vec<LinkDescriptor> { self.outputs.borrow().clone() }
///     fn register_invalidation_delegate(&self, cb: InvalidationCallback) -> SubscriptionId {
///         self.delegates.register(cb)
///     }
///     fn unregister_invalidation_delegate(&self, id: SubscriptionId) {
///         self.delegates.unregister(id);
///     }
/// }
/// ```
pub trait Node {
    fn id(&self) -> NodeId;

    /// Name of the field holding this node's outgoing link descriptors.
    ///
    /// `None` means the node declares no links.
    fn links_key(&self) -> Option<SharedString> {
        None
    }

    /// Link descriptors stored under `key`.
    fn links(&self, _key: &str) -> Vec<LinkDescriptor> {
        Vec::new()
    }

    /// The positioned-item capability, if this node persists a position.
    fn as_positionable(&self) -> Option<&dyn Positionable> {
        None
    }

    fn register_invalidation_delegate(&self, callback: InvalidationCallback) -> SubscriptionId;

    fn unregister_invalidation_delegate(&self, id: SubscriptionId);

    /// Remove `link` from this node's descriptors.
    ///
    /// Only ever called on the link's start node.
    fn delete_link(&self, _link: &Link) {}
}

/// Capability of nodes that persist their canvas position.
///
/// The position lives in a field named by [`position_key`](Self::position_key);
/// the canvas never assumes where that is.
pub trait Positionable {
    fn position_key(&self) -> Option<SharedString>;
    fn stored_position(&self, key: &str) -> Option<Point>;
    fn store_position(&self, key: &str, position: Point);
}

/// A node held in the canvas index, with the subscription made when it was indexed.
#[derive(Clone)]
pub struct IndexedNode {
    pub node: NodeRef,
    pub subscription: SubscriptionId,
}

/// Node identity to the indexed node.
pub type NodeIndex = HashMap<NodeId, IndexedNode>;

/// Ready-made invalidation bookkeeping for [`Node`] implementors.
#[derive(Default)]
pub struct InvalidationDelegates {
    next_id: Cell<u64>,
    callbacks: RefCell<Vec<(SubscriptionId, InvalidationCallback)>>,
}

impl InvalidationDelegates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, callback: InvalidationCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.callbacks.borrow_mut().push((id, callback));
        id
    }

    pub fn unregister(&self, id: SubscriptionId) {
        self.callbacks.borrow_mut().retain(|(sid, _)| *sid != id);
    }

    /// Fire every registered callback.
    pub fn notify(&self) {
        // Snapshot first: a callback may register or unregister
        let callbacks: Vec<InvalidationCallback> =
            self.callbacks.borrow().iter().map(|(_, cb)| cb.clone()).collect();
        for cb in callbacks {
            cb();
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.borrow().is_empty()
    }
}
