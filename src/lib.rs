//! # Slint Link Canvas
//!
//! The link, selection and drag engine behind a node-link diagram surface.
//!
//! Nodes are owned by the host and shown as draggable item views. Links are
//! never stored: every rebuild derives them from the nodes' link descriptors,
//! drops duplicates, resolves their endpoints to terminal views and carries the
//! link selection over by identity.
//!
//! ## Features
//!
//! - **Derived links** - Built from node data, deduplicated by [`LinkIdentity`]
//! - **Stable selection** - Selection survives rebuilds and content replacement
//! - **Line hit-testing** - Clicks within a tolerance of a link segment select it
//! - **Clamped dragging** - Single and group drags stay inside the canvas
//! - **Coalesced updates** - Any number of change requests cost one rebuild per flush
//!
//! ## Core Types
//!
//! - [`CanvasController`] - Owns the canvas state and handles pointer and key input
//! - [`Node`] / [`Positionable`] - What the host's nodes provide
//! - [`ItemView`] / [`TerminalView`] - What the host's views provide
//! - [`DrawingSurface`] - Where links are drawn
//!
//! ## Rust Helpers
//!
//! The building blocks are usable on their own:
//!
//! - [`collect_links`] - Deduplicated link list for a set of nodes
//! - [`resolve_endpoints`] - Anchor a link to its terminal views
//! - [`find_link_at`] - Hit-test links at canvas coordinates
//! - [`SelectionModel`] - Identity-based link selection
//! - [`DragController`] - Drag gesture state machine
//! - [`PositionStore`] - Persisted positions with a random fallback

pub mod geometry;
pub mod node;
pub mod link;
pub mod position;
pub mod dedup;
pub mod terminal;
pub mod selection;
pub mod drag;
pub mod scheduler;
pub mod delete;
pub mod config;
pub mod controller;

pub use geometry::{
    convert_frame_to_view, convert_point_to_view, distance_squared_to_segment, Point, Rect,
};
pub use node::{
    IndexedNode, InvalidationCallback, InvalidationDelegates, Node, NodeId, NodeIndex, NodeRef,
    Positionable, SubscriptionId,
};
pub use link::{DrawingSurface, Link, LinkDescriptor, LinkIdentity, LinkLabel, LinkStyle};
pub use position::{
    gen_random_position, item_position, set_item_position, PositionStore, DEFAULT_RANDOM_REGION,
};
pub use dedup::{collect_links, gather_descriptors};
pub use terminal::{
    build_view_index, resolve_all, resolve_endpoints, terminal_view_for, ItemView, TerminalView,
    ViewIndex,
};
pub use selection::SelectionModel;
pub use hit_test::{
    find_link_at, select_link_at, LinkGeometry, SimpleLinkGeometry, LINK_SELECTION_FREEDOM,
};
pub use drag::{clamp_position, DragCapture, DragController, DragState};
pub use scheduler::{PendingWork, Scheduler};
pub use delete::{delete_links, DeleteOutcome, SkipReason};
pub use config::CanvasConfig;
pub use controller::{
    CanvasController, ContextAction, FlushReport, LinkMenuHandler, Modifiers, PointerEvent,
};
