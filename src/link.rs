//! Derived links and their identity.
//!
//! Links are not stored by the canvas. Nodes hold [`LinkDescriptor`]s and the
//! canvas turns them into [`Link`]s on every rebuild; a [`LinkIdentity`] is what
//! lets a rebuilt link be recognised as "the same" link as before.

use crate::geometry::{distance_squared_to_segment, Point, Rect};
use crate::node::{NodeId, NodeRef};
use slint::{Color, SharedString};
use std::fmt;

/// The (start node, start terminal, end node, end terminal) tuple.
///
/// Two descriptors with the same identity are one link, whichever node's
/// descriptor list they came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkIdentity {
    pub start_node: NodeId,
    pub start_terminal: SharedString,
    pub end_node: NodeId,
    pub end_terminal: SharedString,
}

impl LinkIdentity {
    pub fn new(
        start_node: NodeId,
        start_terminal: impl Into<SharedString>,
        end_node: NodeId,
        end_terminal: impl Into<SharedString>,
    ) -> Self {
        Self {
            start_node,
            start_terminal: start_terminal.into(),
            end_node,
            end_terminal: end_terminal.into(),
        }
    }
}

impl fmt::Display for LinkIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} -> {}:{}",
            self.start_node, self.start_terminal, self.end_node, self.end_terminal
        )
    }
}

/// Visual overrides for a link. Unset fields fall back to terminal defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkStyle {
    pub color: Option<Color>,
    pub width: Option<f32>,
    pub dashed: Option<bool>,
}

impl LinkStyle {
    /// `self` layered over `defaults`: set fields in `self` win.
    pub fn layered_over(&self, defaults: &LinkStyle) -> LinkStyle {
        LinkStyle {
            color: self.color.or(defaults.color),
            width: self.width.or(defaults.width),
            dashed: self.dashed.or(defaults.dashed),
        }
    }
}

/// Label drawn along a link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkLabel {
    pub text: Option<SharedString>,
    pub color: Option<Color>,
    pub offset: Option<f32>,
}

impl LinkLabel {
    pub fn text(text: impl Into<SharedString>) -> Self {
        Self { text: Some(text.into()), ..Default::default() }
    }

    pub fn layered_over(&self, defaults: &LinkLabel) -> LinkLabel {
        LinkLabel {
            text: self.text.clone().or_else(|| defaults.text.clone()),
            color: self.color.or(defaults.color),
            offset: self.offset.or(defaults.offset),
        }
    }
}

/// A link as declared by a node.
///
/// Endpoints are node ids. The canvas looks them up in the current content
/// on every rebuild, so a descriptor never owns a node.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkDescriptor {
    pub start_node: NodeId,
    pub start_terminal: SharedString,
    pub end_node: NodeId,
    pub end_terminal: SharedString,
    pub style: LinkStyle,
    pub label: Option<LinkLabel>,
    pub can_delete: bool,
}

impl LinkDescriptor {
    pub fn new(
        start_node: NodeId,
        start_terminal: impl Into<SharedString>,
        end_node: NodeId,
        end_terminal: impl Into<SharedString>,
    ) -> Self {
        Self {
            start_node,
            start_terminal: start_terminal.into(),
            end_node,
            end_terminal: end_terminal.into(),
            style: LinkStyle::default(),
            label: None,
            can_delete: true,
        }
    }

    pub fn with_style(mut self, style: LinkStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_label(mut self, label: LinkLabel) -> Self {
        self.label = Some(label);
        self
    }

    /// Mark the link as not removable by the canvas.
    pub fn read_only(mut self) -> Self {
        self.can_delete = false;
        self
    }

    pub fn identity(&self) -> LinkIdentity {
        LinkIdentity {
            start_node: self.start_node,
            start_terminal: self.start_terminal.clone(),
            end_node: self.end_node,
            end_terminal: self.end_terminal.clone(),
        }
    }
}

/// A link derived for the current rebuild cycle.
#[derive(Clone)]
pub struct Link {
    pub start_node: NodeRef,
    pub start_terminal: SharedString,
    pub end_node: NodeRef,
    pub end_terminal: SharedString,
    pub selected: bool,
    pub style: LinkStyle,
    pub label: Option<LinkLabel>,
    /// Cached anchor points, `None` while the link is unresolved.
    pub start_pt: Option<Point>,
    pub end_pt: Option<Point>,
    pub can_delete: bool,
}

impl Link {
    /// A plain link between two nodes.
    pub fn new(
        start_node: NodeRef,
        start_terminal: impl Into<SharedString>,
        end_node: NodeRef,
        end_terminal: impl Into<SharedString>,
    ) -> Self {
        let descriptor =
            LinkDescriptor::new(start_node.id(), start_terminal, end_node.id(), end_terminal);
        Self::from_descriptor(&descriptor, start_node, end_node)
    }

    /// Derive a link from `descriptor` with its endpoint ids already looked up.
    pub fn from_descriptor(descriptor: &LinkDescriptor, start_node: NodeRef, end_node: NodeRef) -> Self {
        Self {
            start_node,
            start_terminal: descriptor.start_terminal.clone(),
            end_node,
            end_terminal: descriptor.end_terminal.clone(),
            selected: false,
            style: descriptor.style.clone(),
            label: descriptor.label.clone(),
            start_pt: None,
            end_pt: None,
            can_delete: descriptor.can_delete,
        }
    }

    pub fn identity(&self) -> LinkIdentity {
        LinkIdentity {
            start_node: self.start_node.id(),
            start_terminal: self.start_terminal.clone(),
            end_node: self.end_node.id(),
            end_terminal: self.end_terminal.clone(),
        }
    }

    pub fn endpoints(&self) -> Option<(Point, Point)> {
        Some((self.start_pt?, self.end_pt?))
    }

    pub fn is_resolved(&self) -> bool {
        self.endpoints().is_some()
    }

    /// Squared distance from `point` to the link's segment, `None` if unresolved.
    pub fn distance_squared_from_line(&self, point: Point) -> Option<f32> {
        let (start, end) = self.endpoints()?;
        Some(distance_squared_to_segment(point, start, end))
    }

    /// Hand the link to `surface` if it is resolved this cycle.
    pub fn draw(&self, surface: &mut dyn DrawingSurface) {
        if self.is_resolved() {
            surface.draw_link(self);
        }
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("identity", &self.identity())
            .field("selected", &self.selected)
            .field("start_pt", &self.start_pt)
            .field("end_pt", &self.end_pt)
            .finish()
    }
}

/// The 2D surface links are drawn on. Rendering styles are up to the implementor.
pub trait DrawingSurface {
    fn clear_rect(&mut self, rect: Rect);
    fn draw_link(&mut self, link: &Link);
}
