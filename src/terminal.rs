//! Resolving link endpoints to canvas coordinates.
//!
//! Each endpoint of a link is a named terminal on a node's item view. A link is
//! *resolved* for the current cycle once both terminals were found; otherwise
//! it keeps its place in the list but is skipped for drawing and hit-testing.

use crate::geometry::{convert_frame_to_view, Point, Rect};
use crate::link::{Link, LinkLabel, LinkStyle};
use crate::node::{NodeId, NodeRef};
use std::collections::HashMap;
use std::rc::Rc;

/// A terminal sub-view of an item view.
pub trait TerminalView {
    /// Bounding frame in the owning item view's local space.
    fn frame(&self) -> Rect;

    /// Style defaults for links starting at this terminal.
    fn link_style(&self) -> Option<LinkStyle> {
        None
    }

    /// Label defaults for links starting at this terminal.
    fn label(&self) -> Option<LinkLabel> {
        None
    }
}

/// The on-screen view of a node, created and laid out by the host.
pub trait ItemView {
    /// The node this view displays.
    fn content(&self) -> Option<NodeRef>;

    /// Current frame in canvas space (`x` = left, `y` = top).
    fn layout(&self) -> Rect;

    /// Move the view; size is unchanged.
    fn adjust_position(&self, position: Point);

    fn terminal_view_for(&self, _name: &str) -> Option<Rc<dyn TerminalView>> {
        None
    }

    /// Convert a frame from this view's local space into canvas space.
    ///
    /// Views nesting terminals deeper than one level override this to walk
    /// their own chain.
    fn convert_frame_to_canvas(&self, local: Rect) -> Rect {
        convert_frame_to_view(local, self.layout().origin(), Point::default())
    }

    /// Whether the host currently has this item selected (for group drags).
    fn is_selected(&self) -> bool {
        false
    }
}

/// Node identity to the view displaying it.
pub type ViewIndex = HashMap<NodeId, Rc<dyn ItemView>>;

/// Build a view index from the views produced by a layout pass.
///
/// Views without content are ignored.
pub fn build_view_index<I>(views: I) -> ViewIndex
where
    I: IntoIterator<Item = Rc<dyn ItemView>>,
{
    views
        .into_iter()
        .filter_map(|view| Some((view.content()?.id(), view)))
        .collect()
}

/// Find the item view and named terminal view for `node`.
pub fn terminal_view_for(
    view_index: &ViewIndex,
    node: &NodeRef,
    terminal: &str,
) -> Option<(Rc<dyn ItemView>, Rc<dyn TerminalView>)> {
    let view = view_index.get(&node.id())?;
    let terminal_view = view.terminal_view_for(terminal)?;
    Some((view.clone(), terminal_view))
}

fn anchor(view: &dyn ItemView, terminal: &dyn TerminalView) -> Point {
    view.convert_frame_to_canvas(terminal.frame()).midpoint()
}

/// Compute and cache the anchor points of `link`.
///
/// On success the start terminal's style and label are layered under the
/// link's own values. An unresolved link has its cached points cleared.
pub fn resolve_endpoints(link: &mut Link, view_index: &ViewIndex) -> Option<(Point, Point)> {
    let start = terminal_view_for(view_index, &link.start_node, link.start_terminal.as_str());
    let end = terminal_view_for(view_index, &link.end_node, link.end_terminal.as_str());

    let (Some((start_view, start_terminal)), Some((end_view, end_terminal))) = (start, end) else {
        log::trace!("link {} unresolved this cycle", link.identity());
        link.start_pt = None;
        link.end_pt = None;
        return None;
    };

    let start_pt = anchor(start_view.as_ref(), start_terminal.as_ref());
    let end_pt = anchor(end_view.as_ref(), end_terminal.as_ref());
    link.start_pt = Some(start_pt);
    link.end_pt = Some(end_pt);

    if let Some(style) = start_terminal.link_style() {
        link.style = link.style.layered_over(&style);
    }
    if let Some(label) = start_terminal.label() {
        link.label = Some(match &link.label {
            Some(own) => own.layered_over(&label),
            None => label,
        });
    }

    Some((start_pt, end_pt))
}

/// Resolve every link in place. Returns how many resolved.
pub fn resolve_all(links: &mut [Link], view_index: &ViewIndex) -> usize {
    links
        .iter_mut()
        .filter_map(|link| resolve_endpoints(link, view_index))
        .count()
}
