//! Dragging item views around the canvas.
//!
//! A gesture goes `Idle -> Dragging -> Idle`. Everything the gesture needs is
//! captured on press, so a link rebuild in the middle of a drag does not
//! disturb it.

use crate::geometry::{Point, Rect};
use crate::position::PositionStore;
use crate::terminal::ItemView;
use std::rc::Rc;

/// Clamp `proposed` so an item of `item_size` stays inside a canvas of
/// `canvas_size`: `x` in `[0, canvas_w - item_w]`, `y` in `[0, canvas_h - item_h]`.
pub fn clamp_position(proposed: Point, item_size: Rect, canvas_size: Rect) -> Point {
    Point::new(
        clamp_axis(proposed.x, item_size.width, canvas_size.width),
        clamp_axis(proposed.y, item_size.height, canvas_size.height),
    )
}

fn clamp_axis(value: f32, item_extent: f32, canvas_extent: f32) -> f32 {
    if value < 0.0 {
        0.0
    } else if value + item_extent > canvas_extent {
        canvas_extent - item_extent
    } else {
        value
    }
}

struct CapturedView {
    view: Rc<dyn ItemView>,
    start: Rect,
}

/// Per-gesture state captured on press.
pub struct DragCapture {
    press_point: Point,
    item: Rc<dyn ItemView>,
    views: Vec<CapturedView>,
    canvas_frame: Rect,
    did_move: bool,
}

impl DragCapture {
    pub fn press_point(&self) -> Point {
        self.press_point
    }

    /// The view the pointer went down on.
    pub fn item(&self) -> &Rc<dyn ItemView> {
        &self.item
    }

    pub fn canvas_frame(&self) -> Rect {
        self.canvas_frame
    }

    pub fn did_move(&self) -> bool {
        self.did_move
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }
}

#[derive(Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragCapture),
}

#[derive(Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn capture(&self) -> Option<&DragCapture> {
        match &self.state {
            DragState::Dragging(capture) => Some(capture),
            DragState::Idle => None,
        }
    }

    /// Start a gesture on `item_view`.
    ///
    /// `selected_views` are moved along with it; the pressed view is always
    /// part of the gesture. Without an item view the controller stays idle.
    /// Returns whether a drag was started.
    pub fn press(
        &mut self,
        item_view: Option<Rc<dyn ItemView>>,
        selected_views: Vec<Rc<dyn ItemView>>,
        press_point: Point,
        canvas_frame: Rect,
    ) -> bool {
        let Some(item) = item_view else {
            self.state = DragState::Idle;
            return false;
        };

        let mut views: Vec<CapturedView> = Vec::with_capacity(selected_views.len() + 1);
        for view in std::iter::once(item.clone()).chain(selected_views) {
            if views.iter().any(|c| Rc::ptr_eq(&c.view, &view)) {
                continue;
            }
            let start = view.layout();
            views.push(CapturedView { view, start });
        }

        self.state = DragState::Dragging(DragCapture {
            press_point,
            item,
            views,
            canvas_frame,
            did_move: false,
        });
        true
    }

    /// Drop the current gesture without persisting anything.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Move every captured view by `point - press_point`, clamped to the canvas.
    ///
    /// Returns `false` when no gesture is active.
    pub fn drag_to(&mut self, point: Point) -> bool {
        let DragState::Dragging(capture) = &mut self.state else {
            return false;
        };
        capture.did_move = true;

        let delta = point - capture.press_point;
        for captured in &capture.views {
            let proposed = captured.start.origin() + delta;
            // Each view is clamped with its own size
            let clamped = clamp_position(proposed, captured.start, capture.canvas_frame);
            captured.view.adjust_position(clamped);
        }
        true
    }

    /// End the gesture.
    ///
    /// If anything moved, every captured view whose node is positionable has
    /// its final position persisted through `positions`. Returns those views.
    /// A release without a press does nothing.
    pub fn release(&mut self, positions: &PositionStore) -> Vec<Rc<dyn ItemView>> {
        let DragState::Dragging(capture) = std::mem::take(&mut self.state) else {
            return Vec::new();
        };
        if !capture.did_move {
            return Vec::new();
        }

        let mut persisted = Vec::new();
        for captured in capture.views {
            let Some(node) = captured.view.content() else {
                continue;
            };
            let layout = captured.view.layout();
            if positions.set(node.as_ref(), layout.origin()) {
                persisted.push(captured.view);
            }
        }
        log::debug!("drag committed {} position(s)", persisted.len());
        persisted
    }
}
