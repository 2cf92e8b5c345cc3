//! Reading and writing node positions through their position key.

use crate::geometry::{Point, Rect};
use crate::node::Node;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Region random fallback positions are drawn from: x in [10, 600), y in [10, 400).
pub const DEFAULT_RANDOM_REGION: Rect = Rect::new(10.0, 10.0, 590.0, 390.0);

/// Read the persisted position of `node`.
///
/// Returns `None` when the node is not positionable, declares no position key,
/// or has nothing stored yet. Non-finite coordinates read as 0.
pub fn item_position(node: &dyn Node) -> Option<Point> {
    let positionable = node.as_positionable()?;
    let key = positionable.position_key()?;
    let pos = positionable.stored_position(key.as_str())?;
    Some(Point::new(finite_or_zero(pos.x), finite_or_zero(pos.y)))
}

/// Persist `position` on `node`. Returns `false` if the node cannot store it.
pub fn set_item_position(node: &dyn Node, position: Point) -> bool {
    let Some(positionable) = node.as_positionable() else {
        return false;
    };
    let Some(key) = positionable.position_key() else {
        return false;
    };
    positionable.store_position(key.as_str(), position);
    true
}

/// Whole-unit random point inside `region` (right and bottom edges excluded).
///
/// Fractional bounds are rounded inward. An axis with no whole unit inside
/// the region yields the region's start on that axis.
pub fn gen_random_position<R: Rng + ?Sized>(rng: &mut R, region: Rect) -> Point {
    Point::new(
        random_coordinate(rng, region.x, region.width),
        random_coordinate(rng, region.y, region.height),
    )
}

fn random_coordinate<R: Rng + ?Sized>(rng: &mut R, start: f32, extent: f32) -> f32 {
    let lo = start.ceil() as i32;
    let end = start + extent;
    // Exclusive end: a whole-unit end is itself out of range
    let hi = if end.fract() == 0.0 { end as i32 } else { end.floor() as i32 + 1 };
    if hi <= lo {
        return start;
    }
    rng.random_range(lo..hi) as f32
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Position persistence plus the random generator used when nothing is stored.
pub struct PositionStore {
    rng: StdRng,
    region: Rect,
}

impl Default for PositionStore {
    fn default() -> Self {
        Self::new(DEFAULT_RANDOM_REGION, None)
    }
}

impl PositionStore {
    /// `seed` makes the fallback positions reproducible.
    pub fn new(region: Rect, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng, region }
    }

    pub fn get(&self, node: &dyn Node) -> Option<Point> {
        item_position(node)
    }

    pub fn set(&self, node: &dyn Node, position: Point) -> bool {
        set_item_position(node, position)
    }

    pub fn random_position(&mut self) -> Point {
        gen_random_position(&mut self.rng, self.region)
    }

    /// The stored position, or a fresh random one that is persisted right away.
    pub fn position_or_random(&mut self, node: &dyn Node) -> Point {
        if let Some(pos) = self.get(node) {
            return pos;
        }
        let pos = self.random_position();
        log::debug!("node {} has no stored position, placing at ({}, {})", node.id(), pos.x, pos.y);
        self.set(node, pos);
        pos
    }

    /// Layout for a node's item view: stored `x` is the left edge, `y` the top edge.
    pub fn layout_for_item(&mut self, node: &dyn Node, width: f32, height: f32) -> Rect {
        let pos = self.position_or_random(node);
        Rect::new(pos.x, pos.y, width, height)
    }
}
