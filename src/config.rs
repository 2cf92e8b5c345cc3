use crate::geometry::Rect;
use crate::hit_test::LINK_SELECTION_FREEDOM;
use crate::position::DEFAULT_RANDOM_REGION;

/// Settings a [`CanvasController`](crate::CanvasController) is created with.
///
/// Most of these can also be changed later through the controller's setters.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    /// How far (canvas units) a click may land from a link and still hit it.
    pub link_selection_freedom: f32,
    /// Whether meta-click adds links to the selection.
    pub allow_multiple_selection: bool,
    /// Read-only canvases never delete links.
    pub editable: bool,
    /// Region random fallback positions are drawn from.
    pub random_region: Rect,
    /// Seed for the fallback position generator; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            link_selection_freedom: LINK_SELECTION_FREEDOM,
            allow_multiple_selection: false,
            editable: true,
            random_region: DEFAULT_RANDOM_REGION,
            rng_seed: None,
        }
    }
}

impl CanvasConfig {
    pub fn with_multiple_selection(mut self, allow: bool) -> Self {
        self.allow_multiple_selection = allow;
        self
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_link_selection_freedom(mut self, tolerance: f32) -> Self {
        self.link_selection_freedom = tolerance;
        self
    }
}
