pub mod edge_snap;
pub mod placement;
pub mod simplify;

pub use edge_snap::{PixelSource, SnapParams};
pub use placement::{LightInstance, PlacementParams, place_along, place_lights};
pub use simplify::simplify;

use crate::stroke::Point;

/// How a finished gesture is cleaned up before it is committed
#[derive(Clone, Copy)]
pub struct StrokeFinisher<'a> {
    pub tolerance: f32,
    /// Present only when snapping is switched on and an image is loaded
    pub edge_snap: Option<(&'a dyn PixelSource, SnapParams)>,
}

impl StrokeFinisher<'_> {
    pub fn straighten_only(tolerance: f32) -> Self {
        Self {
            tolerance,
            edge_snap: None,
        }
    }

    /// Straighten the raw gesture, then optionally snap it to image edges
    pub fn finish(&self, raw: &[Point]) -> Vec<Point> {
        let simplified = simplify(raw, self.tolerance);
        match &self.edge_snap {
            Some((source, params)) => edge_snap::snap_or_passthrough(&simplified, *source, params),
            None => simplified,
        }
    }
}
