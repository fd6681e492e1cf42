use crate::command::Command;
use crate::geometry::StrokeFinisher;
use crate::stroke::{MutableStroke, Point, Stroke};

/// Gesture state of the freehand line tool
#[derive(Debug, Clone, Default)]
pub enum DrawStrokeState {
    #[default]
    Idle,
    Drawing { stroke: MutableStroke },
}

/// Captures a drag gesture and turns it into an `AddStroke` command on release.
///
/// A click without movement leaves a single point and is discarded, a plain
/// two-point drag becomes a straight line.
#[derive(Debug, Clone, Default)]
pub struct DrawStrokeTool {
    state: DrawStrokeState,
}

impl DrawStrokeTool {
    pub fn new() -> Self {
        Self {
            state: DrawStrokeState::Idle,
        }
    }

    pub fn name(&self) -> &'static str {
        "DrawStroke"
    }

    pub fn state(&self) -> &DrawStrokeState {
        &self.state
    }

    pub fn current_state_name(&self) -> &'static str {
        match self.state {
            DrawStrokeState::Idle => "Idle",
            DrawStrokeState::Drawing { .. } => "Drawing",
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawStrokeState::Drawing { .. })
    }

    /// Raw points of the gesture in progress, for preview
    pub fn preview_points(&self) -> &[Point] {
        match &self.state {
            DrawStrokeState::Drawing { stroke } => stroke.points(),
            DrawStrokeState::Idle => &[],
        }
    }

    /// Start a new gesture. A press while already drawing restarts it.
    pub fn on_pointer_down(&mut self, pos: Point) {
        if self.is_drawing() {
            log::debug!("Pointer down while drawing, restarting gesture");
        }
        self.state = DrawStrokeState::Drawing {
            stroke: MutableStroke::new(pos),
        };
    }

    pub fn on_pointer_move(&mut self, pos: Point) {
        if let DrawStrokeState::Drawing { stroke } = &mut self.state {
            stroke.add_point(pos);
        }
    }

    /// End the gesture. Returns a command when the gesture is long enough to commit.
    pub fn on_pointer_up(&mut self, finisher: &StrokeFinisher<'_>) -> Option<Command> {
        let DrawStrokeState::Drawing { stroke } = std::mem::take(&mut self.state) else {
            return None;
        };

        if stroke.len() < 2 {
            log::debug!("Discarding gesture with {} point(s)", stroke.len());
            return None;
        }

        let raw_len = stroke.len();
        let points = finisher.finish(&stroke.into_points());
        match Stroke::new_ref(points) {
            Ok(stroke) => {
                log::info!(
                    "Committing line: {} raw points -> {} vertices",
                    raw_len,
                    stroke.points().len()
                );
                Some(Command::AddStroke(stroke))
            }
            Err(err) => {
                log::warn!("Dropping gesture: {}", err);
                None
            }
        }
    }

    /// Drop any gesture in progress without committing it
    pub fn reset(&mut self) {
        self.state = DrawStrokeState::Idle;
    }
}
