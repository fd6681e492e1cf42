use egui::{Context, PointerButton, Pos2, Rect};

use crate::stroke::Point;

/// Convert a screen position into percentage space of `container`.
///
/// Returns `None` when there is no position or the container has not been
/// measured yet. No clamping: a position outside the container maps outside
/// `[0, 100]`.
pub fn to_percent(position: Option<Pos2>, container: Rect) -> Option<Point> {
    let pos = position?;
    if !(container.width() > 0.0 && container.height() > 0.0) {
        return None;
    }
    let x = (pos.x - container.left()) / container.width() * 100.0;
    let y = (pos.y - container.top()) / container.height() * 100.0;
    (x.is_finite() && y.is_finite()).then_some(Point::new(x, y))
}

/// Represents the location where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// The position in screen coordinates, if the event carried one
    pub position: Option<Pos2>,
    /// Whether this position is within the canvas bounds
    pub is_in_canvas: bool,
}

impl InputLocation {
    pub fn at(position: Pos2, canvas: Rect) -> Self {
        Self {
            position: Some(position),
            is_in_canvas: canvas.contains(position),
        }
    }

    pub fn unknown() -> Self {
        Self {
            position: None,
            is_in_canvas: false,
        }
    }
}

/// Pointer activity on the drawing canvas. Touches arrive here as pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed or finger down
    PointerDown { location: InputLocation },
    /// Pointer moved; `primary_held` is true while dragging
    PointerMove {
        location: InputLocation,
        primary_held: bool,
    },
    /// Primary button released or finger lifted
    PointerUp { location: InputLocation },
    /// Pointer left the canvas
    PointerLeave { last_known_location: InputLocation },
}

impl InputEvent {
    pub fn location(&self) -> InputLocation {
        match self {
            InputEvent::PointerDown { location }
            | InputEvent::PointerUp { location }
            | InputEvent::PointerMove { location, .. } => *location,
            InputEvent::PointerLeave {
                last_known_location,
            } => *last_known_location,
        }
    }

    /// Helper to check if an input event occurred within the canvas
    pub fn is_in_canvas(&self) -> bool {
        self.location().is_in_canvas
    }
}

/// Handles converting raw egui input into canvas `InputEvent`s
#[derive(Debug)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Rect,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            last_pointer_pos: None,
            canvas_rect,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    fn make_location(&self, pos: Pos2) -> InputLocation {
        InputLocation::at(pos, self.canvas_rect)
    }

    /// Process raw egui input and generate canvas events.
    ///
    /// `pointer_on_canvas` is false while another layer (a window, a popup)
    /// covers the pointer; the canvas then behaves as if the pointer left it.
    pub fn process_input(&mut self, ctx: &Context, pointer_on_canvas: bool) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos();
            let inside = hover
                .filter(|pos| self.canvas_rect.contains(*pos))
                .filter(|_| pointer_on_canvas);

            if input.pointer.button_pressed(PointerButton::Primary) {
                if let Some(pos) = inside {
                    events.push(InputEvent::PointerDown {
                        location: self.make_location(pos),
                    });
                }
            }

            match (inside, self.last_pointer_pos) {
                (Some(pos), last) if Some(pos) != last => {
                    events.push(InputEvent::PointerMove {
                        location: self.make_location(pos),
                        primary_held: input.pointer.button_down(PointerButton::Primary),
                    });
                }
                (None, Some(last)) => {
                    events.push(InputEvent::PointerLeave {
                        last_known_location: self.make_location(last),
                    });
                }
                _ => {}
            }

            if input.pointer.button_released(PointerButton::Primary) {
                events.push(InputEvent::PointerUp {
                    location: hover
                        .map(|pos| self.make_location(pos))
                        .unwrap_or_else(InputLocation::unknown),
                });
            }

            self.last_pointer_pos = inside;
        });

        events
    }
}
