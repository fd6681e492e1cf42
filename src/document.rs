use crate::stroke::StrokeRef;

/// The line list: committed strokes in the order they were drawn
#[derive(Debug, Clone, Default)]
pub struct Document {
    strokes: Vec<StrokeRef>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            strokes: Vec::new(),
        }
    }

    pub fn add_stroke(&mut self, stroke: StrokeRef) {
        self.strokes.push(stroke);
    }

    pub fn strokes(&self) -> &[StrokeRef] {
        &self.strokes
    }

    pub fn remove_last_stroke(&mut self) -> Option<StrokeRef> {
        self.strokes.pop()
    }

    /// Remove every stroke, handing back what was there
    pub fn take_strokes(&mut self) -> Vec<StrokeRef> {
        std::mem::take(&mut self.strokes)
    }

    pub fn restore_strokes(&mut self, strokes: Vec<StrokeRef>) {
        self.strokes = strokes;
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }
}
