use super::{CommandError, CommandResult};
use crate::document::Document;
use crate::stroke::StrokeRef;

/// Line list edits that can be undone and redone
#[derive(Debug, Clone)]
pub enum Command {
    /// Append a committed stroke to the line list
    AddStroke(StrokeRef),
    /// Remove every stroke; `removed` is filled in on execution so undo can restore it
    ClearLines { removed: Vec<StrokeRef> },
}

impl Command {
    pub fn clear_lines() -> Self {
        Command::ClearLines {
            removed: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::AddStroke(_) => "Add Line",
            Command::ClearLines { .. } => "Clear Lines",
        }
    }

    pub fn execute(&mut self, document: &mut Document) -> CommandResult {
        match self {
            Command::AddStroke(stroke) => {
                document.add_stroke(stroke.clone());
            }
            Command::ClearLines { removed } => {
                *removed = document.take_strokes();
            }
        }
        Ok(())
    }

    pub fn undo(&self, document: &mut Document) -> CommandResult {
        match self {
            Command::AddStroke(stroke) => match document.strokes().last() {
                Some(last) if std::sync::Arc::ptr_eq(last, stroke) => {
                    document.remove_last_stroke();
                    Ok(())
                }
                _ => Err(CommandError::InvalidState),
            },
            Command::ClearLines { removed } => {
                if !document.is_empty() {
                    return Err(CommandError::InvalidState);
                }
                document.restore_strokes(removed.clone());
                Ok(())
            }
        }
    }

    /// Clearing an already empty line list is not worth a history entry
    pub fn is_noop(&self) -> bool {
        matches!(self, Command::ClearLines { removed } if removed.is_empty())
    }
}
