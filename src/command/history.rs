use super::{Command, CommandError, CommandResult};
use crate::document::Document;

/// Manages the history of executed commands for undo/redo functionality
#[derive(Debug, Default)]
pub struct CommandHistory {
    /// Stack of commands that can be undone
    undo_stack: Vec<Command>,
    /// Stack of commands that can be redone
    redo_stack: Vec<Command>,
}

impl CommandHistory {
    /// Creates a new empty command history
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Execute a command and add it to the history if successful
    pub fn execute(&mut self, mut command: Command, document: &mut Document) -> CommandResult {
        command.execute(document)?;
        log::debug!("Executed command: {}", command.name());

        if !command.is_noop() {
            self.undo_stack.push(command);
            self.redo_stack.clear(); // Clear redo stack when new command is executed
        }

        Ok(())
    }

    /// Undo the last executed command
    pub fn undo(&mut self, document: &mut Document) -> CommandResult {
        let command = self.undo_stack.pop().ok_or(CommandError::NothingToUndo)?;
        if let Err(err) = command.undo(document) {
            self.undo_stack.push(command);
            return Err(err);
        }
        log::debug!("Undid command: {}", command.name());
        self.redo_stack.push(command);
        Ok(())
    }

    /// Redo the last undone command
    pub fn redo(&mut self, document: &mut Document) -> CommandResult {
        let mut command = self.redo_stack.pop().ok_or(CommandError::NothingToRedo)?;
        command.execute(document)?;
        log::debug!("Redid command: {}", command.name());
        self.undo_stack.push(command);
        Ok(())
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_stack(&self) -> &[Command] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[Command] {
        &self.redo_stack
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{Point, Stroke};

    fn line(x: f32) -> crate::stroke::StrokeRef {
        Stroke::new_ref(vec![Point::new(x, 10.0), Point::new(x, 90.0)]).unwrap()
    }

    #[test]
    fn test_add_undo_redo() {
        let mut document = Document::new();
        let mut history = CommandHistory::new();

        history.execute(Command::AddStroke(line(10.0)), &mut document).unwrap();
        history.execute(Command::AddStroke(line(20.0)), &mut document).unwrap();
        assert_eq!(document.len(), 2);

        history.undo(&mut document).unwrap();
        assert_eq!(document.len(), 1);
        assert!(history.can_redo());

        history.redo(&mut document).unwrap();
        assert_eq!(document.len(), 2);
        assert_eq!(document.strokes()[1].first(), Point::new(20.0, 10.0));
    }

    #[test]
    fn test_undo_clear_restores_lines_in_order() {
        let mut document = Document::new();
        let mut history = CommandHistory::new();
        history.execute(Command::AddStroke(line(10.0)), &mut document).unwrap();
        history.execute(Command::AddStroke(line(20.0)), &mut document).unwrap();

        history.execute(Command::clear_lines(), &mut document).unwrap();
        assert!(document.is_empty());

        history.undo(&mut document).unwrap();
        assert_eq!(document.len(), 2);
        assert_eq!(document.strokes()[0].first().x, 10.0);
        assert_eq!(document.strokes()[1].first().x, 20.0);
    }

    #[test]
    fn test_clearing_empty_document_is_not_recorded() {
        let mut document = Document::new();
        let mut history = CommandHistory::new();
        history.execute(Command::clear_lines(), &mut document).unwrap();
        assert!(!history.can_undo());
        assert_eq!(history.undo(&mut document), Err(CommandError::NothingToUndo));
    }

    #[test]
    fn test_new_command_clears_redo_stack() {
        let mut document = Document::new();
        let mut history = CommandHistory::new();
        history.execute(Command::AddStroke(line(10.0)), &mut document).unwrap();
        history.undo(&mut document).unwrap();
        history.execute(Command::AddStroke(line(30.0)), &mut document).unwrap();
        assert!(!history.can_redo());
        assert_eq!(history.redo(&mut document), Err(CommandError::NothingToRedo));
    }
}
