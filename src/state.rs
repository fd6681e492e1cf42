//! Editing session for one source photo: the line list, the gesture in
//! progress and whether the lights are being previewed.

use egui::{Rect, Vec2};
use uuid::Uuid;

use crate::command::{Command, CommandHistory, CommandResult};
use crate::config::AppConfig;
use crate::document::Document;
use crate::error::TransitionError;
use crate::geometry::{LightInstance, PlacementParams, SnapParams, StrokeFinisher, place_lights};
use crate::input::{InputEvent, to_percent};
use crate::lights::LightStyle;
use crate::photo::SourceImageRef;
use crate::stroke::Point;
use crate::tools::DrawStrokeTool;

/// What the canvas shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Lines and the gesture in progress are visible; no bulbs
    #[default]
    Editing,
    /// Bulbs are visible, lines are hidden
    Previewing,
}

impl RenderMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Editing => "Editing",
            Self::Previewing => "Previewing",
        }
    }
}

/// Parameters for turning gestures into lines and lines into bulbs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub simplify_tolerance: f32,
    pub placement: PlacementParams,
    pub edge_snap: bool,
    pub snap_params: SnapParams,
}

impl From<&AppConfig> for SessionSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            simplify_tolerance: config.simplify_tolerance,
            placement: config.placement(),
            edge_snap: config.edge_snap.enabled,
            snap_params: config.edge_snap.params,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

pub struct Session {
    id: Uuid,
    image: Option<SourceImageRef>,
    document: Document,
    history: CommandHistory,
    tool: DrawStrokeTool,
    mode: RenderMode,
    night_mode: bool,
    style: Option<&'static LightStyle>,
    canvas_rect: Rect,
    lights: Vec<LightInstance>,
    settings: SessionSettings,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("lines", &self.document.len())
            .field("mode", &self.mode)
            .field("night_mode", &self.night_mode)
            .field("style", &self.style.map(|s| s.id))
            .field("lights", &self.lights.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            image: None,
            document: Document::new(),
            history: CommandHistory::new(),
            tool: DrawStrokeTool::new(),
            mode: RenderMode::Editing,
            night_mode: false,
            style: None,
            canvas_rect: Rect::NOTHING,
            lights: Vec::new(),
            settings,
        }
    }

    /// Identity of this session; changes on every reset so stale async results can be told apart
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Discard everything and start over with `image`
    pub fn reset(&mut self, image: Option<SourceImageRef>) {
        log::info!("Resetting session {}", self.id);
        self.id = Uuid::new_v4();
        self.image = image;
        self.document.clear();
        self.history.clear();
        self.tool.reset();
        self.mode = RenderMode::Editing;
        self.night_mode = false;
        self.lights.clear();
    }

    pub fn image(&self) -> Option<&SourceImageRef> {
        self.image.as_ref()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn tool(&self) -> &DrawStrokeTool {
        &self.tool
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn is_previewing(&self) -> bool {
        self.mode == RenderMode::Previewing
    }

    pub fn night_mode(&self) -> bool {
        self.night_mode
    }

    /// Night filter only ever applies while previewing
    pub fn night_filter_active(&self) -> bool {
        self.is_previewing() && self.night_mode
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn style(&self) -> Option<&'static LightStyle> {
        self.style
    }

    /// Bulbs for the current preview; always empty while editing
    pub fn lights(&self) -> &[LightInstance] {
        &self.lights
    }

    pub fn canvas_rect(&self) -> Rect {
        self.canvas_rect
    }

    pub fn container_size(&self) -> Vec2 {
        if self.canvas_rect.is_positive() {
            self.canvas_rect.size()
        } else {
            Vec2::ZERO
        }
    }

    /// Record the latest container measurement. Bulbs are re-placed if the size changed.
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        let resized = rect.size() != self.canvas_rect.size();
        self.canvas_rect = rect;
        if resized && self.is_previewing() {
            log::debug!("Container resized to {:?}, re-placing lights", rect.size());
            self.refresh_lights();
        }
    }

    pub fn select_style(&mut self, style: &'static LightStyle) {
        log::info!("Selected light style: {}", style.id);
        self.style = Some(style);
        if self.is_previewing() {
            self.refresh_lights();
        }
    }

    pub fn set_edge_snap(&mut self, enabled: bool) {
        self.settings.edge_snap = enabled;
    }

    /// Feed one canvas event through the gesture state machine
    pub fn handle_input(&mut self, event: &InputEvent) {
        if self.is_previewing() {
            return;
        }

        match event {
            InputEvent::PointerDown { location } => {
                // Unresolvable positions are dropped silently
                if let Some(point) = to_percent(location.position, self.canvas_rect) {
                    self.tool.on_pointer_down(point);
                }
            }
            InputEvent::PointerMove {
                location,
                primary_held,
            } => {
                if !*primary_held {
                    return;
                }
                if let Some(point) = to_percent(location.position, self.canvas_rect) {
                    self.tool.on_pointer_move(point);
                }
            }
            InputEvent::PointerUp { .. } | InputEvent::PointerLeave { .. } => self.finish_gesture(),
        }
    }

    pub fn pointer_down(&mut self, point: Point) {
        if !self.is_previewing() {
            self.tool.on_pointer_down(point);
        }
    }

    pub fn pointer_move(&mut self, point: Point) {
        if !self.is_previewing() {
            self.tool.on_pointer_move(point);
        }
    }

    /// Pointer released or left the container: commit or discard the gesture
    pub fn finish_gesture(&mut self) {
        let snap_source = self
            .image
            .as_deref()
            .filter(|_| self.settings.edge_snap)
            .map(|image| (image as &dyn crate::geometry::PixelSource, self.settings.snap_params));
        let finisher = StrokeFinisher {
            tolerance: self.settings.simplify_tolerance,
            edge_snap: snap_source,
        };

        if let Some(command) = self.tool.on_pointer_up(&finisher) {
            if let Err(err) = self.history.execute(command, &mut self.document) {
                log::error!("Failed to commit line: {}", err);
            }
        }
    }

    /// Switch to the light preview, placing bulbs for the current lines
    pub fn enter_preview(&mut self) -> Result<(), TransitionError> {
        if self.is_previewing() {
            return Err(TransitionError::InvalidStateTransition {
                from: self.mode.name(),
                to: RenderMode::Previewing.name(),
                state: format!("{} lines", self.document.len()),
            });
        }
        if self.document.is_empty() {
            return Err(TransitionError::EmptyLineList);
        }
        if self.style.is_none() {
            return Err(TransitionError::NoStyleSelected);
        }

        self.tool.reset();
        self.mode = RenderMode::Previewing;
        self.refresh_lights();
        log::info!("Previewing {} lights", self.lights.len());
        Ok(())
    }

    /// Back to editing. Lines are kept; only the bulbs are dropped.
    pub fn exit_preview(&mut self) -> Result<(), TransitionError> {
        if !self.is_previewing() {
            return Err(TransitionError::InvalidStateTransition {
                from: self.mode.name(),
                to: RenderMode::Editing.name(),
                state: format!("{} lines", self.document.len()),
            });
        }
        self.mode = RenderMode::Editing;
        self.lights.clear();
        Ok(())
    }

    pub fn toggle_preview(&mut self) -> Result<(), TransitionError> {
        match self.mode {
            RenderMode::Editing => self.enter_preview(),
            RenderMode::Previewing => self.exit_preview(),
        }
    }

    pub fn toggle_night_mode(&mut self) {
        self.night_mode = !self.night_mode;
    }

    /// Remove every line and return to an empty editing state
    pub fn clear(&mut self) {
        if let Err(err) = self.history.execute(Command::clear_lines(), &mut self.document) {
            log::error!("Failed to clear lines: {}", err);
        }
        self.tool.reset();
        self.mode = RenderMode::Editing;
        self.night_mode = false;
        self.lights.clear();
    }

    pub fn undo(&mut self) -> CommandResult {
        self.history.undo(&mut self.document)?;
        self.after_edit();
        Ok(())
    }

    pub fn redo(&mut self) -> CommandResult {
        self.history.redo(&mut self.document)?;
        self.after_edit();
        Ok(())
    }

    fn after_edit(&mut self) {
        if !self.is_previewing() {
            return;
        }
        if self.document.is_empty() {
            self.mode = RenderMode::Editing;
            self.lights.clear();
        } else {
            self.refresh_lights();
        }
    }

    fn refresh_lights(&mut self) {
        self.lights = match self.style {
            Some(style) => place_lights(
                self.document.strokes(),
                style,
                self.container_size(),
                &self.settings.placement,
            ),
            None => Vec::new(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputLocation;
    use crate::lights::find_style;
    use egui::Pos2;

    fn session() -> Session {
        let mut session = Session::new(SessionSettings::default());
        session.set_canvas_rect(Rect::from_min_size(Pos2::ZERO, egui::vec2(1000.0, 500.0)));
        session.select_style(find_style("warm-white").unwrap());
        session
    }

    fn drag(session: &mut Session, from: Pos2, to: Pos2) {
        let rect = session.canvas_rect();
        session.handle_input(&InputEvent::PointerDown {
            location: InputLocation::at(from, rect),
        });
        session.handle_input(&InputEvent::PointerMove {
            location: InputLocation::at(to, rect),
            primary_held: true,
        });
        session.handle_input(&InputEvent::PointerUp {
            location: InputLocation::at(to, rect),
        });
    }

    #[test]
    fn test_drag_commits_line() {
        let mut session = session();
        drag(&mut session, Pos2::new(100.0, 250.0), Pos2::new(900.0, 250.0));
        assert_eq!(session.document().len(), 1);
        let line = &session.document().strokes()[0];
        assert!((line.first().x - 10.0).abs() < 1e-4);
        assert!((line.last().x - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_hover_moves_are_not_recorded() {
        let mut session = session();
        let rect = session.canvas_rect();
        session.handle_input(&InputEvent::PointerMove {
            location: InputLocation::at(Pos2::new(10.0, 10.0), rect),
            primary_held: false,
        });
        assert!(session.tool().preview_points().is_empty());
    }

    #[test]
    fn test_leave_finishes_gesture() {
        let mut session = session();
        let rect = session.canvas_rect();
        session.handle_input(&InputEvent::PointerDown {
            location: InputLocation::at(Pos2::new(100.0, 100.0), rect),
        });
        session.handle_input(&InputEvent::PointerMove {
            location: InputLocation::at(Pos2::new(400.0, 100.0), rect),
            primary_held: true,
        });
        session.handle_input(&InputEvent::PointerLeave {
            last_known_location: InputLocation::at(Pos2::new(400.0, 100.0), rect),
        });
        assert_eq!(session.document().len(), 1);
        assert!(!session.tool().is_drawing());
    }

    #[test]
    fn test_unmeasured_canvas_ignores_pointer() {
        let mut session = Session::new(SessionSettings::default());
        session.handle_input(&InputEvent::PointerDown {
            location: InputLocation::at(Pos2::new(10.0, 10.0), Rect::NOTHING),
        });
        assert!(!session.tool().is_drawing());
    }

    #[test]
    fn test_preview_requires_lines_and_style() {
        let mut session = Session::new(SessionSettings::default());
        assert_eq!(session.enter_preview(), Err(TransitionError::EmptyLineList));
        assert_eq!(session.mode(), RenderMode::Editing);
        assert!(session.lights().is_empty());

        session.set_canvas_rect(Rect::from_min_size(Pos2::ZERO, egui::vec2(100.0, 100.0)));
        drag(&mut session, Pos2::new(10.0, 10.0), Pos2::new(90.0, 10.0));
        assert_eq!(session.enter_preview(), Err(TransitionError::NoStyleSelected));
    }

    #[test]
    fn test_input_ignored_while_previewing() {
        let mut session = session();
        drag(&mut session, Pos2::new(100.0, 250.0), Pos2::new(900.0, 250.0));
        session.enter_preview().unwrap();
        drag(&mut session, Pos2::new(100.0, 100.0), Pos2::new(900.0, 100.0));
        assert_eq!(session.document().len(), 1);
    }

    #[test]
    fn test_style_change_and_resize_replace_lights() {
        let mut session = session();
        drag(&mut session, Pos2::new(100.0, 250.0), Pos2::new(900.0, 250.0));
        session.enter_preview().unwrap();
        assert_eq!(session.lights().len(), 41);

        let festive = find_style("festive").unwrap();
        session.select_style(festive);
        assert_eq!(session.lights()[1].color, festive.color_at(1));

        session.set_canvas_rect(Rect::from_min_size(Pos2::ZERO, egui::vec2(500.0, 250.0)));
        assert_eq!(session.lights().len(), 21);
    }

    #[test]
    fn test_exit_preview_keeps_lines() {
        let mut session = session();
        drag(&mut session, Pos2::new(100.0, 250.0), Pos2::new(900.0, 250.0));
        session.enter_preview().unwrap();
        session.exit_preview().unwrap();
        assert_eq!(session.mode(), RenderMode::Editing);
        assert!(session.lights().is_empty());
        assert_eq!(session.document().len(), 1);
        assert!(session.exit_preview().is_err());
    }

    #[test]
    fn test_undo_last_line_while_previewing_returns_to_editing() {
        let mut session = session();
        drag(&mut session, Pos2::new(100.0, 250.0), Pos2::new(900.0, 250.0));
        session.enter_preview().unwrap();
        session.undo().unwrap();
        assert_eq!(session.mode(), RenderMode::Editing);
        assert!(session.lights().is_empty());
    }

    #[test]
    fn test_reset_changes_identity() {
        let mut session = session();
        drag(&mut session, Pos2::new(100.0, 250.0), Pos2::new(900.0, 250.0));
        let before = session.id();
        session.reset(None);
        assert_ne!(session.id(), before);
        assert!(session.document().is_empty());
        assert!(!session.history().can_undo());
    }
}
