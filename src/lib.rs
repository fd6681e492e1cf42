#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod file_handler;
pub mod generation;
pub mod geometry;
pub mod input;
pub mod lights;
pub mod panels;
pub mod photo;
pub mod renderer;
pub mod state;
pub mod stroke;
pub mod tools;

pub use app::{HolidayLightsApp, Preferences};
pub use command::{Command, CommandHistory};
pub use config::AppConfig;
pub use document::Document;
pub use geometry::{LightInstance, PlacementParams, place_lights, simplify};
pub use input::{InputEvent, InputLocation};
pub use lights::LightStyle;
pub use photo::{ImageSource, SourceImage};
pub use renderer::Renderer;
pub use state::{RenderMode, Session, SessionSettings};
pub use stroke::{Point, Stroke};
pub use tools::DrawStrokeTool;
