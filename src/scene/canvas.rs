//! The per-frame drawing contract drawables render into.

use glam::{Vec2, Vec3};

use crate::color::Color;
use crate::geometry::Geometry;

/// Which of the two loaded font faces a text run uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Bold,
    Regular,
}

/// Font face, size (in world units) and fill color of a text run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font: FontStyle,
    pub size: f32,
    pub color: Color,
}

/// Drawing commands available to a drawable during one frame.
///
/// Implementations must tolerate being driven every frame indefinitely and
/// must ignore empty geometry.
pub trait Canvas {
    /// Clear the frame to a solid color.
    fn background(&mut self, color: Color);

    /// Apply one frame of orbit-style camera interaction.
    fn orbit_control(&mut self, sensitivity: Vec2, damping: f32);

    /// Draw world-space triangles.
    fn geometry(&mut self, geometry: &Geometry);

    /// Draw a text run whose baseline starts at `anchor`.
    fn text(&mut self, content: &str, anchor: Vec3, style: &TextStyle);
}

/// A command captured by [`RecordingCanvas`].
#[cfg(test)]
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Command {
    Background(Color),
    OrbitControl(Vec2, f32),
    Geometry(crate::geometry::GeometryId),
    Text(String, Vec3, TextStyle),
}

/// Canvas that records every command instead of rendering it.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingCanvas {
    pub(crate) commands: Vec<Command>,
}

#[cfg(test)]
impl Canvas for RecordingCanvas {
    fn background(&mut self, color: Color) {
        self.commands.push(Command::Background(color));
    }

    fn orbit_control(&mut self, sensitivity: Vec2, damping: f32) {
        self.commands.push(Command::OrbitControl(sensitivity, damping));
    }

    fn geometry(&mut self, geometry: &Geometry) {
        if !geometry.is_empty() {
            self.commands.push(Command::Geometry(geometry.id()));
        }
    }

    fn text(&mut self, content: &str, anchor: Vec3, style: &TextStyle) {
        self.commands
            .push(Command::Text(content.to_string(), anchor, *style));
    }
}
