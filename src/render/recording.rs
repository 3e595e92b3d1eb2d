use crate::error::RenderError;
use crate::render::RenderSink;

/// A single call made on a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Clear,
    Pixel { x: i32, y: i32 },
    Line { x0: i32, y0: i32, x1: i32, y1: i32 },
    String { x: i32, y: i32, text: String },
    Contrast(u8),
    Present,
}

/// A render sink that records draw calls instead of drawing them.
///
/// Headless runs and tests draw into this and inspect what came out.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The commands of the last presented frame, from its `Clear` onwards.
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| *c == DrawCommand::Clear)
            .unwrap_or(0);
        &self.commands[start..]
    }

    /// Every string drawn in the last frame.
    pub fn strings(&self) -> impl Iterator<Item = &str> + '_ {
        self.last_frame().iter().filter_map(|c| match c {
            DrawCommand::String { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.strings().any(|s| s.contains(needle))
    }

    /// Returns true if the last frame set the pixel at `(x, y)` directly.
    pub fn has_pixel(&self, x: i32, y: i32) -> bool {
        self.last_frame()
            .iter()
            .any(|c| *c == DrawCommand::Pixel { x, y })
    }

    pub fn frames(&self) -> usize {
        self.commands.iter().filter(|c| **c == DrawCommand::Present).count()
    }
}

impl RenderSink for RecordingSink {
    fn clear(&mut self) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Clear);
        Ok(())
    }

    fn pixel(&mut self, x: i32, y: i32) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Pixel { x, y });
        Ok(())
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Line { x0, y0, x1, y1 });
        Ok(())
    }

    fn string(&mut self, x: i32, y: i32, text: &str) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::String {
            x,
            y,
            text: text.to_owned(),
        });
        Ok(())
    }

    fn set_contrast(&mut self, contrast: u8) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Contrast(contrast));
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Present);
        Ok(())
    }
}
