use crate::state::theme::Color;

/// One vector drawing instruction in screen pixels.
///
/// Later operations paint over earlier ones where they share pixels, so the
/// order of a `Vec<DrawOp>` is part of the picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOp {
    /// Straight line between two pixels, both ends inclusive.
    Line {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    },
    /// `width` x `height` pixels with the top-left corner at `(x, y)`.
    FilledRect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    },
    /// Outline through the corners `(x, y)` and `(x + width, y + height)`.
    StrokedRect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    },
}

impl DrawOp {
    pub fn line(x1: i32, y1: i32, x2: i32, y2: i32, color: Color) -> Self {
        DrawOp::Line { x1, y1, x2, y2, color }
    }

    pub fn fill_rect(x: i32, y: i32, width: i32, height: i32, color: Color) -> Self {
        DrawOp::FilledRect { x, y, width, height, color }
    }

    pub fn stroke_rect(x: i32, y: i32, width: i32, height: i32, color: Color) -> Self {
        DrawOp::StrokedRect { x, y, width, height, color }
    }

    pub fn color(&self) -> Color {
        match *self {
            DrawOp::Line { color, .. }
            | DrawOp::FilledRect { color, .. }
            | DrawOp::StrokedRect { color, .. } => color,
        }
    }
}

/// Destination for drawing operations. Implementations are write-only from
/// the renderer's point of view.
pub trait Surface {
    fn set_color(&mut self, color: Color);
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32);
}

/// Stream `ops` to `surface` in order, switching color only when it changes.
pub fn replay<S: Surface + ?Sized>(ops: &[DrawOp], surface: &mut S) {
    let mut current: Option<Color> = None;
    for op in ops {
        let color = op.color();
        if current != Some(color) {
            surface.set_color(color);
            current = Some(color);
        }
        match *op {
            DrawOp::Line { x1, y1, x2, y2, .. } => surface.draw_line(x1, y1, x2, y2),
            DrawOp::FilledRect { x, y, width, height, .. } => surface.fill_rect(x, y, width, height),
            DrawOp::StrokedRect { x, y, width, height, .. } => surface.draw_rect(x, y, width, height),
        }
    }
}
