use image::{Rgba, RgbaImage};

use crate::render::ops::Surface;
use crate::state::theme::Color;

/// Aliased pixel surface backed by an `RgbaImage`.
///
/// Pixels outside the image are silently dropped. Colors are copied, not
/// blended, so the last operation to touch a pixel decides its color.
pub struct RasterSurface {
    image: RgbaImage,
    color: Color,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(background)),
            color: [0, 0, 0, 255],
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Color at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let (x, y) = self.index(x, y)?;
        Some(self.image.get_pixel(x, y).0)
    }

    fn index(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < self.image.width() && y < self.image.height()).then_some((x, y))
    }

    fn put(&mut self, x: i32, y: i32) {
        if let Some((x, y)) = self.index(x, y) {
            self.image.put_pixel(x, y, Rgba(self.color));
        }
    }

    /// Liang-Barsky clip of a segment to the image grown by one pixel, so a
    /// segment that is already inside keeps its exact end points.
    fn clip(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> Option<(i32, i32, i32, i32)> {
        let (xmin, ymin) = (-1.0, -1.0);
        let (xmax, ymax) = (f64::from(self.image.width()), f64::from(self.image.height()));
        let inside = |x: i32, y: i32| {
            let (x, y) = (f64::from(x), f64::from(y));
            x >= xmin && x <= xmax && y >= ymin && y <= ymax
        };
        if inside(x1, y1) && inside(x2, y2) {
            return Some((x1, y1, x2, y2));
        }

        let (fx1, fy1) = (f64::from(x1), f64::from(y1));
        let (dx, dy) = (f64::from(x2) - fx1, f64::from(y2) - fy1);
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;
        for (p, q) in [
            (-dx, fx1 - xmin),
            (dx, xmax - fx1),
            (-dy, fy1 - ymin),
            (dy, ymax - fy1),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
        let at = |t: f64| ((fx1 + t * dx).round() as i32, (fy1 + t * dy).round() as i32);
        let (cx1, cy1) = at(t0);
        let (cx2, cy2) = at(t1);
        Some((cx1, cy1, cx2, cy2))
    }

    fn hline(&mut self, x1: i32, x2: i32, y: i32) {
        let (from, to) = (x1.min(x2), x1.max(x2));
        let from = from.max(0);
        let to = to.min(self.image.width() as i32 - 1);
        for x in from..=to {
            self.put(x, y);
        }
    }

    fn vline(&mut self, x: i32, y1: i32, y2: i32) {
        let (from, to) = (y1.min(y2), y1.max(y2));
        let from = from.max(0);
        let to = to.min(self.image.height() as i32 - 1);
        for y in from..=to {
            self.put(x, y);
        }
    }
}

impl Surface for RasterSurface {
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Bresenham line, both end points included.
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        if y1 == y2 {
            return self.hline(x1, x2, y1);
        }
        if x1 == x2 {
            return self.vline(x1, y1, y2);
        }

        let Some((x1, y1, x2, y2)) = self.clip(x1, y1, x2, y2) else {
            return;
        };
        let (mut x, mut y) = (i64::from(x1), i64::from(y1));
        let (x2, y2) = (i64::from(x2), i64::from(y2));
        let dx = (x2 - x).abs();
        let dy = -(y2 - y).abs();
        let sx = if x < x2 { 1 } else { -1 };
        let sy = if y < y2 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if let (Ok(px), Ok(py)) = (i32::try_from(x), i32::try_from(y)) {
                self.put(px, py);
            }
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        if width <= 0 || height <= 0 {
            return;
        }
        let bottom = y.saturating_add(height - 1).min(self.image.height() as i32 - 1);
        let right = x.saturating_add(width - 1);
        for row in y.max(0)..=bottom {
            self.hline(x, right, row);
        }
    }

    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        if width < 0 || height < 0 {
            return;
        }
        let right = x.saturating_add(width);
        let bottom = y.saturating_add(height);
        self.hline(x, right, y);
        self.hline(x, right, bottom);
        self.vline(x, y, bottom);
        self.vline(right, y, bottom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::theme::{DARK_GRAY, WHITE};

    #[test]
    fn starts_with_background() {
        let s = RasterSurface::new(4, 3, WHITE);
        assert_eq!(s.pixel(0, 0), Some(WHITE));
        assert_eq!(s.pixel(3, 2), Some(WHITE));
        assert_eq!(s.pixel(4, 0), None);
        assert_eq!(s.pixel(-1, 0), None);
    }

    #[test]
    fn diagonal_line_includes_end_points() {
        let mut s = RasterSurface::new(10, 10, WHITE);
        s.set_color(DARK_GRAY);
        s.draw_line(1, 1, 4, 4);
        for i in 1..=4 {
            assert_eq!(s.pixel(i, i), Some(DARK_GRAY));
        }
        assert_eq!(s.pixel(5, 5), Some(WHITE));
    }

    #[test]
    fn shallow_line_is_connected() {
        let mut s = RasterSurface::new(20, 10, WHITE);
        s.set_color(DARK_GRAY);
        s.draw_line(0, 0, 9, 3);
        for x in 0..=9 {
            let painted = (0..10).filter(|&y| s.pixel(x, y) == Some(DARK_GRAY)).count();
            assert_eq!(painted, 1, "column {x}");
        }
        assert_eq!(s.pixel(9, 3), Some(DARK_GRAY));
    }

    #[test]
    fn fill_covers_width_by_height() {
        let mut s = RasterSurface::new(10, 10, WHITE);
        s.set_color(DARK_GRAY);
        s.fill_rect(2, 3, 3, 2);
        let painted = (0..10)
            .flat_map(|x| (0..10).map(move |y| (x, y)))
            .filter(|&(x, y)| s.pixel(x, y) == Some(DARK_GRAY))
            .count();
        assert_eq!(painted, 6);
        assert_eq!(s.pixel(4, 4), Some(DARK_GRAY));
        assert_eq!(s.pixel(5, 4), Some(WHITE));
    }

    #[test]
    fn outline_leaves_interior() {
        let mut s = RasterSurface::new(10, 10, WHITE);
        s.set_color(DARK_GRAY);
        s.draw_rect(1, 1, 4, 4);
        assert_eq!(s.pixel(1, 1), Some(DARK_GRAY));
        assert_eq!(s.pixel(5, 5), Some(DARK_GRAY));
        assert_eq!(s.pixel(3, 3), Some(WHITE));
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let mut s = RasterSurface::new(5, 5, WHITE);
        s.set_color(DARK_GRAY);
        s.draw_line(-10, 2, 20, 2);
        s.fill_rect(-3, -3, 5, 5);
        s.draw_line(-5, -5, 10, 10);
        s.draw_line(i32::MIN, 0, i32::MAX, 4);
        assert_eq!(s.pixel(0, 2), Some(DARK_GRAY));
        assert_eq!(s.pixel(4, 2), Some(DARK_GRAY));
        assert_eq!(s.pixel(1, 1), Some(DARK_GRAY));
        assert_eq!(s.pixel(4, 4), Some(DARK_GRAY));
    }
}
