/// Character-grid line renderer for screen-space strokes
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use penplot_core::{Paths, Vector};
use std::io::Write;

/// Marks a cell where strokes of different slopes meet
const CROSSING: char = '+';

/// Draws polylines into a character buffer, one glyph per cell
pub struct LineRenderer {
    width: usize,
    height: usize,
    /// Height of a cell relative to its width
    cell_aspect: f64,
    char_buffer: Vec<char>,
}

impl LineRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cell_aspect: 1.0,
            char_buffer: vec![' '; width * height],
        }
    }

    /// Terminal cells are usually about twice as tall as they are wide
    pub fn with_cell_aspect(mut self, cell_aspect: f64) -> Self {
        self.cell_aspect = cell_aspect;
        self
    }

    /// Pixel size a camera should render at so strokes land on this grid undistorted
    pub fn viewport(&self) -> (u32, u32) {
        (
            self.width as u32,
            (self.height as f64 * self.cell_aspect).round() as u32,
        )
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
    }

    pub fn draw_paths(&mut self, paths: &Paths) {
        for path in paths {
            for pair in path.windows(2) {
                self.draw_segment(&pair[0], &pair[1]);
            }
        }
    }

    /// DDA walk from `a` to `b` in viewport pixels
    pub fn draw_segment(&mut self, a: &Vector, b: &Vector) {
        let (x0, y0) = (a.x, a.y / self.cell_aspect);
        let (x1, y1) = (b.x, b.y / self.cell_aspect);
        let (dx, dy) = (x1 - x0, y1 - y0);
        let glyph = slope_glyph(dx, dy);
        let steps = dx.abs().max(dy.abs()).ceil();
        if !steps.is_finite() {
            return;
        }
        let steps = steps as usize;
        if steps == 0 {
            self.plot(x0, y0, glyph);
            return;
        }
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.plot(x0 + dx * t, y0 + dy * t, glyph);
        }
    }

    fn plot(&mut self, x: f64, y: f64, glyph: char) {
        let (x, y) = (x.floor(), y.floor());
        if x < 0.0 || y < 0.0 || x >= self.width as f64 || y >= self.height as f64 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        let cell = &mut self.char_buffer[idx];
        *cell = if *cell == ' ' || *cell == glyph {
            glyph
        } else {
            CROSSING
        };
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.char_buffer[y * self.width + x])
        } else {
            None
        }
    }

    /// The buffer as text rows
    pub fn rows(&self) -> Vec<String> {
        self.char_buffer
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect())
            .collect()
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetForegroundColor(Color::Cyan))?;
        for row in self.rows() {
            writer.queue(Print(row))?;
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Glyph for a segment direction; screen y grows downwards
fn slope_glyph(dx: f64, dy: f64) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ay <= ax * 0.5 {
        '-'
    } else if ay >= ax * 2.0 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slope_glyphs() {
        assert_eq!(slope_glyph(5.0, 0.0), '-');
        assert_eq!(slope_glyph(0.0, -5.0), '|');
        assert_eq!(slope_glyph(3.0, 3.0), '\\');
        assert_eq!(slope_glyph(3.0, -3.0), '/');
        assert_eq!(slope_glyph(-3.0, 3.0), '/');
    }

    #[test]
    fn test_horizontal_and_vertical_cross() {
        let mut r = LineRenderer::new(10, 10);
        r.draw_paths(&vec![
            vec![Vector::new(1.5, 5.5, 0.0), Vector::new(8.5, 5.5, 0.0)],
            vec![Vector::new(4.5, 1.5, 0.0), Vector::new(4.5, 8.5, 0.0)],
        ]);
        assert_eq!(r.cell(1, 5), Some('-'));
        assert_eq!(r.cell(8, 5), Some('-'));
        assert_eq!(r.cell(4, 1), Some('|'));
        assert_eq!(r.cell(4, 5), Some('+'));
        assert_eq!(r.cell(0, 0), Some(' '));
    }

    #[test]
    fn test_cell_aspect_halves_rows() {
        let mut r = LineRenderer::new(4, 4).with_cell_aspect(2.0);
        assert_eq!(r.viewport(), (4, 8));
        r.draw_segment(&Vector::new(0.5, 7.5, 0.0), &Vector::new(3.5, 7.5, 0.0));
        assert_eq!(r.rows()[3], "----");
    }

    #[test]
    fn test_off_screen_points_are_clipped() {
        let mut r = LineRenderer::new(3, 3);
        r.draw_segment(&Vector::new(-5.0, 1.5, 0.0), &Vector::new(10.0, 1.5, 0.0));
        assert_eq!(r.rows(), vec!["   ", "---", "   "]);
        r.clear();
        assert_eq!(r.rows(), vec!["   ", "   ", "   "]);
    }
}
