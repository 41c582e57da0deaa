//! A character raster the terminal renderer draws frames into.

use crossterm::style::Color;

/// Frame background.
pub const BACKGROUND: Color = Color::Rgb { r: 30, g: 30, b: 40 };
/// Coin face.
pub const COIN: Color = Color::Rgb { r: 240, g: 200, b: 50 };
/// Coin rim.
pub const EDGE: Color = Color::Rgb { r: 180, g: 150, b: 30 };
/// Letter on the coin face.
pub const COIN_TEXT: Color = Color::Rgb { r: 10, g: 10, b: 10 };
/// Status and caption text.
pub const STATUS: Color = Color::Rgb { r: 200, g: 200, b: 220 };

/// One character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: STATUS,
            bg: BACKGROUND,
        }
    }
}

/// Fixed-size grid of cells, row-major.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    /// Blank canvas.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Cell at `(x, y)`, `None` outside the canvas.
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Set a cell; writes outside the canvas are clipped.
    pub fn put(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Write `text` starting at `(x, y)` on the frame background.
    pub fn text(&mut self, x: i32, y: i32, text: &str, fg: Color) {
        for (dx, ch) in (0..).zip(text.chars()) {
            self.put(x + dx, y, Cell { ch, fg, bg: BACKGROUND });
        }
    }

    /// Write `text` centred on row `y`.
    pub fn centered_text(&mut self, y: i32, text: &str, fg: Color) {
        let len = text.chars().count() as i32;
        self.text((i32::from(self.width) - len) / 2, y, text, fg);
    }

    /// Filled ellipse centred on `(cx, cy)` with a rim.
    ///
    /// `rx` is in columns, `ry` in rows.
    pub fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let top = (cy - ry).floor() as i32;
        let bottom = (cy + ry).ceil() as i32;
        let left = (cx - rx).floor() as i32;
        let right = (cx + rx).ceil() as i32;

        for y in top..=bottom {
            for x in left..=right {
                // Sample the cell centre.
                let nx = (f64::from(x) + 0.5 - cx) / rx;
                let ny = (f64::from(y) + 0.5 - cy) / ry;
                let d = nx * nx + ny * ny;
                if d > 1.0 {
                    continue;
                }
                let rim = d > 0.6 || ry < 1.0;
                let cell = if rim {
                    Cell { ch: '█', fg: EDGE, bg: BACKGROUND }
                } else {
                    Cell { ch: '█', fg: COIN, bg: BACKGROUND }
                };
                self.put(x, y, cell);
            }
        }
    }

    /// Rows as plain strings, without colours.
    pub fn lines(&self) -> Vec<String> {
        self.cells
            .chunks(usize::from(self.width.max(1)))
            .map(|row| row.iter().map(|c| c.ch).collect())
            .collect()
    }

    /// Rows of cells.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.width.max(1)))
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return None;
        }
        Some(y as usize * usize::from(self.width) + x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_clipped() {
        let mut canvas = Canvas::new(5, 2);
        canvas.text(3, 0, "abc", STATUS);
        canvas.text(-1, 1, "xyz", STATUS);

        assert_eq!(canvas.lines(), vec!["   ab", "yz   "]);
    }

    #[test]
    fn test_centered_text() {
        let mut canvas = Canvas::new(9, 1);
        canvas.centered_text(0, "HEADS", STATUS);
        assert_eq!(canvas.lines(), vec!["  HEADS  "]);
    }

    #[test]
    fn test_ellipse_is_symmetric_with_rim() {
        let mut canvas = Canvas::new(21, 9);
        canvas.ellipse(10.5, 4.5, 8.0, 4.0);

        let centre = canvas.get(10, 4).unwrap();
        assert_eq!(centre.fg, COIN);
        assert_eq!(canvas.get(3, 4).unwrap().fg, EDGE);
        assert_eq!(canvas.get(0, 0).unwrap().ch, ' ');

        let lines = canvas.lines();
        for line in &lines {
            let reversed: String = line.chars().rev().collect();
            assert_eq!(line, &reversed);
        }
        assert_eq!(lines[0], lines[8]);
    }

    #[test]
    fn test_thin_ellipse_is_all_rim() {
        let mut canvas = Canvas::new(21, 3);
        canvas.ellipse(10.5, 1.5, 8.0, 0.8);

        assert!(canvas.rows().flatten().all(|c| c.ch == ' ' || c.fg == EDGE));
        assert_eq!(canvas.get(10, 1).unwrap().ch, '█');
    }

    #[test]
    fn test_degenerate_ellipse_draws_nothing() {
        let mut canvas = Canvas::new(4, 4);
        canvas.ellipse(2.0, 2.0, 0.0, 1.0);
        assert!(canvas.rows().flatten().all(|c| c.ch == ' '));
    }
}
