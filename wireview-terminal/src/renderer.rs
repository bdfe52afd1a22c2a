//! ASCII line renderer for terminal output

use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::f64::consts::PI;
use std::io::Write;
use wireview_core::{RenderFrame, RenderSink, Segment, Stroke, Vec2, Viewport};

/// One character cell of the frame buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub character: char,
    pub color: Color,
}

const BLANK: Cell = Cell {
    character: ' ',
    color: Color::Reset,
};

/// Draws projected wireframe segments into a grid of terminal cells.
///
/// Terminal cells are about twice as tall as they are wide, so a row spans
/// `2 * cell_size` world units and a column `cell_size`.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cell_size: f64,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, cell_size: f64) -> Self {
        Self {
            width,
            height,
            cell_size,
            cells: vec![BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![BLANK; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<Cell> {
        (column < self.width && row < self.height).then(|| self.cells[row * self.width + column])
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(
            self.width as f64 * self.cell_size,
            self.height as f64 * self.cell_size * 2.0,
        )
    }

    /// Centered coordinates of the middle of a cell, for pointer input.
    pub fn to_centered(&self, column: u16, row: u16) -> Vec2 {
        self.viewport().to_centered(
            (column as f64 + 0.5) * self.cell_size,
            (row as f64 + 0.5) * self.cell_size * 2.0,
        )
    }

    /// Fractional cell position of a point in centered coordinates.
    pub fn to_cell(&self, point: &Vec2) -> (f64, f64) {
        let (x, y) = self.viewport().to_surface(point);
        (x / self.cell_size, y / (self.cell_size * 2.0))
    }

    fn plot(&mut self, column: f64, row: f64, cell: Cell) {
        let (column, row) = (column.floor(), row.floor());
        if column < 0.0 || row < 0.0 {
            return;
        }
        let (column, row) = (column as usize, row as usize);
        if column < self.width && row < self.height {
            self.cells[row * self.width + column] = cell;
        }
    }

    pub fn draw_segment(&mut self, segment: &Segment) {
        let (x0, y0) = self.to_cell(&segment.from);
        let (x1, y1) = self.to_cell(&segment.to);
        let Some(((x0, y0), (x1, y1))) = clip(
            (x0, y0),
            (x1, y1),
            (0.0, 0.0),
            (self.width as f64, self.height as f64),
        ) else {
            return;
        };

        let cell = match segment.stroke {
            Stroke::Axis => Cell {
                character: '.',
                color: Color::Blue,
            },
            Stroke::Edge => Cell {
                character: slope_character(x1 - x0, y1 - y0),
                color: Color::Green,
            },
        };

        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0);
        let count = steps as usize;
        for i in 0..=count {
            let t = i as f64 / steps;
            self.plot(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t, cell);
        }
    }

    /// Plain text rows of the buffer, without colors.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|cell| cell.character).collect())
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for row in 0..self.height {
            writer.queue(cursor::MoveTo(0, row as u16))?;
            for column in 0..self.width {
                let cell = self.cells[row * self.width + column];
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.character))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderSink for AsciiRenderer {
    fn render(&mut self, frame: &RenderFrame) {
        self.clear();
        for segment in frame.strokes(Stroke::Axis).chain(frame.strokes(Stroke::Edge)) {
            self.draw_segment(segment);
        }
        if let Some(origin) = frame.origin {
            let (column, row) = self.to_cell(&origin);
            self.plot(
                column,
                row,
                Cell {
                    character: 'O',
                    color: Color::Red,
                },
            );
        }
    }
}

/// Character that best follows a line with the given cell deltas.
fn slope_character(dx: f64, dy: f64) -> char {
    // Rows are twice as tall as columns and grow downwards.
    let angle = (-dy * 2.0).atan2(dx).rem_euclid(PI);
    if angle < PI / 8.0 || angle >= 7.0 * PI / 8.0 {
        '-'
    } else if angle < 3.0 * PI / 8.0 {
        '/'
    } else if angle < 5.0 * PI / 8.0 {
        '|'
    } else {
        '\\'
    }
}

/// Liang-Barsky clipping of a segment to the rectangle `[min, max)`.
fn clip(from: (f64, f64), to: (f64, f64), min: (f64, f64), max: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    let bounds = [
        (-dx, from.0 - min.0),
        (dx, max.0 - from.0),
        (-dy, from.1 - min.1),
        (dy, max.1 - from.1),
    ];
    for (p, q) in bounds {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    Some((
        (from.0 + dx * t0, from.1 + dy * t0),
        (from.0 + dx * t1, from.1 + dy * t1),
    ))
}
