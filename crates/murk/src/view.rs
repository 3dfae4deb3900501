//! Paints a [`Canvas`] into the terminal with upper half blocks, two pixels
//! per cell.

use murk_scene::Canvas;
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

const UPPER_HALF: &str = "▀";

pub struct CanvasView<'a> {
    canvas: &'a Canvas,
}

impl<'a> CanvasView<'a> {
    pub fn new(canvas: &'a Canvas) -> Self {
        Self { canvas }
    }
}

impl Widget for CanvasView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let image = self.canvas.image();
        for row in 0..area.height {
            for col in 0..area.width {
                let x = u32::from(col);
                let y = u32::from(row) * 2;
                let (Some(top), Some(bottom)) = (image.get(x, y), image.get(x, y + 1)) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(UPPER_HALF)
                        .set_fg(Color::from(top))
                        .set_bg(Color::from(bottom));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murk_core::Rgba;
    use murk_scene::Surface;

    #[test]
    fn test_cell_takes_top_and_bottom_pixels() {
        let mut canvas = Canvas::with_pixel_size(2, 2);
        canvas.clear(Rgba::rgb(10, 20, 30));
        canvas.pixels_mut().set(0, 1, Rgba::rgb(200, 0, 0));

        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        CanvasView::new(&canvas).render(area, &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), UPPER_HALF);
        assert_eq!(cell.fg, Color::Rgb(10, 20, 30));
        assert_eq!(cell.bg, Color::Rgb(200, 0, 0));
    }

    #[test]
    fn test_cells_past_the_canvas_are_left_alone() {
        let canvas = Canvas::with_pixel_size(1, 2);
        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        CanvasView::new(&canvas).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), UPPER_HALF);
        assert_eq!(buf[(1, 0)].symbol(), " ");
        assert_eq!(buf[(0, 1)].symbol(), " ");
    }
}
