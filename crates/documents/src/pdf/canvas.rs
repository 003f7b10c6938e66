/// Fill colour for shaded rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const LIGHT_GRAY: Rgb = Rgb(230, 230, 230);
}

/// Minimal drawing surface the layout code targets.
pub trait Canvas {
    /// Draw `text` with its baseline at `y`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32);
    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Rgb);
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);
    /// Advance width of `text` at `font_size`.
    fn measure_text(&self, text: &str, font_size: f32) -> f32;
}
