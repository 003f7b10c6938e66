//! Page layout on top of a 2D drawing surface.
//!
//! Coordinates are page-relative with `y` growing downwards. The surface
//! itself (PDF writer, preview canvas) is supplied by the caller.

pub mod canvas;
pub mod invoice_layout;
pub mod table;
pub mod wrap;

pub use canvas::{Canvas, Rgb};
pub use invoice_layout::{PageSetup, draw_invoice};
pub use table::{LayoutError, TableLayout, TableRenderer};
pub use wrap::wrap_text;
