//! CanvasRenderingContext2d backend

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::shapes::DrawCmd;

/// Replays draw commands onto a canvas
pub struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Match the backing store to the element's layout size
    pub fn fit_to_layout(&self) -> (f32, f32) {
        let rect = self.canvas.get_bounding_client_rect();
        let (w, h) = (rect.width().max(1.0), rect.height().max(1.0));
        self.canvas.set_width(w as u32);
        self.canvas.set_height(h as u32);
        (w as f32, h as f32)
    }

    pub fn paint(&self, cmds: &[DrawCmd]) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for cmd in cmds {
            match cmd {
                DrawCmd::Clear { width, height } => ctx.clear_rect(0.0, 0.0, *width, *height),
                DrawCmd::Circle {
                    center,
                    radius,
                    fill,
                    stroke,
                    alpha,
                } => {
                    ctx.set_global_alpha(*alpha);
                    ctx.begin_path();
                    ctx.arc(center.x as f64, center.y as f64, *radius, 0.0, TAU)?;
                    ctx.set_fill_style_str(fill);
                    ctx.fill();
                    if let Some((color, width)) = stroke {
                        ctx.set_line_width(*width);
                        ctx.set_stroke_style_str(color);
                        ctx.stroke();
                    }
                    ctx.set_global_alpha(1.0);
                }
                DrawCmd::Text { pos, text, style } => {
                    ctx.set_fill_style_str(style.color);
                    ctx.set_font(style.font);
                    ctx.set_text_align("center");
                    ctx.set_text_baseline("middle");
                    ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
                }
                DrawCmd::Rect {
                    x,
                    y,
                    width,
                    height,
                    fill,
                } => {
                    ctx.set_fill_style_str(fill);
                    ctx.fill_rect(*x, *y, *width, *height);
                }
            }
        }
        Ok(())
    }
}
