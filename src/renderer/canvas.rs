//! 2D canvas renderer (browser only)

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{LineSprite, RenderSink, SceneView};

/// Draws a [`SceneView`] with the canvas 2D API
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Grab the 2D context of `canvas`, `None` if the browser refuses
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }

    fn line(&self, line: &LineSprite<'_>) {
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(line.color);
        self.ctx.move_to(line.p1.x as f64, line.p1.y as f64);
        self.ctx.line_to(line.p2.x as f64, line.p2.y as f64);
        self.ctx.stroke();
    }

    /// Small square marker centered on a point
    fn marker(&self, x: f32, y: f32, half: f32) {
        let size = (half * 2.0 + 1.0) as f64;
        self.ctx
            .fill_rect((x - half) as f64, (y - half) as f64, size, size);
    }
}

impl RenderSink for CanvasRenderer {
    fn draw(&mut self, scene: &SceneView<'_>) {
        self.ctx.set_fill_style_str(scene.background());
        self.ctx
            .fill_rect(0.0, 0.0, scene.width() as f64, scene.height() as f64);

        // Line in progress: both ends marked, then the line itself
        if let Some(draft) = scene.draft_line() {
            self.ctx.set_fill_style_str(draft.color);
            self.marker(draft.p1.x, draft.p1.y, 1.0);
            self.marker(draft.p2.x, draft.p2.y, 1.0);
            self.line(&draft);
        }

        for line in scene.segments() {
            self.line(&line);
        }

        self.ctx.set_stroke_style_str(crate::consts::BALL_COLOR);
        for pos in scene.droppers() {
            self.ctx
                .stroke_rect((pos.x - 3.0) as f64, (pos.y - 3.0) as f64, 6.0, 6.0);
        }

        for ball in scene.balls() {
            self.ctx.set_fill_style_str(ball.color);
            self.marker(ball.pos.x, ball.pos.y, ball.radius);
        }

        if let Some(status) = scene.status_label() {
            self.ctx.set_fill_style_str(crate::consts::BALL_COLOR);
            self.ctx.set_font("12px monospace");
            let _ = self
                .ctx
                .fill_text(&status, 6.0, (scene.height() - 6.0) as f64);
        }
    }
}
