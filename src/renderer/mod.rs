//! Rendering collaborator
//!
//! The simulation never draws. Each tick the session hands a [`SceneView`] to
//! a [`RenderSink`]; the browser build draws it on a 2D canvas.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use view::{BallSprite, DraftLine, LineSprite, SceneView};

/// Render collaborator: draws one frame from a read-only view
pub trait RenderSink {
    fn draw(&mut self, scene: &SceneView<'_>);
}
