//! Hover card example
//!
//! Headless run of a card that fades to a highlight color while the pointer
//! is over it and back when it leaves. Frames are rendered on the CPU and the
//! center pixel is logged at `info` level.
//!
//! Run with `RUST_LOG=debug` to also see transitions start and finish.

use std::rc::Rc;

use statewise::{
    catppuccin::mocha, Entity, EntityConfig, InputState, StandardEvent, Style,
    TransitionOptions,
};
use statewise_raster::{Canvas, RasterRenderer};

const FRAME_DT: f32 = 1.0 / 60.0;
const FADE: f32 = 0.25;

fn main() {
    env_logger::init();

    let renderer = Rc::new(RasterRenderer::new());
    let config = EntityConfig::new((20, 20, 80, 40))
        .with_state(
            "default",
            Style::new()
                .with_bg(mocha::SURFACE0)
                .with_border(mocha::OVERLAY0)
                .with_border_width(1),
        )
        .with_state(
            "hover",
            Style::new()
                .with_bg(mocha::LAVENDER)
                .with_border(mocha::TEXT),
        );

    let mut card = match Entity::new(renderer, config) {
        Ok(card) => card,
        Err(err) => {
            log::error!("failed to create card: {err}");
            return;
        }
    };

    card.on(StandardEvent::Hover, |card, hovered| {
        let target = if hovered { "hover" } else { "default" };
        let options = TransitionOptions::new().with_easing("sine_in_out");
        if let Err(err) = card.transition(target, FADE, &options) {
            log::warn!("hover transition failed: {err}");
        }
    });

    let mut input = InputState::new();
    let path = [(0.0, 0.0), (50.0, 35.0), (60.0, 40.0), (150.0, 90.0)];

    for (x, y) in path {
        let event = input.cursor_moved((x, y));
        card.handle_event(&event);

        for _ in 0..30 {
            card.update(FRAME_DT);
        }

        let mut screen = Canvas::new(120, 80);
        card.draw(&mut screen);
        log::info!(
            "pointer at ({x}, {y}) state={:?} center={:?}",
            card.selected_state(),
            screen.pixel(60, 40)
        );
    }
}
