use super::*;

pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    match key {
        Key::H => model.show_hud = !model.show_hud,
        Key::G => model.show_guides = !model.show_guides,
        Key::Space => model.panic(),
        _ => {}
    }
}
