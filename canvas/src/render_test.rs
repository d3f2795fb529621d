use super::*;
use crate::doc::{BuiltinKind, ObjectSource, Size};
use crate::palette::ImagePalette;

fn ui_with_hover(hovered: Option<ObjectId>, pointer: Option<Point>) -> UiState {
    UiState { hovered, pointer_screen: pointer, ..UiState::default() }
}

#[test]
fn grid_covers_viewport_at_identity() {
    let layer = grid_layer(&Camera::default(), 64.0, 256.0, 128.0);
    // x = 0, 64, 128, 192, 256 and y = 0, 64, 128
    assert_eq!(layer.lines.len(), 8);
    assert_eq!(layer.color, 0xcccccc);
    assert!((layer.alpha - 0.3).abs() < f64::EPSILON);
    assert_eq!(layer.lines[0], GridLine { from: Point::new(0.0, 0.0), to: Point::new(0.0, 128.0) });
}

#[test]
fn grid_follows_pan_and_zoom() {
    let camera = Camera { pan_x: -32.0, pan_y: 0.0, zoom: 0.5 };
    let layer = grid_layer(&camera, 64.0, 128.0, 64.0);
    let first = layer.lines[0];
    // World x range is 64..320; first line sits on the 64 multiple.
    assert!((first.from.x - 64.0).abs() < f64::EPSILON);
    assert!(layer.lines.iter().all(|l| (l.from.x / 64.0).fract() == 0.0 || (l.from.y / 64.0).fract() == 0.0));
}

#[test]
fn grid_empty_for_zero_viewport_or_bad_cell() {
    assert!(grid_layer(&Camera::default(), 64.0, 0.0, 100.0).lines.is_empty());
    assert!(grid_layer(&Camera::default(), 0.0, 100.0, 100.0).lines.is_empty());
}

#[test]
fn objects_drawn_bottom_first() {
    let mut reg = ObjectRegistry::new(64.0);
    let a = reg.create(ObjectSource::Builtin(BuiltinKind::Room), Point::new(0.0, 0.0)).unwrap().id;
    let b = reg.create(ObjectSource::Builtin(BuiltinKind::Bed), Point::new(0.0, 0.0)).unwrap().id;
    reg.raise(&a);

    let list = display_list(&reg, &Camera::default(), &UiState::default(), &CanvasSettings::default(), 0.0, 0.0);
    let ids: Vec<ObjectId> = list
        .items
        .iter()
        .map(|cmd| match cmd {
            DrawCommand::Shape { id, .. } | DrawCommand::Image { id, .. } => *id,
            DrawCommand::Outline { owner, .. } => *owner,
        })
        .collect();
    assert_eq!(ids, vec![b, a]);
    assert!(list.items.windows(2).all(|w| w[0].depth() <= w[1].depth()));
}

#[test]
fn image_outline_follows_owner_and_ties_break_after_objects() {
    let mut palette = ImagePalette::new();
    let key = palette.begin("rug.png", vec![0u8]);
    palette.finish(&key, Size::new(32.0, 32.0)).unwrap();
    let mut reg = ObjectRegistry::new(64.0);
    let upload = palette.get(&key).unwrap();
    let img = reg.create(ObjectSource::Image { upload, max_size: 128.0 }, Point::new(0.0, 0.0)).unwrap().id;
    let chair = reg.create(ObjectSource::Builtin(BuiltinKind::Chair), Point::new(0.0, 0.0)).unwrap().id;
    reg.get_mut(&img).unwrap().apply_selected_style();

    let list = display_list(&reg, &Camera::default(), &UiState::default(), &CanvasSettings::default(), 0.0, 0.0);

    assert_eq!(list.items.len(), 3);
    assert!(matches!(&list.items[0], DrawCommand::Image { id, tint: 0xffffff, texture, .. } if *id == img && *texture == key));
    assert!(matches!(&list.items[1], DrawCommand::Shape { id, depth: 2, .. } if *id == chair));
    assert!(matches!(&list.items[2], DrawCommand::Outline { owner, depth: 2, .. } if *owner == img));
}

#[test]
fn tooltip_needs_hover_and_pointer() {
    let mut reg = ObjectRegistry::new(64.0);
    let id = reg.create(ObjectSource::Builtin(BuiltinKind::Desk), Point::new(0.0, 0.0)).unwrap().id;
    let settings = CanvasSettings::default();

    let list = display_list(&reg, &Camera::default(), &ui_with_hover(Some(id), None), &settings, 0.0, 0.0);
    assert!(list.tooltip.is_none());

    let ui = ui_with_hover(Some(id), Some(Point::new(40.0, 50.0)));
    let tooltip = display_list(&reg, &Camera::default(), &ui, &settings, 0.0, 0.0).tooltip.unwrap();
    assert_eq!(tooltip.at, Point::new(55.0, 65.0));
    assert!(tooltip.text.starts_with("desk\n"));

    let ui = ui_with_hover(Some(uuid::Uuid::new_v4()), Some(Point::new(0.0, 0.0)));
    assert!(display_list(&reg, &Camera::default(), &ui, &settings, 0.0, 0.0).tooltip.is_none());
}

#[test]
fn draw_command_serializes_tagged() {
    let mut reg = ObjectRegistry::new(64.0);
    reg.create(ObjectSource::Builtin(BuiltinKind::Lamp), Point::new(0.0, 0.0)).unwrap();
    let list = display_list(&reg, &Camera::default(), &UiState::default(), &CanvasSettings::default(), 0.0, 0.0);
    let value = serde_json::to_value(&list).unwrap();
    assert_eq!(value["items"][0]["type"], "shape");
    assert_eq!(value["items"][0]["fill"], 0xffd700);
    assert_eq!(value["camera"]["zoom"], 1.0);
}
