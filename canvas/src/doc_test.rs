#![allow(clippy::float_cmp)]

use super::*;
use crate::annotation::RatingTag;
use crate::palette::ImagePalette;

fn registry() -> ObjectRegistry {
    ObjectRegistry::new(64.0)
}

fn place(reg: &mut ObjectRegistry, kind: BuiltinKind, x: f64, y: f64) -> ObjectId {
    reg.create(ObjectSource::Builtin(kind), Point::new(x, y)).unwrap().id
}

fn loaded_palette(name: &str, w: f64, h: f64) -> (ImagePalette, String) {
    let mut palette = ImagePalette::new();
    let key = palette.begin(name, vec![0u8; 4]);
    palette.finish(&key, Size::new(w, h)).unwrap();
    (palette, key)
}

// =============================================================
// BuiltinKind
// =============================================================

#[test]
fn builtin_kind_parses_toolbar_ids() {
    for kind in BuiltinKind::ALL {
        assert_eq!(kind.as_str().parse::<BuiltinKind>().unwrap(), kind);
    }
}

#[test]
fn builtin_kind_accepts_long_wall_names() {
    assert_eq!("wall-horizontal".parse::<BuiltinKind>().unwrap(), BuiltinKind::WallH);
    assert_eq!("wall-vertical".parse::<BuiltinKind>().unwrap(), BuiltinKind::WallV);
}

#[test]
fn builtin_kind_rejects_unknown() {
    let err = "fridge".parse::<BuiltinKind>().unwrap_err();
    assert_eq!(err, EditError::UnknownKind("fridge".into()));
}

#[test]
fn builtin_kind_serde_matches_toolbar_ids() {
    assert_eq!(serde_json::to_string(&BuiltinKind::WallV).unwrap(), "\"wall-v\"");
    assert_eq!(serde_json::to_string(&ObjectKind::CustomImage).unwrap(), "\"custom-image\"");
    assert_eq!(serde_json::to_string(&ObjectKind::Builtin(BuiltinKind::Lamp)).unwrap(), "\"lamp\"");
}

#[test]
fn walls_rest_on_thinner_stroke() {
    assert_eq!(BuiltinKind::WallH.resting_stroke_width(), 1.0);
    assert_eq!(BuiltinKind::WallV.resting_stroke_width(), 1.0);
    assert_eq!(BuiltinKind::Table.resting_stroke_width(), 2.0);
    assert_eq!(BuiltinKind::Room.resting_stroke_width(), 2.0);
}

// =============================================================
// Geometry
// =============================================================

#[test]
fn fit_within_scales_down_preserving_aspect() {
    let s = Size::new(512.0, 256.0).fit_within(128.0);
    assert_eq!(s, Size::new(128.0, 64.0));
    let s = Size::new(100.0, 400.0).fit_within(128.0);
    assert_eq!(s, Size::new(32.0, 128.0));
}

#[test]
fn fit_within_never_scales_up() {
    assert_eq!(Size::new(20.0, 50.0).fit_within(128.0), Size::new(20.0, 50.0));
    assert_eq!(Size::new(128.0, 128.0).fit_within(128.0), Size::new(128.0, 128.0));
}

#[test]
fn rect_inflate_grows_every_side() {
    let r = Rect { x: 10.0, y: 20.0, width: 30.0, height: 40.0 }.inflate(2.0);
    assert_eq!(r, Rect { x: 8.0, y: 18.0, width: 34.0, height: 44.0 });
}

// =============================================================
// ObjectRegistry: create
// =============================================================

#[test]
fn create_snaps_center_to_grid() {
    let mut reg = registry();
    let obj = reg.create(ObjectSource::Builtin(BuiltinKind::Chair), Point::new(100.0, 100.0)).unwrap();
    assert_eq!(obj.position, Point::new(128.0, 128.0));
    assert_eq!(obj.size, Size::new(40.0, 40.0));
    assert_eq!(obj.depth, 1);
    assert_eq!(obj.bounds(), Rect { x: 108.0, y: 108.0, width: 40.0, height: 40.0 });
}

#[test]
fn create_assigns_strictly_increasing_unique_depths() {
    let mut reg = registry();
    let mut last = 0;
    for (i, kind) in BuiltinKind::ALL.into_iter().cycle().take(40).enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let x = (i * 37) as f64;
        let depth = reg.create(ObjectSource::Builtin(kind), Point::new(x, -x)).unwrap().depth;
        assert!(depth > last, "depth {depth} not above {last}");
        last = depth;
    }
    let mut depths: Vec<i64> = reg.iter().map(|o| o.depth).collect();
    depths.dedup();
    assert_eq!(depths.len(), 40);
}

#[test]
fn create_assigns_unique_ids_and_handles() {
    let mut reg = registry();
    let a = place(&mut reg, BuiltinKind::Sofa, 0.0, 0.0);
    let b = place(&mut reg, BuiltinKind::Sofa, 0.0, 0.0);
    assert_ne!(a, b);
    assert_ne!(reg.get(&a).unwrap().handle, reg.get(&b).unwrap().handle);
}

#[test]
fn create_builtin_uses_template_style() {
    let mut reg = registry();
    let id = place(&mut reg, BuiltinKind::WallH, 0.0, 0.0);
    let obj = reg.get(&id).unwrap();
    match &obj.body {
        Body::Shape { kind, fill, stroke } => {
            assert_eq!(*kind, BuiltinKind::WallH);
            assert_eq!(*fill, 0x8b7355);
            assert_eq!(*stroke, Stroke { width: 1.0, color: 0x5a4a3a });
        }
        Body::Image { .. } => panic!("expected shape"),
    }
    assert!(!obj.shows_selected());
    assert!(obj.annotation.is_none());
}

#[test]
fn create_image_scales_to_max_size() {
    let (palette, key) = loaded_palette("big.png", 1024.0, 512.0);
    let mut reg = registry();
    let upload = palette.get(&key).unwrap();
    let obj = reg.create(ObjectSource::Image { upload, max_size: 128.0 }, Point::new(70.0, 10.0)).unwrap();
    assert_eq!(obj.kind(), ObjectKind::CustomImage);
    assert_eq!(obj.position, Point::new(64.0, 0.0));
    assert_eq!(obj.size, Size::new(128.0, 64.0));
    assert_eq!(obj.image().map(|i| i.key.as_str()), Some(key.as_str()));
}

#[test]
fn create_image_pending_fails_without_mutation() {
    let mut palette = ImagePalette::new();
    let key = palette.begin("slow.png", vec![1]);
    let mut reg = registry();
    let upload = palette.get(&key).unwrap();
    let err = reg.create(ObjectSource::Image { upload, max_size: 128.0 }, Point::new(0.0, 0.0)).unwrap_err();
    assert_eq!(err, EditError::ResourceNotReady { name: "slow.png".into() });
    assert!(reg.is_empty());
    // The failed attempt must not consume a depth value.
    assert_eq!(place(&mut reg, BuiltinKind::Plant, 0.0, 0.0), reg.iter().next().unwrap().id);
    assert_eq!(reg.iter().next().unwrap().depth, 1);
}

// =============================================================
// ObjectRegistry: remove / replace / raise
// =============================================================

#[test]
fn remove_is_idempotent() {
    let mut reg = registry();
    let id = place(&mut reg, BuiltinKind::Desk, 0.0, 0.0);
    assert!(reg.remove(&id).is_some());
    assert!(reg.remove(&id).is_none());
    assert!(reg.is_empty());
}

#[test]
fn remove_drops_decoration() {
    let (palette, key) = loaded_palette("a.png", 32.0, 32.0);
    let mut reg = registry();
    let upload = palette.get(&key).unwrap();
    let id = reg.create(ObjectSource::Image { upload, max_size: 128.0 }, Point::new(0.0, 0.0)).unwrap().id;
    reg.get_mut(&id).unwrap().apply_selected_style();
    let removed = reg.remove(&id).unwrap();
    assert!(removed.outline().is_none());
}

#[test]
fn remove_all_empties_and_keeps_depth_counter() {
    let mut reg = registry();
    place(&mut reg, BuiltinKind::Bed, 0.0, 0.0);
    place(&mut reg, BuiltinKind::Lamp, 0.0, 0.0);
    let removed = reg.remove_all();
    assert_eq!(removed.len(), 2);
    assert!(reg.is_empty());
    let id = place(&mut reg, BuiltinKind::Lamp, 0.0, 0.0);
    assert_eq!(reg.get(&id).unwrap().depth, 3);
}

#[test]
fn replace_keeps_slot_and_returns_old() {
    let mut reg = registry();
    let a = place(&mut reg, BuiltinKind::Table, 0.0, 0.0);
    let b = place(&mut reg, BuiltinKind::Chair, 0.0, 0.0);
    let c = place(&mut reg, BuiltinKind::Bed, 0.0, 0.0);

    let mut replacement = reg.get(&b).unwrap().clone();
    replacement.handle = reg.allocate_handle();
    let new_handle = replacement.handle;
    let old = reg.replace(replacement).unwrap();

    assert_eq!(old.id, b);
    assert_ne!(old.handle, new_handle);
    let order: Vec<ObjectId> = reg.iter().map(|o| o.id).collect();
    assert_eq!(order, vec![a, b, c]);
    assert_eq!(reg.get(&b).unwrap().handle, new_handle);
    assert_eq!(reg.len(), 3);
}

#[test]
fn replace_unknown_id_fails() {
    let mut reg = registry();
    let id = place(&mut reg, BuiltinKind::Table, 0.0, 0.0);
    let mut other = reg.get(&id).unwrap().clone();
    other.id = Uuid::new_v4();
    assert!(matches!(reg.replace(other), Err(EditError::ObjectNotFound(_))));
}

#[test]
fn raise_assigns_new_max_depth() {
    let mut reg = registry();
    let a = place(&mut reg, BuiltinKind::Table, 0.0, 0.0);
    place(&mut reg, BuiltinKind::Chair, 0.0, 0.0);
    assert_eq!(reg.raise(&a), Some(3));
    assert_eq!(reg.get(&a).unwrap().depth, 3);
    assert_eq!(reg.raise(&Uuid::new_v4()), None);
}

#[test]
fn sorted_by_depth_is_bottom_first() {
    let mut reg = registry();
    let a = place(&mut reg, BuiltinKind::Room, 0.0, 0.0);
    let b = place(&mut reg, BuiltinKind::Bed, 0.0, 0.0);
    reg.raise(&a);
    let order: Vec<ObjectId> = reg.sorted_by_depth().into_iter().map(|o| o.id).collect();
    assert_eq!(order, vec![b, a]);
}

#[test]
fn references_image_tracks_placed_images() {
    let (palette, key) = loaded_palette("a.png", 8.0, 8.0);
    let mut reg = registry();
    assert!(!reg.references_image(&key));
    let upload = palette.get(&key).unwrap();
    let id = reg.create(ObjectSource::Image { upload, max_size: 128.0 }, Point::new(0.0, 0.0)).unwrap().id;
    assert!(reg.references_image(&key));
    reg.remove(&id);
    assert!(!reg.references_image(&key));
}

// =============================================================
// Selection styles
// =============================================================

#[test]
fn builtin_selected_style_is_bold_highlight() {
    let mut reg = registry();
    let id = place(&mut reg, BuiltinKind::Chair, 0.0, 0.0);
    let obj = reg.get_mut(&id).unwrap();
    obj.apply_selected_style();
    assert!(obj.shows_selected());
    assert_eq!(stroke_of(obj), Stroke { width: 3.0, color: 0x00ff00 });
    obj.apply_unselected_style();
    assert!(!obj.shows_selected());
    assert_eq!(stroke_of(obj), Stroke { width: 2.0, color: 0x3d2817 });
}

fn stroke_of(obj: &PlacedObject) -> Stroke {
    match &obj.body {
        Body::Shape { stroke, .. } => *stroke,
        Body::Image { .. } => panic!("expected shape"),
    }
}

#[test]
fn image_selected_style_owns_outline_above_object() {
    let (palette, key) = loaded_palette("a.png", 40.0, 20.0);
    let mut reg = registry();
    let upload = palette.get(&key).unwrap();
    let id = reg.create(ObjectSource::Image { upload, max_size: 128.0 }, Point::new(0.0, 0.0)).unwrap().id;
    let obj = reg.get_mut(&id).unwrap();
    obj.apply_selected_style();
    let outline = *obj.outline().unwrap();
    assert_eq!(outline.depth, obj.depth + 1);
    assert_eq!(outline.rect, Rect { x: -22.0, y: -12.0, width: 44.0, height: 24.0 });

    obj.position = Point::new(100.0, 100.0);
    obj.refresh_decoration();
    assert_eq!(obj.outline().unwrap().rect.x, 78.0);

    obj.apply_unselected_style();
    assert!(obj.outline().is_none());
    // Refresh without an outline must not create one.
    obj.refresh_decoration();
    assert!(obj.outline().is_none());
}

#[test]
fn annotation_survives_clone() {
    let mut reg = registry();
    let id = place(&mut reg, BuiltinKind::Chair, 0.0, 0.0);
    let obj = reg.get_mut(&id).unwrap();
    crate::annotation::attach(obj, crate::annotation::MetadataRecord::new("a", "b", RatingTag::FourS));
    let copy = obj.clone();
    assert_eq!(copy.annotation, obj.annotation);
}
