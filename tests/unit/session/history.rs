use super::*;

fn sheet(w: u32, h: u32) -> SpriteSheet {
    SpriteSheet::from_rgba8(w, h, vec![0; (w * h * 4) as usize]).unwrap()
}

#[test]
fn push_is_newest_first_and_activates() {
    let mut h = SheetHistory::new();
    assert!(h.is_empty());
    let a = h.push("walk.png", sheet(4, 4));
    let b = h.push("run.png", sheet(8, 2));

    assert_eq!(h.len(), 2);
    assert_eq!(h.entries()[0].id, b);
    assert_eq!(h.entries()[1].name, "walk.png");
    assert_eq!(h.active().unwrap().id, b);
    assert_ne!(a, b);
}

#[test]
fn select_switches_but_ignores_active_and_unknown() {
    let mut h = SheetHistory::new();
    let a = h.push("a.png", sheet(2, 2));
    let b = h.push("b.png", sheet(2, 2));

    assert!(!h.select(b));
    assert!(h.select(a));
    assert_eq!(h.active().unwrap().dimensions, ImageDimensions::new(2, 2).unwrap());
    assert!(!h.select(SheetId(99)));
    assert_eq!(h.active().unwrap().id, a);
}
