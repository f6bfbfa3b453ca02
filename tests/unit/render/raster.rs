use super::*;
use crate::{
    foundation::core::{Point, Rect, Rgba8},
    render::scene::{NodeShape, SceneItem},
};

fn scene() -> Scene {
    Scene {
        width: 40.0,
        height: 20.0,
        view_box: Rect::new(0.0, 0.0, 40.0, 20.0),
        background: Rgba8::rgb(10, 20, 30),
        items: vec![SceneItem::Marker {
            center: Point::new(30.0, 10.0),
            radius: 6.0,
            shape: NodeShape::Square,
            color: Rgba8::rgb(250, 0, 0),
            opacity: 1.0,
        }],
    }
}

#[test]
fn raster_size_follows_view_box_and_scale() {
    let img = rasterize(&scene(), 2.0).unwrap();
    assert_eq!(img.dimensions(), (80, 40));
    let bg = img.get_pixel(2, 2).0;
    assert_eq!(bg, [10, 20, 30, 255]);
    let marker = img.get_pixel(60, 20).0;
    assert!(marker[0] > 200 && marker[1] < 40);
}

#[test]
fn bad_scale_and_empty_scenes_are_errors() {
    assert!(rasterize(&scene(), 0.0).is_err());
    assert!(rasterize(&scene(), f64::NAN).is_err());
    let mut empty = scene();
    empty.view_box = Rect::new(0.0, 0.0, 0.0, 0.0);
    assert!(rasterize(&empty, 1.0).is_err());
}
