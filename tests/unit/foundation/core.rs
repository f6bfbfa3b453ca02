use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_frame_to_secs() {
    let fps = Fps::new(30, 1).unwrap();
    assert!((fps.frame_to_secs(FrameIndex(45)) - 1.5).abs() < 1e-12);
    assert_eq!(fps.secs_to_frames_ceil(2.01), 61);
}

#[test]
fn palette_wraps() {
    assert_eq!(traveler_color(0), traveler_color(10));
    assert_ne!(traveler_color(0), traveler_color(1));
    assert_eq!(traveler_color(1).to_hex(), "#3498db");
}
