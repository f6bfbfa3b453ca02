use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CourseError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(CourseError::parse("x").to_string().contains("parse error:"));
    assert!(CourseError::render("x").to_string().contains("render error:"));
    assert!(
        CourseError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CourseError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
