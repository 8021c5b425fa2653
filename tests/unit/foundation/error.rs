use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ValidatorError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        ValidatorError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    let parse = ValidatorError::from(ParseError::UnknownNode {
        name: "X".to_string(),
        line: 3,
    });
    assert_eq!(parse.to_string(), "parse error: line 3: unknown node 'X'");
}

#[test]
fn io_error_names_the_path() {
    let err = ValidatorError::io("scenes/a.ma", std::io::Error::other("boom"));
    let msg = err.to_string();
    assert!(msg.contains("scenes/a.ma"));
    assert!(msg.contains("boom"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ValidatorError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
