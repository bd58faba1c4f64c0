use tpart_core::errors::{ErrorInfo, TpError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("hyperedge", 3)
        .with_context("reason", "example")
}

#[test]
fn graph_error_surface() {
    let err = TpError::Graph(sample_info("empty-hyperedge", "hyperedge has no pins"));
    assert_eq!(err.info().code, "empty-hyperedge");
    assert_eq!(err.info().context.get("hyperedge"), Some(&"3".to_string()));
}

#[test]
fn config_error_surface() {
    let err = TpError::Config(ErrorInfo::new("num-parts", "at least two blocks are required"));
    assert_eq!(err.info().code, "num-parts");
    assert!(err.info().context.is_empty());
}

#[test]
fn precondition_error_surface() {
    let err = TpError::Precondition(sample_info("net-degree-drift", "net degrees drifted"));
    assert_eq!(err.info().code, "net-degree-drift");
    assert!(err.info().context.contains_key("reason"));
}

#[test]
fn display_includes_context_and_hint() {
    let err = TpError::Serde(
        ErrorInfo::new("yaml", "bad document")
            .with_context("line", 4)
            .with_hint("check indentation"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("serde error: bad document (code: yaml)"));
    assert!(rendered.contains("line=4"));
    assert!(rendered.ends_with("hint: check indentation"));
}
