#![allow(dead_code)]

use tagtree::{Context, TemplateError};

/// Route library `tracing` output through the test harness's captured stdout.
pub fn init_tracing() {
    // Another test in this binary may already have installed it.
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

pub fn ctx(json: serde_json::Value) -> Context {
    Context::from_json(&json).expect("test context must be a JSON object")
}

pub fn render(source: &str, json: serde_json::Value) -> Result<String, TemplateError> {
    init_tracing();
    tagtree::render(source, &ctx(json))
}
