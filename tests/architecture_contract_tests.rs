//! Architecture contract tests.

mod support;

use support::architecture::{
    find_lines_containing, find_non_export_lines_in_mod_files, read_relative,
};

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::port",
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::cli",
            "tokio::",
            "tracing::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = find_lines_containing(
        "src/port",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::cli",
        ],
    );

    assert!(hits.is_empty(), "found outer-layer imports in ports: {hits:#?}");
}

#[test]
fn resolution_authority_cannot_be_built_outside_the_crate() {
    let source = read_relative("src/domain/market.rs");
    let start = source
        .find("impl ResolutionAuthority {")
        .expect("ResolutionAuthority impl block");
    let block = &source[start..];
    assert!(
        block.contains("pub(crate) const fn new() -> Self"),
        "ResolutionAuthority::new must stay crate-private"
    );
    assert!(
        source.contains("#[derive(Debug)]\npub struct ResolutionAuthority {"),
        "ResolutionAuthority must not be Clone, Copy or Default"
    );
}

#[test]
fn mod_rs_is_export_only() {
    let violations = find_non_export_lines_in_mod_files("src");
    assert!(
        violations.is_empty(),
        "found non-export content in mod.rs files: {violations:#?}"
    );
}
