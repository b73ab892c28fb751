//! Unit tests for the client layer lint.

use rstest::fixture;
use rstest::rstest;

use super::*;

#[derive(Clone, Copy)]
struct LintSingle;

impl LintSingle {
    fn lint(self, file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
        lint_sources(&[LintSource {
            file: Utf8PathBuf::from(file),
            contents: contents.to_owned(),
        }])
    }
}

#[fixture]
fn lint_single() -> LintSingle {
    LintSingle
}

#[rstest]
#[case(
    "domain/lifecycle/mod.rs",
    "use crate::domain::ports::MatchRequestRepository; use tracing::info; fn f() { info!(\"x\"); }",
    true
)]
#[case(
    "domain/views.rs",
    "fn render(config: &str, url: &str) -> usize { config.len() + url.len() }",
    true
)]
#[case(
    "domain/lifecycle/mod.rs",
    "use crate::outbound::http::HttpMatchRequestRepository; fn f() {}",
    false
)]
#[case(
    "domain/identity.rs",
    "use mentorship_client::config::ClientSettings; fn f() {}",
    false
)]
#[case(
    "domain/match_request.rs",
    "fn parse(raw: &str) -> bool { url::Url::parse(raw).is_ok() }",
    false
)]
#[case("domain/user.rs", "use reqwest::Client; fn f() {}", false)]
#[case("domain/user.rs", "use clap::Parser; fn f() {}", false)]
#[case(
    "outbound/http/client.rs",
    "use crate::domain::ports::MatchRequestRepository; use reqwest::Client; fn f() {}",
    true
)]
#[case(
    "outbound/http/client.rs",
    "use ortho_config::OrthoConfig; fn f() {}",
    false
)]
#[case(
    "outbound/http/session.rs",
    "use super::super::super::config::ClientSettings; fn f() {}",
    false
)]
#[case(
    "config.rs",
    "use crate::outbound::http::HttpClientConfig; use ortho_config::OrthoConfig; fn f() {}",
    true
)]
#[case("config.rs", "use clap::Parser; fn f() {}", false)]
fn detects_boundary_violations(
    lint_single: LintSingle,
    #[case] file: &str,
    #[case] contents: &str,
    #[case] ok: bool,
) {
    let result = lint_single.lint(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
fn reports_each_forbidden_root_once(lint_single: LintSingle) {
    let result = lint_single.lint(
        "domain/enrichment.rs",
        "use reqwest::Client; fn f() { let _c = reqwest::Client::new(); let _u = reqwest::Url::parse(\"x\"); }",
    );
    let Err(ArchitectureLintError::Violations(violations)) = result else {
        panic!("expected violations, got {result:?}");
    };
    assert_eq!(violations.len(), 1, "violations: {violations:?}");
    assert_eq!(violations[0].file, Utf8PathBuf::from("domain/enrichment.rs"));
    assert!(violations[0].message.contains("external crate `reqwest`"));
}

#[rstest]
#[case("lib.rs")]
#[case("bin/match_requests.rs")]
fn composition_roots_are_not_layers(lint_single: LintSingle, #[case] file: &str) {
    let result = lint_single.lint(file, "fn main() {}");
    assert!(
        matches!(result, Err(ArchitectureLintError::Parse { .. })),
        "result: {result:?}"
    );
}

#[rstest]
fn unparsable_sources_are_reported(lint_single: LintSingle) {
    let result = lint_single.lint("domain/user.rs", "fn broken( {");
    assert!(
        matches!(result, Err(ArchitectureLintError::Parse { ref file, .. }) if file.as_str() == "domain/user.rs"),
        "result: {result:?}"
    );
}
