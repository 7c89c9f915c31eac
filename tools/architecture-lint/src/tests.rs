//! Unit coverage for layer classification and import collection.

use super::*;
use rstest::rstest;

fn lint_one(file: &str, contents: &str) -> Result<(), LintError> {
    lint_sources(&[LintSource::new(file, contents)])
}

fn violations(result: Result<(), LintError>) -> Vec<String> {
    match result {
        Ok(()) => Vec::new(),
        Err(LintError::Violations(found)) => found.iter().map(ToString::to_string).collect(),
        Err(other) => panic!("unexpected lint failure: {other}"),
    }
}

#[rstest]
#[case::domain("domain/alumni_status.rs", Some(Layer::Domain))]
#[case::nested_inbound("inbound/cli/commands.rs", Some(Layer::Inbound))]
#[case::outbound("outbound/dce/client.rs", Some(Layer::Outbound))]
#[case::config("config.rs", None)]
fn files_map_to_layers(#[case] file: &str, #[case] expected: Option<Layer>) {
    assert_eq!(Layer::of(Utf8Path::new(file)), expected);
}

#[rstest]
#[case::ports_from_inbound(
    "inbound/cli/state.rs",
    "use crate::domain::ports::ResearchProfileStore;"
)]
#[case::ports_from_outbound(
    "outbound/dce/profiles.rs",
    "use crate::domain::ports::{BackendError, ProfileStore};"
)]
#[case::domain_sibling("domain/profile_service.rs", "use super::ports::ProfileStore;")]
#[case::tracing_in_domain("domain/status_monitor.rs", "use tracing::debug;")]
#[case::tokio_in_domain("domain/status_monitor.rs", "use tokio::sync::watch;")]
#[case::cap_std_in_inbound(
    "inbound/cli/commands.rs",
    "use cap_std::{ambient_authority, fs::Dir};"
)]
fn allowed_imports_pass(#[case] file: &str, #[case] contents: &str) {
    assert!(violations(lint_one(file, contents)).is_empty());
}

#[rstest]
#[case::inbound_to_outbound(
    "inbound/cli/state.rs",
    "use crate::outbound::dce::DceHttpBackend;",
    "inbound/cli/state.rs: inbound code must not depend on crate::outbound"
)]
#[case::domain_to_config(
    "domain/status_monitor.rs",
    "use crate::config::PortalSettings;",
    "domain/status_monitor.rs: domain code must not depend on crate::config"
)]
#[case::domain_http(
    "domain/alumni_status.rs",
    "use reqwest::Client;",
    "domain/alumni_status.rs: domain code must not depend on external crate `reqwest`"
)]
#[case::outbound_cli(
    "outbound/dce/client.rs",
    "fn parse() { let _ = clap::Command::new(\"x\"); }",
    "outbound/dce/client.rs: outbound code must not depend on external crate `clap`"
)]
#[case::via_own_crate_name(
    "outbound/identity/toolkit.rs",
    "use portal::inbound::cli::CliState;",
    "outbound/identity/toolkit.rs: outbound code must not depend on crate::inbound"
)]
#[case::via_super(
    "domain/session.rs",
    "use super::super::outbound::identity::IdentityToolkitProvider;",
    "domain/session.rs: domain code must not depend on crate::outbound"
)]
fn forbidden_imports_are_reported(
    #[case] file: &str,
    #[case] contents: &str,
    #[case] expected: &str,
) {
    assert_eq!(violations(lint_one(file, contents)), vec![expected.to_owned()]);
}

#[test]
fn grouped_imports_report_each_dependency_once() {
    let found = violations(lint_one(
        "domain/research_service.rs",
        "use {reqwest::Client, crate::{inbound::cli, outbound::dce}};\n\
         fn f() { let _ = reqwest::Client::new(); }",
    ));
    assert_eq!(
        found,
        vec![
            "domain/research_service.rs: domain code must not depend on crate::inbound".to_owned(),
            "domain/research_service.rs: domain code must not depend on crate::outbound".to_owned(),
            "domain/research_service.rs: domain code must not depend on external crate `reqwest`"
                .to_owned(),
        ]
    );
}

#[test]
fn sources_outside_layers_are_rejected() {
    let result = lint_one("main.rs", "fn main() {}");
    assert!(matches!(result, Err(LintError::UnknownLayer { file }) if file == "main.rs"));
}

#[test]
fn invalid_rust_is_a_parse_error() {
    let result = lint_one("domain/auth.rs", "pub struct {");
    assert!(matches!(result, Err(LintError::Parse { .. })));
}

#[test]
fn walks_nested_layer_directories() {
    let temp = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 temp path");
    let dir = Dir::open_ambient_dir(&root, ambient_authority()).expect("open temp dir");
    dir.create_dir_all("src/inbound/cli").expect("create dirs");
    dir.create_dir_all("src/domain").expect("create dirs");
    dir.write("src/domain/mod.rs", "pub mod ports;").expect("write");
    dir.write("src/domain/notes.txt", "use reqwest::Client;").expect("write");
    dir.write(
        "src/inbound/cli/state.rs",
        "use crate::outbound::dce::DceHttpBackend;",
    )
    .expect("write");

    let Err(LintError::Violations(found)) = lint_portal(&root) else {
        panic!("expected a violation");
    };
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].file, "inbound/cli/state.rs");
    assert_eq!(found[0].dependency, Dependency::Module("outbound".to_owned()));
}

#[test]
fn missing_src_is_an_io_error() {
    let temp = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 temp path");
    assert!(matches!(lint_portal(&root), Err(LintError::Io { .. })));
}
