//! Behaviour tests for the client layer guardrails.

use architecture_lint::{ArchitectureLintError, LintSource, Violation};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

#[derive(Debug, Default)]
struct LintWorld {
    sources: Vec<LintSource>,
    result: Option<Result<(), ArchitectureLintError>>,
}

impl LintWorld {
    fn add(&mut self, file: &str, contents: &str) {
        self.sources.push(LintSource {
            file: Utf8PathBuf::from(file),
            contents: contents.to_owned(),
        });
    }

    fn add_valid_modules(&mut self) {
        self.add(
            "domain/transfer.rs",
            "pub struct TransferId(String); impl TransferId { pub fn new(v: &str) -> Self { Self(v.to_owned()) } }",
        );
        self.add(
            "inbound/cli/commands.rs",
            "use crate::domain::transfer::TransferId; fn run() { let _id = TransferId::new(\"t-1\"); }",
        );
        self.add(
            "outbound/supabase/transfers.rs",
            "use crate::domain::transfer::TransferId; use reqwest::Client; pub struct Repo(Client); impl Repo { pub fn update(&self, _id: TransferId) {} }",
        );
    }

    fn violations(&self) -> Vec<Violation> {
        match self.result.as_ref().expect("lint must have run") {
            Ok(()) => panic!("expected violations, lint succeeded"),
            Err(ArchitectureLintError::Violations(violations)) => violations.clone(),
            Err(other) => panic!("expected violations error, got: {other:?}"),
        }
    }

    fn assert_violation(&self, file: &str, fragment: &str) {
        let violations = self.violations();
        assert!(
            violations
                .iter()
                .any(|violation| violation.file == file && violation.message.contains(fragment)),
            "expected violation in {file} containing '{fragment}', got: {violations:?}"
        );
    }
}

#[fixture]
fn world() -> LintWorld {
    LintWorld::default()
}

fn write_tree(root: &Utf8Path, sources: &[LintSource]) {
    let dir = Dir::open_ambient_dir(root, ambient_authority()).expect("open temp dir");
    for source in sources {
        let path = Utf8Path::new("client/src").join(&source.file);
        if let Some(parent) = path.parent() {
            dir.create_dir_all(parent).expect("create parent directories");
        }
        dir.write(&path, &source.contents).expect("write source file");
    }
}

#[given("valid domain, inbound, and outbound modules")]
fn valid_modules(world: &mut LintWorld) {
    world.add_valid_modules();
}

#[given("an inbound module that imports the outbound layer")]
fn inbound_imports_outbound(world: &mut LintWorld) {
    world.add(
        "inbound/cli/state.rs",
        "use land_registry::outbound::supabase::SupabaseAuth; fn wire() { let _ = SupabaseAuth::new; }",
    );
}

#[given("an inbound module that uses reqwest directly")]
fn inbound_uses_reqwest(world: &mut LintWorld) {
    world.add(
        "inbound/cli/commands.rs",
        "fn run() { let _ = reqwest::Client::new(); }",
    );
}

#[given("a domain module that imports clap")]
fn domain_imports_clap(world: &mut LintWorld) {
    world.add("domain/form.rs", "use clap::Args; fn field() {}");
}

#[given("an outbound module that imports the inbound layer")]
fn outbound_imports_inbound(world: &mut LintWorld) {
    world.add(
        "outbound/cloudinary/mod.rs",
        "use crate::inbound::cli::CliError; fn upload() {}",
    );
}

#[given("valid modules mixed with multiple boundary violations")]
fn valid_modules_with_violations(world: &mut LintWorld) {
    world.add_valid_modules();
    world.add(
        "inbound/cli/state.rs",
        "use crate::outbound::cloudinary::CloudinaryUploader; fn wire() {}",
    );
    world.add("domain/form.rs", "use clap::Args; fn field() {}");
}

#[when("the architecture lint runs")]
fn run_architecture_lint(world: &mut LintWorld) {
    let temp = TempDir::new().expect("tempdir");
    let root = Utf8Path::from_path(temp.path()).expect("utf-8 temp path");
    write_tree(root, &world.sources);
    world.result = Some(architecture_lint::lint_client_sources(&root.join("client")));
}

#[then("the lint succeeds")]
fn lint_succeeds(world: &mut LintWorld) {
    let outcome = world.result.as_ref().expect("lint must have run");
    assert!(outcome.is_ok(), "expected success, got: {outcome:?}");
}

#[then("the lint fails")]
fn lint_fails(world: &mut LintWorld) {
    let outcome = world.result.as_ref().expect("lint must have run");
    assert!(outcome.is_err(), "expected failure, got: {outcome:?}");
}

#[then("the lint fails due to outbound access from inbound")]
fn fails_on_outbound_access(world: &mut LintWorld) {
    world.assert_violation("inbound/cli/state.rs", "crate::outbound");
}

#[then("the lint fails due to HTTP client usage in the adapter")]
fn fails_on_http_client(world: &mut LintWorld) {
    world.assert_violation("inbound/cli/commands.rs", "external crate `reqwest`");
}

#[then("the lint fails due to CLI crate usage in the domain")]
fn fails_on_cli_crate(world: &mut LintWorld) {
    world.assert_violation("domain/form.rs", "external crate `clap`");
}

#[then("the lint fails due to inbound access from outbound")]
fn fails_on_inbound_access(world: &mut LintWorld) {
    world.assert_violation("outbound/cloudinary/mod.rs", "crate::inbound");
}

#[then("all boundary violations are reported")]
fn all_violations_reported(world: &mut LintWorld) {
    assert_eq!(world.violations().len(), 2);
    world.assert_violation("inbound/cli/state.rs", "crate::outbound");
    world.assert_violation("domain/form.rs", "external crate `clap`");
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "Well-layered modules pass"
)]
fn well_layered_modules_pass(world: LintWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "The CLI adapter reaches into the Supabase adapter"
)]
fn cli_adapter_reaches_into_supabase(world: LintWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "The CLI adapter issues HTTP requests itself"
)]
fn cli_adapter_issues_http_requests(world: LintWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "Domain code parses command-line arguments"
)]
fn domain_parses_arguments(world: LintWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "An outbound adapter depends on the CLI adapter"
)]
fn outbound_depends_on_cli(world: LintWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "Every violation is reported in one run"
)]
fn every_violation_reported(world: LintWorld) {
    drop(world);
}
