//! Generation runs against the real filesystem and embedded payload.

use std::path::{Path, PathBuf};

use ngs_adapters::{EmbeddedTemplates, LocalFilesystem, MemoryFilesystem, ProcessRunner};
use ngs_core::application::ParameterFlags;
use ngs_core::prelude::*;
use walkdir::WalkDir;

fn flags(name: &str, module: &str, path: &Path) -> ParameterFlags {
    ParameterFlags {
        name: Some(name.into()),
        module: Some(module.into()),
        description: Some("Acme billing API".into()),
        port: Some("9090".into()),
        path: Some(path.display().to_string()),
    }
}

fn local_service(strategy: WriteStrategy, bootstrap: Option<BootstrapCommand>) -> GenerationService {
    GenerationService::new(
        Manifest::builtin().unwrap(),
        Box::new(EmbeddedTemplates::new()),
        Box::new(LocalFilesystem::new()),
        Box::new(ProcessRunner::default()),
        GenerationOptions {
            strategy,
            bootstrap,
            base_dir: None,
        },
    )
}

fn tree(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}

fn manifest_targets() -> Vec<PathBuf> {
    let mut targets: Vec<_> = Manifest::builtin()
        .unwrap()
        .iter()
        .map(|e| e.target().as_path().to_path_buf())
        .collect();
    targets.sort();
    targets
}

#[test]
fn generated_tree_matches_manifest_and_is_fully_rendered() {
    let parent = tempfile::tempdir().unwrap();
    let root = parent.path().join("acme");

    let result = local_service(WriteStrategy::Staged, None)
        .run(flags("acme", "api", &root), None)
        .unwrap();

    assert_eq!(tree(&root), manifest_targets());
    for file in tree(&root) {
        let body = std::fs::read_to_string(root.join(&file)).unwrap();
        assert!(
            !body.contains("{{"),
            "{} still has template markers",
            file.display()
        );
    }

    let go_mod = std::fs::read_to_string(root.join("go.mod")).unwrap();
    assert!(go_mod.starts_with("module acme/api\n"));
    let env = std::fs::read_to_string(root.join(".env.local")).unwrap();
    assert!(env.starts_with("# ACME local environment"));
    assert!(env.contains("\nACME_SERVER_PORT=9090\n"));
    let key_line = format!("\nACME_CSRF_AUTH_KEY={}\n", result.params.csrf_auth_key());
    assert!(env.contains(&key_line));
    let root_cmd = std::fs::read_to_string(root.join("cmd/root.go")).unwrap();
    assert!(root_cmd.contains("\"acme/api/internal/conf\""));
    assert!(root_cmd.contains("os.Getenv(\"ACME_ENVIRONMENT\")"));
    // Literal braces in Go bodies survive rendering.
    let http_test =
        std::fs::read_to_string(root.join("internal/tests/shared/http/http_test.go")).unwrap();
    assert!(http_test.contains("}}"));

    // Nothing besides the project is left beside it.
    let siblings: Vec<_> = std::fs::read_dir(parent.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(siblings, ["acme"]);
}

#[test]
fn rendering_is_deterministic_for_equal_parameters() {
    let parent = tempfile::tempdir().unwrap();
    let service = local_service(WriteStrategy::Direct, None);
    let params = service
        .run(flags("acme", "github.com/acme/api", &parent.path().join("one")), None)
        .unwrap()
        .params;

    let raw = RawParameters {
        name: params.name().into(),
        module: params.module().into(),
        description: params.description().into(),
        port: params.port().into(),
        destination_path: parent.path().join("two").display().to_string(),
    };
    let again = ParameterSet::from_raw(raw, None, params.csrf_auth_key()).unwrap();
    service.generate(again).unwrap();

    for file in manifest_targets() {
        assert_eq!(
            std::fs::read(parent.path().join("one").join(&file)).unwrap(),
            std::fs::read(parent.path().join("two").join(&file)).unwrap(),
            "{} differs",
            file.display()
        );
    }
}

#[cfg(unix)]
#[test]
fn failing_bootstrap_keeps_files_and_reports_output() {
    let parent = tempfile::tempdir().unwrap();
    let root = parent.path().join("acme");
    let bootstrap = BootstrapCommand::new("sh", ["-c", "echo 'go: module lookup disabled' >&2; exit 1"]);

    let failure = local_service(WriteStrategy::Staged, Some(bootstrap))
        .run(flags("acme", "api", &root), None)
        .unwrap_err();

    assert_eq!(failure.stage, GenerationState::Bootstrapping);
    assert!(failure.to_string().contains("go: module lookup disabled"));
    assert_eq!(tree(&root), manifest_targets());
}

#[cfg(unix)]
#[test]
fn bootstrap_runs_inside_the_project() {
    let parent = tempfile::tempdir().unwrap();
    let root = parent.path().join("acme");
    let bootstrap = BootstrapCommand::new("sh", ["-c", "head -n 1 go.mod"]);

    let result = local_service(WriteStrategy::Staged, Some(bootstrap))
        .run(flags("acme", "api", &root), None)
        .unwrap();

    assert_eq!(result.bootstrap_output.as_deref(), Some("module acme/api\n"));
}

#[test]
fn missing_absolute_parent_writes_nothing() {
    let parent = tempfile::tempdir().unwrap();
    let root = parent.path().join("missing").join("acme");

    let failure = local_service(WriteStrategy::Direct, None)
        .run(flags("acme", "api", &root), None)
        .unwrap_err();

    assert_eq!(failure.stage, GenerationState::ValidatingPath);
    assert_eq!(failure.error.kind(), "PathError");
    assert!(!parent.path().join("missing").exists());
}

#[test]
fn memory_filesystem_receives_the_whole_manifest() {
    let parent = tempfile::tempdir().unwrap();
    let root = parent.path().join("acme");
    let fs = MemoryFilesystem::new();
    let service = GenerationService::new(
        Manifest::builtin().unwrap(),
        Box::new(EmbeddedTemplates::new()),
        Box::new(fs.clone()),
        Box::new(ProcessRunner::default()),
        GenerationOptions {
            bootstrap: None,
            ..GenerationOptions::default()
        },
    );

    let result = service.run(flags("acme", "api", &root), None).unwrap();

    assert_eq!(fs.list_files().len(), result.written_files.len());
    let main = fs.read_file(&root.join("main.go")).unwrap();
    assert!(String::from_utf8(main).unwrap().contains("\"acme/api/cmd\""));
}
