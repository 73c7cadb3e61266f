//! Descriptor file integration tests: scan, parse errors, and version
//! round-trips through the on-disk YAML.

use assert_fs::prelude::*;
use catalog_core::{descriptor, Descriptor, DescriptorError, DescriptorKind};
use predicates::prelude::predicate;
use rstest::rstest;

// ---------------------------------------------------------------------------
// 1. Round-trip through disk
// ---------------------------------------------------------------------------

#[test]
fn prepend_then_save_yields_newest_first() {
    let work = assert_fs::TempDir::new().expect("tempdir");
    let file = work.child("platforms/bom.yaml");
    file.write_str("group-id: io.quarkus\nartifact-id: quarkus-bom\nversions: [1.0]\n")
        .expect("write");

    let mut d = Descriptor::load(file.path(), DescriptorKind::Platform).expect("load");
    assert_eq!(d.versions(), vec!["1.0"]);
    d.prepend_version("2.0");
    d.save().expect("save");

    let reloaded = Descriptor::load(file.path(), DescriptorKind::Platform).expect("reload");
    assert_eq!(reloaded.versions(), vec!["2.0", "1.0"]);
    file.assert(predicate::str::contains("artifact-id: quarkus-bom"));
}

#[test]
fn save_keeps_extra_keys() {
    let work = assert_fs::TempDir::new().expect("tempdir");
    let file = work.child("extensions/ext.yaml");
    file.write_str(
        "maven-repository: https://repo.example.com/maven2\n\
         group-id: org.acme\n\
         artifact-id: acme-ext\n\
         notes: keep me\n\
         versions:\n  - \"0.9\"\n",
    )
    .expect("write");

    let mut d = Descriptor::load(file.path(), DescriptorKind::Extension).expect("load");
    d.prepend_version("1.0");
    d.save().expect("save");

    file.assert(predicate::str::contains("notes: keep me"));
    file.assert(predicate::str::contains("maven-repository: https://repo.example.com/maven2"));
}

// ---------------------------------------------------------------------------
// 2. Parse errors
// ---------------------------------------------------------------------------

#[rstest]
#[case::missing_group("artifact-id: a\n", "group-id")]
#[case::missing_artifact("group-id: g\n", "artifact-id")]
#[case::broken_yaml(": : corrupt : yaml : !!!\n  - broken: [unclosed", "bad.yaml")]
fn parse_errors_name_the_problem(#[case] contents: &str, #[case] needle: &str) {
    let work = assert_fs::TempDir::new().expect("tempdir");
    let file = work.child("bad.yaml");
    file.write_str(contents).expect("write");

    let err = Descriptor::load(file.path(), DescriptorKind::Extension).unwrap_err();
    assert!(matches!(err, DescriptorError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains(needle), "got: {err}");
}

#[test]
fn load_missing_file_is_io_error_with_path() {
    let work = assert_fs::TempDir::new().expect("tempdir");
    let err = Descriptor::load(&work.path().join("gone.yaml"), DescriptorKind::Platform)
        .unwrap_err();
    assert!(matches!(err, DescriptorError::Io { .. }));
    assert!(err.to_string().contains("gone.yaml"));
}

// ---------------------------------------------------------------------------
// 3. Directory scan
// ---------------------------------------------------------------------------

#[test]
fn scan_uses_kind_subdirectory() {
    let work = assert_fs::TempDir::new().expect("tempdir");
    work.child("platforms/z.yaml").write_str("x: 1\n").expect("write");
    work.child("platforms/a.yaml").write_str("x: 1\n").expect("write");
    work.child("extensions/e.yaml").write_str("x: 1\n").expect("write");

    let dir = descriptor::descriptor_dir(work.path(), DescriptorKind::Platform);
    let files = descriptor::list_descriptors_at(&dir).expect("list");
    assert_eq!(files, vec![dir.join("a.yaml"), dir.join("z.yaml")]);
}
