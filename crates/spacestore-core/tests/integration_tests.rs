//! Integration tests for spacestore-core.
//!
//! These tests verify end-to-end extraction workflows with real filesystem
//! operations, laid out the way the upload service lays out tenant data.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use spacestore_core::ArchiveType;
use spacestore_core::ExtractionError;
use spacestore_core::KeyMap;
use spacestore_core::detect_format;
use spacestore_core::extract_archive;
use spacestore_core::test_utils::TarTestBuilder;
use spacestore_core::test_utils::ZipTestBuilder;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Creates `uploads/acme/` and returns it.
fn tenant_dir(temp: &TempDir) -> PathBuf {
    let keys = KeyMap::from_pairs([("key-acme", "acme")]).unwrap();
    let dir = keys
        .resolve("key-acme")
        .unwrap()
        .dir_in(&temp.path().join("uploads"));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn stage(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}

/// Relative path to content for every file under `root`.
fn file_tree(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(root).unwrap().to_path_buf();
            (relative, fs::read(e.path()).unwrap())
        })
        .collect()
}

fn report_zip() -> Vec<u8> {
    ZipTestBuilder::new()
        .add_file("notes.txt", b"hello")
        .add_directory("sub/")
        .add_file("sub/data.bin", &[1, 2, 3])
        .build()
}

#[test]
fn test_report_zip_extracts_under_tenant() {
    let temp = TempDir::new().unwrap();
    let tenant = tenant_dir(&temp);
    let archive = stage(&tenant, "report.zip", &report_zip());

    let archive_type = detect_format("report.zip").unwrap();
    let report = extract_archive(&archive, archive_type, &tenant).unwrap();

    let uploads = temp.path().join("uploads");
    assert_eq!(
        fs::read(uploads.join("acme/report/notes.txt")).unwrap(),
        b"hello"
    );
    assert_eq!(
        fs::read(uploads.join("acme/report/sub/data.bin")).unwrap(),
        [1, 2, 3]
    );
    assert!(!archive.exists(), "staged archive should be deleted");
    assert!(report.archive_removed);
    assert!(!report.has_warnings());
    assert_eq!(report.total_items(), 3);
    assert!(report.destination.ends_with("acme/report"));
}

#[test]
fn test_evil_zip_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let tenant = tenant_dir(&temp);
    let data = ZipTestBuilder::new()
        .add_file("../../etc/passwd", b"root:x:0:0")
        .build();
    let archive = stage(&tenant, "evil.zip", &data);

    let err = extract_archive(&archive, ArchiveType::Zip, &tenant).unwrap_err();

    assert!(matches!(err, ExtractionError::PathTraversal { .. }));
    assert!(err.is_security_violation());
    assert!(archive.exists(), "staged archive should remain");
    assert!(!temp.path().join("uploads/etc").exists());
    assert!(!temp.path().join("etc").exists());
    let files: Vec<_> = file_tree(&temp.path().join("uploads"))
        .into_keys()
        .collect();
    assert_eq!(files, vec![PathBuf::from("acme/evil.zip")]);
}

#[test]
fn test_escape_after_valid_entries_is_all_or_nothing() {
    let temp = TempDir::new().unwrap();
    let tenant = tenant_dir(&temp);
    let data = TarTestBuilder::new()
        .add_file("one.txt", b"1")
        .add_directory("docs/")
        .add_file("docs/two.txt", b"2")
        .add_raw_file("docs/../../../outside.txt", b"x")
        .build();
    let archive = stage(&tenant, "mixed.tar", &data);

    let err = extract_archive(&archive, ArchiveType::Tar, &tenant).unwrap_err();

    assert!(matches!(err, ExtractionError::PathTraversal { .. }));
    assert!(file_tree(&tenant.join("mixed")).is_empty());
    assert!(!temp.path().join("uploads/outside.txt").exists());
    assert!(archive.exists());
}

#[test]
fn test_reextract_overwrites() {
    let temp = TempDir::new().unwrap();
    let tenant = tenant_dir(&temp);

    let archive = stage(&tenant, "report.zip", &report_zip());
    extract_archive(&archive, ArchiveType::Zip, &tenant).unwrap();

    let updated = ZipTestBuilder::new()
        .add_file("notes.txt", b"hello again")
        .add_directory("sub/")
        .add_file("sub/data.bin", &[1, 2, 3])
        .build();
    let archive = stage(&tenant, "report.zip", &updated);
    extract_archive(&archive, ArchiveType::Zip, &tenant).unwrap();

    let tree = file_tree(&tenant.join("report"));
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[Path::new("notes.txt")], b"hello again");
}

#[test]
fn test_zip_and_tar_of_same_tree_match() {
    let temp = TempDir::new().unwrap();
    let tenant = tenant_dir(&temp);

    let files: [(&str, &[u8]); 3] = [
        ("readme.md", b"# title"),
        ("src/main.rs", b"fn main() {}"),
        ("src/nested/deep/blob.bin", &[0, 255, 7, 7]),
    ];

    let mut zip = ZipTestBuilder::new();
    let mut tar = TarTestBuilder::new();
    for (name, content) in files {
        zip = zip.add_deflated_file(name, content);
        tar = tar.add_file(name, content);
    }

    let zip_archive = stage(&tenant, "tree.zip", &zip.build());
    let tar_archive = stage(&tenant, "tree-copy.tar", &tar.build());
    extract_archive(&zip_archive, ArchiveType::Zip, &tenant).unwrap();
    extract_archive(&tar_archive, ArchiveType::Tar, &tenant).unwrap();

    let from_zip = file_tree(&tenant.join("tree"));
    let from_tar = file_tree(&tenant.join("tree-copy"));
    assert_eq!(from_zip.len(), 3);
    assert_eq!(from_zip, from_tar);
}

#[test]
fn test_leading_slash_is_confined() {
    let temp = TempDir::new().unwrap();
    let tenant = tenant_dir(&temp);
    let data = ZipTestBuilder::new()
        .add_file("/etc/passwd", b"confined")
        .build();
    let archive = stage(&tenant, "abs.zip", &data);

    extract_archive(&archive, ArchiveType::Zip, &tenant).unwrap();

    assert_eq!(
        fs::read(tenant.join("abs/etc/passwd")).unwrap(),
        b"confined"
    );
}

#[test]
fn test_hardlink_rejected() {
    let temp = TempDir::new().unwrap();
    let tenant = tenant_dir(&temp);
    let data = TarTestBuilder::new()
        .add_file("target.txt", b"t")
        .add_hardlink("alias", "target.txt")
        .build();
    let archive = stage(&tenant, "links.tar", &data);

    let err = extract_archive(&archive, ArchiveType::Tar, &tenant).unwrap_err();

    assert!(matches!(
        err,
        ExtractionError::UnsupportedEntry {
            kind: "hardlink",
            ..
        }
    ));
    assert!(file_tree(&tenant.join("links")).is_empty());
}

#[test]
fn test_zip_symlink_rejected() {
    let temp = TempDir::new().unwrap();
    let tenant = tenant_dir(&temp);
    let data = ZipTestBuilder::new()
        .add_symlink("passwd", "/etc/passwd")
        .build();
    let archive = stage(&tenant, "link.zip", &data);

    let err = extract_archive(&archive, ArchiveType::Zip, &tenant).unwrap_err();

    assert!(matches!(err, ExtractionError::UnsupportedEntry { .. }));
    assert!(!tenant.join("link/passwd").exists());
}

#[test]
fn test_truncated_tar_reports_invalid_archive() {
    let temp = TempDir::new().unwrap();
    let tenant = tenant_dir(&temp);
    let mut data = TarTestBuilder::new()
        .add_file("big.bin", &[9u8; 8192])
        .build();
    data.truncate(2048);
    let archive = stage(&tenant, "cut.tar", &data);

    let err = extract_archive(&archive, ArchiveType::Tar, &tenant).unwrap_err();

    assert!(matches!(err, ExtractionError::InvalidArchive(_)));
    assert!(archive.exists());
    assert!(file_tree(&tenant.join("cut")).is_empty());
}

#[test]
fn test_no_scratch_directories_left_behind() {
    let temp = TempDir::new().unwrap();
    let tenant = tenant_dir(&temp);

    let ok = stage(&tenant, "report.zip", &report_zip());
    extract_archive(&ok, ArchiveType::Zip, &tenant).unwrap();

    let bad = TarTestBuilder::new().add_raw_file("../x", b"x").build();
    let bad = stage(&tenant, "bad.tar", &bad);
    extract_archive(&bad, ArchiveType::Tar, &tenant).unwrap_err();

    let leftovers: Vec<_> = WalkDir::new(&tenant)
        .min_depth(1)
        .into_iter()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains(".extracting-"))
        .collect();
    assert!(leftovers.is_empty(), "leftover scratch dirs: {leftovers:?}");
}
