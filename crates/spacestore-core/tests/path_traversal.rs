//! Path traversal attack integration tests.
//!
//! Known zip-slip name patterns, checked both at the sanitizer and through
//! a full extraction.

#![allow(clippy::unwrap_used)]

use spacestore_core::ArchiveType;
use spacestore_core::ExtractionError;
use spacestore_core::extract_archive;
use spacestore_core::security::validate_entry;
use spacestore_core::test_utils::TarTestBuilder;
use spacestore_core::types::DestDir;
use spacestore_core::types::EntryType;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ESCAPING_NAMES: &[&str] = &[
    "../etc/passwd",
    "../../etc/passwd",
    "foo/../../etc/passwd",
    "foo/bar/../../../etc/passwd",
    "..",
    "../",
    "./../x",
    "..\\..\\windows\\system32",
    "foo\\..\\..\\x",
    "a/b/c/../../../../x",
];

const CONFINED_NAMES: &[(&str, &str)] = &[
    ("foo/../bar.txt", "bar.txt"),
    ("./a/./b.txt", "a/b.txt"),
    ("/etc/passwd", "etc/passwd"),
    ("//double//slash.txt", "double/slash.txt"),
    ("dir\\file.txt", "dir/file.txt"),
    ("..foo/bar", "..foo/bar"),
    ("foo..bar", "foo..bar"),
];

#[test]
fn test_zip_slip_names_rejected() {
    let temp = TempDir::new().unwrap();
    let dest = DestDir::new(temp.path()).unwrap();

    for name in ESCAPING_NAMES {
        let result = validate_entry(name, EntryType::File, &dest);
        assert!(
            matches!(result, Err(ExtractionError::PathTraversal { .. })),
            "Path should be rejected: {name}"
        );
    }
}

#[test]
fn test_confined_names_normalized() {
    let temp = TempDir::new().unwrap();
    let dest = DestDir::new(temp.path()).unwrap();

    for (name, expected) in CONFINED_NAMES {
        let entry = validate_entry(name, EntryType::File, &dest).unwrap();
        assert_eq!(entry.path.as_path(), Path::new(expected), "for {name}");
        assert!(dest.contains(&dest.join(&entry.path)));
    }
}

#[test]
fn test_directory_entries_traversal_rejected() {
    let temp = TempDir::new().unwrap();
    let dest = DestDir::new(temp.path()).unwrap();

    let result = validate_entry("../sibling/", EntryType::Directory, &dest);
    assert!(matches!(result, Err(ExtractionError::PathTraversal { .. })));
}

#[test]
fn test_null_byte_injection() {
    let temp = TempDir::new().unwrap();
    let dest = DestDir::new(temp.path()).unwrap();

    let result = validate_entry("safe.txt\0../../etc/passwd", EntryType::File, &dest);
    assert!(matches!(result, Err(ExtractionError::SecurityViolation { .. })));
}

#[test]
fn test_every_escaping_name_aborts_tar_extraction() {
    for (index, name) in ESCAPING_NAMES.iter().enumerate() {
        let temp = TempDir::new().unwrap();
        let data = TarTestBuilder::new()
            .add_file("before.txt", b"ok")
            .add_raw_file(name, b"payload")
            .build();
        let archive = temp.path().join(format!("case{index}.tar"));
        fs::write(&archive, data).unwrap();

        let err = extract_archive(&archive, ArchiveType::Tar, temp.path()).unwrap_err();

        assert!(err.is_security_violation(), "{name}: {err}");
        assert!(archive.exists());
        assert!(
            !temp.path().join(format!("case{index}/before.txt")).exists(),
            "{name}: earlier entry was committed"
        );
    }
}
