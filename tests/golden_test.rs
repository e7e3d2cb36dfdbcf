//! Golden-file tests: a fixture entity directory rendered against checked-in C# output

use std::path::{Path, PathBuf};

use modelgen::{parse_provider, render_all, write_files, DirectorySource, ProjectConfig};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/case1")
}

fn expected(name: &str) -> String {
    let path = fixture_dir().join("expected").join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
        .replace("\r\n", "\n")
}

#[test]
fn test_case1_matches_expected_output() {
    let config = ProjectConfig::from_file(fixture_dir().join("modelgen.yaml"))
        .expect("Failed to load fixture config");

    let output = parse_provider(&DirectorySource::new(&config.entities))
        .expect("Failed to read fixture entities");
    assert!(output.is_clean(), "{:?} {:?}", output.errors, output.property_errors());

    let files = render_all(&config.codegen_settings(), &output.entities);
    let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["AppSpecies.cs", "Breed.cs", "Clinic.cs", "Species.cs"]);

    for file in &files {
        assert_eq!(file.content, expected(&file.filename), "{} differs", file.filename);
    }
}

#[test]
fn test_case1_written_files_match() {
    let config = ProjectConfig::from_file(fixture_dir().join("modelgen.yaml")).unwrap();
    let output = parse_provider(&DirectorySource::new(&config.entities)).unwrap();

    let out = tempfile::tempdir().unwrap();
    let report = write_files(&config.codegen_settings(), &output.entities, out.path()).unwrap();
    assert_eq!(report.written.len(), 4);
    assert!(report.skipped.is_empty());

    let written = std::fs::read_to_string(out.path().join("Breed.cs")).unwrap();
    assert_eq!(written, expected("Breed.cs"));

    // A second run leaves everything in place
    let again = write_files(&config.codegen_settings(), &output.entities, out.path()).unwrap();
    assert!(again.written.is_empty());
    assert_eq!(again.skipped.len(), 4);
}
