// rayleighrs-diagnostics/tests/source_tree_test.rs

//! End-to-end tests against a small fake `src/Diagnostics` tree.

use rayleighrs_diagnostics::{
    render_catalog, scan, DiagnosticsError, FileRule, FormulaSize, QuantityCatalog,
    TexSourceRenderer,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BASE: &str = r#"Module Diagnostics_Base
    Implicit None
    ! Offsets first, then codes relative to them
    Integer, Parameter :: offA = 10
    Integer, Parameter :: qX = offA + 5   ! :tex: $q_x$
    Integer, Parameter :: offB = offA + 100
    Include 'indices.F'
    Integer, Parameter :: qZ = 400 ! total energy :tex: kinetic_energy $\frac{1}{2}v^2$ per_unit
Contains
    Subroutine Nothing()
    End Subroutine Nothing
End Module Diagnostics_Base
"#;

const INDICES: &str = r#"! included from the base file
Integer, Parameter :: qY = offB + 1 ! :tex: some text $y^2
Integer, Parameter :: qW = 2
"#;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn source_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    write(dir, "Diagnostics_Base.F90", BASE);
    write(dir, "indices.F", INDICES);
    write(
        dir,
        "Diagnostics_Velocity_Field.F90",
        "If (compute_quantity(qx)) Then\nEndIf\nIf (Compute_Quantity(QY)) qty = 1\n",
    );
    write(
        dir,
        "Diagnostics_Energies.F90",
        "If (compute_quantity(qz)) Then\nIf (compute_quantity(qw)) Then\nIf (compute_quantity(q_unknown)) Then\n",
    );
    write(dir, "Diagnostics_Quiet.F90", "! nothing computed here\n");
    write(
        dir,
        "Diagnostics_Interface.F90",
        "If (compute_quantity(qx)) Then\n",
    );
    write(dir, "Spherical_IO.F90", "If (compute_quantity(qx)) Then\n");
    fs::create_dir(dir.join("Diagnostics_Subdir")).unwrap();
    tmp
}

#[test]
fn test_offset_chain() {
    let tree = source_tree();
    let catalog = QuantityCatalog::from_diagnostics_dir(tree.path()).unwrap();

    assert_eq!(catalog.get("qx").unwrap().code(), 15);
    assert_eq!(catalog.get("qy").unwrap().code(), 111);

    let offsets: Vec<(String, i64)> = catalog
        .offsets()
        .map(|q| (q.name().to_string(), q.code()))
        .collect();
    assert_eq!(
        offsets,
        vec![("offa".to_string(), 10), ("offb".to_string(), 110)]
    );

    let codes: Vec<i64> = catalog.iter().map(|q| q.code()).collect();
    assert_eq!(codes, vec![2, 10, 15, 110, 111, 400]);
}

#[test]
fn test_formulas_are_sanitized() {
    let tree = source_tree();
    let catalog = QuantityCatalog::from_diagnostics_dir(tree.path()).unwrap();

    assert_eq!(catalog.get("qx").unwrap().formula(), Some("$q_x$"));
    assert_eq!(catalog.get("qy").unwrap().formula(), Some("some text $y^2$"));
    assert_eq!(
        catalog.get("qz").unwrap().formula(),
        Some(r"kinetic\_energy $\frac{1}{2}v^2$ per\_unit")
    );
    assert_eq!(catalog.get("qw").unwrap().formula(), None);
}

#[test]
fn test_offset_used_before_definition() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "Diagnostics_Base.F90",
        "Integer, Parameter :: qX = offA + 5\nInteger, Parameter :: offA = 10\n",
    );

    let err = QuantityCatalog::from_diagnostics_dir(tmp.path()).unwrap_err();
    match err {
        DiagnosticsError::OffsetResolution { line, offset, .. } => {
            assert_eq!(line, 1);
            assert_eq!(offset, "offa");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_conflicting_offset_definitions() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "Diagnostics_Base.F90",
        "Integer, Parameter :: offA = 10\nInteger, Parameter :: offA = 10\nInteger, Parameter :: offA = 20\n",
    );

    let err = QuantityCatalog::from_diagnostics_dir(tmp.path()).unwrap_err();
    assert_eq!(err.category(), "offset");
    match err {
        DiagnosticsError::OffsetRedefinition {
            line,
            offset,
            existing,
            value,
            ..
        } => {
            assert_eq!(line, 3);
            assert_eq!(offset, "offa");
            assert_eq!((existing, value), (10, 20));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_include() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "Diagnostics_Base.F90",
        "Integer, Parameter :: offA = 10\nInclude \"missing.F\"\n",
    );

    let err = QuantityCatalog::from_diagnostics_dir(tmp.path()).unwrap_err();
    assert!(matches!(
        err,
        DiagnosticsError::IncludeResolution { line: 2, ref include, .. } if include == "missing.F"
    ));
}

#[test]
fn test_nested_include_rejected() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "Diagnostics_Base.F90", "Include 'a.F'\n");
    write(tmp.path(), "a.F", "Integer, Parameter :: q = 1\nInclude 'b.F'\n");
    write(tmp.path(), "b.F", "Integer, Parameter :: r = 2\n");

    let err = QuantityCatalog::from_diagnostics_dir(tmp.path()).unwrap_err();
    match err {
        DiagnosticsError::IncludeResolution { file, line, .. } => {
            assert_eq!(file, tmp.path().join("a.F"));
            assert_eq!(line, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unquoted_include_rejected() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "Diagnostics_Base.F90", "Include indices.F\n");

    let err = QuantityCatalog::from_diagnostics_dir(tmp.path()).unwrap_err();
    assert_eq!(err.category(), "include");
}

#[test]
fn test_duplicates_sorted_and_removed() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "Diagnostics_Base.F90",
        "Include 'a.F'\nInteger, Parameter :: c = 40\nInteger, Parameter :: a = 5\n",
    );
    write(
        tmp.path(),
        "a.F",
        "Integer, Parameter :: a = 5\nInteger, Parameter :: b = 12\n",
    );

    let catalog = QuantityCatalog::from_diagnostics_dir(tmp.path()).unwrap();
    let codes: Vec<i64> = catalog.iter().map(|q| q.code()).collect();
    assert_eq!(codes, vec![5, 12, 40]);
}

#[test]
fn test_classification() {
    let tree = source_tree();
    let (_, classification) = scan(tree.path()).unwrap();

    let labels: Vec<&str> = classification.labels().collect();
    assert_eq!(labels, vec!["Energies", "Velocity_Field"]);

    let velocity: Vec<i64> = classification
        .category("Velocity_Field")
        .unwrap()
        .iter()
        .map(|q| q.code())
        .collect();
    assert_eq!(velocity, vec![15, 111]);

    let energies: Vec<&str> = classification
        .category("Energies")
        .unwrap()
        .iter()
        .map(|q| q.name())
        .collect();
    assert_eq!(energies, vec!["qw", "qz"]);

    assert_eq!(classification.unmapped.len(), 1);
    assert_eq!(classification.unmapped[0].name, "q_unknown");
    assert_eq!(
        classification.unmapped[0].file,
        tree.path().join("Diagnostics_Energies.F90")
    );

    let skipped: Vec<(String, FileRule)> = classification
        .skipped
        .iter()
        .map(|s| {
            (
                s.file.file_name().unwrap().to_string_lossy().into_owned(),
                s.rule,
            )
        })
        .collect();
    assert_eq!(
        skipped,
        vec![
            ("Diagnostics_Base.F90".to_string(), FileRule::DenyList),
            ("Diagnostics_Interface.F90".to_string(), FileRule::DenyList),
            ("Spherical_IO.F90".to_string(), FileRule::DiagnosticsPrefix),
            ("indices.F".to_string(), FileRule::DiagnosticsPrefix),
        ]
    );
}

#[test]
fn test_render_from_source_tree() {
    let tree = source_tree();
    let catalog = QuantityCatalog::from_diagnostics_dir(tree.path()).unwrap();
    let out = tree.path().join("formulas");

    let summary = render_catalog(
        &catalog,
        &TexSourceRenderer,
        &out,
        &FormulaSize::default(),
        false,
    )
    .unwrap();

    assert_eq!(
        summary.written,
        vec![out.join("15.tex"), out.join("111.tex"), out.join("400.tex")]
    );
    assert_eq!(summary.offsets, 2);
    assert_eq!(summary.without_formula, 1);
}
