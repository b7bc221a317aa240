//! End-to-end extraction over directories and single files

use pretty_assertions::assert_eq;

use axiom_logic::batch::FileStatus;
use axiom_logic::{extract_logic, run_extraction, AxiomLogicError, ExtractOptions, InputSource};

use crate::common::{only_workbook, TestContext, WorkbookInfo};

const RC_REPORT: &str = "axiom_FFIEC031_RC_20240331";
const RCB_REPORT: &str = "axiom_FFIEC031_RCB_20240331";

#[test]
fn test_fixture_directory_extraction() {
    let ctx = TestContext::with_fixture("ffiec031");
    let summary = ctx.extract_successfully(ctx.options());

    // README.txt does not match *.log
    assert_eq!(summary.outcomes.len(), 2);
    assert_eq!(summary.failed().count(), 0);
    assert_eq!(summary.rows, 5);

    let workbook = WorkbookInfo::from_xlsx(&summary.output_path).unwrap();
    assert_eq!(workbook.sheet_names, vec!["Axiom Logic"]);
    assert_eq!(
        workbook.header(),
        vec![
            "Report",
            "Schedule",
            "LineNumber",
            "MDRM",
            "Element",
            "ElementLogic",
            "UpstreamLogic",
            "Model"
        ]
    );

    // Files are processed in name order: RCB sorts before RC_
    assert_eq!(
        workbook.column("Report"),
        vec![RCB_REPORT, RCB_REPORT, RC_REPORT, RC_REPORT, RC_REPORT]
    );
    assert_eq!(
        workbook.column("Schedule"),
        vec!["RCB_", "RCB_", "RCFA", "RCFA", "RCFA"]
    );
    assert_eq!(
        workbook.column("MDRM"),
        vec!["RCFD0211", "RCFD0211", "RCFD2170", "RCFD2170", "RCFD2948"]
    );
    assert_eq!(
        workbook.column("Element"),
        vec!["book", "status", "balance", "flag", "balance"]
    );
}

#[test]
fn test_patched_capture_replaces_original() {
    let ctx = TestContext::with_fixture("ffiec031");
    let summary = ctx.extract_successfully(ctx.options());
    let workbook = WorkbookInfo::from_xlsx(&summary.output_path).unwrap();

    let logic = workbook.column("ElementLogic");
    assert_eq!(logic[0], "s.book = 'HTM' AND s.status = 'A'");
    // The AFS capture after the last patch never appears
    assert!(!workbook.column("MDRM").contains(&"RCFD1773"));
}

#[test]
fn test_default_output_name() {
    let ctx = TestContext::with_fixture("ffiec031");
    let summary = ctx.extract_successfully(ctx.options());

    assert_eq!(only_workbook(&ctx.output_dir), summary.output_path);
    let name = summary
        .output_path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned();
    assert!(
        name.starts_with("ffiec031rc_axiom_log_file_logic_extraction_"),
        "unexpected name {}",
        name
    );
    assert!(name.ends_with(".xlsx"));
}

#[test]
fn test_explicit_output_path() {
    let ctx = TestContext::with_fixture("ffiec031");
    let output = ctx.output_dir.join("custom").join("logic.xlsx");
    let summary = ctx.extract_successfully(ExtractOptions {
        output_path: Some(output.clone()),
        ..ctx.options()
    });
    assert_eq!(summary.output_path, output);
    assert!(output.exists());
}

#[test]
fn test_keep_rows_without_elements() {
    let ctx = TestContext::with_fixture("ffiec031");
    let mut options = ctx.options();
    options.assemble.keep_rows_without_elements = true;
    let summary = ctx.extract_successfully(options);
    let workbook = WorkbookInfo::from_xlsx(&summary.output_path).unwrap();

    let row = workbook
        .data()
        .iter()
        .find(|row| row[3] == "RCFD3123")
        .expect("SELECT-only capture should be kept");
    assert_eq!(row[4], "");
    assert_eq!(row[5], "N/A");
    assert_eq!(row[6], "d.entity = 'BANK1' AND c.kind = 'RETAIL'");
    assert_eq!(row[7], "AXIOM_DATA.DEPOSITS d, AXIOM_DATA.CUSTOMERS c");
}

#[test]
fn test_single_file_has_no_batch_columns() {
    let ctx = TestContext::with_fixture("ffiec031");
    let path = ctx.input_dir.join(format!("{}.log", RC_REPORT));

    let table = extract_logic(&path, &ctx.options()).unwrap();
    assert!(!table.batch_columns);
    assert_eq!(table.rows.len(), 3);
    assert!(table.rows.iter().all(|row| row.report.is_none()));

    let summary = ctx.extract_successfully(ExtractOptions {
        input: InputSource::File(path),
        ..ctx.options()
    });
    let workbook = WorkbookInfo::from_xlsx(&summary.output_path).unwrap();
    assert_eq!(workbook.header()[0], "LineNumber");
    assert_eq!(workbook.column("LineNumber"), vec!["RCFA_12", "RCFA_12", "RCFA_13"]);
}

#[test]
fn test_pattern_selects_files() {
    let ctx = TestContext::with_fixture("ffiec031");
    let summary = ctx.extract_successfully(ExtractOptions {
        pattern: "*_RCB_*.log".to_string(),
        ..ctx.options()
    });
    assert_eq!(summary.outcomes.len(), 1);
    assert_eq!(summary.outcomes[0].report, RCB_REPORT);
    assert_eq!(summary.rows, 2);
}

#[test]
fn test_empty_directory_still_writes_workbook() {
    let ctx = TestContext::new();
    let summary = ctx.extract_successfully(ctx.options());

    assert!(summary.is_empty());
    assert!(summary.outcomes.is_empty());
    let workbook = WorkbookInfo::from_xlsx(&summary.output_path).unwrap();
    assert_eq!(workbook.rows.len(), 1);
    assert!(summary
        .output_path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("axiom_axiom_log_file_logic_extraction_"));
}

#[test]
fn test_log_without_statements_is_reported() {
    let ctx = TestContext::new();
    ctx.write_log("axiom_FFIEC031_RI_20240331.log", "INFO started\nINFO finished\n");

    let summary = ctx.extract_successfully(ctx.options());
    assert!(summary.is_empty());
    match &summary.outcomes[0].status {
        FileStatus::Extracted { rows, notices } => {
            assert_eq!(*rows, 0);
            assert!(!notices.is_empty());
        }
        other => panic!("unexpected status {:?}", other),
    }
}

#[test]
fn test_missing_input_directory() {
    let ctx = TestContext::new();
    let err = run_extraction(ExtractOptions {
        input: InputSource::Directory(ctx.input_dir.join("missing")),
        ..ctx.options()
    })
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AxiomLogicError>(),
        Some(AxiomLogicError::InputDirNotFound { .. })
    ));
}

#[test]
fn test_missing_single_file() {
    let ctx = TestContext::new();
    let err = run_extraction(ExtractOptions {
        input: InputSource::File(ctx.input_dir.join("absent.log")),
        ..ctx.options()
    })
    .unwrap_err();
    assert!(err
        .downcast_ref::<AxiomLogicError>()
        .is_some_and(AxiomLogicError::is_file_access));
}

#[cfg(unix)]
#[test]
fn test_dangling_log_link_is_reported_as_failed() {
    use std::os::unix::fs::symlink;

    let ctx = TestContext::with_fixture("ffiec031");
    symlink(
        ctx.input_dir.join(format!("{RC_REPORT}.log")),
        ctx.input_dir.join("linked_FFIEC031_RC.log"),
    )
    .unwrap();
    symlink(
        ctx.input_dir.join("removed.log.bak"),
        ctx.input_dir.join("dangling_FFIEC031_RI.log"),
    )
    .unwrap();

    let summary = ctx.extract_successfully(ctx.options());
    assert_eq!(summary.outcomes.len(), 4);

    let failed: Vec<&str> = summary.failed().map(|o| o.report.as_str()).collect();
    assert_eq!(failed, vec!["dangling_FFIEC031_RI"]);

    let linked = summary
        .outcomes
        .iter()
        .find(|o| o.report == "linked_FFIEC031_RC")
        .unwrap();
    assert!(matches!(linked.status, FileStatus::Extracted { rows: 3, .. }));
    assert_eq!(summary.rows, 5 + 3);
}
