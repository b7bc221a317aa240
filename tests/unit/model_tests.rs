//! Unit tests for clause parsing, element resolution and row assembly

use pretty_assertions::assert_eq;

use axiom_logic::model::{
    assemble, is_reportable, AssembleOptions, ExtractedRow, ExtractionNotice, FactColumns,
    LogicTable, MDRM_LENGTH,
};
use axiom_logic::parser::{
    extract_clause_facts, models, parse_statement, report_refs, resolve_elements, ReportRef,
};

fn extracted(line: &str, mdrm: &str) -> ExtractedRow {
    ExtractedRow {
        line_number: Some(line.to_string()),
        mdrm: Some(mdrm.to_string()),
        element_logic: Some("a.amount > 0".to_string()),
        upstream_logic: Some("N/A".to_string()),
        model: Some("N/A".to_string()),
    }
}

// ============================================================================
// MDRM filter
// ============================================================================

#[test]
fn test_only_eight_character_mdrms_survive() {
    for (mdrm, expected) in [
        ("RCFD2170", true),
        ("RCON3123", true),
        ("RCFD217", false),
        ("RCFD21700", false),
        ("N/A", false),
    ] {
        assert_eq!(is_reportable(&extracted("RC_1", mdrm)), expected, "{}", mdrm);
    }
    assert_eq!(MDRM_LENGTH, 8);
}

#[test]
fn test_orphan_line_is_excluded() {
    assert!(!is_reportable(&extracted("z_orphans", "RCFD2170")));
}

#[test]
fn test_assembled_rows_all_pass_the_filter() {
    let statement = parse_statement(
        "SELECT CASE WHEN a.x = 1 THEN '/z_orphans/RCFD0001/' \
         WHEN a.y = 2 THEN '/RC_2/RCFD02/' \
         WHEN a.z = 3 THEN '/RC_3/RCFD0003/' END FROM AXIOM_DATA.T a",
    );
    let assembly = assemble(&[statement], &AssembleOptions::default());

    assert_eq!(assembly.candidate_rows, 3);
    assert_eq!(assembly.reportable_rows, 1);
    for row in &assembly.rows {
        assert_eq!(row.mdrm.as_deref().map(str::len), Some(8));
        assert_ne!(row.line_number.as_deref(), Some("z_orphans"));
    }
}

// ============================================================================
// Alignment
// ============================================================================

/// Flattened INSERT with the given clause counts.
fn synthetic_statement(whens: usize, froms: usize, joins: usize, not_exists: bool) -> String {
    let mut sql = String::from("SQL statement: INSERT / INTO AXIOM_DATA.OUT SELECT ");
    if whens == 0 {
        sql.push_str("/RC_0/RCFD0000/ a.v ");
    } else {
        sql.push_str("CASE ");
        for i in 0..whens {
            sql.push_str(&format!("WHEN a.f{i} = {i} THEN '/RC_{i}/RCFD000{i}/' "));
        }
        sql.push_str("END ");
    }

    sql.push_str("FROM AXIOM_DATA.T0 a ");
    for j in 0..joins {
        sql.push_str(&format!("JOIN AXIOM_DATA.J{j} j{j} ON j{j}.k = a.k "));
    }
    for f in 1..froms {
        sql.push_str(&format!(", (SELECT k FROM AXIOM_DATA.U{f} u{f}) s{f} "));
    }

    sql.push_str("WHERE a.k = 1");
    if not_exists {
        sql.push_str(" AND NOT EXISTS (SELECT 1 FROM AXIOM_DATA.X x WHERE x.k = a.k)");
    }
    sql
}

#[test]
fn test_fact_lists_stay_aligned_for_mismatched_clause_counts() {
    for whens in 0..=4 {
        for froms in 1..=3 {
            for joins in 0..=2 {
                for not_exists in [false, true] {
                    let sql = synthetic_statement(whens, froms, joins, not_exists);
                    let statement = parse_statement(&sql);

                    assert!(statement.branches.len() >= whens.max(1), "{sql}");
                    let positions: Vec<usize> =
                        statement.branches.iter().map(|b| b.branch).collect();
                    assert_eq!(positions, (0..statement.branches.len()).collect::<Vec<_>>());

                    // Every clause yields at least one value, so each empty
                    // cell is a counted alignment gap
                    let empty_cells: usize = statement
                        .branches
                        .iter()
                        .map(|b| {
                            [&b.line_number, &b.element_logic, &b.upstream_logic, &b.model]
                                .into_iter()
                                .filter(|cell| cell.is_none())
                                .count()
                        })
                        .sum();
                    assert_eq!(empty_cells, statement.unaligned_cells, "{sql}");

                    let columns = FactColumns::from_statements(std::slice::from_ref(&statement));
                    assert!(columns.is_aligned(), "{sql}");
                    assert_eq!(columns.lengths()[0], statement.branches.len());

                    let assembly = assemble(&[statement.clone()], &AssembleOptions::default());
                    let flagged = assembly
                        .notices
                        .iter()
                        .any(|n| matches!(n, ExtractionNotice::AlignmentAmbiguity { .. }));
                    assert_eq!(flagged, statement.unaligned_cells > 0, "{sql}");
                }
            }
        }
    }
}

#[test]
fn test_alignment_notice_reports_gap_count() {
    let statement = parse_statement(
        "SELECT CASE WHEN a.x = 1 THEN '/L4/RCFD0004/' WHEN a.y = 2 THEN '/L5/RCFD0005/' \
         WHEN a.z = 3 THEN '/L6/RCFD0006/' END FROM AXIOM_DATA.T a, (SELECT k FROM AXIOM_DATA.U) u",
    );
    let assembly = assemble(&[statement], &AssembleOptions::default());
    assert_eq!(
        assembly.notices,
        vec![ExtractionNotice::AlignmentAmbiguity {
            unaligned_cells: 1,
            threshold: 0
        }]
    );
}

// ============================================================================
// Clause parsing
// ============================================================================

#[test]
fn test_two_part_and_prefixed_tokens() {
    assert_eq!(
        report_refs("SELECT /RCFA/RCFA3792/ a.x FROM t a"),
        vec![ReportRef::new("RCFA", "RCFA3792")]
    );
    assert_eq!(
        report_refs("SELECT /X/RCFA/RCFA3792/ a.x FROM t a"),
        vec![ReportRef::new("RCFA", "RCFA3792")]
    );
}

#[test]
fn test_not_exists_limits_search_to_outer_select() {
    let text = "SELECT /L1/RCFD0001/ a.v FROM AXIOM_DATA.T a WHERE a.k = 1 AND NOT EXISTS \
                (SELECT /L9/RCFD0009/ b.v FROM AXIOM_DATA.U b WHERE b.id = a.id)";
    let facts = extract_clause_facts(text);
    assert_eq!(facts.report_refs, vec![ReportRef::new("L1", "RCFD0001")]);
    assert_eq!(facts.upstream_logic, vec!["a.k = 1 AND"]);
    assert_eq!(facts.models, vec!["AXIOM_DATA.T a"]);
}

#[test]
fn test_missing_select_yields_placeholder() {
    assert_eq!(report_refs("INSERT INTO t VALUES (1)"), vec![ReportRef::not_available()]);
    assert_eq!(models("INSERT INTO t VALUES (1)"), vec!["N/A"]);
}

// ============================================================================
// Element resolution
// ============================================================================

#[test]
fn test_element_resolution_is_idempotent() {
    let logic = "a.balance > 0 AND b.flag = 'Y' AND a.balance < 100";
    let once = resolve_elements(logic);
    assert_eq!(once, vec!["balance", "flag"]);
    assert_eq!(resolve_elements(logic), once);
}

#[test]
fn test_table_headers_without_batch_columns() {
    assert_eq!(
        LogicTable::default().headers(),
        vec!["LineNumber", "MDRM", "Element", "ElementLogic", "UpstreamLogic", "Model"]
    );
}
