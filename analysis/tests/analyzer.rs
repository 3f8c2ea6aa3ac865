use analysis::Analyzer;
use ordo_parser::parse_program;

fn analyze(src: &str) -> analysis::AnalysisReport {
    let prog = parse_program(src).unwrap();
    Analyzer::new().analyze(&prog)
}

#[test]
fn straight_line_code_is_constant() {
    let report = analyze("FUNCTION F(n) BEGIN x <- 1 y <- 2 z <- x + y END");
    assert_eq!(report.worst_case.notation, "O(1)");
    assert_eq!(report.best_case.notation, "Ω(1)");
    assert_eq!(report.average_case.notation, "Θ(1)");
    assert_eq!(report.theta.as_deref(), Some("Θ(1)"));
    assert!(!report.is_recursive);
    assert!(report.recurrence.is_none());
}

#[test]
fn single_loop_is_linear() {
    let report = analyze("FUNCTION F(n) BEGIN FOR i<-1 TO n DO BEGIN x<-1 END END");
    assert_eq!(report.worst_case.notation, "O(n)");
    assert_eq!(report.best_case.notation, "Ω(n)");
    assert_eq!(report.average_case.notation, "Θ(n)");
    assert_eq!(report.theta.as_deref(), Some("Θ(n)"));
    assert_eq!(report.worst_case.expr, "2*n");
}

#[test]
fn nested_loops_are_quadratic() {
    let src = "FUNCTION F(n) BEGIN \
               FOR i <- 1 TO n DO \
               BEGIN FOR j <- 1 TO n DO BEGIN x <- 1 END END \
               END";
    let report = analyze(src);
    assert_eq!(report.worst_case.notation, "O(n^2)");
    assert_eq!(report.theta.as_deref(), Some("Θ(n^2)"));
}

#[test]
fn triangular_loop_is_quadratic_by_series() {
    // Inner bound depends on the outer iterator: sum resolves in closed
    // form, not by approximation.
    let src = "FUNCTION F(n) BEGIN \
               FOR i <- 1 TO n DO \
               BEGIN FOR j <- i TO n DO BEGIN x <- 1 END END \
               END";
    let report = analyze(src);
    assert_eq!(report.worst_case.notation, "O(n^2)");
    assert_eq!(report.theta.as_deref(), Some("Θ(n^2)"));
    assert_eq!(report.worst_case.expr, "n^2 + n");
}

#[test]
fn asymmetric_branches_have_no_tight_bound() {
    let src = "FUNCTION F(n) BEGIN \
               IF (n > 0) THEN \
               BEGIN FOR i <- 1 TO n DO BEGIN x <- 1 END END \
               ELSE BEGIN y <- 1 END \
               END";
    let report = analyze(src);
    assert_eq!(report.worst_case.notation, "O(n)");
    assert_eq!(report.best_case.notation, "Ω(1)");
    assert!(report.theta.is_none());
}

#[test]
fn while_loop_uses_documented_heuristic() {
    let src = "FUNCTION F(n) BEGIN WHILE x < n DO BEGIN x <- x + 1 END END";
    let report = analyze(src);
    assert_eq!(report.worst_case.notation, "O(n)");
    assert_eq!(report.best_case.notation, "Ω(1)");
    assert_eq!(report.average_case.notation, "Θ(n)");
    assert!(report.theta.is_none());
}

#[test]
fn merge_sort_shape_resolves_to_n_log_n() {
    let src = "FUNCTION F(n) BEGIN \
               IF (n>1) THEN \
               BEGIN \
               CALL F(n/2) \
               CALL F(n/2) \
               FOR i<-1 TO n DO BEGIN x<-1 END \
               END \
               END";
    let report = analyze(src);
    assert!(report.is_recursive);
    assert_eq!(report.recurrence.as_deref(), Some("T(n) = 2T(n/2) + O(n)"));
    assert_eq!(report.worst_case.notation, "O(n log n)");
    assert_eq!(report.best_case.notation, "Ω(n log n)");
    assert_eq!(report.average_case.notation, "Θ(n log n)");
    assert_eq!(report.theta.as_deref(), Some("Θ(n log n)"));
}

#[test]
fn halving_recursion_resolves_to_log_n() {
    let src = "FUNCTION Search(n) BEGIN IF n > 1 THEN CALL Search(n/2) END";
    let report = analyze(src);
    assert!(report.is_recursive);
    assert_eq!(report.theta.as_deref(), Some("Θ(log n)"));
}

#[test]
fn quadtree_recursion_hits_case_one() {
    // T(n) = 4T(n/2) + O(n) → Θ(n^2)
    let src = "FUNCTION F(n) BEGIN \
               IF n > 1 THEN \
               BEGIN \
               CALL F(n/2) CALL F(n/2) CALL F(n/2) CALL F(n/2) \
               FOR i <- 1 TO n DO x <- 1 \
               END \
               END";
    let report = analyze(src);
    assert_eq!(report.theta.as_deref(), Some("Θ(n^2)"));
    assert_eq!(report.recurrence.as_deref(), Some("T(n) = 4T(n/2) + O(n)"));
}

#[test]
fn karatsuba_exponent_stays_symbolic() {
    // T(n) = 3T(n/2) + O(n) → Θ(n^(log_2 3))
    let src = "FUNCTION F(n) BEGIN \
               IF n > 1 THEN \
               BEGIN \
               CALL F(n/2) CALL F(n/2) CALL F(n/2) \
               FOR i <- 1 TO n DO x <- 1 \
               END \
               END";
    let report = analyze(src);
    assert_eq!(report.worst_case.notation, "O(n^(log_2(3)))");
    assert_eq!(report.theta.as_deref(), Some("Θ(n^(log_2(3)))"));
}

#[test]
fn mixed_divisors_stay_unresolved() {
    let src = "FUNCTION F(n) BEGIN \
               IF n > 1 THEN \
               BEGIN CALL F(n/2) CALL F(n/3) x <- 1 END \
               END";
    let report = analyze(src);
    assert!(report.is_recursive);
    let recurrence = report.recurrence.as_deref().unwrap();
    assert!(recurrence.contains("b unresolved"), "got: {recurrence}");
    // Only the local work is asserted.
    assert_eq!(report.worst_case.notation, "O(1)");
}

#[test]
fn subtractive_recursion_is_surfaced_but_not_resolved() {
    let src = "FUNCTION Fact(n) BEGIN IF n > 1 THEN CALL Fact(n - 1) END";
    let report = analyze(src);
    assert!(report.is_recursive);
    assert_eq!(
        report.recurrence.as_deref(),
        Some("T(n) = 1T(n-1) + O(1)")
    );
    assert_eq!(report.worst_case.notation, "O(1)");
}

#[test]
fn no_shrink_recursion_stays_unresolved() {
    // T(n) = T(n): divisor 1 never passes the b > 1 gate.
    let src = "FUNCTION F(n) BEGIN IF n > 1 THEN CALL F(n) END";
    let report = analyze(src);
    assert!(report.is_recursive);
    assert!(report.recurrence.is_some());
}

#[test]
fn line_costs_cover_stamped_statements() {
    let src = "FUNCTION F(n) BEGIN\n\
               x <- 1\n\
               FOR i <- 1 TO n DO\n\
               y <- 2\n\
               END";
    let report = analyze(src);
    assert_eq!(report.line_costs.get(&2).map(String::as_str), Some("2"));
    assert_eq!(report.line_costs.get(&3).map(String::as_str), Some("2*n"));
    assert_eq!(report.line_costs.get(&4).map(String::as_str), Some("2"));
    assert!(!report.line_costs.contains_key(&1));
}

#[test]
fn report_serializes_to_json() {
    let report = analyze("FUNCTION F(n) BEGIN FOR i<-1 TO n DO BEGIN x<-1 END END");
    let json = serde_json::to_string(&report).unwrap();
    let back: analysis::AnalysisReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}
