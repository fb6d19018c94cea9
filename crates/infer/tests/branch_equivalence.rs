//! Decomposition must not change what the rule accepts: OR over the
//! branches agrees with the whole predicate on every record.

use nearmiss_core::{eval::eval_bool, BinaryOp, Expr, FieldType, Predicate, Record, Schema, Value};
use nearmiss_infer::{branches, infer, infer_all, InferError, InferenceEngine};

const PREDICATES: &[&str] = &[
    "Age >= 18 AndAlso Income > 1000 OrElse HasGuarantor == true",
    "x => x.Age >= 18 && x.Income > 1000 || x.HasGuarantor == true",
    "Age > 60 || Age < 10 || Income > 5000 && HasGuarantor == false",
    "Age > 20 && (Income > 100 || HasGuarantor == true)",
    "(Age > 20 || Income > 100) && HasGuarantor == true || Age == 5",
    "Age > 20 || (Income > 100 || HasGuarantor == true) || Age < 3",
    "Not(HasGuarantor) || Age >= 18",
    "HasGuarantor || Age >= 18 && Income > 300",
    "Age >= 18",
];

fn grid() -> Vec<Record> {
    let mut out = Vec::new();
    for age in [2, 5, 16, 18, 30, 70] {
        for income in [0, 200, 1200, 6000] {
            for guarantor in [false, true] {
                out.push(
                    Record::new()
                        .with("Age", Value::Int(age))
                        .with("Income", Value::Int(income))
                        .with("HasGuarantor", Value::Bool(guarantor)),
                );
            }
        }
    }
    out
}

fn or_all(exprs: Vec<Expr>) -> Expr {
    exprs
        .into_iter()
        .reduce(|acc, e| Expr::binary(BinaryOp::OrElse, acc, e))
        .unwrap()
}

#[test]
fn or_of_branches_matches_predicate() {
    let records = grid();
    for src in PREDICATES {
        let predicate = Predicate::parse(src).unwrap();
        let joined = or_all(
            branches(&predicate)
                .unwrap()
                .into_iter()
                .map(|b| b.expr().clone())
                .collect(),
        );
        for record in &records {
            assert_eq!(
                eval_bool(&joined, record).unwrap(),
                eval_bool(&predicate.body, record).unwrap(),
                "predicate {src} disagrees on {record:?}"
            );
        }
    }
}

#[test]
fn reparsed_branch_text_matches_branch_expr() {
    let records = grid();
    for src in PREDICATES {
        let predicate = Predicate::parse(src).unwrap();
        for branch in branches(&predicate).unwrap() {
            let mut reparsed = Predicate::parse(branch.text()).unwrap();
            reparsed.parameters = predicate.parameters.clone();
            for record in &records {
                assert_eq!(
                    eval_bool(&reparsed.body, record).unwrap(),
                    eval_bool(branch.expr(), record).unwrap()
                );
            }
        }
    }
}

#[test]
fn predicate_without_or_is_one_branch() {
    let predicate = Predicate::parse("Age > 20 && Income > 100").unwrap();
    let bs = branches(&predicate).unwrap();
    assert_eq!(bs.len(), 1);
    assert_eq!(bs[0].text(), "((Age > 20) AndAlso (Income > 100))");
}

#[test]
fn loan_scenario() {
    let predicate =
        Predicate::parse("Age >= 18 AndAlso Income > 1000 OrElse HasGuarantor == true").unwrap();
    let texts: Vec<String> = branches(&predicate)
        .unwrap()
        .iter()
        .map(|b| b.text().to_string())
        .collect();
    assert_eq!(
        texts,
        vec![
            "(HasGuarantor == True)",
            "((Age >= 18) AndAlso (Income > 1000))"
        ]
    );

    let record = Record::new()
        .with("Age", Value::Int(16))
        .with("Income", Value::Int(1200))
        .with("HasGuarantor", Value::Bool(false));
    let schema = Schema::new()
        .field("Age", FieldType::Int)
        .field("Income", FieldType::Int)
        .field("HasGuarantor", FieldType::Bool);
    let report = infer(&predicate, schema, &record).unwrap();
    assert_eq!(report.properties_to_change, vec!["HasGuarantor"]);
    assert_eq!(report.ratings, vec![false]);
    assert_eq!(report.pass_ratio, "0");
    assert_eq!(report.errors, 1);
}

#[test]
fn batch_over_grid_reports_only_failures() {
    let records = grid();
    let predicate =
        Predicate::parse("Age >= 18 AndAlso Income > 1000 OrElse HasGuarantor == true").unwrap();
    let result = infer_all(&predicate, &records).unwrap();
    let expected = records
        .iter()
        .filter(|r| !eval_bool(&predicate.body, r).unwrap())
        .count();
    assert_eq!(result.inferences.len(), expected);
    for (i, report) in result.inferences.iter().enumerate() {
        assert_eq!(report.id, i);
        assert!(report.errors > 0);
        assert!(!report.properties_to_change.is_empty());
    }
}

#[test]
fn decimal_fields_are_inferred_from_json() {
    let predicate = Predicate::parse("Price > 10.5 || Stock > 3").unwrap();
    let records = vec![
        Record::from_json(&serde_json::json!({"Price": 9.75, "Stock": 1})).unwrap(),
        Record::from_json(&serde_json::json!({"Price": 12.5, "Stock": 0})).unwrap(),
    ];
    let result = infer_all(&predicate, &records).unwrap();
    assert_eq!(result.inferences.len(), 1);
    assert_eq!(result.inferences[0].data, records[0]);
}

#[test]
fn unknown_property_surfaces_as_fragment_error() {
    let predicate = Predicate::parse("Age > Salary || Age > 100").unwrap();
    let schema = Schema::new().field("Age", FieldType::Int);
    let engine = InferenceEngine::new(predicate, schema).unwrap();
    let record = Record::new().with("Age", Value::Int(1));
    match engine.infer(&record).unwrap_err() {
        InferError::Fragment { fragment, .. } => assert_eq!(fragment, "(Age > Salary)"),
        other => panic!("expected a fragment error, got {other:?}"),
    }
}

#[test]
fn branch_with_only_unknown_properties_scores_clean() {
    let predicate = Predicate::parse("Age > 3 || Salary > 10").unwrap();
    let schema = Schema::new().field("Age", FieldType::Int);
    let engine = InferenceEngine::new(predicate, schema).unwrap();
    let report = engine.infer(&Record::new().with("Age", Value::Int(1))).unwrap();
    assert_eq!(report.branch, "(Salary > 10)");
    assert!(report.ratings.is_empty());
    assert_eq!(report.pass_ratio, "0");
    assert_eq!(report.hits_percentage, "0%");
}
