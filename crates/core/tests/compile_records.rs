//! Compiling rule text against schemas derived from JSON records.

use nearmiss_core::{
    CompileError, ExpressionCompiler, FieldType, Predicate, Record, RecordType, Schema,
    TextCompiler,
};

fn records() -> Vec<Record> {
    let raw = serde_json::json!([
        {"Age": 16, "Income": 1200, "HasGuarantor": false, "Name": "Ana", "Price": 10},
        {"Age": 42, "Income": 800.5, "HasGuarantor": true, "Name": null, "Price": 7.25},
    ]);
    raw.as_array()
        .unwrap()
        .iter()
        .map(|v| Record::from_json(v).unwrap())
        .collect()
}

#[test]
fn inferred_schema_types_every_field() {
    let records = records();
    let schema = Schema::infer(&records);
    assert_eq!(
        schema.property_names(),
        vec!["Age", "HasGuarantor", "Income", "Name", "Price"]
    );
    assert_eq!(schema.property_type("Income"), Some(FieldType::Decimal));
    assert_eq!(schema.property_type("Price"), Some(FieldType::Decimal));
    assert_eq!(schema.property_type("HasGuarantor"), Some(FieldType::Bool));
}

#[test]
fn rendered_predicate_compiles_to_the_same_behaviour() {
    let records = records();
    let schema = Schema::infer(&records);
    let predicate = Predicate::parse(
        "x => x.Age >= 18 && !string.IsNullOrWhiteSpace(x.Name) || x.Price < 8",
    )
    .unwrap();

    let direct = TextCompiler
        .compile(
            "Age >= 18 && !string.IsNullOrWhiteSpace(Name) || Price < 8",
            &schema,
        )
        .unwrap();
    let rendered = TextCompiler
        .compile(&predicate.body.to_string(), &schema)
        .unwrap();

    for record in &records {
        assert_eq!(
            direct.evaluate(record).unwrap(),
            rendered.evaluate(record).unwrap()
        );
    }
    assert!(!direct.evaluate(&records[0]).unwrap());
    assert!(direct.evaluate(&records[1]).unwrap());
}

#[test]
fn qualified_members_compile_by_name() {
    let schema = Schema::new().field("Age", FieldType::Int);
    let compiled = TextCompiler.compile("(x.Age > 3)", &schema).unwrap();
    let record = Record::new().with("Age", nearmiss_core::Value::Int(4));
    assert!(compiled.evaluate(&record).unwrap());
}

#[test]
fn compile_errors_distinguish_syntax_from_unknown_names() {
    let schema = Schema::infer(&records());
    for text in ["(Age > 3", "Age > 3)", "Age >", "Age = 3", "(Age > 3) AndAlso"] {
        let err = TextCompiler.compile(text, &schema).unwrap_err();
        assert!(err.is_syntax(), "{text} should be a syntax error, got {err}");
    }
    let err = TextCompiler.compile("Salary > 3", &schema).unwrap_err();
    assert!(matches!(err, CompileError::UnknownProperty { ref name } if name == "Salary"));
}
