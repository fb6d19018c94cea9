use std::path::Path;
use std::process;

use nearmiss_core::Schema;
use nearmiss_infer::{InferenceEngine, InferenceReport};

use crate::input::{load_records, load_schema, parse_predicate};
use crate::output::print_structured;
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_infer(
    predicate: &str,
    records_path: &Path,
    schema_path: Option<&Path>,
    single: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let predicate = match parse_predicate(predicate) {
        Ok(p) => p,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let records = match load_records(records_path) {
        Ok(r) => r,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    // An explicit schema keeps its declared order; otherwise derive one.
    let schema = match schema_path {
        Some(path) => match load_schema(path) {
            Ok(s) => s,
            Err(msg) => {
                report_error(&msg, output, quiet);
                process::exit(1);
            }
        },
        None => Schema::infer(&records),
    };

    let engine = match InferenceEngine::new(predicate, schema) {
        Ok(e) => e,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    if single {
        let Some(record) = records.first() else {
            report_error(
                &format!("error: no records in {}", records_path.display()),
                output,
                quiet,
            );
            process::exit(1);
        };
        match engine.infer(record) {
            Ok(report) => match output {
                OutputFormat::Json | OutputFormat::Xml => {
                    print_structured(&report, "InferenceReport", output)
                }
                OutputFormat::Text => print_report(&report),
            },
            Err(e) => {
                report_error(&format!("inference error: {}", e), output, quiet);
                process::exit(1);
            }
        }
        return;
    }

    let result = match engine.infer_all(&records) {
        Ok(r) => r,
        Err(e) => {
            report_error(&format!("inference error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Json | OutputFormat::Xml => {
            print_structured(&result, "InferenceResult", output)
        }
        OutputFormat::Text => {
            if result.inferences.is_empty() {
                if !quiet {
                    println!("all {} record(s) satisfy the predicate", records.len());
                }
                return;
            }
            if !quiet {
                println!(
                    "{} of {} record(s) fail the predicate",
                    result.inferences.len(),
                    records.len()
                );
            }
            for report in &result.inferences {
                print_report(report);
            }
        }
    }
}

fn print_report(report: &InferenceReport) {
    let data = serde_json::to_string(&report.data)
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("record {}: {}", report.id, data);
    println!("  closest branch: {}", report.branch);
    let ratings: Vec<&str> = report
        .ratings
        .iter()
        .map(|&r| if r { "pass" } else { "fail" })
        .collect();
    println!("  conditions:     [{}]", ratings.join(", "));
    if report.properties_to_change.is_empty() {
        println!("  change:         (nothing)");
    } else {
        println!("  change:         {}", report.properties_to_change.join(", "));
    }
    println!(
        "  pass ratio:     {} ({}, {} error(s))",
        report.pass_ratio, report.hits_percentage, report.errors
    );
}
