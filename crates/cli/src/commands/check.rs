use std::path::Path;
use std::process;

use nearmiss_core::{Record, Schema};
use nearmiss_infer::InferenceEngine;
use serde::Serialize;

use crate::input::{load_records, parse_predicate};
use crate::output::print_structured;
use crate::{report_error, OutputFormat};

#[derive(Serialize)]
struct CheckSummary<'a> {
    total: usize,
    satisfying: Vec<&'a Record>,
    failing: Vec<&'a Record>,
}

pub(crate) fn cmd_check(predicate: &str, records_path: &Path, output: OutputFormat, quiet: bool) {
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

    let engine = match InferenceEngine::new(predicate, Schema::infer(&records)) {
        Ok(e) => e,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    let (satisfying, failing) = match (engine.satisfying(&records), engine.failing(&records)) {
        (Ok(s), Ok(f)) => (s, f),
        (Err(e), _) | (_, Err(e)) => {
            report_error(&format!("evaluation error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Json | OutputFormat::Xml => {
            let summary = CheckSummary {
                total: records.len(),
                satisfying,
                failing,
            };
            print_structured(&summary, "CheckSummary", output);
        }
        OutputFormat::Text => {
            println!(
                "{} of {} record(s) satisfy the predicate",
                satisfying.len(),
                records.len()
            );
            if !quiet {
                for record in &failing {
                    let data = serde_json::to_string(record)
                        .unwrap_or_else(|e| format!("serialization error: {}", e));
                    println!("  fails: {}", data);
                }
            }
        }
    }
}
