use std::process;

use serde::Serialize;

use crate::input::parse_predicate;
use crate::output::print_structured;
use crate::{report_error, OutputFormat};

#[derive(Serialize)]
struct Decomposition<'a> {
    predicate: String,
    parameters: &'a [String],
    branches: Vec<&'a str>,
}

pub(crate) fn cmd_decompose(predicate: &str, output: OutputFormat, quiet: bool) {
    let predicate = match parse_predicate(predicate) {
        Ok(p) => p,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let branches = match nearmiss_infer::branches(&predicate) {
        Ok(b) => b,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Json | OutputFormat::Xml => {
            let decomposition = Decomposition {
                predicate: predicate.to_string(),
                parameters: &predicate.parameters,
                branches: branches.iter().map(|b| b.text()).collect(),
            };
            print_structured(&decomposition, "Decomposition", output);
        }
        OutputFormat::Text => {
            if !quiet {
                println!("{} branch(es) of {}", branches.len(), predicate);
            }
            for (i, branch) in branches.iter().enumerate() {
                println!("  [{}] {}", i, branch.text());
            }
        }
    }
}
