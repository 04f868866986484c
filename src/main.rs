#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::process::exit;
use std::rc::Rc;

use mince_yaml::{BudgetReport, DumpOptions, Error, Options, dump, dump_with_options};

const USAGE: &str = "\
Usage: mince-yaml [--budget] [--indent N] [--wrap N] [--force-quotes] <file>

Loads the file, prints it back in normalized form and exits with 0.
Exit codes: 1 usage error, 2 file not readable, 3 invalid document.";

struct Args {
    path: String,
    budget: bool,
    dump: DumpOptions,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut path = None;
    let mut budget = false;
    let mut dump = DumpOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{USAGE}");
                exit(0);
            }
            "--budget" => budget = true,
            "--force-quotes" => dump.force_quotes = true,
            "--indent" => dump.indent_step = number(&arg, args.next())?,
            "--wrap" => dump.wrap_column = number(&arg, args.next())?,
            flag if flag.starts_with('-') => return Err(format!("unknown option {flag}")),
            other if path.is_some() => return Err(format!("unexpected argument {other}")),
            other => path = Some(other.to_owned()),
        }
    }

    let path = path.ok_or("expected a path to a YAML file")?;
    Ok(Args { path, budget, dump })
}

fn number(flag: &str, value: Option<String>) -> Result<usize, String> {
    value
        .as_deref()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| format!("{flag} expects a non-negative number"))
}

/// Validate a YAML file and print its normalized form, optionally with the budget report.
fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}\n\n{USAGE}");
            exit(1);
        }
    };

    let content = match mince_yaml::read_to_string(&args.path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("{err}");
            exit(2);
        }
    };

    let report: Rc<RefCell<Option<BudgetReport>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&report);
    let options = Options::default().with_budget_report(move |r| *sink.borrow_mut() = Some(r));

    let value = match mince_yaml::load_with_options(&content, options) {
        Ok(value) => value,
        Err(err) => {
            print_failure(&args.path, &content, &err);
            exit(3);
        }
    };

    print!("{}", dump_with_options(&value, args.dump));
    if args.budget {
        if let Some(report) = report.borrow().as_ref() {
            print!("{}", dump(&report.to_value()));
        }
    }
}

fn print_failure(path: &str, content: &str, err: &Error) {
    eprintln!("{path} invalid:\n{}", err.render_with_path(content, path));
}
