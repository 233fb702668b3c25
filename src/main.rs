use std::process::ExitCode;

use bpaf::{construct, short, Parser};
use curnel::{
	frontend::{
		elaborate::{Outcome, Session},
		parse::parse,
		unparse::pretty_print,
	},
	ir::{source::lex, syntax::Term},
	report::{report_elaboration_error, report_parse_error, report_tokenization_error},
};
use lasso::Rodeo;
use tracing_subscriber::EnvFilter;

pub fn run(source: &str) -> ExitCode {
	// Parsing.
	let lexed_source = match lex(source) {
		Ok(x) => x,
		Err(e) => {
			report_tokenization_error(source, e);
			return ExitCode::FAILURE;
		}
	};

	let mut interner = Rodeo::new();
	let parsed_program = match parse(&lexed_source, &mut interner) {
		Ok(x) => x,
		Err(e) => {
			report_parse_error(&lexed_source, e);
			return ExitCode::FAILURE;
		}
	};
	tracing::info!(declarations = parsed_program.declarations.len(), "parsing complete");

	// Elaboration.
	let mut session = Session::new();
	let result = session.run(parsed_program);

	for outcome in &session.outcomes {
		let print = |term: &Term| pretty_print(term, &session.signature, &interner);
		match outcome {
			Outcome::Declared(name) => tracing::info!(name = interner.resolve(name), "declared"),
			Outcome::Evaluated { term, normal_form, ty } => {
				println!("Elaborated term: {}", print(term));
				println!("Synthesized type: {}", print(ty));
				println!("Evaluation: {}", print(normal_form));
				println!();
			}
			Outcome::Checked { term, ty } => {
				println!("Checked: {} : {}", print(term), print(ty));
				println!();
			}
		}
	}

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			report_elaboration_error(&lexed_source, &session.signature, &interner, e);
			ExitCode::FAILURE
		}
	}
}

enum InputOption {
	Direct(String),
	FilePath(String),
}

struct Options {
	input: InputOption,
}

fn main() -> ExitCode {
	tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();

	let options: Options = construct!(Options {
		input(construct!([
			c(short('c').argument::<String>("\"program\"").help("Read input from argument").map(InputOption::Direct)),
			f(short('f').argument::<String>("PATH").help("Read input from file").map(InputOption::FilePath)),
		]))
	})
	.to_options()
	.run();

	let input = match options.input {
		InputOption::Direct(command) => command,
		InputOption::FilePath(file_path) => match std::fs::read_to_string(&file_path) {
			Ok(input) => input,
			Err(error) => {
				eprintln!("error: could not read {file_path}: {error}");
				return ExitCode::FAILURE;
			}
		},
	};

	run(&input)
}
