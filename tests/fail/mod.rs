use std::fs;

use curnel::{
	frontend::{
		elaborate::{ElaborationErrorKind, Session},
		parse::parse,
	},
	ir::source::lex,
	kernel::error::KernelError,
};
use lasso::Rodeo;

use crate::common::programs;

const EXPECT: &str = "% expect: ";

/// The name of the innermost variant of an elaboration error.
fn variant(kind: &ElaborationErrorKind) -> String {
	let debug = match kind {
		ElaborationErrorKind::Kernel(KernelError::Type(error)) => format!("{error:?}"),
		ElaborationErrorKind::Kernel(KernelError::Configuration(error)) => format!("{error:?}"),
		ElaborationErrorKind::Kernel(KernelError::Invariant(error)) => format!("{error:?}"),
		kind => format!("{kind:?}"),
	};
	debug.chars().take_while(char::is_ascii_alphanumeric).collect()
}

#[test]
fn run_fail_tests() {
	let mut count = 0;
	for path in programs("tests/fail/programs") {
		let path_str = path.as_os_str().to_str().unwrap().to_owned();
		let source = fs::read_to_string(path).expect(&path_str);
		let expected = source.lines().find_map(|line| line.strip_prefix(EXPECT)).expect(&path_str).trim();
		let lexed_source = lex(&source).ok().expect(&path_str);
		let mut interner = Rodeo::new();
		let parsed_program = parse(&lexed_source, &mut interner).expect(&path_str);
		let error = Session::new().run(parsed_program).expect_err(&path_str);
		assert_eq!(variant(&error.kind), expected, "{path_str}: {:?}", error.kind);
		count += 1;
	}
	assert!(count > 0);
}
