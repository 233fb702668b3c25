use std::{
	ffi::OsStr,
	fs,
	path::{Path, PathBuf},
};

use curnel::{
	frontend::{elaborate::Session, parse::parse},
	ir::source::lex,
	report::report_elaboration_error,
};
use lasso::Rodeo;

pub const EXTENSION: &str = "cur";

pub fn programs(directory: impl AsRef<Path>) -> impl Iterator<Item = PathBuf> {
	fs::read_dir(directory)
		.unwrap()
		.flatten()
		.map(|x| x.path())
		.filter(|x| x.extension() == Some(OsStr::new(EXTENSION)))
}

pub fn pass_frontend(path: impl AsRef<Path>) -> (Session, Rodeo) {
	let path = path.as_ref();
	let path_str = path.as_os_str().to_str().unwrap().to_owned();
	let source = fs::read_to_string(path).expect(&path_str);
	let lexed_source = lex(&source).ok().expect(&path_str);
	let mut interner = Rodeo::new();
	let parsed_program = parse(&lexed_source, &mut interner).expect(&path_str);
	let mut session = Session::new();
	if let Err(error) = session.run(parsed_program) {
		report_elaboration_error(&lexed_source, &session.signature, &interner, error);
		panic!("{}", path_str);
	}

	(session, interner)
}

pub fn pass_frontend_directory(directory: impl AsRef<Path>) {
	for path in programs(directory) {
		pass_frontend(path);
	}
}
