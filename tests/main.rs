mod common;
mod fail;
mod scenarios;

use common::pass_frontend_directory;

#[test]
fn run_programs() {
	pass_frontend_directory("programs");
	pass_frontend_directory("programs/logic");
}
