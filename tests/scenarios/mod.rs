use curnel::frontend::{
	elaborate::{Outcome, Session},
	unparse::pretty_print,
};
use lasso::Rodeo;

use crate::common::pass_frontend;

/// The printed normal forms of a program's `eval` declarations, in order.
fn evaluations(path: &str) -> Vec<String> {
	let (session, interner): (Session, Rodeo) = pass_frontend(path);
	session
		.outcomes
		.iter()
		.filter_map(|outcome| match outcome {
			Outcome::Evaluated { normal_form, .. } => Some(pretty_print(normal_form, &session.signature, &interner)),
			_ => None,
		})
		.collect()
}

#[test]
fn natural_numbers() {
	assert_eq!(
		evaluations("programs/nat.cur"),
		[
			"succ (succ (succ (succ zero)))",
			"succ (succ (succ (succ (succ (succ zero)))))",
			"succ zero",
			"|n : Nat| n",
		]
	);
}

#[test]
fn optionals() {
	assert_eq!(evaluations("programs/maybe.cur"), ["succ zero", "zero", "succ (succ zero)"]);
}

#[test]
fn vectors() {
	assert_eq!(
		evaluations("programs/vec.cur"),
		["cons Nat (succ zero) zero (cons Nat zero zero (nil Nat))", "succ (succ zero)"]
	);
}

#[test]
fn binary_trees() {
	assert_eq!(evaluations("programs/tree.cur"), ["succ (succ zero)", "succ zero", "succ (succ zero)"]);
}

#[test]
fn equality() {
	assert_eq!(evaluations("programs/logic/eq.cur"), ["refl Nat zero"]);
}

#[test]
fn checks_report_their_types() {
	let (session, interner) = pass_frontend("programs/maybe.cur");
	let checked: Vec<_> = session
		.outcomes
		.iter()
		.filter_map(|outcome| match outcome {
			Outcome::Checked { ty, .. } => Some(pretty_print(ty, &session.signature, &interner)),
			_ => None,
		})
		.collect();
	assert_eq!(checked, ["Maybe Nat", "|A : Type| -> Maybe A"]);
}
