use lasso::Rodeo;

use super::signature::Signature;
use crate::{
	common::{bind, ConstructorId, FamilyId, Index, Name},
	ir::{semantics::Value, syntax::Term},
};

/// Naturals with addition, optionals, and an opaque natural, declared directly in the core language.
pub struct Prelude {
	pub interner: Rodeo,
	pub signature: Signature,
	pub nat: FamilyId,
	pub zero: ConstructorId,
	pub succ: ConstructorId,
	pub maybe: FamilyId,
	pub none: ConstructorId,
	pub just: ConstructorId,
	pub plus_name: Name,
	pub axiom_name: Name,
}

impl Prelude {
	pub fn new() -> Self {
		let mut interner = Rodeo::new();
		let mut signature = Signature::new();

		let nat_name = interner.get_or_intern("Nat");
		let nat = signature.declare_inductive(nat_name, 0, Term::Universe(0)).unwrap();
		let former = || Term::Former(nat, vec![]);
		let zero = signature.declare_constructor(nat_name, interner.get_or_intern("zero"), former()).unwrap();
		let succ = signature
			.declare_constructor(
				nat_name,
				interner.get_or_intern("succ"),
				Term::Pi { base: former().into(), family: bind([None], former()) },
			)
			.unwrap();
		signature.finalize_family(nat_name).unwrap();

		let maybe_name = interner.get_or_intern("Maybe");
		let a = Some(interner.get_or_intern("A"));
		let over_a = |body: Term| Term::Pi { base: Term::Universe(0).into(), family: bind([a], body) };
		let maybe = signature.declare_inductive(maybe_name, 1, over_a(Term::Universe(0))).unwrap();
		let none = signature
			.declare_constructor(
				maybe_name,
				interner.get_or_intern("none"),
				over_a(Term::Former(maybe, vec![Term::Variable(a, Index(0))])),
			)
			.unwrap();
		let just = signature
			.declare_constructor(
				maybe_name,
				interner.get_or_intern("just"),
				over_a(Term::Pi {
					base: Term::Variable(a, Index(0)).into(),
					family: bind([None], Term::Former(maybe, vec![Term::Variable(a, Index(1))])),
				}),
			)
			.unwrap();
		signature.finalize_family(maybe_name).unwrap();

		// plus m n = elim m :: |_| Nat { n, |k ih| succ ih }
		let plus_name = interner.get_or_intern("plus");
		let (m, n, k, ih) = (
			Some(interner.get_or_intern("m")),
			Some(interner.get_or_intern("n")),
			Some(interner.get_or_intern("k")),
			Some(interner.get_or_intern("ih")),
		);
		let function = |label, body: Term| Term::Function { domain: former().into(), body: bind([label], body) };
		let plus = function(
			m,
			function(
				n,
				Term::Eliminate {
					target: Term::Variable(m, Index(1)).into(),
					motive: function(None, former()).into(),
					methods: vec![
						Term::Variable(n, Index(0)),
						function(k, function(ih, Term::Constructor(succ, vec![Term::Variable(ih, Index(0))]))),
					],
				},
			),
		);
		let binary = Term::Pi {
			base: former().into(),
			family: bind([None], Term::Pi { base: former().into(), family: bind([None], former()) }),
		};
		signature.declare_definition(plus_name, binary, plus).unwrap();

		let axiom_name = interner.get_or_intern("opaque");
		signature.declare_axiom(axiom_name, former()).unwrap();

		Self { interner, signature, nat, zero, succ, maybe, none, just, plus_name, axiom_name }
	}

	pub fn nat(&self) -> Term { Term::Former(self.nat, vec![]) }

	pub fn numeral(&self, n: usize) -> Term {
		(0..n).fold(Term::Constructor(self.zero, vec![]), |term, _| Term::Constructor(self.succ, vec![term]))
	}

	/// Reads a closed natural number out of a value.
	pub fn as_number(&self, value: &Value) -> Option<usize> {
		match value {
			Value::Constructor(constructor, arguments) if *constructor == self.zero && arguments.is_empty() => Some(0),
			Value::Constructor(constructor, arguments) if *constructor == self.succ => match arguments.as_slice() {
				[predecessor] => Some(self.as_number(predecessor)? + 1),
				_ => None,
			},
			_ => None,
		}
	}
}
