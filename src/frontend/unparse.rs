use std::fmt::Write;

use lasso::Resolver;

use crate::{
	common::Label,
	ir::syntax::Term,
	kernel::signature::{Constant as _, Signature},
};

/// Renders a core term in surface syntax.
pub fn pretty_print(term: &Term, signature: &Signature, resolver: &impl Resolver) -> String {
	let mut string = String::new();
	// Writing to a string never fails.
	let _ = Printer { signature, resolver }.print(term, &mut string);
	string
}

struct Printer<'a, R> {
	signature: &'a Signature,
	resolver: &'a R,
}

impl<R: Resolver> Printer<'_, R> {
	fn resolve(&self, label: &Label) -> &str {
		match label {
			Some(name) => self.resolver.resolve(name),
			None => "_",
		}
	}

	fn print(&self, term: &Term, f: &mut impl Write) -> std::fmt::Result {
		match term {
			Term::Variable(label, _) => write!(f, "{}", self.resolve(label))?,
			Term::Constant(name) => write!(f, "{}", self.resolver.resolve(name))?,
			Term::Let { ty, argument, tail } => {
				write!(f, "let {} : ", self.resolve(&tail.parameter()))?;
				self.print(ty, f)?;
				write!(f, " = ")?;
				self.print(argument, f)?;
				write!(f, "; ")?;
				self.print(&tail.body, f)?;
			}
			Term::Universe(0) => write!(f, "Type")?,
			Term::Universe(level) => write!(f, "Type {level}")?,
			Term::Pi { base, family } => {
				let parameter = self.resolve(&family.parameter());
				if parameter != "_" {
					write!(f, "|{parameter} : ")?;
					self.print(base, f)?;
					write!(f, "| -> ")?;
				} else {
					self.print_spine(base, f)?;
					write!(f, " -> ")?;
				}
				self.print(&family.body, f)?;
			}
			Term::Function { domain, body } => {
				write!(f, "|{} : ", self.resolve(&body.parameter()))?;
				self.print(domain, f)?;
				write!(f, "| ")?;
				self.print(&body.body, f)?;
			}
			Term::Apply { scrutinee, argument } => {
				self.print_spine(scrutinee, f)?;
				write!(f, " ")?;
				self.print_atom(argument, f)?;
			}
			Term::Former(family, arguments) => {
				write!(f, "{}", self.resolver.resolve(&self.signature.family(*family).name()))?;
				self.print_arguments(arguments, f)?;
			}
			Term::Constructor(constructor, arguments) => {
				write!(f, "{}", self.resolver.resolve(&self.signature.constructor(*constructor).name()))?;
				self.print_arguments(arguments, f)?;
			}
			Term::Eliminate { target, motive, methods } => {
				write!(f, "elim ")?;
				self.print_spine(target, f)?;
				write!(f, " :: ")?;
				self.print(motive, f)?;
				write!(f, " {{")?;
				let mut methods = methods.iter();
				if let Some(method) = methods.next() {
					write!(f, " ")?;
					self.print(method, f)?;
					for method in methods {
						write!(f, ", ")?;
						self.print(method, f)?;
					}
					write!(f, " ")?;
				}
				write!(f, "}}")?;
			}
		}

		Ok(())
	}

	fn print_arguments(&self, arguments: &[Term], f: &mut impl Write) -> std::fmt::Result {
		for argument in arguments {
			write!(f, " ")?;
			self.print_atom(argument, f)?;
		}
		Ok(())
	}

	fn print_spine(&self, term: &Term, f: &mut impl Write) -> std::fmt::Result {
		match term {
			Term::Apply { .. } | Term::Former(..) | Term::Constructor(..) => self.print(term, f),
			_ => self.print_atom(term, f),
		}
	}

	fn print_atom(&self, term: &Term, f: &mut impl Write) -> std::fmt::Result {
		match term {
			Term::Variable(..) | Term::Constant(_) | Term::Universe(0) => self.print(term, f)?,

			Term::Former(_, arguments) | Term::Constructor(_, arguments) if arguments.is_empty() => self.print(term, f)?,

			Term::Let { .. }
			| Term::Universe(_)
			| Term::Pi { .. }
			| Term::Function { .. }
			| Term::Apply { .. }
			| Term::Former(..)
			| Term::Constructor(..)
			| Term::Eliminate { .. } => {
				write!(f, "(")?;
				self.print(term, f)?;
				write!(f, ")")?;
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		common::{bind, Index},
		kernel::fixtures::Prelude,
	};

	#[test]
	fn prints_applications_with_parentheses() {
		let prelude = Prelude::new();
		let term = Term::Former(prelude.maybe, vec![prelude.nat()]);
		assert_eq!(pretty_print(&term, &prelude.signature, &prelude.interner), "Maybe Nat");
		assert_eq!(pretty_print(&prelude.numeral(2), &prelude.signature, &prelude.interner), "succ (succ zero)");
	}

	#[test]
	fn prints_arrows_and_binders() {
		let prelude = Prelude::new();
		let arrow = Term::Pi { base: prelude.nat().into(), family: bind([None], prelude.nat()) };
		assert_eq!(pretty_print(&arrow, &prelude.signature, &prelude.interner), "Nat -> Nat");

		let a = prelude.interner.get("A");
		let identity = Term::Function { domain: Term::Universe(1).into(), body: bind([a], Term::Variable(a, Index(0))) };
		assert_eq!(pretty_print(&identity, &prelude.signature, &prelude.interner), "|A : Type 1| A");
	}

	#[test]
	fn prints_eliminations() {
		let prelude = Prelude::new();
		let term = Term::Eliminate {
			target: Term::Constant(prelude.axiom_name).into(),
			motive: Term::Function { domain: prelude.nat().into(), body: bind([None], prelude.nat()) }.into(),
			methods: vec![prelude.numeral(0), prelude.numeral(1)],
		};
		assert_eq!(
			pretty_print(&term, &prelude.signature, &prelude.interner),
			"elim opaque :: |_ : Nat| Nat { zero, succ zero }"
		);
	}
}
