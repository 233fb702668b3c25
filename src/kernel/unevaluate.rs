use super::{
	error::InvariantViolation,
	evaluate::{Evaluate as _, EvaluateAuto as _},
	signature::{Scope, Signature},
};
use crate::{
	common::{bind, Binder, Closure, Index, Label, Level},
	ir::{
		semantics::{Environment, Neutral, Value},
		syntax::Term,
	},
};

/// Computes the normal form of a closed term.
pub fn normalize(signature: &Signature, term: &Term) -> Term {
	term.clone().evaluate(signature).unevaluate_in(Scope::new(signature, Level(0)))
}

pub trait Unevaluate {
	type Term;

	/// Transforms a value into a core term, or fails if a variable escapes the scope.
	fn try_unevaluate_in(&self, scope: Scope) -> Option<Self::Term>;

	fn unevaluate_in(&self, scope: Scope) -> Self::Term {
		match self.try_unevaluate_in(scope) {
			Some(term) => term,
			None => panic!("{}", InvariantViolation::EscapedVariable),
		}
	}
}

impl<const N: usize> Unevaluate for Closure<Environment, Term, N> {
	type Term = Binder<Label, Box<Term>, N>;
	fn try_unevaluate_in(&self, scope: Scope) -> Option<Self::Term> {
		Some(bind(self.parameters, self.evaluate_auto(scope).try_unevaluate_in(scope + N)?))
	}
}

impl Unevaluate for Value {
	type Term = Term;
	fn try_unevaluate_in(&self, scope: Scope) -> Option<Self::Term> {
		Some(match self {
			Value::Neutral(neutral) => neutral.try_unevaluate_in(scope)?,
			Value::Universe(level) => Term::Universe(*level),
			Value::Pi { base, family } =>
				Term::Pi { base: base.try_unevaluate_in(scope)?.into(), family: family.try_unevaluate_in(scope)? },
			Value::Function { domain, body } =>
				Term::Function { domain: domain.try_unevaluate_in(scope)?.into(), body: body.try_unevaluate_in(scope)? },
			Value::Former(family, arguments) => Term::Former(*family, unevaluate_all(arguments, scope)?),
			Value::Constructor(constructor, arguments) =>
				Term::Constructor(*constructor, unevaluate_all(arguments, scope)?),
		})
	}
}

impl Unevaluate for Neutral {
	type Term = Term;
	fn try_unevaluate_in(&self, scope: Scope) -> Option<Self::Term> {
		Some(match self {
			Neutral::Variable(name, Level(level)) => Term::Variable(*name, Index(scope.level.0.checked_sub(level + 1)?)),
			Neutral::Constant(name) => Term::Constant(*name),
			Neutral::Apply { scrutinee, argument } => Term::Apply {
				scrutinee: scrutinee.try_unevaluate_in(scope)?.into(),
				argument: argument.try_unevaluate_in(scope)?.into(),
			},
			Neutral::Eliminate { target, motive, methods } => Term::Eliminate {
				target: target.try_unevaluate_in(scope)?.into(),
				motive: motive.try_unevaluate_in(scope)?.into(),
				methods: unevaluate_all(methods, scope)?,
			},
		})
	}
}

fn unevaluate_all(values: &[Value], scope: Scope) -> Option<Vec<Term>> {
	values.iter().map(|value| value.try_unevaluate_in(scope)).collect()
}
