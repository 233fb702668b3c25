use std::rc::Rc;

use super::{
	evaluate::EvaluateAuto as _,
	signature::{Constant as _, Scope},
};
use crate::{
	common::Closure,
	ir::{
		semantics::{Environment, Neutral, Value},
		syntax::Term,
	},
};

pub trait Conversion<T: ?Sized> {
	/// Decides whether two values are judgementally equal.
	fn can_convert(self, left: &T, right: &T) -> bool;
}

impl Scope<'_> {
	/// Decides whether a value can be applied to one more argument.
	fn is_applicable(self, value: &Value) -> bool {
		match value {
			Value::Neutral(_) => true,
			Value::Former(family, arguments) => arguments.len() < self.signature.family(*family).arity(),
			Value::Constructor(constructor, arguments) =>
				arguments.len() < self.signature.constructor(*constructor).arity(),
			_ => false,
		}
	}
}

impl Conversion<Value> for Scope<'_> {
	fn can_convert(self, left: &Value, right: &Value) -> bool {
		use Value as V;
		match (left, right) {
			// Neutrals.
			(V::Neutral(left), V::Neutral(right)) => self.can_convert(left, right),

			// Universes.
			(V::Universe(left), V::Universe(right)) => left == right,

			// Dependent functions.
			(V::Pi { base: left_base, family: left_family }, V::Pi { base: right_base, family: right_family }) =>
				self.can_convert(&**left_base, right_base) && self.can_convert(left_family, right_family),
			(V::Function { domain: left_domain, body: left_body }, V::Function { domain: right_domain, body: right_body }) =>
				self.can_convert(&**left_domain, right_domain) && self.can_convert(left_body, right_body),
			(V::Function { body, .. }, other) | (other, V::Function { body, .. }) if self.is_applicable(other) => {
				let variable = Value::from((body.parameter(), self.level));
				(self + 1)
					.can_convert(&body.evaluate_auto(self), &other.clone().apply(self.signature, variable))
			}

			// Inductive families.
			(V::Former(left, left_arguments), V::Former(right, right_arguments)) =>
				left == right && self.can_convert(left_arguments.as_slice(), right_arguments),
			(V::Constructor(left, left_arguments), V::Constructor(right, right_arguments)) =>
				left == right && self.can_convert(left_arguments.as_slice(), right_arguments),

			// Inconvertible.
			_ => false,
		}
	}
}

impl Conversion<Neutral> for Scope<'_> {
	fn can_convert(self, left: &Neutral, right: &Neutral) -> bool {
		use Neutral as N;
		match (left, right) {
			// Variables.
			(N::Variable(_, left), N::Variable(_, right)) => left == right,
			(N::Constant(left), N::Constant(right)) => left == right,

			// Dependent functions.
			(
				N::Apply { scrutinee: left_scrutinee, argument: left_argument },
				N::Apply { scrutinee: right_scrutinee, argument: right_argument },
			) => self.can_convert(&**left_scrutinee, right_scrutinee) && self.can_convert(&**left_argument, right_argument),

			// Inductive families.
			(
				N::Eliminate { target: left_target, motive: left_motive, methods: left_methods },
				N::Eliminate { target: right_target, motive: right_motive, methods: right_methods },
			) =>
				self.can_convert(&**left_target, right_target)
					&& self.can_convert(&**left_motive, right_motive)
					&& self.can_convert(&**left_methods, right_methods),

			// Inconvertible.
			_ => false,
		}
	}
}

impl Conversion<[Value]> for Scope<'_> {
	fn can_convert(self, left: &[Value], right: &[Value]) -> bool {
		left.len() == right.len() && left.iter().zip(right).all(|(left, right)| self.can_convert(left, right))
	}
}

impl<const N: usize> Conversion<Rc<Closure<Environment, Term, N>>> for Scope<'_> {
	fn can_convert(self, left: &Rc<Closure<Environment, Term, N>>, right: &Rc<Closure<Environment, Term, N>>) -> bool {
		(self + N).can_convert(&left.evaluate_auto(self), &right.evaluate_auto(self))
	}
}
