use std::rc::Rc;

use super::{
	eliminate::eliminate,
	error::InvariantViolation,
	signature::{Scope, Signature},
};
use crate::{
	common::{Binder, Closure, Label, Level},
	ir::{
		semantics::{Environment, Neutral, Value},
		syntax::Term,
	},
};

pub trait Evaluate {
	type Value;

	fn evaluate(self, signature: &Signature) -> Self::Value
	where
		Self: Sized,
	{
		self.evaluate_in(signature, &Environment::default())
	}

	/// Transforms a core term into a value.
	fn evaluate_in(self, signature: &Signature, environment: &Environment) -> Self::Value;
}

impl<const N: usize> Evaluate for Binder<Label, Box<Term>, N> {
	type Value = Closure<Environment, Term, N>;
	fn evaluate_in(self, _: &Signature, environment: &Environment) -> Self::Value {
		Closure::new(environment.clone(), self.parameters, *self.body)
	}
}

impl Evaluate for Term {
	type Value = Value;
	fn evaluate_in(self, signature: &Signature, environment: &Environment) -> Self::Value {
		match self {
			// Variables.
			Term::Variable(_, index) => environment.lookup(index),
			Term::Constant(name) => match signature.global(name).and_then(|global| global.definition.as_ref()) {
				Some(definition) => definition.clone(),
				None => Value::Neutral(Neutral::Constant(name)),
			},

			// Let-expressions.
			Term::Let { argument, tail, .. } =>
				tail.evaluate_at(signature, environment, [argument.evaluate_in(signature, environment)]),

			// Types and universe indices.
			Term::Universe(level) => Value::Universe(level),

			// Dependent functions.
			Term::Pi { base, family } => Value::Pi {
				base: base.evaluate_in(signature, environment).into(),
				family: family.evaluate_in(signature, environment).into(),
			},
			Term::Function { domain, body } => Value::Function {
				domain: domain.evaluate_in(signature, environment).into(),
				body: body.evaluate_in(signature, environment).into(),
			},
			Term::Apply { scrutinee, argument } => scrutinee
				.evaluate_in(signature, environment)
				.apply(signature, argument.evaluate_in(signature, environment)),

			// Inductive families.
			Term::Former(family, arguments) =>
				Value::Former(family, arguments.into_iter().map(|x| x.evaluate_in(signature, environment)).collect()),
			Term::Constructor(constructor, arguments) => Value::Constructor(
				constructor,
				arguments.into_iter().map(|x| x.evaluate_in(signature, environment)).collect(),
			),
			Term::Eliminate { target, motive, methods } => {
				let target = target.evaluate_in(signature, environment);
				let motive = motive.evaluate_in(signature, environment);
				let methods: Rc<[Value]> = methods.into_iter().map(|x| x.evaluate_in(signature, environment)).collect();
				match eliminate(signature, target, &motive, &methods) {
					Ok(value) => value,
					Err(violation) => panic!("{violation}"),
				}
			}
		}
	}
}

impl Value {
	/// Applies a function-like value to an argument.
	pub fn apply(self, signature: &Signature, argument: Self) -> Self {
		match self {
			Value::Function { body, .. } => body.evaluate_with(signature, [argument]),
			Value::Neutral(neutral) =>
				Value::Neutral(Neutral::Apply { scrutinee: neutral.into(), argument: argument.into() }),
			Value::Former(family, mut arguments) => {
				arguments.push(argument);
				Value::Former(family, arguments)
			}
			Value::Constructor(constructor, mut arguments) => {
				arguments.push(argument);
				Value::Constructor(constructor, arguments)
			}
			_ => panic!("{}", InvariantViolation::NotAFunction),
		}
	}

	pub fn apply_all(self, signature: &Signature, arguments: impl IntoIterator<Item = Self>) -> Self {
		arguments.into_iter().fold(self, |callee, argument| callee.apply(signature, argument))
	}

	/// Instantiates the leading Π-binders of a type with the given arguments.
	pub fn instantiate(self, signature: &Signature, arguments: &[Self]) -> Self {
		arguments.iter().fold(self, |ty, argument| match ty {
			Value::Pi { family, .. } => family.evaluate_with(signature, [argument.clone()]),
			_ => panic!("{}", InvariantViolation::ShortTelescope),
		})
	}
}

/// The leading Π-binders of a type, opened with fresh variables.
pub struct Telescope {
	pub labels: Vec<Label>,
	/// Each domain lives in the scope extended by the variables before it.
	pub domains: Vec<Value>,
	pub variables: Vec<Value>,
	pub body: Value,
}

impl Telescope {
	/// Opens at most `limit` binders of `ty`, binding the first at the level of `scope`.
	pub fn open(scope: Scope, ty: Value, limit: usize) -> Self {
		let mut telescope = Self { labels: Vec::new(), domains: Vec::new(), variables: Vec::new(), body: ty };
		while telescope.variables.len() < limit {
			let Value::Pi { base, family } = &telescope.body else { break };
			let variable = Value::from((family.parameter(), scope.level + telescope.variables.len()));
			let body = family.evaluate_with(scope.signature, [variable.clone()]);
			telescope.labels.push(family.parameter());
			telescope.domains.push(base.as_ref().clone());
			telescope.variables.push(variable);
			telescope.body = body;
		}
		telescope
	}

	pub fn len(&self) -> usize { self.variables.len() }
}

pub trait EvaluateWith<const N: usize> {
	type Value;
	/// Transforms a core closure under a binder into a value, taking arguments.
	fn evaluate_with(self, signature: &Signature, arguments: [Self::Value; N]) -> Self::Value;
}

impl<const N: usize> EvaluateWith<N> for &Closure<Environment, Term, N> {
	type Value = Value;
	fn evaluate_with(self, signature: &Signature, arguments: [Self::Value; N]) -> Self::Value {
		self.body.clone().evaluate_in(signature, &self.environment.extend(arguments))
	}
}

pub trait EvaluateAt<const N: usize> {
	type Value;
	/// Transforms a core term under a binder into a value, taking arguments.
	fn evaluate_at(self, signature: &Signature, environment: &Environment, arguments: [Self::Value; N]) -> Self::Value;
}

impl<const N: usize> EvaluateAt<N> for Binder<Label, Box<Term>, N> {
	type Value = Value;
	fn evaluate_at(self, signature: &Signature, environment: &Environment, arguments: [Self::Value; N]) -> Self::Value {
		self.body.evaluate_in(signature, &environment.extend(arguments))
	}
}

pub trait EvaluateAuto {
	type Value;
	/// Evaluates a closure on its own parameters by postulating them and passing them in.
	fn evaluate_auto(&self, scope: Scope) -> Self::Value;
}

impl<const N: usize> EvaluateAuto for Closure<Environment, Term, N> {
	type Value = Value;
	fn evaluate_auto(&self, scope: Scope) -> Self::Value {
		let mut x = 0;
		self.evaluate_with(
			scope.signature,
			self.parameters.map(|parameter| {
				let y: Level = scope.level + x;
				x += 1;
				(parameter, y).into()
			}),
		)
	}
}
