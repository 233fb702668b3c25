use std::rc::Rc;

use super::syntax::Term;
use crate::common::{Closure, ConstructorId, FamilyId, Index, Label, Level, Name};

#[derive(Clone, Debug)]
pub enum Value {
	// Neutrals.
	Neutral(Neutral),

	// Types and universe indices.
	Universe(u64),

	// Dependent functions.
	Pi { base: Rc<Self>, family: Rc<Closure<Environment, Term>> },
	Function { domain: Rc<Self>, body: Rc<Closure<Environment, Term>> },

	// Inductive families.
	Former(FamilyId, Vec<Self>),
	Constructor(ConstructorId, Vec<Self>),
}

#[derive(Clone, Debug)]
pub enum Neutral {
	// Variables.
	Variable(Label, Level),
	Constant(Name),

	// Dependent functions.
	Apply { scrutinee: Rc<Self>, argument: Rc<Value> },

	// Inductive families.
	Eliminate { target: Rc<Self>, motive: Rc<Value>, methods: Rc<[Value]> },
}

#[derive(Clone, Debug, Default)]
pub struct Environment(pub Vec<Value>);

impl Environment {
	pub fn lookup(&self, Index(i): Index) -> Value { self.0[self.0.len() - (i + 1)].clone() }

	#[must_use]
	pub fn extend<const N: usize>(&self, values: [Value; N]) -> Self {
		let mut environment = self.clone();
		environment.0.extend(values);
		environment
	}

	pub fn level(&self) -> Level { Level(self.0.len()) }

	pub fn push(&mut self, value: Value) { self.0.push(value); }

	pub fn pop(&mut self) { self.0.pop(); }
}

impl From<(Label, Level)> for Value {
	fn from((name, level): (Label, Level)) -> Self { Self::Neutral(Neutral::Variable(name, level)) }
}
