use crate::common::{Binder, Label, Name};

#[derive(Debug, Clone)]
pub struct ParsedProgram {
	pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone)]
pub struct Declaration {
	pub range: (usize, usize),
	pub kind: DeclarationKind,
}

#[derive(Debug, Clone)]
pub enum DeclarationKind {
	/// `data Name (params) : arity { constructor : type, ... }`, where constructor types omit the parameters.
	Inductive {
		name: ParsedName,
		parameters: Vec<(ParsedLabel, Expression)>,
		arity: Expression,
		constructors: Vec<(ParsedName, Expression)>,
	},
	Axiom { name: ParsedName, ty: Expression },
	Definition { name: ParsedName, ty: Option<Expression>, value: Expression },
	Evaluate(Expression),
	Check { term: Expression, ty: Expression },
}

#[derive(Debug, Clone)]
pub struct Expression {
	pub range: (usize, usize),
	pub preterm: ParsedPreterm,
}

#[derive(Debug, Clone, Copy)]
pub struct ParsedLabel {
	pub locus: usize,
	pub label: Label,
}

#[derive(Debug, Clone, Copy)]
pub struct ParsedName {
	pub locus: usize,
	pub name: Name,
}

#[derive(Debug, Clone)]
pub struct ParsedPreterm(pub Preterm<ParsedLabel, Expression>);

#[derive(Debug, Clone)]
pub enum Preterm<L, E> {
	Variable(Name),

	Let { ty: Option<Box<E>>, argument: Box<E>, tail: Binder<L, Box<E>> },
	Annotation { term: Box<E>, ty: Box<E> },

	// Types and universe indices.
	Universe(u64),

	// Dependent functions.
	Pi { base: Box<E>, family: Binder<L, Box<E>> },
	Lambda { domain: Option<Box<E>>, body: Binder<L, Box<E>> },
	Call { callee: Box<E>, argument: Box<E> },

	// Inductive families.
	Eliminate { target: Box<E>, motive: Box<E>, methods: Vec<E> },
}

impl Preterm<ParsedLabel, Expression> {
	pub fn at(self, range: (usize, usize)) -> Expression { Expression { range, preterm: ParsedPreterm(self) } }
}
