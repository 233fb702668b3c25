use crate::common::{Binder, ConstructorId, FamilyId, Index, Label, Name};

#[derive(Clone, Debug)]
pub enum Term {
	// Variables.
	Variable(Label, Index),
	Constant(Name),

	// Let-expressions.
	Let { ty: Box<Self>, argument: Box<Self>, tail: Binder<Label, Box<Self>> },

	// Types and universe indices.
	Universe(u64),

	// Dependent functions.
	Pi { base: Box<Self>, family: Binder<Label, Box<Self>> },
	Function { domain: Box<Self>, body: Binder<Label, Box<Self>> },
	Apply { scrutinee: Box<Self>, argument: Box<Self> },

	// Inductive families.
	Former(FamilyId, Vec<Self>),
	Constructor(ConstructorId, Vec<Self>),
	Eliminate { target: Box<Self>, motive: Box<Self>, methods: Vec<Self> },
}

impl Term {
	/// Applies a term to an argument, extending the spine of a tag application when possible.
	pub fn apply(self, argument: Self) -> Self {
		match self {
			Self::Former(family, mut arguments) => {
				arguments.push(argument);
				Self::Former(family, arguments)
			}
			Self::Constructor(constructor, mut arguments) => {
				arguments.push(argument);
				Self::Constructor(constructor, arguments)
			}
			scrutinee => Self::Apply { scrutinee: scrutinee.into(), argument: argument.into() },
		}
	}

	/// Decides whether the former of `family` appears anywhere in this term.
	pub fn mentions(&self, family: FamilyId) -> bool {
		match self {
			Self::Variable(..) | Self::Constant(_) | Self::Universe(_) => false,
			Self::Let { ty, argument, tail } => ty.mentions(family) || argument.mentions(family) || tail.body.mentions(family),
			Self::Pi { base, family: body } => base.mentions(family) || body.body.mentions(family),
			Self::Function { domain, body } => domain.mentions(family) || body.body.mentions(family),
			Self::Apply { scrutinee, argument } => scrutinee.mentions(family) || argument.mentions(family),
			Self::Former(former, arguments) => *former == family || arguments.iter().any(|x| x.mentions(family)),
			Self::Constructor(_, arguments) => arguments.iter().any(|x| x.mentions(family)),
			Self::Eliminate { target, motive, methods } =>
				target.mentions(family) || motive.mentions(family) || methods.iter().any(|x| x.mentions(family)),
		}
	}
}
