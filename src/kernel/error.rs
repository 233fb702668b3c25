use thiserror::Error;

use crate::{
	common::{ConstructorId, FamilyId, Index, Name},
	ir::syntax::Term,
};

/// A term failed to typecheck.
#[derive(Error, Clone, Debug)]
pub enum TypeError {
	#[error("variable {0:?} is not bound")]
	UnboundVariable(Index),
	#[error("unknown constant {0:?}")]
	UnknownConstant(Name),
	#[error("expected a type, found a term of type {0:?}")]
	ExpectedUniverse(Term),
	#[error("expected a function, found a term of type {0:?}")]
	ExpectedFunction(Term),
	#[error("expected an inductive family, found {0:?}")]
	ExpectedInductive(Term),
	#[error("tag applied to {found} arguments, but accepts at most {arity}")]
	Overapplied { arity: usize, found: usize },
	#[error("motive of type {0:?} does not eliminate the target")]
	InvalidMotive(Term),
	#[error("universe level {0} has no successor")]
	UniverseOverflow(u64),
	#[error("type mismatch: expected {expected:?}, found {found:?}")]
	Mismatch { expected: Term, found: Term },
}

/// The signature was used in a way that it does not allow.
#[derive(Error, Clone, Debug)]
pub enum ConfigurationError {
	#[error("{0:?} is already declared")]
	DuplicateName(Name),
	#[error("unknown inductive family {0:?}")]
	UnknownFamily(Name),
	#[error("inductive family {0:?} is already finalized")]
	FamilyFinalized(Name),
	#[error("inductive family {0:?} is not finalized")]
	FamilyUnfinalized(Name),
	#[error("inductive family {0:?} has no constructors")]
	NoConstructors(Name),
	#[error("type former of {family:?} binds fewer than {parameter_count} parameters")]
	ParameterCount { family: Name, parameter_count: usize },
	#[error("type former of {0:?} does not end in a universe")]
	FamilyArity(Name),
	#[error("constructor {0:?} does not bind the parameters of its family")]
	ConstructorParameters(Name),
	#[error("constructor {0:?} does not return its own family")]
	ConstructorTarget(Name),
	#[error("constructor {constructor:?} has a non-positive occurrence of its family in field {field}")]
	NonPositive { constructor: Name, field: usize },
	#[error("eliminator for {family:?} needs {expected} methods, but was given {found}")]
	MethodCount { family: Name, expected: usize, found: usize },
}

/// The kernel reached a state that typechecking rules out.
#[derive(Error, Clone, Debug)]
pub enum InvariantViolation {
	#[error("cannot eliminate a value that is neither neutral nor constructed")]
	NonConstructorTarget,
	#[error("constructor {0:?} is applied to the wrong number of fields")]
	PartialConstruction(ConstructorId),
	#[error("no method for constructor {0:?}")]
	MissingMethod(ConstructorId),
	#[error("inductive family {0:?} was eliminated before being finalized")]
	UnfinalizedFamily(FamilyId),
	#[error("applied a value that is not a function")]
	NotAFunction,
	#[error("telescope is shorter than its declared arity")]
	ShortTelescope,
	#[error("read back a variable outside of its scope")]
	EscapedVariable,
}

#[derive(Error, Clone, Debug)]
pub enum KernelError {
	#[error(transparent)]
	Type(#[from] TypeError),
	#[error(transparent)]
	Configuration(#[from] ConfigurationError),
	#[error(transparent)]
	Invariant(#[from] InvariantViolation),
}
