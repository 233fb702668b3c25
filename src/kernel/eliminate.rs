//! Iota reduction: the generic eliminator of inductive families.
//!
//! Eliminating a constructed value selects the method registered for its constructor,
//! drops the shared parameters, and applies the method first to the remaining fields
//! and then to the results of eliminating each recursive field, in field order:
//!
//! ```text
//! elim (succ n) :: P { z, s }  ~>  s n (elim n :: P { z, s })
//! ```

use std::rc::Rc;

use super::{
	error::{ConfigurationError, InvariantViolation, KernelError},
	signature::{Constant as _, Signature},
};
use crate::ir::semantics::{Neutral, Value};

pub fn eliminate(
	signature: &Signature,
	target: Value,
	motive: &Value,
	methods: &Rc<[Value]>,
) -> Result<Value, InvariantViolation> {
	match target {
		Value::Neutral(target) => Ok(Value::Neutral(Neutral::Eliminate {
			target: target.into(),
			motive: motive.clone().into(),
			methods: methods.clone(),
		})),
		Value::Constructor(tag, fields) => {
			let constructor = signature.constructor(tag);
			if fields.len() != constructor.arity() {
				return Err(InvariantViolation::PartialConstruction(tag));
			}
			let dispatch = signature
				.family(constructor.family())
				.dispatch()
				.map_err(|_| InvariantViolation::UnfinalizedFamily(constructor.family()))?;
			let method = dispatch.select(tag, methods).ok_or(InvariantViolation::MissingMethod(tag))?;

			let mut results = Vec::with_capacity(constructor.recursive_fields().len());
			for &position in constructor.recursive_fields() {
				results.push(eliminate(signature, fields[position].clone(), motive, methods)?);
			}
			tracing::trace!(?tag, fields = fields.len(), recursive = results.len(), "iota");

			Ok(method.clone().apply_all(signature, fields.into_iter().skip(constructor.parameter_count()).chain(results)))
		}
		_ => Err(InvariantViolation::NonConstructorTarget),
	}
}

impl Signature {
	/// Eliminates a closed constructed value, checking the shape of the call first.
	pub fn eliminate(&self, target: Value, motive: Value, methods: Vec<Value>) -> Result<Value, KernelError> {
		let Value::Constructor(tag, _) = &target else {
			return Err(InvariantViolation::NonConstructorTarget.into());
		};
		let family = self.family(self.constructor(*tag).family());
		let expected = family.dispatch()?.constructors().len();
		if methods.len() != expected {
			return Err(ConfigurationError::MethodCount { family: family.name(), expected, found: methods.len() }.into());
		}
		Ok(eliminate(self, target, &motive, &methods.into())?)
	}
}
