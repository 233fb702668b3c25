use super::{
	check::Context,
	conversion::Conversion as _,
	error::{ConfigurationError, KernelError},
	evaluate::{Evaluate as _, Telescope},
	signature::{Constant as _, Global, Scope, Signature},
	unevaluate::Unevaluate as _,
};
use crate::{
	common::{ConstructorId, FamilyId, Level, Name},
	ir::{semantics::Value, syntax::Term},
};

impl Signature {
	/// Postulates a constant of type `ty`.
	pub fn declare_axiom(&mut self, name: Name, ty: Term) -> Result<(), KernelError> {
		self.reserve(name)?;
		Context::new(self).check_type(&ty)?;
		let ty = ty.evaluate(self);
		self.insert_global(name, Global { ty, definition: None });
		tracing::debug!(?name, "declared axiom");
		Ok(())
	}

	/// Defines a constant of type `ty` that unfolds to `value`.
	pub fn declare_definition(&mut self, name: Name, ty: Term, value: Term) -> Result<(), KernelError> {
		self.reserve(name)?;
		let ty = {
			let mut context = Context::new(self);
			context.check_type(&ty)?;
			let ty = context.evaluate(&ty);
			context.check(&value, &ty)?;
			ty
		};
		let value = value.evaluate(self);
		self.insert_global(name, Global { ty, definition: Some(value) });
		tracing::debug!(?name, "declared definition");
		Ok(())
	}

	/// Opens a new inductive family whose type former `ty` binds `parameter_count` parameters, then its indices.
	pub fn declare_inductive(&mut self, name: Name, parameter_count: usize, ty: Term) -> Result<FamilyId, KernelError> {
		self.reserve(name)?;
		Context::new(self).check_type(&ty)?;
		let ty = ty.evaluate(self);
		let telescope = Telescope::open(Scope::new(self, Level(0)), ty.clone(), usize::MAX);
		if telescope.len() < parameter_count {
			return Err(ConfigurationError::ParameterCount { family: name, parameter_count }.into());
		}
		let Value::Universe(_) = telescope.body else {
			return Err(ConfigurationError::FamilyArity(name).into());
		};
		let index_count = telescope.len() - parameter_count;
		let family = self.insert_family(name, parameter_count, index_count, ty);
		tracing::debug!(?name, parameter_count, index_count, "declared inductive family");
		Ok(family)
	}

	/// Adds a constructor of type `ty` to an open family.
	///
	/// The type must bind the parameters of the family, then the fields of the constructor,
	/// and return the family applied to the same parameters. Fields may mention the family
	/// only as their whole type.
	pub fn declare_constructor(&mut self, family: Name, name: Name, ty: Term) -> Result<ConstructorId, KernelError> {
		let family_entry = self.family_named(family)?;
		if family_entry.is_finalized() {
			return Err(ConfigurationError::FamilyFinalized(family).into());
		}
		self.reserve(name)?;
		let id = family_entry.id();
		let parameter_count = family_entry.parameter_count();
		let arity = family_entry.arity();

		Context::new(self).check_type(&ty)?;
		let ty = ty.evaluate(self);
		let scope = Scope::new(self, Level(0));

		let parameters = Telescope::open(scope, ty.clone(), parameter_count);
		let expected = Telescope::open(scope, family_entry.ty().clone(), parameter_count);
		let matches_family = parameters.len() == parameter_count
			&& parameters.domains.iter().zip(&expected.domains).enumerate().all(|(offset, (domain, expected))| {
				(scope + offset).can_convert(domain, expected)
			});
		if !matches_family {
			return Err(ConfigurationError::ConstructorParameters(name).into());
		}

		// Applications of the family that keep the parameters of the constructor fixed.
		let is_uniform = |scope: Scope, value: &Value| match value {
			Value::Former(former, arguments) if *former == id && arguments.len() == arity =>
				scope.can_convert(&arguments[..parameter_count], &parameters.variables[..])
					&& arguments[parameter_count..].iter().all(|index| !index.unevaluate_in(scope).mentions(id)),
			_ => false,
		};

		let fields = Telescope::open(scope + parameter_count, parameters.body.clone(), usize::MAX);
		let mut recursive_fields = Vec::new();
		for (offset, domain) in fields.domains.iter().enumerate() {
			let field_scope = scope + parameter_count + offset;
			let position = parameter_count + offset;
			if is_uniform(field_scope, domain) {
				recursive_fields.push(position);
			} else if domain.unevaluate_in(field_scope).mentions(id) {
				return Err(ConfigurationError::NonPositive { constructor: name, field: position }.into());
			}
		}
		if !is_uniform(scope + parameter_count + fields.len(), &fields.body) {
			return Err(ConfigurationError::ConstructorTarget(name).into());
		}

		let field_count = fields.len();
		let constructor = self.insert_constructor(name, id, field_count, recursive_fields.into(), ty)?;
		tracing::debug!(?name, ?family, field_count, "declared constructor");
		Ok(constructor)
	}

	/// Closes a family to further constructors and builds its method dispatch.
	pub fn finalize_family(&mut self, family: Name) -> Result<FamilyId, KernelError> {
		let id = self.family_named(family)?.id();
		self.seal_family(id)?;
		tracing::debug!(?family, "finalized inductive family");
		Ok(id)
	}

	/// Starts declaring a family, to be finished with [`InductiveBuilder::finalize`].
	pub fn inductive(&mut self, name: Name, parameter_count: usize, ty: Term) -> Result<InductiveBuilder<'_>, KernelError> {
		self.declare_inductive(name, parameter_count, ty)?;
		Ok(InductiveBuilder { signature: self, family: name })
	}
}

/// Declares the constructors of one family, then finalizes it.
pub struct InductiveBuilder<'s> {
	signature: &'s mut Signature,
	family: Name,
}

impl InductiveBuilder<'_> {
	pub fn constructor(self, name: Name, ty: Term) -> Result<Self, KernelError> {
		self.signature.declare_constructor(self.family, name, ty)?;
		Ok(self)
	}

	pub fn finalize(self) -> Result<FamilyId, KernelError> { self.signature.finalize_family(self.family) }
}

#[cfg(test)]
mod tests {
	use lasso::Rodeo;

	use super::*;
	use crate::{
		common::{bind, Index},
		kernel::{error::TypeError, fixtures::Prelude},
	};

	fn arrow(domain: Term, codomain: Term) -> Term { Term::Pi { base: domain.into(), family: bind([None], codomain) } }

	#[test]
	fn computes_recursive_fields() {
		let prelude = Prelude::new();
		let signature = &prelude.signature;
		assert_eq!(signature.constructor(prelude.zero).recursive_fields(), &[] as &[usize]);
		assert_eq!(signature.constructor(prelude.succ).recursive_fields(), &[0]);
		assert_eq!(signature.constructor(prelude.just).recursive_fields(), &[] as &[usize]);
		assert_eq!(signature.constructor(prelude.just).parameter_count(), 1);
		assert_eq!(signature.constructor(prelude.just).arity(), 2);
	}

	#[test]
	fn recursive_fields_skip_parameters() {
		let mut interner = Rodeo::new();
		let mut signature = Signature::new();
		let list = interner.get_or_intern("List");
		let a = Some(interner.get_or_intern("A"));
		let family = |body: Term| Term::Pi { base: Term::Universe(0).into(), family: bind([a], body) };
		let id = signature.declare_inductive(list, 1, family(Term::Universe(0))).unwrap();
		let list_of = |index: usize| Term::Former(id, vec![Term::Variable(a, Index(index))]);
		signature.declare_constructor(list, interner.get_or_intern("nil"), family(list_of(0))).unwrap();
		let cons = signature
			.declare_constructor(
				list,
				interner.get_or_intern("cons"),
				family(arrow(Term::Variable(a, Index(0)), arrow(list_of(1), list_of(2)))),
			)
			.unwrap();
		signature.finalize_family(list).unwrap();
		assert_eq!(signature.constructor(cons).recursive_fields(), &[2]);
		assert_eq!(signature.constructor(cons).field_count(), 2);
	}

	#[test]
	fn builder_declares_and_finalizes() {
		let mut interner = Rodeo::new();
		let mut signature = Signature::new();
		let boolean = interner.get_or_intern("Bool");
		let id = FamilyId(0);
		let family = signature
			.inductive(boolean, 0, Term::Universe(0))
			.and_then(|builder| builder.constructor(interner.get_or_intern("false"), Term::Former(id, vec![])))
			.and_then(|builder| builder.constructor(interner.get_or_intern("true"), Term::Former(id, vec![])))
			.and_then(InductiveBuilder::finalize)
			.unwrap();
		assert_eq!(family, id);
		assert_eq!(signature.family(family).dispatch().unwrap().constructors().len(), 2);
	}

	#[test]
	fn rejects_constructors_of_unknown_families() {
		let mut interner = Rodeo::new();
		let mut signature = Signature::new();
		let result = signature.declare_constructor(
			interner.get_or_intern("Missing"),
			interner.get_or_intern("c"),
			Term::Universe(0),
		);
		assert!(matches!(result, Err(KernelError::Configuration(ConfigurationError::UnknownFamily(_)))));
	}

	#[test]
	fn rejects_constructors_after_finalization() {
		let mut prelude = Prelude::new();
		let nat = prelude.interner.get_or_intern("Nat");
		let other = prelude.interner.get_or_intern("other");
		let result = prelude.signature.declare_constructor(nat, other, prelude.nat());
		assert!(matches!(result, Err(KernelError::Configuration(ConfigurationError::FamilyFinalized(_)))));
	}

	#[test]
	fn rejects_empty_families() {
		let mut interner = Rodeo::new();
		let mut signature = Signature::new();
		let void = interner.get_or_intern("Void");
		signature.declare_inductive(void, 0, Term::Universe(0)).unwrap();
		assert!(matches!(
			signature.finalize_family(void),
			Err(KernelError::Configuration(ConfigurationError::NoConstructors(_)))
		));
	}

	#[test]
	fn rejects_duplicate_names() {
		let mut prelude = Prelude::new();
		let zero = prelude.interner.get_or_intern("zero");
		let result = prelude.signature.declare_axiom(zero, prelude.nat());
		assert!(matches!(result, Err(KernelError::Configuration(ConfigurationError::DuplicateName(_)))));
	}

	#[test]
	fn rejects_non_positive_fields() {
		let mut interner = Rodeo::new();
		let mut signature = Signature::new();
		let bad = interner.get_or_intern("Bad");
		let id = signature.declare_inductive(bad, 0, Term::Universe(0)).unwrap();
		let former = || Term::Former(id, vec![]);
		let result =
			signature.declare_constructor(bad, interner.get_or_intern("wrap"), arrow(arrow(former(), former()), former()));
		assert!(matches!(
			result,
			Err(KernelError::Configuration(ConfigurationError::NonPositive { field: 0, .. }))
		));
		// Strictly positive functional fields are rejected too.
		let result = signature.declare_constructor(
			bad,
			interner.get_or_intern("limit"),
			arrow(arrow(Term::Universe(0), former()), former()),
		);
		assert!(matches!(
			result,
			Err(KernelError::Configuration(ConfigurationError::NonPositive { field: 0, .. }))
		));
	}

	#[test]
	fn rejects_constructors_of_other_families() {
		let mut prelude = Prelude::new();
		let unit = prelude.interner.get_or_intern("Unit");
		let star = prelude.interner.get_or_intern("star");
		prelude.signature.declare_inductive(unit, 0, Term::Universe(0)).unwrap();
		let result = prelude.signature.declare_constructor(unit, star, prelude.nat());
		assert!(matches!(result, Err(KernelError::Configuration(ConfigurationError::ConstructorTarget(_)))));
	}

	#[test]
	fn rejects_ill_typed_definitions() {
		let mut prelude = Prelude::new();
		let name = prelude.interner.get_or_intern("bad");
		let ty = Term::Former(prelude.maybe, vec![prelude.nat()]);
		let result = prelude.signature.declare_definition(name, ty, prelude.numeral(0));
		assert!(matches!(result, Err(KernelError::Type(TypeError::Mismatch { .. }))));
		assert!(prelude.signature.lookup(name).is_none());
	}

	#[test]
	fn rejects_family_types_without_universes() {
		let mut prelude = Prelude::new();
		let name = prelude.interner.get_or_intern("Odd");
		let result = prelude.signature.declare_inductive(name, 0, prelude.nat());
		assert!(matches!(result, Err(KernelError::Configuration(ConfigurationError::FamilyArity(_)))));
		let result = prelude.signature.declare_inductive(name, 1, Term::Universe(0));
		assert!(matches!(result, Err(KernelError::Configuration(ConfigurationError::ParameterCount { .. }))));
	}
}
