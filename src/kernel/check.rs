use super::{
	conversion::Conversion as _,
	error::{ConfigurationError, KernelError, TypeError},
	evaluate::{Evaluate as _, EvaluateAuto as _, EvaluateWith as _, Telescope},
	signature::{Constant, Constructor, Entry, Family, Scope, Signature},
	unevaluate::Unevaluate as _,
};
use crate::{
	common::{bind, Closure, Index, Label, Level, Name},
	ir::{
		semantics::{Environment, Value},
		syntax::Term,
	},
};

/// A typing context: the types of the variables in scope, and the values they stand for.
pub struct Context<'s> {
	signature: &'s Signature,
	environment: Environment,
	tys: Vec<(Label, Value)>,
}

impl<'s> Context<'s> {
	pub fn new(signature: &'s Signature) -> Self { Self { signature, environment: Environment::default(), tys: Vec::new() } }

	pub fn signature(&self) -> &'s Signature { self.signature }

	pub fn len(&self) -> Level { Level(self.tys.len()) }

	pub fn scope(&self) -> Scope<'s> { Scope::new(self.signature, self.len()) }

	pub fn environment(&self) -> &Environment { &self.environment }

	pub fn evaluate(&self, term: &Term) -> Value { term.clone().evaluate_in(self.signature, &self.environment) }

	pub fn quote(&self, value: &Value) -> Term { value.unevaluate_in(self.scope()) }

	pub fn definitionally_equal(&self, left: &Value, right: &Value) -> bool { self.scope().can_convert(left, right) }

	/// Finds the innermost variable with the given name.
	pub fn lookup(&self, name: Name) -> Option<(Index, Value)> {
		self.tys.iter().rev().enumerate().find_map(|(index, (label, ty))| {
			(*label == Some(name)).then(|| (Index(index), ty.clone()))
		})
	}

	/// Finds a global declaration with the given name.
	pub fn lookup_global(&self, name: Name) -> Option<(Term, Value)> {
		let signature = self.signature;
		Some(match signature.lookup(name)? {
			Entry::Global => (Term::Constant(name), signature.global(name)?.ty.clone()),
			Entry::Family(family) => (Term::Former(family, vec![]), signature.family(family).ty().clone()),
			Entry::Constructor(constructor) =>
				(Term::Constructor(constructor, vec![]), signature.constructor(constructor).ty().clone()),
		})
	}

	/// Runs `action` with a fresh variable of type `ty` in scope.
	pub fn bind<T, E>(&mut self, label: Label, ty: Value, action: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E> {
		let variable = Value::from((label, self.len()));
		self.alias(label, ty, variable, action)
	}

	/// Runs `action` with a variable of type `ty` standing for `value` in scope.
	pub fn alias<T, E>(
		&mut self,
		label: Label,
		ty: Value,
		value: Value,
		action: impl FnOnce(&mut Self) -> Result<T, E>,
	) -> Result<T, E> {
		self.tys.push((label, ty));
		self.environment.push(value);
		let result = action(self);
		self.environment.pop();
		self.tys.pop();
		result
	}

	/// Checks that a term is a type, returning its universe level.
	pub fn check_type(&mut self, term: &Term) -> Result<u64, KernelError> {
		match self.infer(term)? {
			Value::Universe(level) => Ok(level),
			ty => Err(TypeError::ExpectedUniverse(self.quote(&ty)).into()),
		}
	}

	pub fn infer(&mut self, term: &Term) -> Result<Value, KernelError> {
		let signature = self.signature;
		Ok(match term {
			// Variables.
			Term::Variable(_, Index(index)) => {
				let level = self.tys.len().checked_sub(index + 1).ok_or(TypeError::UnboundVariable(Index(*index)))?;
				self.tys[level].1.clone()
			}
			Term::Constant(name) => signature.global(*name).ok_or(TypeError::UnknownConstant(*name))?.ty.clone(),

			// Let-expressions.
			Term::Let { ty, argument, tail } => {
				self.check_type(ty)?;
				let ty = self.evaluate(ty);
				self.check(argument, &ty)?;
				let argument = self.evaluate(argument);
				self.alias(tail.parameter(), ty, argument, |context| context.infer(&tail.body))?
			}

			// Types and universe indices.
			Term::Universe(level) => Value::Universe(level.checked_add(1).ok_or(TypeError::UniverseOverflow(*level))?),

			// Dependent functions.
			Term::Pi { base, family } => {
				let base_level = self.check_type(base)?;
				let base = self.evaluate(base);
				let family_level = self.bind(family.parameter(), base, |context| context.check_type(&family.body))?;
				Value::Universe(base_level.max(family_level))
			}
			Term::Function { domain, body } => {
				self.check_type(domain)?;
				let domain = self.evaluate(domain);
				let codomain = self.bind(body.parameter(), domain.clone(), |context| {
					let ty = context.infer(&body.body)?;
					Ok::<_, KernelError>(context.quote(&ty))
				})?;
				Value::Pi {
					base: domain.into(),
					family: Closure::new(self.environment.clone(), body.parameters, codomain).into(),
				}
			}
			Term::Apply { scrutinee, argument } => {
				let scrutinee_ty = self.infer(scrutinee)?;
				let Value::Pi { base, family } = &scrutinee_ty else {
					return Err(TypeError::ExpectedFunction(self.quote(&scrutinee_ty)).into());
				};
				self.check(argument, base)?;
				family.evaluate_with(signature, [self.evaluate(argument)])
			}

			// Inductive families.
			Term::Former(family, arguments) => self.infer_spine(signature.family(*family), arguments)?,
			Term::Constructor(constructor, arguments) =>
				self.infer_spine(signature.constructor(*constructor), arguments)?,
			Term::Eliminate { target, motive, methods } => self.infer_elimination(target, motive, methods)?,
		})
	}

	pub fn check(&mut self, term: &Term, ty: &Value) -> Result<(), KernelError> {
		match (term, ty) {
			(Term::Function { domain, body }, Value::Pi { base, family }) => {
				self.check_type(domain)?;
				let domain = self.evaluate(domain);
				if !self.definitionally_equal(&domain, base) {
					return Err(TypeError::Mismatch { expected: self.quote(base), found: self.quote(&domain) }.into());
				}
				let codomain = family.evaluate_auto(self.scope());
				self.bind(body.parameter(), domain, |context| context.check(&body.body, &codomain))
			}
			(Term::Let { ty: annotation, argument, tail }, _) => {
				self.check_type(annotation)?;
				let annotation = self.evaluate(annotation);
				self.check(argument, &annotation)?;
				let argument = self.evaluate(argument);
				self.alias(tail.parameter(), annotation, argument, |context| context.check(&tail.body, ty))
			}
			_ => {
				let inferred = self.infer(term)?;
				if self.definitionally_equal(&inferred, ty) {
					Ok(())
				} else {
					Err(TypeError::Mismatch { expected: self.quote(ty), found: self.quote(&inferred) }.into())
				}
			}
		}
	}

	/// Infers the type of a tag applied to some of its arguments.
	fn infer_spine(&mut self, constant: &impl Constant, arguments: &[Term]) -> Result<Value, KernelError> {
		if arguments.len() > constant.arity() {
			return Err(TypeError::Overapplied { arity: constant.arity(), found: arguments.len() }.into());
		}
		let mut ty = constant.ty().clone();
		for argument in arguments {
			let Value::Pi { base, family } = &ty else {
				return Err(TypeError::ExpectedFunction(self.quote(&ty)).into());
			};
			self.check(argument, base)?;
			let next = family.evaluate_with(self.signature, [self.evaluate(argument)]);
			ty = next;
		}
		Ok(ty)
	}

	fn infer_elimination(&mut self, target: &Term, motive: &Term, methods: &[Term]) -> Result<Value, KernelError> {
		let signature = self.signature;
		let target_ty = self.infer(target)?;
		let (family, parameters, indices) = self.split_target(&target_ty)?;
		let dispatch = family.dispatch()?;
		if methods.len() != dispatch.constructors().len() {
			return Err(ConfigurationError::MethodCount {
				family: family.name(),
				expected: dispatch.constructors().len(),
				found: methods.len(),
			}
			.into());
		}

		let motive_ty = self.infer(motive)?;
		let domains = motive_domains(self.scope(), family, parameters);
		check_motive(self.scope(), &domains, &motive_ty)
			.ok_or_else(|| TypeError::InvalidMotive(self.quote(&motive_ty)))?;
		let motive = self.evaluate(motive);

		for (method, &constructor) in methods.iter().zip(dispatch.constructors()) {
			let expected =
				method_type(self.scope(), &self.environment, signature.constructor(constructor), parameters, &motive);
			self.check(method, &expected)?;
		}

		let target = self.evaluate(target);
		Ok(motive.apply_all(signature, indices.iter().cloned().chain([target])))
	}

	/// Splits the type of an elimination target into its family, parameters, and indices.
	pub fn split_target<'t>(&self, ty: &'t Value) -> Result<(&'s Family, &'t [Value], &'t [Value]), TypeError> {
		let signature = self.signature;
		match ty {
			Value::Former(family, arguments) if arguments.len() == signature.family(*family).arity() => {
				let family = signature.family(*family);
				let (parameters, indices) = arguments.split_at(family.parameter_count());
				Ok((family, parameters, indices))
			}
			_ => Err(TypeError::ExpectedInductive(self.quote(ty))),
		}
	}
}

/// The domains of a motive for `family` at the given parameters: its indices, then the family itself.
///
/// Each domain lives in `scope` extended by the domains before it.
pub fn motive_domains(scope: Scope, family: &Family, parameters: &[Value]) -> Vec<Value> {
	let indices = Telescope::open(scope, family.ty().clone().instantiate(scope.signature, parameters), usize::MAX);
	let mut domains = indices.domains;
	domains.push(Value::Former(family.id(), parameters.iter().cloned().chain(indices.variables).collect()));
	domains
}

/// Checks that a motive type abstracts over `domains` and ends in a universe.
pub fn check_motive(scope: Scope, domains: &[Value], motive_ty: &Value) -> Option<u64> {
	let motive = Telescope::open(scope, motive_ty.clone(), domains.len());
	if motive.len() != domains.len() {
		return None;
	}
	for (offset, (domain, expected)) in motive.domains.iter().zip(domains).enumerate() {
		if !(scope + offset).can_convert(domain, expected) {
			return None;
		}
	}
	match motive.body {
		Value::Universe(level) => Some(level),
		_ => None,
	}
}

/// The type of the method handling `constructor`:
///
/// ```text
/// Π fields, Π (motive indices' field) for each recursive field, motive indices (constructor parameters fields)
/// ```
pub fn method_type(
	scope: Scope,
	environment: &Environment,
	constructor: &Constructor,
	parameters: &[Value],
	motive: &Value,
) -> Value {
	let signature = scope.signature;
	let parameter_count = constructor.parameter_count();
	let fields =
		Telescope::open(scope, constructor.ty().clone().instantiate(signature, parameters), constructor.field_count());
	let indices = |ty: &Value| match ty {
		Value::Former(_, arguments) => arguments[parameter_count..].to_vec(),
		_ => Vec::new(),
	};

	let hypotheses: Vec<Value> = constructor
		.recursive_fields()
		.iter()
		.map(|&position| {
			let field = position - parameter_count;
			motive.clone().apply_all(signature, indices(&fields.domains[field]).into_iter().chain([fields.variables[field].clone()]))
		})
		.collect();
	let construction =
		Value::Constructor(constructor.id(), parameters.iter().cloned().chain(fields.variables.iter().cloned()).collect());
	let result = motive.clone().apply_all(signature, indices(&fields.body).into_iter().chain([construction]));

	let inner = scope + fields.len();
	let mut ty = result.unevaluate_in(inner + hypotheses.len());
	for (offset, hypothesis) in hypotheses.iter().enumerate().rev() {
		ty = Term::Pi { base: hypothesis.unevaluate_in(inner + offset).into(), family: bind([None], ty) };
	}
	for (offset, domain) in fields.domains.iter().enumerate().rev() {
		ty = Term::Pi { base: domain.unevaluate_in(scope + offset).into(), family: bind([fields.labels[offset]], ty) };
	}
	ty.evaluate_in(signature, environment)
}
