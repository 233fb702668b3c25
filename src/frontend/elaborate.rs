use crate::{
	common::{bind, Closure, Label, Level, Name},
	ir::{
		presyntax::{Declaration, DeclarationKind, Expression, ParsedLabel, ParsedPreterm, ParsedProgram, Preterm},
		semantics::Value,
		syntax::Term,
	},
	kernel::{
		check::{check_motive, method_type, motive_domains, Context},
		error::{KernelError, TypeError},
		evaluate::{EvaluateAuto as _, EvaluateWith as _},
		signature::{Scope, Signature},
		unevaluate::{normalize, Unevaluate as _},
	},
};

/// Elaborates a closed expression, checking it against `expected` if given, and returns it with its type.
///
/// The elaborated term is checked again by the kernel before it is returned.
pub fn elaborate(
	signature: &Signature,
	expr: Expression,
	expected: Option<&Value>,
) -> Result<(Term, Value), ElaborationError> {
	let range = expr.range;
	let mut context = Context::new(signature);
	let (term, ty) = context.elaborate(expr, expected.cloned())?;
	context.check(&term, &ty).map_err(|error| ElaborationErrorKind::Kernel(error).at(range))?;
	Ok((term, ty))
}

/// Elaborates a closed type.
pub fn elaborate_type(signature: &Signature, expr: Expression) -> Result<(Term, Value), ElaborationError> {
	let mut context = Context::new(signature);
	let (ty, _) = context.elaborate_type(expr)?;
	let value = context.evaluate(&ty);
	Ok((ty, value))
}

#[derive(Debug, Clone)]
pub struct ElaborationError {
	pub range: (usize, usize),
	pub kind: ElaborationErrorKind,
}

#[derive(Debug, Clone)]
pub enum ElaborationErrorKind {
	NotInScope(Name),
	SynthesizedLambda,
	ExpectedUniverse(Term),
	ExpectedFunction(Term),
	UnexpectedLambda(Term),
	MethodCount { expected: usize, found: usize },
	InvalidMotive(Term),
	BidirectionalMismatch { synthesized: Term, expected: Term },
	Kernel(KernelError),
}

impl ElaborationErrorKind {
	fn at(self, range: (usize, usize)) -> ElaborationError { ElaborationError { range, kind: self } }
}

impl Context<'_> {
	fn synthesize(&mut self, expr: Expression) -> Result<(Term, Value), ElaborationError> { self.elaborate(expr, None) }

	fn verify(&mut self, expr: Expression, ty: Value) -> Result<Term, ElaborationError> {
		self.elaborate(expr, Some(ty)).map(|(term, _)| term)
	}

	fn elaborate_type(&mut self, expr: Expression) -> Result<(Term, u64), ElaborationError> {
		let range = expr.range;
		match self.synthesize(expr)? {
			(term, Value::Universe(level)) => Ok((term, level)),
			(_, ty) => Err(ElaborationErrorKind::ExpectedUniverse(self.quote(&ty)).at(range)),
		}
	}

	fn elaborate(&mut self, expr: Expression, ty: Option<Value>) -> Result<(Term, Value), ElaborationError> {
		let ParsedPreterm(preterm) = expr.preterm;
		Ok(match (preterm, ty) {
			// Variables.
			(Preterm::Variable(name), None) => match self.lookup(name) {
				Some((index, ty)) => (Term::Variable(Some(name), index), ty),
				None => self.lookup_global(name).ok_or(ElaborationErrorKind::NotInScope(name).at(expr.range))?,
			},

			// Let-expressions.
			(Preterm::Let { ty: annotation, argument, tail }, ty) => {
				let (annotation, argument, argument_ty) = match annotation {
					Some(annotation) => {
						let (annotation, _) = self.elaborate_type(*annotation)?;
						let annotation_value = self.evaluate(&annotation);
						let argument = self.verify(*argument, annotation_value.clone())?;
						(annotation, argument, annotation_value)
					}
					None => {
						let (argument, argument_ty) = self.synthesize(*argument)?;
						(self.quote(&argument_ty), argument, argument_ty)
					}
				};
				let label = tail.parameter().label;
				let argument_value = self.evaluate(&argument);
				let (tail, tail_ty) =
					self.alias(label, argument_ty, argument_value, |context| context.elaborate(*tail.body, ty))?;
				(Term::Let { ty: annotation.into(), argument: argument.into(), tail: bind([label], tail) }, tail_ty)
			}

			// Annotations.
			(Preterm::Annotation { term, ty: annotation }, None) => {
				let (annotation, _) = self.elaborate_type(*annotation)?;
				let annotation = self.evaluate(&annotation);
				let term = self.verify(*term, annotation.clone())?;
				(term, annotation)
			}

			// Types and universe indices.
			(Preterm::Universe(level), None) => match level.checked_add(1) {
				Some(successor) => (Term::Universe(level), Value::Universe(successor)),
				None => return Err(ElaborationErrorKind::Kernel(TypeError::UniverseOverflow(level).into()).at(expr.range)),
			},

			// Dependent functions.
			(Preterm::Pi { base, family }, None) => {
				let (base, base_level) = self.elaborate_type(*base)?;
				let base_value = self.evaluate(&base);
				let label = family.parameter().label;
				let (family, family_level) =
					self.bind(label, base_value, |context| context.elaborate_type(*family.body))?;
				(Term::Pi { base: base.into(), family: bind([label], family) }, Value::Universe(base_level.max(family_level)))
			}
			(Preterm::Lambda { domain: None, .. }, None) =>
				return Err(ElaborationErrorKind::SynthesizedLambda.at(expr.range)),
			(Preterm::Lambda { domain: Some(domain), body }, None) => {
				let (domain, _) = self.elaborate_type(*domain)?;
				let domain = self.evaluate(&domain);
				self.abstract_over(body.parameter(), domain, |context| context.synthesize(*body.body))?
			}
			(Preterm::Lambda { domain, body }, Some(ty)) => {
				let Value::Pi { base, family } = &ty else {
					return Err(ElaborationErrorKind::UnexpectedLambda(self.quote(&ty)).at(expr.range));
				};
				let domain = match domain {
					Some(domain) => {
						let range = domain.range;
						let (domain, _) = self.elaborate_type(*domain)?;
						let domain_value = self.evaluate(&domain);
						if !self.definitionally_equal(&domain_value, base) {
							return Err(ElaborationErrorKind::BidirectionalMismatch {
								synthesized: domain,
								expected: self.quote(base),
							}
							.at(range));
						}
						domain
					}
					None => self.quote(base),
				};
				let label = body.parameter().label;
				let codomain = family.evaluate_auto(self.scope());
				let body = self.bind(label, base.as_ref().clone(), |context| context.verify(*body.body, codomain))?;
				(Term::Function { domain: domain.into(), body: bind([label], body) }, ty)
			}
			(Preterm::Call { callee, argument }, None) => {
				let range = callee.range;
				let (callee, callee_ty) = self.synthesize(*callee)?;
				let Value::Pi { base, family } = &callee_ty else {
					return Err(ElaborationErrorKind::ExpectedFunction(self.quote(&callee_ty)).at(range));
				};
				let argument = self.verify(*argument, base.as_ref().clone())?;
				let ty = family.evaluate_with(self.signature(), [self.evaluate(&argument)]);
				(callee.apply(argument), ty)
			}

			// Inductive families.
			(Preterm::Eliminate { target, motive, methods }, None) =>
				self.elaborate_elimination(expr.range, *target, *motive, methods)?,

			(preterm, Some(ty)) => {
				let (term, synthesized) = self.synthesize(preterm.at(expr.range))?;
				if !self.definitionally_equal(&synthesized, &ty) {
					return Err(ElaborationErrorKind::BidirectionalMismatch {
						synthesized: self.quote(&synthesized),
						expected: self.quote(&ty),
					}
					.at(expr.range));
				}
				(term, ty)
			}
		})
	}

	/// Synthesizes a function over `domain` whose body is elaborated by `body`.
	fn abstract_over(
		&mut self,
		parameter: ParsedLabel,
		domain: Value,
		body: impl FnOnce(&mut Self) -> Result<(Term, Value), ElaborationError>,
	) -> Result<(Term, Value), ElaborationError> {
		let label = parameter.label;
		let domain_term = self.quote(&domain);
		let (body, codomain) = self.bind(label, domain.clone(), |context| {
			let (body, ty) = body(context)?;
			Ok((body, context.quote(&ty)))
		})?;
		let ty = Value::Pi {
			base: domain.into(),
			family: Closure::new(self.environment().clone(), [label], codomain).into(),
		};
		Ok((Term::Function { domain: domain_term.into(), body: bind([label], body) }, ty))
	}

	fn elaborate_elimination(
		&mut self,
		range: (usize, usize),
		target: Expression,
		motive: Expression,
		methods: Vec<Expression>,
	) -> Result<(Term, Value), ElaborationError> {
		let signature = self.signature();
		let target_range = target.range;
		let (target, target_ty) = self.synthesize(target)?;
		let (family, parameters, indices) =
			self.split_target(&target_ty).map_err(|error| ElaborationErrorKind::Kernel(error.into()).at(target_range))?;
		let dispatch = family.dispatch().map_err(|error| ElaborationErrorKind::Kernel(error.into()).at(range))?;
		if methods.len() != dispatch.constructors().len() {
			return Err(ElaborationErrorKind::MethodCount {
				expected: dispatch.constructors().len(),
				found: methods.len(),
			}
			.at(range));
		}

		let domains = motive_domains(self.scope(), family, parameters);
		let motive_range = motive.range;
		let (motive, motive_ty) = self.elaborate_motive(motive, &domains)?;
		if check_motive(self.scope(), &domains, &motive_ty).is_none() {
			return Err(ElaborationErrorKind::InvalidMotive(self.quote(&motive_ty)).at(motive_range));
		}
		let motive_value = self.evaluate(&motive);

		let mut elaborated = Vec::with_capacity(methods.len());
		for (method, &constructor) in methods.into_iter().zip(dispatch.constructors()) {
			let expected =
				method_type(self.scope(), self.environment(), signature.constructor(constructor), parameters, &motive_value);
			elaborated.push(self.verify(method, expected)?);
		}

		let ty = motive_value.apply_all(signature, indices.iter().cloned().chain([self.evaluate(&target)]));
		Ok((Term::Eliminate { target: target.into(), motive: motive.into(), methods: elaborated }, ty))
	}

	/// Elaborates a motive, taking the domains of its unannotated leading lambdas from `domains`.
	fn elaborate_motive(&mut self, expr: Expression, domains: &[Value]) -> Result<(Term, Value), ElaborationError> {
		match (expr.preterm.0, domains.split_first()) {
			(Preterm::Lambda { domain: None, body }, Some((domain, domains))) =>
				self.abstract_over(body.parameter(), domain.clone(), |context| context.elaborate_motive(*body.body, domains)),
			(preterm, _) => self.synthesize(preterm.at(expr.range)),
		}
	}
}

/// Elaborates a sequence of parameters, each in the scope of those before it.
fn elaborate_parameters(
	context: &mut Context,
	mut parameters: std::vec::IntoIter<(ParsedLabel, Expression)>,
	mut telescope: Vec<(Label, Term)>,
) -> Result<Vec<(Label, Term)>, ElaborationError> {
	let Some((parameter, ty)) = parameters.next() else { return Ok(telescope) };
	let (ty, _) = context.elaborate_type(ty)?;
	let value = context.evaluate(&ty);
	telescope.push((parameter.label, ty));
	context.bind(parameter.label, value, |context| elaborate_parameters(context, parameters, telescope))
}

/// Runs `action` with the variables of a telescope in scope.
fn within_telescope<T>(
	context: &mut Context,
	telescope: &[(Label, Term)],
	action: impl FnOnce(&mut Context) -> Result<T, ElaborationError>,
) -> Result<T, ElaborationError> {
	match telescope.split_first() {
		None => action(context),
		Some(((label, ty), rest)) => {
			let ty = context.evaluate(ty);
			context.bind(*label, ty, |context| within_telescope(context, rest, action))
		}
	}
}

/// Abstracts a type over a telescope.
fn close_telescope(telescope: &[(Label, Term)], body: Term) -> Term {
	telescope.iter().rev().fold(body, |body, (label, ty)| Term::Pi { base: ty.clone().into(), family: bind([*label], body) })
}

/// The observable result of a declaration.
#[derive(Debug, Clone)]
pub enum Outcome {
	Declared(Name),
	Evaluated { term: Term, normal_form: Term, ty: Term },
	Checked { term: Term, ty: Term },
}

/// A signature that grows by running programs against it.
#[derive(Debug, Default)]
pub struct Session {
	pub signature: Signature,
	pub outcomes: Vec<Outcome>,
}

impl Session {
	pub fn new() -> Self { Self::default() }

	/// Runs each declaration of a program in order, stopping at the first error.
	pub fn run(&mut self, program: ParsedProgram) -> Result<(), ElaborationError> {
		for declaration in program.declarations {
			let outcome = self.declare(declaration)?;
			self.outcomes.push(outcome);
		}
		Ok(())
	}

	fn declare(&mut self, Declaration { range, kind }: Declaration) -> Result<Outcome, ElaborationError> {
		let kernel = |error: KernelError| ElaborationErrorKind::Kernel(error).at(range);
		Ok(match kind {
			DeclarationKind::Inductive { name, parameters, arity, constructors } => {
				let telescope = elaborate_parameters(&mut Context::new(&self.signature), parameters.into_iter(), Vec::new())?;
				let arity = within_telescope(&mut Context::new(&self.signature), &telescope, |context| {
					context.elaborate_type(arity).map(|(arity, _)| arity)
				})?;
				self.signature
					.declare_inductive(name.name, telescope.len(), close_telescope(&telescope, arity))
					.map_err(kernel)?;
				for (constructor, ty) in constructors {
					let ty = within_telescope(&mut Context::new(&self.signature), &telescope, |context| {
						context.elaborate_type(ty).map(|(ty, _)| ty)
					})?;
					self.signature
						.declare_constructor(name.name, constructor.name, close_telescope(&telescope, ty))
						.map_err(|error| ElaborationErrorKind::Kernel(error).at((constructor.locus, constructor.locus + 1)))?;
				}
				self.signature.finalize_family(name.name).map_err(kernel)?;
				Outcome::Declared(name.name)
			}
			DeclarationKind::Axiom { name, ty } => {
				let (ty, _) = elaborate_type(&self.signature, ty)?;
				self.signature.declare_axiom(name.name, ty).map_err(kernel)?;
				Outcome::Declared(name.name)
			}
			DeclarationKind::Definition { name, ty, value } => {
				let (value, ty) = match ty {
					Some(ty) => {
						let (ty, ty_value) = elaborate_type(&self.signature, ty)?;
						let (value, _) = elaborate(&self.signature, value, Some(&ty_value))?;
						(value, ty)
					}
					None => {
						let (value, ty) = elaborate(&self.signature, value, None)?;
						(value, ty.unevaluate_in(Scope::new(&self.signature, Level(0))))
					}
				};
				self.signature.declare_definition(name.name, ty, value).map_err(kernel)?;
				Outcome::Declared(name.name)
			}
			DeclarationKind::Evaluate(expr) => {
				let (term, ty) = elaborate(&self.signature, expr, None)?;
				let normal_form = normalize(&self.signature, &term);
				let ty = ty.unevaluate_in(Scope::new(&self.signature, Level(0)));
				tracing::debug!("evaluated declaration");
				Outcome::Evaluated { term, normal_form, ty }
			}
			DeclarationKind::Check { term, ty } => {
				let (ty, ty_value) = elaborate_type(&self.signature, ty)?;
				let (term, _) = elaborate(&self.signature, term, Some(&ty_value))?;
				Outcome::Checked { term, ty }
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use lasso::Rodeo;

	use super::*;
	use crate::{
		frontend::parse::{parse, parse_expression},
		ir::source::lex,
		kernel::{error::ConfigurationError, signature::Entry},
	};

	const PRELUDE: &str = "
		data Nat : Type { zero : Nat, succ : Nat -> Nat }
		data Maybe (A : Type) : Type { none : Maybe A, just : A -> Maybe A }
		def plus : Nat -> Nat -> Nat = |m n| elim m :: |_| Nat { n, |_ ih| succ ih }
	";

	fn run(source: &str, interner: &mut Rodeo) -> Result<Session, ElaborationError> {
		let lexed = lex(source).ok().unwrap();
		let program = parse(&lexed, interner).unwrap();
		let mut session = Session::new();
		session.run(program)?;
		Ok(session)
	}

	fn expression(source: &str, interner: &mut Rodeo) -> Expression {
		let lexed = lex(source).ok().unwrap();
		parse_expression(&lexed, interner).unwrap()
	}

	fn constructor(session: &Session, interner: &Rodeo, name: &str) -> crate::common::ConstructorId {
		match session.signature.lookup(interner.get(name).unwrap()) {
			Some(Entry::Constructor(constructor)) => constructor,
			_ => panic!("{name} is not a constructor"),
		}
	}

	fn as_number(session: &Session, interner: &Rodeo, term: &Term) -> Option<usize> {
		match term {
			Term::Constructor(tag, arguments) if *tag == constructor(session, interner, "zero") && arguments.is_empty() =>
				Some(0),
			Term::Constructor(tag, arguments) if *tag == constructor(session, interner, "succ") => match arguments.as_slice() {
				[predecessor] => Some(as_number(session, interner, predecessor)? + 1),
				_ => None,
			},
			_ => None,
		}
	}

	fn last_normal_form(session: &Session) -> &Term {
		match session.outcomes.last() {
			Some(Outcome::Evaluated { normal_form, .. }) => normal_form,
			_ => panic!("no evaluation"),
		}
	}

	#[test]
	fn adds_two_and_two() {
		let mut interner = Rodeo::new();
		let source = format!("{PRELUDE} eval plus (succ (succ zero)) (succ (succ zero))");
		let session = run(&source, &mut interner).unwrap();
		assert_eq!(as_number(&session, &interner, last_normal_form(&session)), Some(4));
	}

	#[test]
	fn eliminates_optionals() {
		let mut interner = Rodeo::new();
		let source = format!("{PRELUDE} eval elim (just Nat (succ zero)) :: |_| Nat {{ zero, |x| x }}");
		let session = run(&source, &mut interner).unwrap();
		assert_eq!(as_number(&session, &interner, last_normal_form(&session)), Some(1));
	}

	#[test]
	fn rejects_a_natural_as_an_optional() {
		let mut interner = Rodeo::new();
		let source = format!("{PRELUDE} check zero : Maybe Nat");
		let error = run(&source, &mut interner).err().unwrap();
		assert!(matches!(error.kind, ElaborationErrorKind::BidirectionalMismatch { .. }));
	}

	#[test]
	fn elaborates_against_an_expected_type() {
		let mut interner = Rodeo::new();
		let session = run(PRELUDE, &mut interner).unwrap();
		let (_, expected) = elaborate_type(&session.signature, expression("Nat -> Nat", &mut interner)).unwrap();
		let (term, ty) =
			elaborate(&session.signature, expression("|n| plus n n", &mut interner), Some(&expected)).unwrap();
		assert!(matches!(term, Term::Function { .. }));
		assert!(matches!(ty, Value::Pi { .. }));
		assert!(elaborate(&session.signature, expression("|n| n", &mut interner), None).is_err());
	}

	#[test]
	fn infers_motive_domains_for_indexed_families() {
		let mut interner = Rodeo::new();
		let source = format!(
			"{PRELUDE}
			data Vec (A : Type) : Nat -> Type {{
				nil : Vec A zero,
				cons : |n : Nat| -> A -> Vec A n -> Vec A (succ n),
			}}
			def length : |n : Nat| -> Vec Nat n -> Nat = |n v| elim v :: |_ _| Nat {{ zero, |_ _ _ ih| succ ih }}
			eval length (succ (succ zero)) (cons Nat zero zero (nil Nat))"
		);
		let error = run(&source, &mut interner).err().unwrap();
		// The vector is one element short of its claimed length.
		assert!(matches!(error.kind, ElaborationErrorKind::BidirectionalMismatch { .. }));

		let source = format!(
			"{PRELUDE}
			data Vec (A : Type) : Nat -> Type {{
				nil : Vec A zero,
				cons : |n : Nat| -> A -> Vec A n -> Vec A (succ n),
			}}
			def length : |n : Nat| -> Vec Nat n -> Nat = |n v| elim v :: |_ _| Nat {{ zero, |_ _ _ ih| succ ih }}
			eval length (succ (succ zero)) (cons Nat (succ zero) zero (cons Nat zero zero (nil Nat)))"
		);
		let session = run(&source, &mut interner).unwrap();
		assert_eq!(as_number(&session, &interner, last_normal_form(&session)), Some(2));
	}

	#[test]
	fn reports_unknown_names() {
		let mut interner = Rodeo::new();
		let error = run("eval missing", &mut interner).err().unwrap();
		assert!(matches!(error.kind, ElaborationErrorKind::NotInScope(_)));
	}

	#[test]
	fn rejects_wrong_method_counts() {
		let mut interner = Rodeo::new();
		let source = format!("{PRELUDE} eval elim zero :: |_| Nat {{ zero }}");
		let error = run(&source, &mut interner).err().unwrap();
		assert!(matches!(error.kind, ElaborationErrorKind::MethodCount { expected: 2, found: 1 }));
	}

	#[test]
	fn rejects_non_positive_families() {
		let mut interner = Rodeo::new();
		let error = run("data Bad : Type { wrap : (Bad -> Bad) -> Bad }", &mut interner).err().unwrap();
		assert!(matches!(
			error.kind,
			ElaborationErrorKind::Kernel(KernelError::Configuration(ConfigurationError::NonPositive { .. }))
		));
	}

	#[test]
	fn rejects_the_largest_universe() {
		let mut interner = Rodeo::new();
		let error = run("eval Type 18446744073709551615", &mut interner).err().unwrap();
		assert!(matches!(
			error.kind,
			ElaborationErrorKind::Kernel(KernelError::Type(TypeError::UniverseOverflow(u64::MAX)))
		));
	}

	#[test]
	fn let_bindings_unfold() {
		let mut interner = Rodeo::new();
		let source = format!("{PRELUDE} eval let two : Nat = succ (succ zero); plus two two");
		let session = run(&source, &mut interner).unwrap();
		assert_eq!(as_number(&session, &interner, last_normal_form(&session)), Some(4));
	}
}
