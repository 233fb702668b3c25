use std::collections::HashMap;

use super::error::ConfigurationError;
use crate::{
	common::{ConstructorId, FamilyId, Level, Name},
	ir::semantics::Value,
};

/// Global declarations: axioms, definitions, inductive families, and their constructors.
#[derive(Debug, Default)]
pub struct Signature {
	entries: HashMap<Name, Entry>,
	globals: HashMap<Name, Global>,
	families: Vec<Family>,
	constructors: Vec<Constructor>,
}

/// What a global name refers to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Entry {
	Global,
	Family(FamilyId),
	Constructor(ConstructorId),
}

/// An axiom, or a definition if it carries a value.
#[derive(Clone, Debug)]
pub struct Global {
	pub ty: Value,
	pub definition: Option<Value>,
}

/// Common interface of inductive type formers and constructors.
pub trait Constant {
	fn name(&self) -> Name;

	/// The number of leading arguments shared by a family and all of its constructors.
	fn parameter_count(&self) -> usize;

	/// The number of arguments of a saturated application.
	fn arity(&self) -> usize;

	/// Argument positions whose type is the family being declared.
	fn recursive_fields(&self) -> &[usize] { &[] }

	fn ty(&self) -> &Value;
}

#[derive(Debug)]
pub struct Family {
	pub(super) id: FamilyId,
	pub(super) name: Name,
	pub(super) parameter_count: usize,
	pub(super) index_count: usize,
	pub(super) ty: Value,
	pub(super) state: FamilyState,
}

#[derive(Debug)]
pub(super) enum FamilyState {
	Open(FamilyBuilder),
	Finalized(Dispatch),
}

impl Family {
	pub fn id(&self) -> FamilyId { self.id }

	pub fn index_count(&self) -> usize { self.index_count }

	pub fn is_finalized(&self) -> bool { matches!(self.state, FamilyState::Finalized(_)) }

	/// The method dispatch table, available once the family is finalized.
	pub fn dispatch(&self) -> Result<&Dispatch, ConfigurationError> {
		match &self.state {
			FamilyState::Finalized(dispatch) => Ok(dispatch),
			FamilyState::Open(_) => Err(ConfigurationError::FamilyUnfinalized(self.name)),
		}
	}
}

impl Constant for Family {
	fn name(&self) -> Name { self.name }

	fn parameter_count(&self) -> usize { self.parameter_count }

	fn arity(&self) -> usize { self.parameter_count + self.index_count }

	fn ty(&self) -> &Value { &self.ty }
}

#[derive(Debug)]
pub struct Constructor {
	pub(super) id: ConstructorId,
	pub(super) name: Name,
	pub(super) family: FamilyId,
	pub(super) parameter_count: usize,
	pub(super) field_count: usize,
	pub(super) recursive_fields: Box<[usize]>,
	pub(super) ty: Value,
}

impl Constructor {
	pub fn id(&self) -> ConstructorId { self.id }

	pub fn family(&self) -> FamilyId { self.family }

	/// The number of non-parameter arguments.
	pub fn field_count(&self) -> usize { self.field_count }
}

impl Constant for Constructor {
	fn name(&self) -> Name { self.name }

	fn parameter_count(&self) -> usize { self.parameter_count }

	fn arity(&self) -> usize { self.parameter_count + self.field_count }

	fn recursive_fields(&self) -> &[usize] { &self.recursive_fields }

	fn ty(&self) -> &Value { &self.ty }
}

/// Accumulates the constructors of a family that is still open.
#[derive(Debug, Default)]
pub struct FamilyBuilder {
	constructors: Vec<ConstructorId>,
}

impl FamilyBuilder {
	pub(super) fn push(&mut self, constructor: ConstructorId) { self.constructors.push(constructor) }

	pub(super) fn finalize(self) -> Dispatch {
		let positions = self.constructors.iter().enumerate().map(|(position, &constructor)| (constructor, position)).collect();
		Dispatch { constructors: self.constructors.into_boxed_slice(), positions }
	}
}

/// Maps each constructor of a finalized family to the method that handles it.
#[derive(Debug)]
pub struct Dispatch {
	constructors: Box<[ConstructorId]>,
	positions: HashMap<ConstructorId, usize>,
}

impl Dispatch {
	/// Constructors in declaration order.
	pub fn constructors(&self) -> &[ConstructorId] { &self.constructors }

	pub fn select<'m, T>(&self, constructor: ConstructorId, methods: &'m [T]) -> Option<&'m T> {
		methods.get(*self.positions.get(&constructor)?)
	}
}

impl Signature {
	pub fn new() -> Self { Self::default() }

	pub fn lookup(&self, name: Name) -> Option<Entry> { self.entries.get(&name).copied() }

	pub fn global(&self, name: Name) -> Option<&Global> { self.globals.get(&name) }

	pub fn family(&self, FamilyId(id): FamilyId) -> &Family { &self.families[id] }

	pub fn constructor(&self, ConstructorId(id): ConstructorId) -> &Constructor { &self.constructors[id] }

	pub fn family_named(&self, name: Name) -> Result<&Family, ConfigurationError> {
		match self.lookup(name) {
			Some(Entry::Family(family)) => Ok(self.family(family)),
			_ => Err(ConfigurationError::UnknownFamily(name)),
		}
	}

	pub(super) fn reserve(&self, name: Name) -> Result<(), ConfigurationError> {
		if self.entries.contains_key(&name) {
			Err(ConfigurationError::DuplicateName(name))
		} else {
			Ok(())
		}
	}

	pub(super) fn insert_global(&mut self, name: Name, global: Global) {
		self.entries.insert(name, Entry::Global);
		self.globals.insert(name, global);
	}

	pub(super) fn insert_family(
		&mut self,
		name: Name,
		parameter_count: usize,
		index_count: usize,
		ty: Value,
	) -> FamilyId {
		let id = FamilyId(self.families.len());
		self.families.push(Family {
			id,
			name,
			parameter_count,
			index_count,
			ty,
			state: FamilyState::Open(FamilyBuilder::default()),
		});
		self.entries.insert(name, Entry::Family(id));
		id
	}

	pub(super) fn insert_constructor(
		&mut self,
		name: Name,
		family: FamilyId,
		field_count: usize,
		recursive_fields: Box<[usize]>,
		ty: Value,
	) -> Result<ConstructorId, ConfigurationError> {
		let id = ConstructorId(self.constructors.len());
		let FamilyId(index) = family;
		let entry = &mut self.families[index];
		let FamilyState::Open(builder) = &mut entry.state else {
			return Err(ConfigurationError::FamilyFinalized(entry.name));
		};
		builder.push(id);
		let parameter_count = entry.parameter_count;
		self.constructors.push(Constructor { id, name, family, parameter_count, field_count, recursive_fields, ty });
		self.entries.insert(name, Entry::Constructor(id));
		Ok(id)
	}

	pub(super) fn seal_family(&mut self, FamilyId(index): FamilyId) -> Result<(), ConfigurationError> {
		let entry = &mut self.families[index];
		let builder = match std::mem::replace(&mut entry.state, FamilyState::Open(FamilyBuilder::default())) {
			FamilyState::Open(builder) => builder,
			finalized => {
				entry.state = finalized;
				return Err(ConfigurationError::FamilyFinalized(entry.name));
			}
		};
		if builder.constructors.is_empty() {
			entry.state = FamilyState::Open(builder);
			return Err(ConfigurationError::NoConstructors(entry.name));
		}
		entry.state = FamilyState::Finalized(builder.finalize());
		Ok(())
	}
}

/// A signature together with the number of variables in scope.
#[derive(Clone, Copy)]
pub struct Scope<'s> {
	pub signature: &'s Signature,
	pub level: Level,
}

impl<'s> Scope<'s> {
	pub fn new(signature: &'s Signature, level: Level) -> Self { Self { signature, level } }
}

impl std::ops::Add<usize> for Scope<'_> {
	type Output = Self;
	fn add(self, rhs: usize) -> Self::Output { Self { signature: self.signature, level: self.level + rhs } }
}
