use lasso::Spur;

// de Bruijn index: zero is the newest bound parameter.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Index(pub usize);
// de Bruijn level: zero is the oldest bound parameter.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Level(pub usize);

impl std::ops::Add<usize> for Level {
	type Output = Self;
	fn add(self, rhs: usize) -> Self::Output {
		let Self(level) = self;
		Self(level + rhs)
	}
}

impl std::ops::AddAssign<usize> for Level {
	fn add_assign(&mut self, rhs: usize) { self.0 += rhs; }
}

pub type Name = Spur;
pub type Label = Option<Name>;

/// Position of an inductive family in its signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FamilyId(pub usize);

/// Position of a constructor in its signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ConstructorId(pub usize);

#[derive(Clone, Debug)]
pub struct Binder<P, T, const N: usize = 1> {
	pub parameters: [P; N],
	pub body: T,
}

impl<P, T, const N: usize> Binder<P, T, N> {
	pub fn new(parameters: [P; N], body: T) -> Self { Self { parameters, body } }
}

pub fn bind<P, T, const N: usize>(parameters: [P; N], body: impl Into<T>) -> Binder<P, T, N> {
	Binder::new(parameters, body.into())
}

impl<P: Copy, T> Binder<P, T, 1> {
	pub fn parameter(&self) -> P {
		let [parameter] = self.parameters;
		parameter
	}
}

#[derive(Clone, Debug)]
pub struct Closure<E, T, const N: usize = 1> {
	pub environment: E,
	pub parameters: [Label; N],
	pub body: T,
}

impl<E, T, const N: usize> Closure<E, T, N> {
	pub fn new(environment: E, parameters: [Label; N], body: T) -> Self { Self { environment, parameters, body } }
}

impl<E, T> Closure<E, T, 1> {
	pub fn parameter(&self) -> Label {
		let [parameter] = self.parameters;
		parameter
	}
}
