use std::str::Chars;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Token {
	Whitespace,
	Keyword(Keyword),
	Identifier,
	Number,
	LowDash,
	Pipe,
	Colon,
	TwoColon,
	Semi,
	Comma,
	Equal,
	ParenL,
	ParenR,
	CurlyL,
	CurlyR,
	Arrow,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Keyword {
	// Declarations.
	Data,
	Axiom,
	Def,
	Eval,
	Check,

	// Terms.
	Let,
	Elim,
	Type,
}

pub struct LexError(pub usize, pub LexErrorKind);

pub enum LexErrorKind {
	UnrecognizedLexemePrefix,
	UnexpectedCharacter(&'static [char]),
	UnexpectedEnd(&'static [char]),
}

struct Scanner<'s> {
	len: usize,
	chars: Chars<'s>,
}

impl<'s> Scanner<'s> {
	pub fn new(source: &'s str) -> Self { Self { len: source.len(), chars: source.chars() } }

	pub fn position(&self) -> usize { self.len - self.chars.as_str().len() }

	pub fn next(&mut self) -> Option<(char, usize)> {
		let position = self.position();
		Some((self.chars.next()?, position))
	}

	pub fn pop(&mut self) -> Option<char> { self.chars.next() }

	pub fn peek(&mut self) -> Option<char> { self.chars.clone().next() }
}

pub struct LexedSource<'s> {
	pub source: &'s str,
	pub tokens: Box<[Token]>,
	pub ranges: Box<[(usize, usize)]>,
}

pub fn lex(source: &str) -> Result<LexedSource, LexError> { LexedSource::new(source) }

impl<'s> LexedSource<'s> {
	fn keyword_or_identifier(string: &str) -> Token {
		use Token::*;

		use self::Keyword::*;
		match string {
			"data" => Keyword(Data),
			"axiom" => Keyword(Axiom),
			"def" => Keyword(Def),
			"eval" => Keyword(Eval),
			"check" => Keyword(Check),

			"let" => Keyword(Let),
			"elim" => Keyword(Elim),
			"Type" => Keyword(Type),

			_ => Identifier,
		}
	}

	pub fn new(source: &'s str) -> Result<Self, LexError> {
		use LexErrorKind::*;
		use Token::*;
		let mut scanner = Scanner::new(source);
		let mut tokens = Vec::new();
		let mut ranges = Vec::new();
		while let Some((initial, start)) = scanner.next() {
			let token = match initial {
				' ' | '\n' | '\r' | '\t' => {
					while let Some(' ' | '\n' | '\r' | '\t') = scanner.peek() {
						scanner.pop();
					}
					Whitespace
				}
				'%' => {
					while let Some(c) = scanner.peek() {
						scanner.pop();
						if c == '\n' {
							break;
						}
					}
					Whitespace
				}
				'a'..='z' | 'A'..='Z' => {
					while let Some('a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '\'') = scanner.peek() {
						scanner.pop();
					}
					Self::keyword_or_identifier(&source[start..scanner.position()])
				}
				'0'..='9' => {
					while let Some('0'..='9') = scanner.peek() {
						scanner.pop();
					}
					Number
				}
				'_' => LowDash,
				'|' => Pipe,
				':' =>
					if let Some(':') = scanner.peek() {
						scanner.pop();
						TwoColon
					} else {
						Colon
					},
				';' => Semi,
				',' => Comma,
				'=' => Equal,
				'(' => ParenL,
				')' => ParenR,
				'{' => CurlyL,
				'}' => CurlyR,
				'-' => {
					const EXPECTED: [char; 1] = ['>'];
					let position = scanner.position();
					match scanner.pop() {
						Some('>') => Arrow,
						Some(_) => return Err(LexError(position, UnexpectedCharacter(&EXPECTED))),
						None => return Err(LexError(position, UnexpectedEnd(&EXPECTED))),
					}
				}
				_ => return Err(LexError(start, UnrecognizedLexemePrefix)),
			};
			tokens.push(token);
			ranges.push((start, scanner.position()));
		}

		debug_assert!(tokens.len() == ranges.len());
		Ok(Self { source, tokens: tokens.into_boxed_slice(), ranges: ranges.into_boxed_slice() })
	}
}
