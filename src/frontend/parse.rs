use lasso::Rodeo;
use peg::error::ParseError;

use crate::{
	common::{bind, Name},
	ir::{
		presyntax::{Declaration, DeclarationKind, Expression, ParsedLabel, ParsedName, ParsedProgram, Preterm},
		source::{Keyword, LexedSource, Token},
	},
};

/// Parses a program from a lexed source, interning its names in `interner`.
pub fn parse(source: &LexedSource, interner: &mut Rodeo) -> Result<ParsedProgram, ParseError<usize>> {
	let mut parser = Parser { source: source.source, interner, ranges: &source.ranges };
	presyntax_parse::program(&source.tokens, &mut parser)
}

/// Parses a lone expression from a lexed source.
pub fn parse_expression(source: &LexedSource, interner: &mut Rodeo) -> Result<Expression, ParseError<usize>> {
	let mut parser = Parser { source: source.source, interner, ranges: &source.ranges };
	presyntax_parse::expression(&source.tokens, &mut parser)
}

pub struct Parser<'s> {
	source: &'s str,
	interner: &'s mut Rodeo,
	ranges: &'s [(usize, usize)],
}

impl<'s> Parser<'s> {
	fn span(&self, token_index: usize) -> &'s str {
		let range = self.ranges[token_index];
		&self.source[range.0..range.1]
	}

	fn identifier(&mut self, token_index: usize) -> Name {
		let span = self.span(token_index);
		self.interner.get_or_intern(span)
	}

	fn number(&self, token_index: usize) -> Option<u64> { self.span(token_index).parse::<u64>().ok() }
}

/// Nests single-parameter lambdas, innermost last.
fn curry(parameters: Vec<ParsedLabel>, body: Expression, range: (usize, usize)) -> Expression {
	parameters
		.into_iter()
		.rev()
		.fold(body, |body, parameter| Preterm::Lambda { domain: None, body: bind([parameter], body) }.at(range))
}

peg::parser! {
  grammar presyntax_parse(parser: &mut Parser) for [Token] {
		rule _ = [Token::Whitespace]*

		rule identifier() -> Name
			= pos:position!() [Token::Identifier] {parser.identifier(pos)}

		rule number() -> u64
			= pos:position!() [Token::Number] {? parser.number(pos).ok_or("universe level")}

		rule name() -> ParsedName
			= locus:position!() name:identifier() {ParsedName { locus, name }}

		rule optional_parameter() -> ParsedLabel
			= locus:position!() label:(name:identifier() {Some(name)} / [Token::LowDash] {None}) {ParsedLabel { locus, label }}

		rule atom() -> Expression
			= init:position!() [Token::ParenL] _ term:preterm() _ [Token::Colon] _ ty:preterm() _ [Token::ParenR] fini:position!()
				{Preterm::Annotation { term: term.into(), ty: ty.into() }.at((init, fini))}
			/ [Token::ParenL] _ preterm:preterm() _ [Token::ParenR] {preterm}
			/ init:position!() preterm:(
				  [Token::Keyword(Keyword::Type)] level:(_ level:number() {level})? {Preterm::Universe(level.unwrap_or(0))}
				/ identifier:identifier() {Preterm::Variable(identifier)}
			) fini:position!() {preterm.at((init, fini))}

		// Spines: function calls.
		#[cache_left_rec]
		rule spine() -> Expression
			= init:position!() callee:spine() _ argument:atom() fini:position!()
				{Preterm::Call { callee: callee.into(), argument: argument.into() }.at((init, fini))}
			/ atom()

		rule lambda() -> Expression
			= init:position!() [Token::Pipe] _ parameters:(optional_parameter() ++ _) _ [Token::Pipe] _ body:spine_headed() fini:position!()
				{curry(parameters, body, (init, fini))}

		#[cache]
		rule spine_headed() -> Expression
			= init:position!() preterm:(
				  [Token::Pipe] _ parameter:optional_parameter() _ [Token::Colon] _ base:spine_headed() _ [Token::Pipe] _ [Token::Arrow] _ right:spine_headed()
					{Preterm::Pi { base: base.into(), family: bind([parameter], right) }}
				/ [Token::Pipe] _ parameter:optional_parameter() _ [Token::Colon] _ domain:spine_headed() _ [Token::Pipe] _ body:spine_headed()
					{Preterm::Lambda { domain: Some(domain.into()), body: bind([parameter], body) }}
				/ locus:position!() left:spine() _ [Token::Arrow] _ right:spine_headed()
					{Preterm::Pi { base: left.into(), family: bind([ParsedLabel { locus, label: None }], right) }}
				// Eliminations.
				/ [Token::Keyword(Keyword::Elim)] _ target:spine() _ [Token::TwoColon] _ motive:spine_headed() _ [Token::CurlyL] _ methods:(preterm() ** (_ [Token::Comma] _)) _ ([Token::Comma] _)? [Token::CurlyR]
					{Preterm::Eliminate { target: target.into(), motive: motive.into(), methods }}
			) fini:position!() {preterm.at((init, fini))}
			/ lambda()
			/ spine()

		rule preterm() -> Expression
			= init:position!() [Token::Keyword(Keyword::Let)] _ name:optional_parameter() _ ty:([Token::Colon] _ ty:spine_headed() _ {ty})? [Token::Equal] _ argument:spine_headed() _ [Token::Semi] _ tail:preterm() fini:position!()
				{Preterm::Let { ty: ty.map(Box::new), argument: argument.into(), tail: bind([name], tail) }.at((init, fini))}
			/ spine_headed()

		// Declarations.
		rule parameter_group() -> (ParsedLabel, Expression)
			= [Token::ParenL] _ parameter:optional_parameter() _ [Token::Colon] _ ty:preterm() _ [Token::ParenR] {(parameter, ty)}

		rule constructor() -> (ParsedName, Expression)
			= name:name() _ [Token::Colon] _ ty:preterm() {(name, ty)}

		rule declaration() -> Declaration
			= init:position!() kind:(
				  [Token::Keyword(Keyword::Data)] _ name:name() _ parameters:(group:parameter_group() _ {group})* [Token::Colon] _ arity:preterm() _
					[Token::CurlyL] _ constructors:(constructor() ** (_ [Token::Comma] _)) _ ([Token::Comma] _)? [Token::CurlyR]
					{DeclarationKind::Inductive { name, parameters, arity, constructors }}
				/ [Token::Keyword(Keyword::Axiom)] _ name:name() _ [Token::Colon] _ ty:preterm()
					{DeclarationKind::Axiom { name, ty }}
				/ [Token::Keyword(Keyword::Def)] _ name:name() _ ty:([Token::Colon] _ ty:preterm() _ {ty})? [Token::Equal] _ value:preterm()
					{DeclarationKind::Definition { name, ty, value }}
				/ [Token::Keyword(Keyword::Eval)] _ term:preterm()
					{DeclarationKind::Evaluate(term)}
				/ [Token::Keyword(Keyword::Check)] _ term:preterm() _ [Token::Colon] _ ty:preterm()
					{DeclarationKind::Check { term, ty }}
			) fini:position!() {Declaration { range: (init, fini), kind }}

		pub rule program() -> ParsedProgram
			= _ declarations:(declaration:declaration() _ {declaration})* {ParsedProgram { declarations }}

		pub rule expression() -> Expression
			= _ expression:preterm() _ {expression}
  }
}
