use lasso::Resolver;
use peg::error::ParseError;

use crate::{
	common::Name,
	frontend::{
		elaborate::{ElaborationError, ElaborationErrorKind},
		unparse::pretty_print,
	},
	ir::{
		source::{LexError, LexErrorKind, LexedSource},
		syntax::Term,
	},
	kernel::{
		error::{ConfigurationError, KernelError, TypeError},
		signature::Signature,
	},
};

pub fn report_tokenization_error(source: &str, lex_error: LexError) {
	report_line_error(source, (lex_error.0, lex_error.0 + 1), &format_lex_error(source, lex_error))
}

pub fn report_parse_error(source: &LexedSource, error: ParseError<usize>) {
	report_line_error(
		source.source,
		source.ranges.get(error.location).copied().unwrap_or((source.source.len(), source.source.len() + 1)),
		&format!("parse error: expected one of: {:?}", error.expected.tokens().collect::<Vec<_>>()),
	);
}

pub fn report_elaboration_error(
	source: &LexedSource,
	signature: &Signature,
	resolver: &impl Resolver,
	error: ElaborationError,
) {
	let start = source.ranges.get(error.range.0).map_or(source.source.len(), |range| range.0);
	let end = match error.range.1.checked_sub(1).and_then(|last| source.ranges.get(last)) {
		Some(range) if range.1 > start => range.1,
		_ => start + 1,
	};
	report_line_error(source.source, (start, end), &display_error(error.kind, signature, resolver));
}

fn report_line_error(source: &str, range: (usize, usize), error_string: &str) {
	const TAB_REPLACEMENT: &str = "   ";

	let mut lines = source.split_inclusive('\n');
	let mut line_number: usize = 0;
	let mut bytes_left = range.0;
	let (line, bytes_left, width) = loop {
		if let Some(line) = lines.next() {
			line_number += 1;
			if line.len() <= bytes_left {
				bytes_left -= line.len();
			} else {
				let end = range.1.min(range.0 - bytes_left + line.trim_end().len()).max(range.0 + 1);
				break (line, bytes_left, end - range.0);
			}
		} else {
			let (i, last) = source.split('\n').enumerate().last().unwrap_or((0, ""));
			line_number = i + 1;
			break (last, last.len(), 1);
		}
	};

	eprint!("[{}:{}] ", line_number, bytes_left);
	eprintln!("error: {error_string}");

	let visual_line = line.replace('\t', TAB_REPLACEMENT).trim_end().to_owned();
	let visual_offset: usize =
		unicode_width::UnicodeWidthStr::width(line[0..bytes_left].replace('\t', TAB_REPLACEMENT).as_str());

	let displayed_line_number = line_number.to_string();
	let dummy_line_number = " ".repeat(displayed_line_number.len());
	eprintln!("{} |", dummy_line_number);
	eprintln!("{} | {}", displayed_line_number, visual_line);
	eprintln!("{} | {}{}", dummy_line_number, " ".repeat(visual_offset), "^".repeat(width));
}

fn format_lex_error(source: &str, LexError(location, kind): LexError) -> String {
	fn char_list_string(chars: &[char]) -> String {
		chars.iter().map(|c| format!("`{c}`")).collect::<Vec<_>>().join(", ")
	}

	let found = source.get(location..).and_then(|rest| rest.chars().next()).unwrap_or(' ');
	match kind {
		LexErrorKind::UnrecognizedLexemePrefix => format!("lex error: unrecognized lexeme prefix `{found}`"),
		LexErrorKind::UnexpectedCharacter(expected) =>
			format!("lex error: expected one of {}; found `{}`", char_list_string(expected), found.escape_default()),
		LexErrorKind::UnexpectedEnd(expected) =>
			format!("lex error: expected one of {}; found end of input", char_list_string(expected)),
	}
}

pub fn display_error(kind: ElaborationErrorKind, signature: &Signature, resolver: &impl Resolver) -> String {
	let print = |term: &Term| pretty_print(term, signature, resolver);
	match kind {
		ElaborationErrorKind::NotInScope(name) =>
			format!("elaboration error: `{}` is not in scope", resolver.resolve(&name)),
		ElaborationErrorKind::SynthesizedLambda =>
			"elaboration error: cannot infer the type of an unannotated lambda".to_owned(),
		ElaborationErrorKind::ExpectedUniverse(ty) =>
			format!("elaboration error: expected a type, found a term of type {}", print(&ty)),
		ElaborationErrorKind::ExpectedFunction(ty) =>
			format!("elaboration error: expected a function, found a term of type {}", print(&ty)),
		ElaborationErrorKind::UnexpectedLambda(ty) =>
			format!("elaboration error: expected a term of type {}, found a lambda", print(&ty)),
		ElaborationErrorKind::MethodCount { expected, found } =>
			format!("elaboration error: eliminator needs {expected} methods, but was given {found}"),
		ElaborationErrorKind::InvalidMotive(ty) =>
			format!("elaboration error: motive of type {} does not eliminate the target", print(&ty)),
		ElaborationErrorKind::BidirectionalMismatch { synthesized, expected } => format!(
			"elaboration error: type mismatch\nexpected: {}\nfound: {}",
			print(&expected),
			print(&synthesized)
		),
		ElaborationErrorKind::Kernel(KernelError::Type(TypeError::Mismatch { expected, found })) =>
			format!("type error: type mismatch\nexpected: {}\nfound: {}", print(&expected), print(&found)),
		ElaborationErrorKind::Kernel(KernelError::Configuration(error)) =>
			format!("configuration error: {}", display_configuration_error(error, resolver)),
		ElaborationErrorKind::Kernel(error) => format!("kernel error: {error}"),
	}
}

fn display_configuration_error(error: ConfigurationError, resolver: &impl Resolver) -> String {
	let name = |name: Name| resolver.resolve(&name).to_owned();
	match error {
		ConfigurationError::DuplicateName(n) => format!("`{}` is already declared", name(n)),
		ConfigurationError::UnknownFamily(n) => format!("unknown inductive family `{}`", name(n)),
		ConfigurationError::FamilyFinalized(n) => format!("inductive family `{}` is already finalized", name(n)),
		ConfigurationError::FamilyUnfinalized(n) => format!("inductive family `{}` is not finalized", name(n)),
		ConfigurationError::NoConstructors(n) => format!("inductive family `{}` has no constructors", name(n)),
		ConfigurationError::ParameterCount { family, parameter_count } =>
			format!("type former of `{}` binds fewer than {parameter_count} parameters", name(family)),
		ConfigurationError::FamilyArity(n) => format!("type former of `{}` does not end in a universe", name(n)),
		ConfigurationError::ConstructorParameters(n) =>
			format!("constructor `{}` does not bind the parameters of its family", name(n)),
		ConfigurationError::ConstructorTarget(n) => format!("constructor `{}` does not return its own family", name(n)),
		ConfigurationError::NonPositive { constructor, field } => format!(
			"constructor `{}` has a non-positive occurrence of its family in field {field}",
			name(constructor)
		),
		ConfigurationError::MethodCount { family, expected, found } =>
			format!("eliminator for `{}` needs {expected} methods, but was given {found}", name(family)),
	}
}
