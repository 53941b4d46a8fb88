//! Parsing Hack assembly source code into statement sequences.
//!
//! This module handles the front half of the assembly pipeline:
//! - stripping comments and surrounding whitespace from each raw line,
//! - classifying each surviving line as one of the three statement forms,
//! - validating mnemonics and symbol names against the fixed tables,
//! - collecting every diagnostic before translation is allowed to continue.
//!
//! The module's key functions are [`parse_program`] (for whole source text)
//! and [`parse_lines`] (for an already-split sequence of lines). Both follow
//! an all-or-nothing contract: if any line is rejected, the diagnostics for
//! every offending line are returned together and no statements are produced.

use std::collections::HashSet;

use crate::ast::{Comp, Compute, Dest, ImmOrSym, Jump, Stmt, StmtKind, PREDEFINED};

/// Parses a complete source text into a sequence of statements.
///
/// The source is split on line terminators and handed to [`parse_lines`];
/// see there for the classification rules.
///
/// ## Example
/// ```
/// use hack_ensemble::parse::parse_program;
///
/// let stmts = parse_program("@2\nD=A").unwrap();
/// assert_eq!(stmts.len(), 2);
///
/// let errs = parse_program("@2\nD=B").unwrap_err();
/// assert_eq!(errs[0].to_string(), "Invalid operation in line 2: D=B");
/// ```
pub fn parse_program(src: &str) -> Result<Vec<Stmt>, Vec<ParseErr>> {
    parse_lines(src.lines())
}

/// Parses a sequence of raw source lines into a sequence of statements.
///
/// Each line is normalized (comment cut, whitespace trimmed) and, if
/// anything remains, classified as an address instruction, a compute
/// instruction, or a label declaration. Classification does not stop at the
/// first bad line: every line is checked, and any failure at all means the
/// whole input is rejected with the full diagnostic list.
///
/// Line numbers in diagnostics are 1-based and count every raw line,
/// including those that normalize to nothing.
///
/// ## Example
/// ```
/// use hack_ensemble::parse::parse_lines;
///
/// let stmts = parse_lines(["(LOOP)", "@LOOP", "0;JMP"]).unwrap();
/// assert_eq!(stmts.len(), 3);
/// ```
pub fn parse_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Vec<Stmt>, Vec<ParseErr>> {
    let mut stmts = vec![];
    let mut errs = vec![];
    let mut declared: HashSet<String> = HashSet::new();

    for (i, raw) in lines.into_iter().enumerate() {
        let line = normalize(raw);
        if line.is_empty() { continue; }

        match classify(line, &declared) {
            Ok(kind) => {
                if let StmtKind::Label(name) = &kind {
                    declared.insert(name.clone());
                }
                stmts.push(Stmt { kind, line: i + 1 });
            }
            Err(kind) => errs.push(ParseErr::new(kind, i + 1, line)),
        }
    }

    match errs.is_empty() {
        true  => Ok(stmts),
        false => Err(errs),
    }
}

/// Kinds of errors that can occur from classifying source lines.
///
/// See [`ParseErr`] for this error type with line information included.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ParseErrKind {
    /// The operand of an address instruction is neither a literal nor a
    /// well-formed symbol.
    InvalidSymbolName,
    /// A label declaration's name is not a well-formed symbol.
    InvalidLabelName,
    /// A label declaration reuses a name that is already bound.
    DuplicateLabel,
    /// A line holds more than one `;` or more than one `=`.
    TooManyOperations,
    /// A destination, computation, or jump mnemonic is not in its table.
    InvalidOperation,
    /// A line matches none of the three statement forms.
    InvalidStatement,
}
impl std::fmt::Display for ParseErrKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSymbolName => f.write_str("Invalid symbol name"),
            Self::InvalidLabelName  => f.write_str("Invalid label name"),
            Self::DuplicateLabel    => f.write_str("Duplicate label"),
            Self::TooManyOperations => f.write_str("Too many operations"),
            Self::InvalidOperation  => f.write_str("Invalid operation"),
            Self::InvalidStatement  => f.write_str("Invalid statement"),
        }
    }
}

/// Error from classifying a single source line.
///
/// Its `Display` form is the diagnostic exactly as reported to users:
/// the message, the 1-based source line number, and the offending line text
/// (after comment and whitespace removal).
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ParseErr {
    /// The kind of error.
    pub kind: ParseErrKind,
    /// The 1-based line number in the raw source. Blank and comment-only
    /// lines count toward this number.
    pub line: usize,
    /// The offending line, post-normalization.
    pub text: String,
}
impl ParseErr {
    /// Creates a new [`ParseErr`].
    pub fn new(kind: ParseErrKind, line: usize, text: impl Into<String>) -> Self {
        ParseErr { kind, line, text: text.into() }
    }
}
impl std::fmt::Display for ParseErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} in line {}: {}", self.kind, self.line, self.text)
    }
}
impl std::error::Error for ParseErr {}
impl crate::err::Error for ParseErr {
    fn line(&self) -> Option<usize> {
        Some(self.line)
    }

    fn help(&self) -> Option<std::borrow::Cow<str>> {
        match self.kind {
            ParseErrKind::InvalidSymbolName => Some("symbols consist of letters, digits, '_', '.', '$', ':' and cannot start with a digit".into()),
            ParseErrKind::InvalidLabelName  => Some("labels follow the symbol rules: letters, digits, '_', '.', '$', ':' and no leading digit".into()),
            ParseErrKind::DuplicateLabel    => Some("labels must be unique within a program and cannot reuse a predefined symbol".into()),
            ParseErrKind::TooManyOperations => Some("an instruction holds at most one '=' and one ';'".into()),
            ParseErrKind::InvalidOperation  => Some("one of the destination, computation, or jump mnemonics is not part of the instruction set".into()),
            ParseErrKind::InvalidStatement  => Some("expected @value, dest=comp;jump, or a (LABEL) declaration".into()),
        }
    }
}

/// Strips the comment and surrounding whitespace from a raw line.
///
/// The result is empty if nothing but comment and whitespace was there.
fn normalize(raw: &str) -> &str {
    let code = match raw.find("//") {
        Some(i) => &raw[..i],
        None => raw,
    };
    code.trim()
}

/// Classifies one normalized, non-empty line, validating its mnemonics and
/// names along the way.
///
/// The checks run in a fixed order: the address form first, then the
/// operator count, then the jump split, then the destination split, then
/// label declarations, and "Invalid statement" for everything left over.
/// A bare computation with no `=` and no `;` is therefore rejected, not
/// treated as a no-op instruction.
///
/// `declared` holds the label names accepted so far; a label is a duplicate
/// if its name is in there or among the predefined symbols.
fn classify(line: &str, declared: &HashSet<String>) -> Result<StmtKind, ParseErrKind> {
    if let Some(operand) = line.strip_prefix('@') {
        if is_literal(operand) {
            return Ok(StmtKind::Addr(ImmOrSym::Imm(parse_literal(operand))));
        }
        return match symbol_is_valid(operand) {
            true  => Ok(StmtKind::Addr(ImmOrSym::Sym(operand.to_string()))),
            false => Err(ParseErrKind::InvalidSymbolName),
        };
    }

    if line.matches(';').count() > 1 || line.matches('=').count() > 1 {
        return Err(ParseErrKind::TooManyOperations);
    }

    if let Some((head, jump)) = line.split_once(';') {
        let jump = Jump::from_mnemonic(jump).ok_or(ParseErrKind::InvalidOperation)?;
        let (dest, comp) = split_compute(head)?;
        return Ok(StmtKind::Compute(Compute { dest, comp, jump: Some(jump) }));
    }

    if line.contains('=') {
        let (dest, comp) = split_compute(line)?;
        return Ok(StmtKind::Compute(Compute { dest, comp, jump: None }));
    }

    if let Some(name) = line.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        if declared.contains(name) || PREDEFINED.iter().any(|&(sym, _)| sym == name) {
            return Err(ParseErrKind::DuplicateLabel);
        }
        return match symbol_is_valid(name) {
            true  => Ok(StmtKind::Label(name.to_string())),
            false => Err(ParseErrKind::InvalidLabelName),
        };
    }

    Err(ParseErrKind::InvalidStatement)
}

/// Splits an optional `dest=` prefix off a computation clause and looks both
/// parts up in their tables.
///
/// The parts are matched as-is: `D = A` fails where `D=A` succeeds, because
/// `"D "` and `" A"` are not table entries.
fn split_compute(part: &str) -> Result<(Option<Dest>, Comp), ParseErrKind> {
    match part.split_once('=') {
        Some((dest, comp)) => {
            let dest = Dest::from_mnemonic(dest).ok_or(ParseErrKind::InvalidOperation)?;
            let comp = Comp::from_mnemonic(comp).ok_or(ParseErrKind::InvalidOperation)?;
            Ok((Some(dest), comp))
        }
        None => {
            let comp = Comp::from_mnemonic(part).ok_or(ParseErrKind::InvalidOperation)?;
            Ok((None, comp))
        }
    }
}

/// Checks a candidate symbol or label name.
///
/// A well-formed name is nonempty, does not start with a decimal digit, and
/// consists of alphanumeric characters and `_`, `.`, `$`, `:` only.
fn symbol_is_valid(name: &str) -> bool {
    let Some(first) = name.chars().next() else { return false };
    if first.is_ascii_digit() {
        return false;
    }
    name.chars().all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '$' | ':'))
}

/// Checks whether an address operand is a literal (entirely decimal digits).
fn is_literal(operand: &str) -> bool {
    !operand.is_empty() && operand.bytes().all(|b| b.is_ascii_digit())
}

/// Reduces an all-digit operand into the 15-bit address field.
///
/// The literal itself is not bounds-checked; out-of-range values wrap into
/// the field, matching the fixed width of the encoded word.
fn parse_literal(digits: &str) -> u16 {
    let value = digits.bytes()
        .fold(0u16, |acc, b| acc.wrapping_mul(10).wrapping_add(u16::from(b - b'0')));
    value & 0x7FFF
}
