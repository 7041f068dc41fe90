use std::fmt::{Display, Formatter};
use std::io::BufRead;

use crate::base::{Error, Number};

use super::tk::{Lexer, Token};

/// The operators of the PostScript calculator language (Type 4 functions), plus the braces.
pub const FUNCTION_KEYWORDS: &[&[u8]] = &[
    // arithmetic
    b"abs", b"cvi", b"floor", b"mod", b"sin", b"add", b"cvr", b"idiv", b"mul", b"sqrt",
    b"atan", b"div", b"ln", b"neg", b"sub", b"ceiling", b"exp", b"log", b"round", b"truncate",
    b"cos",
    // boolean and relational
    b"and", b"false", b"le", b"not", b"true", b"bitshift", b"ge", b"lt", b"or", b"xor", b"eq",
    b"gt", b"ne",
    // conditional
    b"if", b"ifelse",
    // stack
    b"copy", b"exch", b"pop", b"dup", b"index", b"roll",
    b"{", b"}",
];

pub fn is_function_keyword(kw: &[u8]) -> bool {
    FUNCTION_KEYWORDS.contains(&kw)
}

/// A problem found in a calculator program. None of them stops the parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A keyword which is not an operator of the language.
    InvalidKeyword(Vec<u8>),
    /// A token which is neither a number nor a keyword.
    InvalidObjectType(Token),
}

impl Diagnostic {
    pub fn level(&self) -> log::Level {
        log::Level::Warn
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::InvalidKeyword(kw) =>
                write!(f, "invalid keyword in function: {}", String::from_utf8_lossy(kw)),
            Diagnostic::InvalidObjectType(tk) =>
                write!(f, "invalid object type in function: {tk}")
        }
    }
}

/// Reads the program of a Type 4 function into the flat list of its numeric operands.
///
/// Keywords are checked against [`FUNCTION_KEYWORDS`] and then dropped, braces included, so
/// the block structure is left to the evaluator.
pub struct FunctionParser<R: BufRead> {
    lexer: Lexer<R>,
    operands: Vec<Number>,
    diagnostics: Vec<Diagnostic>,
}

impl<R: BufRead> FunctionParser<R> {
    pub fn new(reader: R) -> Self {
        FunctionParser {
            lexer: Lexer::new(reader),
            operands: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Reads the input to its end. Unexpected content is reported in [`Self::diagnostics()`]
    /// and skipped; only a failure of the reader is an error.
    pub fn parse(&mut self) -> Result<(), Error> {
        self.lexer.initialize_token();
        self.lexer.skip_spaces(true)?;
        loop {
            let diag = match self.lexer.next_token()? {
                Token::Eof | Token::None => break,
                Token::Keyword(kw) if is_function_keyword(kw) => continue,
                Token::Keyword(kw) => Diagnostic::InvalidKeyword(kw.clone()),
                &Token::Integer(num) => {
                    self.operands.push(Number::Int(num));
                    continue;
                },
                &Token::Real(num) => {
                    self.operands.push(Number::Real(num));
                    continue;
                },
                tk => Diagnostic::InvalidObjectType(tk.clone())
            };
            log::log!(diag.level(), "{diag}");
            self.diagnostics.push(diag);
        }
        Ok(())
    }

    pub fn operands(&self) -> &[Number] {
        &self.operands
    }

    pub fn into_operands(self) -> Vec<Number> {
        self.operands
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
