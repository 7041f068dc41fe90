//! Reading PDF syntax: the shared lexer, stream bodies and calculator functions.

pub(crate) mod bp;
pub(crate) mod cc;

mod tk;
pub use tk::{Lexer, Token};

mod stm;
pub use stm::read_stream_body;

mod func;
pub use func::{FunctionParser, Diagnostic, FUNCTION_KEYWORDS, is_function_keyword};
