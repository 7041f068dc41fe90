pub mod types {
    /// Object number: type alias for `u64`.
    pub type ObjNum = u64;
    /// Object generation: type alias for `u16`.
    pub type ObjGen = u16;
}

mod name;
pub use name::*;

mod number;
pub use number::*;

mod dict;
pub use dict::*;

mod object;
pub use object::*;

mod string;

mod source;
pub use source::*;

mod stream;
pub use stream::*;

mod error;
pub use error::*;
