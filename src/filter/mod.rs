pub mod apply;
pub mod expr;
pub mod spec;


pub use apply::*;
pub use expr::*;
pub use spec::*;
