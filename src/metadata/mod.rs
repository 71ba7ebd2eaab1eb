pub mod raw;
pub mod triple;
pub mod unflatten;
pub mod unpack;

pub use raw::*;
pub use triple::*;
pub use unflatten::*;
pub use unpack::*;
