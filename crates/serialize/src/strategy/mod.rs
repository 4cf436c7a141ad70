//! The built-in strategy family.
//!
//! Each submodule holds the algorithm for one shape, as free functions that
//! generated code and hand-written impls call, together with the impls for
//! the standard library types of that shape.
//!
//! | module       | wire format                                          |
//! |--------------|------------------------------------------------------|
//! | [`trivial`]  | the raw bytes of the value                           |
//! | [`sequence`] | `u64` length, then each element                      |
//! | [`tuple`]    | each element in position order                       |
//! | [`sum`]      | `u64` alternative index (`u64::MAX` when valueless), then the payload |
//! | [`optional`] | one flag byte, then the payload if present           |
//! | [`aggregate`]| each member in declaration order                     |

pub mod aggregate;
pub mod optional;
pub mod sequence;
pub mod sum;
pub mod trivial;
pub mod tuple;
