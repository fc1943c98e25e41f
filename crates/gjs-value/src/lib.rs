//! Dynamic value model and runtime type predicates.
//!
//! `Value` models a dynamically-typed value. The predicates answer the
//! usual "what is this" questions about it, and `classify` folds the
//! answers into a single closed `Kind` that structural code can match on.

mod convert;
mod kind;
mod number;
mod predicates;
mod value;

pub use kind::{classify, Kind};
pub use number::{parse_float, to_number};
pub use predicates::{
    is_array, is_boolean, is_date, is_empty, is_empty_object, is_error, is_function, is_int,
    is_mail, is_num, is_object, is_plain_object, is_regexp, is_string, is_undefined,
};
pub use value::{DateValue, ErrorValue, Function, Instance, Map, RegExp, Value};
