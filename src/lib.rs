//! gjs-util - small helpers for dynamic values
//!
//! This crate collects the everyday helpers a dynamically-typed codebase
//! leans on: runtime type predicates, iteration with early exit, a
//! recursive object merge ("extend"), a BOM-stripping byte decoder and a
//! synchronous deferred-callback step.

pub mod iter;
pub mod merge;
pub mod step;
pub mod text;

pub use gjs_value::{
    classify, is_array, is_boolean, is_date, is_empty, is_empty_object, is_error, is_function,
    is_int, is_mail, is_num, is_object, is_plain_object, is_regexp, is_string, is_undefined,
    parse_float, to_number, DateValue, ErrorValue, Function, Instance, Kind, Map, RegExp, Value,
};
pub use iter::{arr_each, each, obj_each, Key, VisitFlow};
pub use merge::{extend, merge_layers, ConfigError, MergeOptions};
pub use step::{step, Step, StepError, StepState};
pub use text::{to_utf8, UTF8_BOM};
