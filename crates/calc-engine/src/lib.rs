//! # calc-engine
//!
//! Deterministic interpretation of free-text launcher queries.
//!
//! Given a query such as `"3 + 4 * 2"`, `"5 kg a pound"`, `"25 c to f"` or
//! `"el último viernes de febrero"`, the engine decides which kind of
//! question it is and produces one formatted answer. English and Spanish
//! are understood side by side. Nothing here reads the clock or does I/O:
//! "now" is always passed in by the caller.
//!
//! ## Modules
//!
//! - [`dispatch`] — Try every resolver in priority order, first success wins
//! - [`normalize`] — Free text → canonical numeric expression ("3 times 4" → "3 * 4")
//! - [`arithmetic`] — Tokenizer, shunting-yard, postfix evaluator
//! - [`units`] — Mass, length, volume and astronomical unit conversion
//! - [`temperature`] — Celsius ⇄ Fahrenheit
//! - [`date`] — Bilingual date phrases resolved against a supplied "now"
//! - [`vocabulary`] — Static date word tables
//! - [`error`] — Error types

pub mod arithmetic;
mod conversion;
pub mod date;
pub mod dispatch;
pub mod error;
pub mod normalize;
pub mod temperature;
pub mod units;
pub mod vocabulary;

pub use arithmetic::{evaluate, format_number, Function, Operator, Token};
pub use conversion::ConversionOutcome;
pub use date::{resolve, resolve_with_options, DateQuery, ResolveOptions, ResolvedDate};
pub use dispatch::{interpret, InterpretationResult, Interpreter, InterpreterOptions, Kind};
pub use error::CalcError;
pub use vocabulary::Language;
