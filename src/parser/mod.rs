//! SVG parser: structural checks with roxmltree, then a usvg render tree
//!
//! The root `viewBox` goes through a logos lexer and chumsky grammar so
//! that syntax errors point at the offending byte.

mod builder;
pub mod config;
pub mod grammar;
pub mod lexer;
pub mod units;

pub use builder::{parse, parse_with};
pub use config::ParserConfig;
pub use grammar::parse_number_list;
