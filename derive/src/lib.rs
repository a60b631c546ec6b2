//! Proc macros for deriving parsers from ABNF rule lists.
//!
//! ```ignore
//! #[derive(Parser)]
//! #[abnf_inline = "greeting = \"hello\" [\" \" name]\nname = \"world\""]
//! pub struct GreetingParser;
//! ```
//!
//! Deriving emits a `Rule` enum with one variant per rule, and an
//! implementation of `parsegen::Parser<Rule>`. Grammar errors are reported
//! as compile errors at the derive site.

use syn::{parse_macro_input, DeriveInput};

mod error;
mod generate;

#[proc_macro_derive(Parser, attributes(abnf_file, abnf_inline))]
pub fn derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    match generate::generate(ast) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
