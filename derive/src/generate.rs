use abnf::{Case, CompileOptions, Construct, Identifier, Rulelist};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use syn::{Attribute, DeriveInput, Generics, Ident, Lit, Meta};

use crate::error::{DeriveError, Result};

const ABNF_FILE_ATTR: &str = "abnf_file";
const ABNF_INLINE_ATTR: &str = "abnf_inline";

/// Compiled rules, in declaration order.
#[derive(Debug)]
struct Grammar {
    rules: Vec<(Identifier, Construct)>,
    /// File the rules were read from, if any.
    file: Option<PathBuf>,
}

pub fn generate(ast: DeriveInput) -> Result<TokenStream> {
    let grammar = grammar_from_ast(&ast)?;
    let name = ast.ident;
    let generics = ast.generics;

    // Rebuild whenever the grammar file changes.
    let tracked = grammar.file.as_ref().map(|path| {
        let path = path.to_string_lossy();
        quote! {
            const _: &str = include_str!(#path);
        }
    });
    let generated_rules = generate_rule_enum(&grammar);
    let generated_impl = generate_impl(name, &generics, &grammar);

    Ok(quote! {
        #tracked
        #generated_rules
        #generated_impl
    })
}

/// Load a grammar from a derive attribute.
///
/// There must be exactly 1 attribute specifying the grammar source. The source
/// may either be written inline, or a path to an abnf file relative to the
/// crate root.
fn grammar_from_ast(ast: &DeriveInput) -> Result<Grammar> {
    let sources: Vec<&Attribute> = ast
        .attrs
        .iter()
        .filter(|attr| match attr.parse_meta() {
            Ok(Meta::NameValue(val)) => {
                val.path.is_ident(ABNF_FILE_ATTR) || val.path.is_ident(ABNF_INLINE_ATTR)
            }
            _ => false,
        })
        .collect();

    let source_attr = match sources.len() {
        0 => return Err(DeriveError::MissingGrammarSource),
        1 => sources[0],
        _ => return Err(DeriveError::MultipleGrammarSources),
    };

    match source_attr.parse_meta()? {
        Meta::NameValue(val) => match val.lit {
            Lit::Str(s) => {
                if val.path.is_ident(ABNF_FILE_ATTR) {
                    let root = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
                    let path = Path::new(&root).join(&s.value());
                    let data = fs::read_to_string(&path).map_err(|e| DeriveError::ReadFile {
                        path: path.to_string_lossy().into_owned(),
                        msg: e.to_string(),
                    })?;
                    let mut grammar = compile_grammar(&data)?;
                    grammar.file = Some(path);
                    Ok(grammar)
                } else {
                    compile_grammar(&s.value())
                }
            }
            _ => Err(DeriveError::Other("attribute not a string".to_owned())),
        },
        _ => Err(DeriveError::Other("attribute not a name value".to_owned())),
    }
}

/// Compile every rule in a rule list. Every rule referenced must be declared
/// in the same list, since there's nothing to resolve it against later.
fn compile_grammar(text: &str) -> Result<Grammar> {
    let list: Rulelist = text.parse().map_err(|e| DeriveError::Compile {
        rule: String::new(),
        msg: format!("{}", e),
    })?;

    let mut declared = HashSet::new();
    for rule in &list.rules {
        if !declared.insert(rule.name.as_str()) {
            return Err(DeriveError::DuplicateRule(rule.name.to_string()));
        }
    }

    let mut rules = Vec::with_capacity(list.rules.len());
    for rule in &list.rules {
        let root = rule
            .compile(CompileOptions::default())
            .map_err(|e| DeriveError::Compile {
                rule: rule.name.to_string(),
                msg: format!("{}", e),
            })?;
        if let Some(missing) = root
            .references()
            .into_iter()
            .find(|name| !declared.contains(name.as_str()))
        {
            return Err(DeriveError::UnknownRule {
                rule: rule.name.to_string(),
                reference: missing.to_string(),
            });
        }
        rules.push((rule.name.clone(), root));
    }

    Ok(Grammar { rules, file: None })
}

/// Rule names may hold dashes, and may collide with keywords.
fn rule_ident(name: &Identifier) -> Ident {
    let mut name = name.as_str().replace('-', "_");
    // Keywords that can't be raw identifiers.
    if ["self", "Self", "super", "crate"].contains(&name.as_str()) {
        name.push('_');
    }
    match syn::parse_str::<Ident>(&name) {
        Ok(_) => Ident::new(&name, Span::call_site()),
        Err(_) => Ident::new_raw(&name, Span::call_site()),
    }
}

/// Generate the parser implmentation from the grammar.
///
/// Individual rule functions are are generated in a nested `rule_impls` module
/// to prevent name clashes.
fn generate_impl(name: Ident, generics: &Generics, grammar: &Grammar) -> TokenStream {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let gen_patterns = generate_patterns(grammar);
    let gen_rules: Vec<TokenStream> = grammar
        .rules
        .iter()
        .map(|(name, root)| generate_rule_function(name, root))
        .collect();

    quote! {
        impl #impl_generics parsegen::Parser<Rule> for #name #ty_generics #where_clause {
            fn parse(rule: Rule, input: &str) -> anyhow::Result<std::vec::Vec<parsegen::Token<Rule>>> {
                mod rule_impls {
                    #( #gen_rules )*
                }

                let state = parsegen::State::new(input);
                let res = #gen_patterns

                let end_state = res.map_err(|state| {
                    anyhow::anyhow!("parsing failed, furthest position {}", state.furthest())
                })?;
                Ok(end_state.tokens())
            }
        }
    }
}

/// Generate the pattern match for a grammar. Each rule will have itself matched
/// with a function of the same name in the `rule_impls` module.
fn generate_patterns(grammar: &Grammar) -> TokenStream {
    let gen_rules: Vec<TokenStream> = grammar
        .rules
        .iter()
        .map(|(name, _)| {
            let rule = rule_ident(name);
            quote! {
                Rule::#rule => rule_impls::#rule(state)
            }
        })
        .collect();

    quote! {
        match rule {
            #( #gen_rules ),*
        };
    }
}

/// Generates a rule function for the provided rule.
fn generate_rule_function(name: &Identifier, root: &Construct) -> TokenStream {
    let name = rule_ident(name);
    let gen_expr = generate_expression(root);
    quote! {
        #[allow(non_snake_case)]
        pub fn #name(state: parsegen::State<super::Rule>) -> parsegen::StateResult<parsegen::State<super::Rule>> {
            state.tokenize(super::Rule::#name, |state| {
                #gen_expr
            })
        }
    }
}

fn generate_expression(construct: &Construct) -> TokenStream {
    match construct {
        Construct::Literal(term) => {
            let value = term.value.as_str();
            match term.case {
                Case::Sensitive => quote! { state.match_str(#value) },
                Case::Insensitive => quote! { state.match_str_ignore_case(#value) },
            }
        }
        Construct::RuleReference(name) => {
            // Paths through `self` so a rule named `state` isn't shadowed by
            // the closure parameter.
            let ident = rule_ident(name);
            quote! {
                self::#ident(state)
            }
        }
        Construct::Concatenation(left, right) => {
            let left_expr = generate_expression(left);
            let right_expr = generate_expression(right);
            quote! {
                state.sequence(|state| #left_expr, |state| #right_expr)
            }
        }
        Construct::Alternation(left, right) => {
            let left_expr = generate_expression(left);
            let right_expr = generate_expression(right);
            quote! {
                state.choice(|state| #left_expr, |state| #right_expr)
            }
        }
        Construct::Grouping(inner) => {
            let inner_expr = generate_expression(inner);
            quote! {
                state.apply(|state| #inner_expr)
            }
        }
        Construct::Optional(inner) => {
            let inner_expr = generate_expression(inner);
            quote! {
                state.optional(|state| #inner_expr)
            }
        }
        Construct::Repetition(repeat, inner) => {
            let inner_expr = generate_expression(inner);
            let min = repeat.min;
            let max = match repeat.max {
                Some(max) => quote! { Some(#max) },
                None => quote! { None },
            };
            quote! {
                state.repeat(#min, #max, |state| #inner_expr)
            }
        }
        Construct::Comment(inner, _) => generate_expression(inner),
    }
}

/// Generate enum variants for each rule.
fn generate_rule_enum(grammar: &Grammar) -> TokenStream {
    let rules = grammar.rules.iter().map(|(name, _)| {
        let ident = rule_ident(name);
        quote! {
            #ident
        }
    });

    quote! {
        #[allow(non_camel_case_types)]
        #[derive(Copy, Debug, Eq, Clone, PartialEq, Hash)]
        pub enum Rule {
            #( #rules ),*
        }
    }
}
