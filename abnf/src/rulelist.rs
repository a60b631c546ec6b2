use nom::{
    character::complete::{char, space0},
    sequence::{pair, terminated},
    IResult,
};
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::extract::identifier;
use crate::{CompileError, CompileOptions, Compiler, Construct, Identifier};

/// A named rule whose body has not been compiled yet.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Rule {
    pub name: Identifier,
    pub body: String,
}

impl Rule {
    pub fn compile(&self, options: CompileOptions) -> Result<Construct, CompileError> {
        Compiler::new(options).compile(&self.body)
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.body)
    }
}

fn definition(input: &str) -> IResult<&str, Identifier> {
    terminated(identifier, pair(space0, char('=')))(input)
}

impl FromStr for Rule {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (body, name) = definition(s.trim_start())?;
        if body.starts_with('/') {
            return Err(CompileError::MalformedRule(format!(
                "incremental alternatives for '{}' are not supported",
                name
            )));
        }
        Ok(Rule {
            name,
            body: body.trim().to_owned(),
        })
    }
}

/// A set of rules, in declaration order.
///
/// Each rule starts at the beginning of a line. Lines starting with
/// whitespace continue the rule above them. Blank lines and lines holding
/// only a comment are skipped.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Rulelist {
    pub rules: Vec<Rule>,
}

impl Display for Rulelist {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}

impl FromStr for Rulelist {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut sources: Vec<String> = Vec::new();
        for line in s.lines() {
            let content = line.trim();
            if content.is_empty() || content.starts_with(';') {
                continue;
            }
            if line.starts_with(char::is_whitespace) {
                match sources.last_mut() {
                    Some(source) => {
                        source.push('\n');
                        source.push_str(line);
                    }
                    None => return Err(CompileError::MalformedRule(content.to_owned())),
                }
            } else {
                sources.push(line.to_owned());
            }
        }

        let rules = sources
            .iter()
            .map(|source| source.parse())
            .collect::<Result<Vec<Rule>, _>>()?;
        Ok(Rulelist { rules })
    }
}
