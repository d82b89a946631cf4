//! This module embeds a small catalog of ready-made rule sets.

use crate::parser::parse;
use crate::types::{ConfigError, Program};

// Embedded rule sets, in catalog order.
const PROGRAM_TEXTS: [&str; 4] = [
    include_str!("../machines/fibonacci.json"),
    include_str!("../machines/unary-addition.json"),
    include_str!("../machines/binary-increment.json"),
    include_str!("../machines/unary-copy.json"),
];

/// Access to the embedded rule sets.
///
/// The catalog is stateless: every lookup parses the embedded text again, so callers own
/// the programs they get back.
pub struct ProgramCatalog;

impl ProgramCatalog {
    /// Parses every embedded rule set.
    pub fn all() -> Result<Vec<Program>, ConfigError> {
        PROGRAM_TEXTS.iter().map(|text| parse(text)).collect()
    }

    /// The number of embedded rule sets.
    pub fn count() -> usize {
        PROGRAM_TEXTS.len()
    }

    /// List all program names
    pub fn names() -> Result<Vec<String>, ConfigError> {
        Ok(Self::all()?.into_iter().map(|program| program.name).collect())
    }

    /// Get a program by its name, ignoring case.
    pub fn get(name: &str) -> Result<Program, ConfigError> {
        Self::all()?
            .into_iter()
            .find(|program| program.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::InvalidConfig(format!("Program '{}' not found", name)))
    }

    /// Get the embedded JSON text of a program by its name, ignoring case.
    pub fn text(name: &str) -> Result<&'static str, ConfigError> {
        let index = Self::all()?
            .iter()
            .position(|program| program.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::InvalidConfig(format!("Program '{}' not found", name)))?;

        Ok(PROGRAM_TEXTS[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::lint;
    use crate::machine::{MachineConfig, TapeInput, TuringMachine};
    use crate::types::Outcome;
    use std::sync::Arc;

    fn run(name: &str, inputs: &[TapeInput]) -> TuringMachine {
        let program = Arc::new(ProgramCatalog::get(name).unwrap());
        let config = MachineConfig::for_program(&program);
        let mut machine = TuringMachine::new(program, config).unwrap();
        machine.load(inputs).unwrap();

        let result = machine.run(10_000);
        assert_eq!(result.outcome, Outcome::Accepted, "{} did not accept", name);
        machine
    }

    #[test]
    fn test_all_programs_are_valid() {
        let programs = ProgramCatalog::all().unwrap();
        assert_eq!(programs.len(), ProgramCatalog::count());

        for program in &programs {
            assert!(
                lint(program).is_empty(),
                "Program '{}' has lint warnings",
                program.name
            );
        }
    }

    #[test]
    fn test_program_names() {
        let names = ProgramCatalog::names().unwrap();
        assert_eq!(
            names,
            vec!["Fibonacci", "Unary addition", "Binary increment", "Unary copy"]
        );
    }

    #[test]
    fn test_get_program_by_name() {
        assert!(ProgramCatalog::get("unary ADDITION").is_ok());
        assert!(ProgramCatalog::get("Nonexistent").is_err());
        assert!(ProgramCatalog::text("Binary increment")
            .unwrap()
            .contains("carry"));
    }

    #[test]
    fn test_fibonacci() {
        let expected = [0, 1, 1, 2, 3, 5, 8, 13];

        for (n, &fib) in expected.iter().enumerate() {
            let input = format!("{}#", "1".repeat(n));
            let machine = run("Fibonacci", &[input.as_str().into()]);
            assert_eq!(
                machine.tapes()[0].trimmed(),
                "1".repeat(fib),
                "F({}) should leave {} ones",
                n,
                fib
            );
        }
    }

    #[test]
    fn test_fibonacci_without_terminator() {
        let machine = run("Fibonacci", &["111111".into()]);
        assert_eq!(machine.tapes()[0].trimmed(), "1".repeat(8));
        assert_eq!(machine.state(), "done");
    }

    #[test]
    fn test_unary_addition() {
        let machine = run("Unary addition", &["_".into(), "111".into(), "11".into()]);
        assert_eq!(machine.tapes()[0].trimmed(), "11111");
        assert_eq!(machine.step_count(), 7);
    }

    #[test]
    fn test_binary_increment() {
        let machine = run("Binary increment", &["1011".into()]);
        assert_eq!(machine.tapes()[0].trimmed(), "1100");

        let machine = run("Binary increment", &["111".into()]);
        assert_eq!(machine.tapes()[0].trimmed(), "1000");

        let machine = run("Binary increment", &[]);
        assert_eq!(machine.tapes()[0].trimmed(), "1");
    }

    #[test]
    fn test_unary_copy() {
        let machine = run("Unary copy", &["1111".into()]);
        assert_eq!(machine.tapes()[0].trimmed(), "1111");
        assert_eq!(machine.tapes()[1].trimmed(), "1111");
        assert_eq!(machine.heads(), &[0, 0]);
    }
}
