use std::fs;
use std::path::Path;

use crate::kernel::{Instruction, MAX_INSTRUCTIONS};

/// Failures while turning an instruction listing into a program.
#[derive(thiserror::Error, Debug)]
pub enum ProgramLoadError {
    #[error("program file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: unknown mnemonic '{mnemonic}'")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("line {line}: '{mnemonic}' requires an integer argument")]
    MissingArgument { line: usize, mnemonic: String },

    #[error("line {line}: invalid argument '{argument}'")]
    InvalidArgument { line: usize, argument: String },

    #[error("line {line}: unexpected argument after '{mnemonic}'")]
    UnexpectedArgument { line: usize, mnemonic: String },

    #[error("program is empty")]
    EmptyProgram,

    #[error("program exceeds {max} instructions")]
    TooLong { max: usize },
}

/// The instruction listing every created process runs by default.
pub fn demo_program() -> Vec<Instruction> {
    vec![
        Instruction::Set(100),
        Instruction::Add(10),
        Instruction::Subtract(5),
        Instruction::Print,
        Instruction::End,
    ]
}

/// Reads an instruction listing from a file.
pub fn load_program_file(path: &Path) -> Result<Vec<Instruction>, ProgramLoadError> {
    let listing = fs::read_to_string(path)?;
    parse_program(&listing)
}

/// Parses an instruction listing: one mnemonic per line (`S`, `A`, `D` with
/// an integer argument; `P`, `E` without), `#` comments and blank lines
/// skipped. The program must be non-empty and fit `MAX_INSTRUCTIONS`.
pub fn parse_program(listing: &str) -> Result<Vec<Instruction>, ProgramLoadError> {
    let mut program = Vec::new();

    for (index, raw) in listing.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        program.push(parse_instruction(line, index + 1)?);
        if program.len() > MAX_INSTRUCTIONS {
            return Err(ProgramLoadError::TooLong {
                max: MAX_INSTRUCTIONS,
            });
        }
    }

    if program.is_empty() {
        return Err(ProgramLoadError::EmptyProgram);
    }

    Ok(program)
}

fn parse_instruction(line: &str, line_no: usize) -> Result<Instruction, ProgramLoadError> {
    let mut parts = line.split_ascii_whitespace();
    let mnemonic = parts.next().unwrap_or_default();
    let argument = parts.next();
    let extra = parts.next();

    match mnemonic {
        "S" | "A" | "D" => {
            let argument = argument.ok_or_else(|| ProgramLoadError::MissingArgument {
                line: line_no,
                mnemonic: mnemonic.to_string(),
            })?;
            if extra.is_some() {
                return Err(ProgramLoadError::UnexpectedArgument {
                    line: line_no,
                    mnemonic: mnemonic.to_string(),
                });
            }

            let value: i32 =
                argument
                    .parse()
                    .map_err(|_| ProgramLoadError::InvalidArgument {
                        line: line_no,
                        argument: argument.to_string(),
                    })?;

            Ok(match mnemonic {
                "S" => Instruction::Set(value),
                "A" => Instruction::Add(value),
                _ => Instruction::Subtract(value),
            })
        }
        "P" | "E" => {
            if argument.is_some() {
                return Err(ProgramLoadError::UnexpectedArgument {
                    line: line_no,
                    mnemonic: mnemonic.to_string(),
                });
            }

            Ok(if mnemonic == "P" {
                Instruction::Print
            } else {
                Instruction::End
            })
        }
        _ => Err(ProgramLoadError::UnknownMnemonic {
            line: line_no,
            mnemonic: mnemonic.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_demo_listing() {
        let listing = "S 100\nA 10\nD 5\nP\nE\n";
        assert_eq!(parse_program(listing).unwrap(), demo_program());
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let listing = "# load, bump, finish\n\nS 1\n  A 2  \n\nE\n";
        assert_eq!(
            parse_program(listing).unwrap(),
            vec![Instruction::Set(1), Instruction::Add(2), Instruction::End]
        );
    }

    #[test]
    fn test_parse_accepts_negative_arguments() {
        assert_eq!(
            parse_program("A -7\nE").unwrap(),
            vec![Instruction::Add(-7), Instruction::End]
        );
    }

    #[test]
    fn test_unknown_mnemonic_is_rejected() {
        let err = parse_program("X 1\n").unwrap_err();
        assert!(matches!(
            err,
            ProgramLoadError::UnknownMnemonic { line: 1, .. }
        ));
    }

    #[test]
    fn test_missing_argument_is_rejected() {
        let err = parse_program("S\n").unwrap_err();
        assert!(matches!(
            err,
            ProgramLoadError::MissingArgument { line: 1, .. }
        ));
    }

    #[test]
    fn test_invalid_argument_is_rejected() {
        let err = parse_program("A ten\n").unwrap_err();
        assert!(matches!(
            err,
            ProgramLoadError::InvalidArgument { line: 1, .. }
        ));
    }

    #[test]
    fn test_unexpected_argument_is_rejected() {
        let err = parse_program("P 3\n").unwrap_err();
        assert!(matches!(
            err,
            ProgramLoadError::UnexpectedArgument { line: 1, .. }
        ));

        let err = parse_program("S 1 2\n").unwrap_err();
        assert!(matches!(
            err,
            ProgramLoadError::UnexpectedArgument { line: 1, .. }
        ));
    }

    #[test]
    fn test_empty_listing_is_rejected() {
        assert!(matches!(
            parse_program("# nothing here\n").unwrap_err(),
            ProgramLoadError::EmptyProgram
        ));
    }

    #[test]
    fn test_oversized_listing_is_rejected() {
        let listing = "A 1\n".repeat(MAX_INSTRUCTIONS + 1);
        assert!(matches!(
            parse_program(&listing).unwrap_err(),
            ProgramLoadError::TooLong { .. }
        ));
    }
}
