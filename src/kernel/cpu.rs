use log::debug;

use super::process_control_block::{Instruction, ProcessControlBlock};

/// Result of retiring one instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ExecutionOutcome {
    /// One instruction retired; the process still has work.
    Continued {
        instruction: Instruction,
        /// Accumulator value emitted when the instruction was a print.
        output: Option<i32>,
    },
    /// The program finished, through an `E` instruction or a program
    /// counter past the end of the instruction list.
    Completed,
}

/// The accumulator machine. Executes exactly one instruction per call
/// against the context stored in a process control block.
pub(crate) struct Cpu;

impl Cpu {
    pub fn execute(pcb: &mut ProcessControlBlock) -> ExecutionOutcome {
        let instruction = match pcb.instruction_at(pcb.program_counter) {
            Some(instruction) => instruction,
            // Counter past the end without an `E`: treated as completion so
            // the scheduler keeps making progress.
            None => return ExecutionOutcome::Completed,
        };

        debug!(
            "process {} executing {} (pc {})",
            pcb.get_id(),
            instruction,
            pcb.program_counter
        );

        let output = match instruction {
            Instruction::Set(arg) => {
                pcb.accumulator = arg;
                None
            }
            Instruction::Add(arg) => {
                pcb.accumulator += arg;
                None
            }
            Instruction::Subtract(arg) => {
                pcb.accumulator -= arg;
                None
            }
            Instruction::Print => Some(pcb.accumulator),
            Instruction::End => return ExecutionOutcome::Completed,
        };

        pcb.program_counter += 1;
        ExecutionOutcome::Continued {
            instruction,
            output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcb_with(program: Vec<Instruction>) -> ProcessControlBlock {
        ProcessControlBlock::new(1, 0, 0, program)
    }

    #[test]
    fn test_set_loads_accumulator() {
        let mut pcb = pcb_with(vec![Instruction::Set(100)]);

        let outcome = Cpu::execute(&mut pcb);

        assert_eq!(
            outcome,
            ExecutionOutcome::Continued {
                instruction: Instruction::Set(100),
                output: None,
            }
        );
        assert_eq!(pcb.accumulator, 100);
        assert_eq!(pcb.program_counter, 1);
    }

    #[test]
    fn test_add_and_subtract_adjust_accumulator() {
        let mut pcb = pcb_with(vec![Instruction::Add(10), Instruction::Subtract(3)]);

        Cpu::execute(&mut pcb);
        assert_eq!(pcb.accumulator, 10);

        Cpu::execute(&mut pcb);
        assert_eq!(pcb.accumulator, 7);
        assert_eq!(pcb.program_counter, 2);
    }

    #[test]
    fn test_print_emits_accumulator_without_mutating_it() {
        let mut pcb = pcb_with(vec![Instruction::Set(42), Instruction::Print]);
        Cpu::execute(&mut pcb);

        let outcome = Cpu::execute(&mut pcb);

        assert_eq!(
            outcome,
            ExecutionOutcome::Continued {
                instruction: Instruction::Print,
                output: Some(42),
            }
        );
        assert_eq!(pcb.accumulator, 42);
        assert_eq!(pcb.program_counter, 2);
    }

    #[test]
    fn test_end_completes_without_advancing_counter() {
        let mut pcb = pcb_with(vec![Instruction::End, Instruction::Set(1)]);

        let outcome = Cpu::execute(&mut pcb);

        assert_eq!(outcome, ExecutionOutcome::Completed);
        assert_eq!(pcb.program_counter, 0);
        assert_eq!(pcb.accumulator, 0);
    }

    #[test]
    fn test_exhausted_counter_completes_without_mutation() {
        let mut pcb = pcb_with(vec![Instruction::Set(5)]);
        Cpu::execute(&mut pcb);

        let outcome = Cpu::execute(&mut pcb);

        assert_eq!(outcome, ExecutionOutcome::Completed);
        assert_eq!(pcb.program_counter, 1);
        assert_eq!(pcb.accumulator, 5);
    }

    #[test]
    fn test_demo_program_runs_to_completion() {
        let mut pcb = pcb_with(vec![
            Instruction::Set(100),
            Instruction::Add(10),
            Instruction::Subtract(5),
            Instruction::Print,
            Instruction::End,
        ]);

        Cpu::execute(&mut pcb);
        Cpu::execute(&mut pcb);
        Cpu::execute(&mut pcb);
        assert_eq!(pcb.accumulator, 105);

        let outcome = Cpu::execute(&mut pcb);
        assert_eq!(
            outcome,
            ExecutionOutcome::Continued {
                instruction: Instruction::Print,
                output: Some(105),
            }
        );

        assert_eq!(Cpu::execute(&mut pcb), ExecutionOutcome::Completed);
    }
}
