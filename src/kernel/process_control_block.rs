use std::fmt;

/// Simulated process identifier. Id 0 is reserved as the root-parent
/// sentinel and is never assigned to a process.
pub(crate) type Pid = u32;

/// Queue/slot state of a simulated process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ProcessState {
    Ready,
    Running,
    Blocked,
}

/// One instruction of the accumulator machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Instruction {
    /// `S n` — load `n` into the accumulator.
    Set(i32),
    /// `A n` — add `n` to the accumulator.
    Add(i32),
    /// `D n` — subtract `n` from the accumulator.
    Subtract(i32),
    /// `P` — emit the current accumulator value.
    Print,
    /// `E` — finish the process.
    End,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Set(arg) => write!(f, "S {arg}"),
            Instruction::Add(arg) => write!(f, "A {arg}"),
            Instruction::Subtract(arg) => write!(f, "D {arg}"),
            Instruction::Print => write!(f, "P"),
            Instruction::End => write!(f, "E"),
        }
    }
}

/// The process control block. Holds process identity, queue state and the
/// execution context of the accumulator machine.
pub(crate) struct ProcessControlBlock {
    pub program_counter: usize,
    pub accumulator: i32,
    pub state: ProcessState,
    /// Lifetime tick counter; never reset. The scheduler preempts whenever
    /// it reaches a multiple of the quantum.
    pub time_used: u32,

    id: Pid,
    parent_id: Pid,
    start_time: u32,
    program: Vec<Instruction>,
}

impl ProcessControlBlock {
    pub fn new(
        id: Pid,
        parent_id: Pid,
        start_time: u32,
        program: Vec<Instruction>,
    ) -> ProcessControlBlock {
        ProcessControlBlock {
            program_counter: 0,
            accumulator: 0,
            state: ProcessState::Ready,
            time_used: 0,
            id,
            parent_id,
            start_time,
            program,
        }
    }

    pub fn get_id(&self) -> Pid {
        self.id
    }

    pub fn get_parent_id(&self) -> Pid {
        self.parent_id
    }

    pub fn get_start_time(&self) -> u32 {
        self.start_time
    }

    /// The instruction under `index`, or `None` past the end of the program.
    pub fn instruction_at(&self, index: usize) -> Option<Instruction> {
        self.program.get(index).copied()
    }

    pub fn program_len(&self) -> usize {
        self.program.len()
    }
}
