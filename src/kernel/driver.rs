use std::io::Write;

use crate::io::console::{self, Command};

use super::process_control_block::Instruction;
use super::scheduler::{Scheduler, TickEvent};

/// Holds the simulated system and narrates every operator command.
pub struct Driver {
    scheduler: Scheduler,
    program: Vec<Instruction>,
}

impl Driver {
    /// `program` is the instruction listing every created process runs.
    pub fn new(quantum: u32, program: Vec<Instruction>) -> Driver {
        Driver {
            scheduler: Scheduler::new(quantum),
            program,
        }
    }

    /// Runs the interactive session until terminate or end of input.
    pub fn run(&mut self) {
        console::print_menu();
        let commands = console::spawn_command_reader();

        loop {
            print!("$ ");
            let _ = std::io::stdout().flush();

            let line = match commands.recv() {
                Ok(line) => line,
                Err(_) => break, // operator input closed
            };

            match Command::parse(&line) {
                Some(command) => {
                    if !self.dispatch(command) {
                        break;
                    }
                }
                None => println!("Invalid command. Try again."),
            }
        }
    }

    /// Applies one operator command. Returns `false` when the session ends.
    pub fn dispatch(&mut self, command: Command) -> bool {
        match command {
            Command::Create => self.create(),
            Command::Tick => self.tick(),
            Command::Unblock => self.unblock(),
            Command::Block => self.block(),
            Command::Report => self.report(),
            Command::Terminate => {
                println!("Terminating simulation.");
                return false;
            }
        }

        true
    }

    fn create(&mut self) {
        // The running process adopts the new one; operator creations are
        // children of the root sentinel.
        let parent_id = self.scheduler.snapshot().running.unwrap_or(0);

        match self.scheduler.create_process(parent_id, self.program.clone()) {
            Ok(pid) => println!("Process {pid} created by parent {parent_id}."),
            Err(err) => println!("error: {err}"),
        }
    }

    fn tick(&mut self) {
        let outcome = self.scheduler.tick();

        if let Some(pid) = outcome.dispatched {
            println!("Process {pid} is now running.");
        }

        match outcome.event {
            TickEvent::Idle => println!("No process in the ready queue."),
            TickEvent::Ran {
                pid,
                instruction,
                output,
                preempted,
            } => {
                println!("Process {pid} executing: {instruction}");
                if let Some(value) = output {
                    println!("Process {pid} accumulator: {value}");
                }
                if preempted {
                    println!("Time slice expired for process {pid}.");
                }
            }
            TickEvent::Completed { pid } => {
                println!("Process {pid} has completed execution.");
            }
        }
    }

    fn unblock(&mut self) {
        match self.scheduler.unblock_one() {
            Ok(pid) => println!("Process {pid} unblocked and moved to the ready queue."),
            Err(err) => println!("error: {err}"),
        }
    }

    fn block(&mut self) {
        match self.scheduler.block_running() {
            Ok(pid) => println!("Process {pid} blocked."),
            Err(err) => println!("error: {err}"),
        }
    }

    fn report(&self) {
        let snapshot = self.scheduler.snapshot();

        println!();
        println!("System State at Time {}:", snapshot.system_time);
        match snapshot.running {
            Some(pid) => println!("Running Process: Process {pid}"),
            None => println!("Running Process: None"),
        }
        println!("Ready Queue: {}", format_pids(&snapshot.ready));
        println!("Blocked Queue: {}", format_pids(&snapshot.blocked));
    }
}

fn format_pids(pids: &[super::process_control_block::Pid]) -> String {
    pids.iter()
        .map(|pid| format!("P{pid}"))
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_driver() -> Driver {
        Driver::new(
            3,
            vec![
                Instruction::Set(100),
                Instruction::Add(10),
                Instruction::Subtract(5),
                Instruction::Print,
                Instruction::End,
            ],
        )
    }

    #[test]
    fn test_terminate_ends_the_session() {
        let mut driver = demo_driver();

        assert!(driver.dispatch(Command::Report));
        assert!(!driver.dispatch(Command::Terminate));
    }

    #[test]
    fn test_session_walks_a_process_through_all_states() {
        let mut driver = demo_driver();

        driver.dispatch(Command::Create);
        driver.dispatch(Command::Tick);
        assert_eq!(driver.scheduler.snapshot().running, Some(1));

        driver.dispatch(Command::Block);
        let snapshot = driver.scheduler.snapshot();
        assert_eq!(snapshot.running, None);
        assert_eq!(snapshot.blocked, vec![1]);

        driver.dispatch(Command::Unblock);
        assert_eq!(driver.scheduler.snapshot().ready, vec![1]);
    }

    #[test]
    fn test_create_while_running_sets_parent_to_runner() {
        let mut driver = demo_driver();

        driver.dispatch(Command::Create);
        driver.dispatch(Command::Tick);
        driver.dispatch(Command::Create);

        let snapshot = driver.scheduler.snapshot();
        assert_eq!(snapshot.running, Some(1));
        assert_eq!(snapshot.ready, vec![2]);
    }

    #[test]
    fn test_commands_on_empty_system_do_not_advance_time() {
        let mut driver = demo_driver();

        driver.dispatch(Command::Tick);
        driver.dispatch(Command::Unblock);
        driver.dispatch(Command::Block);

        assert_eq!(driver.scheduler.snapshot().system_time, 0);
    }
}
