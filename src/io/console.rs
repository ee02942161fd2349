use std::io::BufRead;
use std::sync::mpsc::{self, Receiver};
use std::thread;

/// One operator command, a single character per line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// `C` — create a new process.
    Create,
    /// `Q` — simulate one time slice.
    Tick,
    /// `U` — unblock a process.
    Unblock,
    /// `B` — block the running process.
    Block,
    /// `P` — print the system state.
    Report,
    /// `T` — terminate the simulation.
    Terminate,
}

impl Command {
    /// `None` for input no command letter matches.
    pub fn parse(input: &str) -> Option<Command> {
        match input.trim() {
            "C" => Some(Command::Create),
            "Q" => Some(Command::Tick),
            "U" => Some(Command::Unblock),
            "B" => Some(Command::Block),
            "P" => Some(Command::Report),
            "T" => Some(Command::Terminate),
            _ => None,
        }
    }
}

pub fn print_menu() {
    println!("Operating System Process Management Simulation");
    println!("Commands:");
    println!("C: Create a new process");
    println!("Q: Simulate time slice");
    println!("U: Unblock a process");
    println!("B: Block the running process");
    println!("P: Print system state");
    println!("T: Terminate simulation");
}

/// Spawns the operator-side reader: one thread owning stdin, relaying one
/// command line at a time to the simulation loop. The rendezvous channel
/// keeps commands unbuffered, so each one is handed over only when the
/// receiver is ready for it. The channel closes at end of input.
pub fn spawn_command_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::sync_channel(0);

    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if sender.send(trimmed.to_string()).is_err() {
                break; // simulation loop is gone
            }
        }
    });

    receiver
}
