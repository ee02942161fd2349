use std::collections::HashMap;

use log::{debug, warn};

use super::cpu::{Cpu, ExecutionOutcome};
use super::error::KernelError;
use super::process_control_block::{Instruction, Pid, ProcessControlBlock, ProcessState};
use super::queue::BoundedQueue;
use super::MAX_PROCESSES;

/// What a single `tick` did, for operator narration and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TickOutcome {
    /// Process moved from the ready queue into the running slot this tick.
    pub dispatched: Option<Pid>,
    pub event: TickEvent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TickEvent {
    /// Nothing to run; no counters advanced.
    Idle,
    /// One instruction retired.
    Ran {
        pid: Pid,
        instruction: Instruction,
        /// Accumulator value emitted by a print instruction.
        output: Option<i32>,
        preempted: bool,
    },
    /// The process finished its program and was discarded.
    Completed { pid: Pid },
}

/// Read-only view of the system for the report command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SystemSnapshot {
    pub system_time: u32,
    pub running: Option<Pid>,
    pub ready: Vec<Pid>,
    pub blocked: Vec<Pid>,
}

/// Cooperative round-robin scheduler.
///
/// Sole owner of every process control block from creation to completion:
/// the queues and the running slot hold ids into `processes`, so each
/// process occupies exactly one place at a time.
pub(crate) struct Scheduler {
    processes: HashMap<Pid, ProcessControlBlock>,
    ready_queue: BoundedQueue<Pid, MAX_PROCESSES>,
    blocked_queue: BoundedQueue<Pid, MAX_PROCESSES>,
    running: Option<Pid>,
    process_counter: Pid,
    system_time: u32,
    quantum: u32,
}

impl Scheduler {
    pub fn new(quantum: u32) -> Scheduler {
        assert!(quantum > 0, "quantum must be at least one tick");

        Scheduler {
            processes: HashMap::new(),
            ready_queue: BoundedQueue::new(),
            blocked_queue: BoundedQueue::new(),
            running: None,
            process_counter: 0,
            system_time: 0,
            quantum,
        }
    }

    /// Admits a new process into the ready queue.
    ///
    /// The id is consumed even when admission fails; ids are never reused.
    pub fn create_process(
        &mut self,
        parent_id: Pid,
        program: Vec<Instruction>,
    ) -> Result<Pid, KernelError> {
        self.process_counter += 1;
        let pid = self.process_counter;

        self.ready_queue
            .enqueue(pid)
            .map_err(|pid| KernelError::ReadyQueueFull { pid })?;

        let pcb = ProcessControlBlock::new(pid, parent_id, self.system_time, program);
        debug!(
            "process {} created by parent {} at time {} ({} instructions), ready queue holds {}",
            pcb.get_id(),
            pcb.get_parent_id(),
            pcb.get_start_time(),
            pcb.program_len(),
            self.ready_queue.len()
        );
        self.processes.insert(pid, pcb);

        Ok(pid)
    }

    /// Advances the simulation by at most one instruction and one time unit.
    pub fn tick(&mut self) -> TickOutcome {
        let mut dispatched = None;

        let pid = match self.running {
            Some(pid) => pid,
            None => match self.ready_queue.dequeue() {
                Some(pid) => {
                    self.pcb_mut(pid).state = ProcessState::Running;
                    self.running = Some(pid);
                    dispatched = Some(pid);
                    debug!("process {pid} dispatched at time {}", self.system_time);
                    pid
                }
                None => {
                    return TickOutcome {
                        dispatched: None,
                        event: TickEvent::Idle,
                    };
                }
            },
        };

        match Cpu::execute(self.pcb_mut(pid)) {
            ExecutionOutcome::Completed => {
                // Completion is not charged against the slice or the clock.
                if let Some(pcb) = self.processes.remove(&pid) {
                    debug!(
                        "process {pid} completed, started at time {}, used {} ticks",
                        pcb.get_start_time(),
                        pcb.time_used
                    );
                }
                self.running = None;

                TickOutcome {
                    dispatched,
                    event: TickEvent::Completed { pid },
                }
            }
            ExecutionOutcome::Continued {
                instruction,
                output,
            } => {
                let time_used = {
                    let pcb = self.pcb_mut(pid);
                    pcb.time_used += 1;
                    pcb.time_used
                };
                self.system_time += 1;

                let mut preempted = false;
                if time_used % self.quantum == 0 {
                    match self.ready_queue.enqueue(pid) {
                        Ok(()) => {
                            self.pcb_mut(pid).state = ProcessState::Ready;
                            self.running = None;
                            preempted = true;
                            debug!("time slice expired for process {pid}");
                        }
                        Err(_) => {
                            // Preemption falls to the next quantum boundary.
                            warn!("ready queue full, process {pid} holds the cpu past its slice");
                        }
                    }
                }

                TickOutcome {
                    dispatched,
                    event: TickEvent::Ran {
                        pid,
                        instruction,
                        output,
                        preempted,
                    },
                }
            }
        }
    }

    /// Moves the running process to the blocked queue.
    pub fn block_running(&mut self) -> Result<Pid, KernelError> {
        let pid = self.running.ok_or(KernelError::NoRunningProcess)?;

        self.blocked_queue
            .enqueue(pid)
            .map_err(|pid| KernelError::BlockedQueueFull { pid })?;
        self.pcb_mut(pid).state = ProcessState::Blocked;
        self.running = None;

        debug!("process {pid} blocked");
        Ok(pid)
    }

    /// Moves the head of the blocked queue back to the ready queue.
    pub fn unblock_one(&mut self) -> Result<Pid, KernelError> {
        if self.blocked_queue.is_empty() {
            return Err(KernelError::BlockedQueueEmpty);
        }

        // The capacity check comes first so a refused unblock moves nothing.
        if self.ready_queue.is_full() {
            let pid = self.blocked_queue.peek().copied().unwrap_or_default();
            return Err(KernelError::ReadyQueueFull { pid });
        }

        let pid = match self.blocked_queue.dequeue() {
            Some(pid) => pid,
            None => return Err(KernelError::BlockedQueueEmpty),
        };
        self.ready_queue
            .enqueue(pid)
            .unwrap_or_else(|pid| panic!("ready queue rejected process {pid} after capacity check"));
        self.pcb_mut(pid).state = ProcessState::Ready;

        debug!("process {pid} unblocked");
        Ok(pid)
    }

    /// Read-only state dump for the report command.
    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot {
            system_time: self.system_time,
            running: self.running,
            ready: self.ready_queue.iter().copied().collect(),
            blocked: self.blocked_queue.iter().copied().collect(),
        }
    }

    fn pcb_mut(&mut self, pid: Pid) -> &mut ProcessControlBlock {
        match self.processes.get_mut(&pid) {
            Some(pcb) => pcb,
            None => panic!("no process control block for id {pid}"),
        }
    }
}
