use super::process_control_block::Pid;

/// Recoverable failures of the scheduler operations.
///
/// None of these end the simulation; the command loop reports them to the
/// operator and keeps accepting commands.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub(crate) enum KernelError {
    #[error("ready queue is full, cannot admit process {pid}")]
    ReadyQueueFull { pid: Pid },

    #[error("blocked queue is full, cannot block process {pid}")]
    BlockedQueueFull { pid: Pid },

    #[error("no process in the blocked queue")]
    BlockedQueueEmpty,

    #[error("no running process to block")]
    NoRunningProcess,
}
