pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::SchedCore;
pub use event::SchedEvent;
pub use state::{
    Process, ProcessId, ProcessState, QueueId, ReadyAt, RunQueue, SimCtx, Slice, Ticks,
};
