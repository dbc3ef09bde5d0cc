use crate::core::{ProcessId, Ticks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedEvent {
    // CPU sat idle until the next process became eligible
    CpuIdle {
        from: Ticks,
        until: Ticks,
    },
    Dispatched {
        pid: ProcessId,
        at: Ticks,
        slice: Ticks,
    },
    Preempted {
        pid: ProcessId,
        at: Ticks,
        remaining: Ticks,
    },
    Completed {
        pid: ProcessId,
        at: Ticks,
    },
}
