use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

// Index into Process Vec
pub type ProcessId = usize;
pub type Ticks = u64;
new_key_type! {
    pub struct QueueId;
}

/// Priority key for time-ordered run queues: earliest `time` first, ties
/// broken by lower `pid`.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct ReadyAt {
    pub time: Ticks,
    pub pid: ProcessId,
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop ReadyAt's Ord
impl PartialOrd for ReadyAt {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReadyAt {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.pid.cmp(&self.pid))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Ready,
    Running,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Process {
    pub id: ProcessId,
    pub arrival_time: Ticks,
    pub cpu_burst: Ticks,
    pub state: ProcessState,
    pub remaining_time: Ticks,
    /// Clock value at the most recent dispatch. Overwritten on every dispatch.
    pub start_time: Option<Ticks>,
    pub first_start_time: Option<Ticks>,
    pub completion_time: Option<Ticks>,
    pub dispatches: u32,
}

impl Process {
    pub fn new(id: ProcessId, arrival_time: Ticks, cpu_burst: Ticks) -> Self {
        Self {
            id,
            arrival_time,
            cpu_burst,
            state: ProcessState::Ready,
            remaining_time: cpu_burst,
            start_time: None,
            first_start_time: None,
            completion_time: None,
            dispatches: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state == ProcessState::Completed
    }
}

/// One contiguous stretch of CPU time given to a single process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub pid: ProcessId,
    pub start: Ticks,
    pub end: Ticks,
}

impl Slice {
    pub fn len(&self) -> Ticks {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug)]
pub enum RunQueue {
    Fifo {
        procs: VecDeque<ProcessId>,
    },
    Priq {
        procs: KeyedPriorityQueue<ProcessId, ReadyAt>,
    },
}

impl RunQueue {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            procs: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            procs: KeyedPriorityQueue::new(),
        }
    }

    pub fn contains(&self, pid: ProcessId) -> bool {
        match self {
            Self::Fifo { procs } => procs.contains(&pid),
            Self::Priq { procs } => procs.get_priority(&pid).is_some(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { procs } => procs.len(),
            Self::Priq { procs } => procs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-run simulation state: the clock, the trace and the process arena.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub processes: Vec<Process>,
    pub trace: Vec<Slice>,
    pub queues: SlotMap<QueueId, RunQueue>,
    pub proc_to_queue: FxHashMap<ProcessId, QueueId>,
    pub running: Option<ProcessId>,
}

impl SimCtx {
    pub fn new(processes: Vec<Process>) -> Self {
        debug_assert!(
            processes.iter().enumerate().all(|(idx, p)| p.id == idx),
            "ProcessId must match Vec index"
        );

        Self {
            now: 0,
            processes,
            trace: Vec::new(),
            queues: SlotMap::with_key(),
            proc_to_queue: FxHashMap::default(),
            running: None,
        }
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self
            .now
            .checked_add(delta)
            .expect("Simulated clock overflowed");
    }

    // Returns the idle gap skipped, if any
    pub fn fast_forward_to(&mut self, time: Ticks) -> Option<Ticks> {
        if self.now < time {
            let gap = time - self.now;
            self.now = time;
            Some(gap)
        } else {
            None
        }
    }

    pub fn create_queue_fifo(&mut self) -> QueueId {
        self.queues.insert(RunQueue::new_fifo())
    }

    pub fn create_queue_priq(&mut self) -> QueueId {
        self.queues.insert(RunQueue::new_priq())
    }

    fn queue_push(&mut self, queue_id: QueueId, pid: ProcessId, ready_at: Option<Ticks>) {
        assert!(
            !self.proc_to_queue.contains_key(&pid),
            "Process {pid} already present in some run queue"
        );
        debug_assert_eq!(
            self.process(pid).state,
            ProcessState::Ready,
            "Process {pid} must be Ready when enqueued"
        );

        let queue = self.queues.get_mut(queue_id).expect("Unknown run queue");
        match queue {
            RunQueue::Fifo { procs } => procs.push_back(pid),
            RunQueue::Priq { procs } => {
                let time = ready_at.expect("Attempted to push to a priority queue with no time");
                procs.push(pid, ReadyAt { time, pid });
            }
        };

        self.proc_to_queue.insert(pid, queue_id);
    }

    pub fn queue_push_back(&mut self, queue_id: QueueId, pid: ProcessId) {
        self.queue_push(queue_id, pid, None);
    }

    pub fn queue_push_priq(&mut self, queue_id: QueueId, pid: ProcessId, ready_at: Ticks) {
        self.queue_push(queue_id, pid, Some(ready_at));
    }

    /// Pops the next process together with the earliest time it may run.
    /// FIFO queues report the process's arrival time; priority queues report
    /// the key it was inserted with.
    pub fn queue_pop(&mut self, queue_id: QueueId) -> Option<(ProcessId, Ticks)> {
        let queue = self.queues.get_mut(queue_id)?;
        let popped = match queue {
            RunQueue::Fifo { procs } => procs.pop_front().map(|pid| (pid, None)),
            RunQueue::Priq { procs } => procs.pop().map(|(pid, key)| (pid, Some(key.time))),
        };
        let (pid, ready_at) = popped?;

        let removed = self.proc_to_queue.remove(&pid);
        debug_assert!(removed.is_some(), "Process {pid} missing queue membership");

        let ready_at = ready_at.unwrap_or(self.process(pid).arrival_time);
        Some((pid, ready_at))
    }

    pub fn proc_in_any_queue(&self, pid: ProcessId) -> bool {
        self.proc_to_queue.contains_key(&pid)
    }

    pub fn process(&self, pid: ProcessId) -> &Process {
        &self.processes[pid]
    }

    pub fn process_mut(&mut self, pid: ProcessId) -> &mut Process {
        &mut self.processes[pid]
    }

    pub fn all_completed(&self) -> bool {
        self.processes.iter().all(Process::is_completed)
    }

    pub fn set_running(&mut self, pid: ProcessId) {
        debug_assert!(
            !self.proc_to_queue.contains_key(&pid),
            "Running process {pid} must not be enqueued"
        );
        debug_assert!(
            self.running.is_none(),
            "CPU already running process {:?}",
            self.running
        );

        let now = self.now;
        self.running = Some(pid);
        let process = self.process_mut(pid);
        process.state = ProcessState::Running;
        process.start_time = Some(now);
        process.first_start_time.get_or_insert(now);
        process.dispatches += 1;
    }

    /// Runs the current process for `ticks`, appending the slice to the trace.
    pub fn run_for(&mut self, pid: ProcessId, ticks: Ticks) {
        debug_assert_eq!(self.running, Some(pid), "Process {pid} is not on the CPU");
        debug_assert!(
            ticks <= self.process(pid).remaining_time,
            "Process {pid} would overrun its burst"
        );

        let start = self.now;
        self.advance_time(ticks);
        self.process_mut(pid).remaining_time -= ticks;
        self.trace.push(Slice {
            pid,
            start,
            end: self.now,
        });
    }

    pub fn mark_ready(&mut self, pid: ProcessId) {
        let process = self.process_mut(pid);
        debug_assert!(
            process.state != ProcessState::Completed,
            "Completed process {} cannot be ready",
            process.id
        );
        process.state = ProcessState::Ready;
        if self.running == Some(pid) {
            self.running = None;
        }
    }

    pub fn mark_completed(&mut self, pid: ProcessId) {
        debug_assert!(
            !self.proc_to_queue.contains_key(&pid),
            "Completing process {pid} that is still enqueued"
        );

        let now = self.now;
        let process = &mut self.processes[pid];
        debug_assert!(
            process.state == ProcessState::Running,
            "Process {pid} must have been running before marked complete"
        );
        debug_assert_eq!(process.remaining_time, 0);

        process.state = ProcessState::Completed;
        process.completion_time = Some(now);
        self.running = None;
    }
}
