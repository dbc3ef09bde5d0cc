pub mod driver;
pub mod report;
pub mod workload;

pub use driver::{Schedule, Sim, simulate, simulate_all};
pub use report::{ProcessMetrics, Report, WaitingTime, cpu_utilization};
pub use workload::{GeneratorConfig, InputError, ProcessSpec, Workload};
