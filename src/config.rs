use std::time::Duration;

/// Elements loaded into every container before a trial.
pub const DEFAULT_POPULATE_SIZE: usize = 100_000;
/// Budget after which a trial is cancelled.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);
/// Instances kept live at once by the memory profiler.
pub const DEFAULT_MEMORY_BATCH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
   pub populate_size: usize,
   pub timeout: Duration,
   pub memory_batch_size: usize,
}

impl BenchConfig {
   pub fn new(populate_size: usize, timeout: Duration) -> Self {
      Self { populate_size, timeout, ..Self::default() }
   }

   pub fn with_memory_batch_size(mut self, memory_batch_size: usize) -> Self {
      self.memory_batch_size = memory_batch_size;
      self
   }
}

impl Default for BenchConfig {
   fn default() -> Self {
      Self {
         populate_size: DEFAULT_POPULATE_SIZE,
         timeout: DEFAULT_TIMEOUT,
         memory_batch_size: DEFAULT_MEMORY_BATCH,
      }
   }
}
