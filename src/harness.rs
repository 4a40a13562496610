// Drives the fixed task list for each implementation and the memory
// profiler across a list of implementations.

use crate::trial::TrialSpec;
use crate::{
   reclaim, BenchConfig, Collection, ContainerDescriptor, ContainerFactory, DefaultContext,
   InstantiationError, MemoryProfiler, ResultStore, TimedTrialRunner,
};
use std::hint::black_box;
use std::time::Instant;
use tracing::{error, info};

/// Length of the batch used by the bulk tasks.
const BATCH_LEN: usize = 1000;
/// Batch values cycle through `0..BATCH_CYCLE`.
const BATCH_CYCLE: usize = 30;
/// Values added by the insert task cycle through `0..ADD_CYCLE`.
const ADD_CYCLE: usize = 29;

/// The batch handed to `add_all`, `remove_all`, `contains_all` and
/// `retain_all`.
pub fn bulk_batch() -> Vec<String> {
   (0..BATCH_LEN).map(|i| (i % BATCH_CYCLE).to_string()).collect()
}

/// The ten timed tasks, in the order they must run.
///
/// Each task mutates the working instance; the runner's reset step makes
/// the next one independent of how the previous one ended.
pub fn standard_tasks(populate_size: usize, batch: &[String]) -> Vec<TrialSpec<'_>> {
   let removals = (populate_size / 10).max(1);
   let bulk_adds = populate_size.min(1000);
   let lookups = populate_size.min(1000);
   let bulk_removals = populate_size.min(10);
   let bulk_lookups = populate_size.min(5000);
   let snapshots = populate_size.min(5000);
   let retains = populate_size.min(10);

   vec![
      TrialSpec::new(format!("add {populate_size} elements"), populate_size, |c, i| {
         c.add((i % ADD_CYCLE).to_string()).map(drop)
      }),
      TrialSpec::new(format!("remove {removals} elements by value"), removals, |c, i| {
         c.remove(&i.to_string()).map(drop)
      }),
      TrialSpec::new(
         format!("add_all {bulk_adds} times {} elements", batch.len()),
         bulk_adds,
         move |c, _| c.add_all(batch).map(drop),
      ),
      TrialSpec::new(format!("contains {lookups} times"), lookups, |c, i| {
         // walks down from the tail; goes negative once i passes len
         let probe = c.len() as i64 - i as i64 - 1;
         c.contains(&probe.to_string()).map(drop)
      }),
      TrialSpec::new(
         format!("remove_all {bulk_removals} times {} elements", batch.len()),
         bulk_removals,
         move |c, _| c.remove_all(batch).map(drop),
      ),
      TrialSpec::new(format!("iterator {populate_size} times"), populate_size, |c, _| {
         black_box(c.iter().next());
         Ok(())
      }),
      TrialSpec::new(format!("contains_all {bulk_lookups} times"), bulk_lookups, move |c, _| {
         c.contains_all(batch).map(drop)
      }),
      TrialSpec::new(format!("to_array {snapshots} times"), snapshots, |c, _| {
         black_box(c.to_array()?.len());
         Ok(())
      }),
      TrialSpec::new("clear", 1, |c, _| {
         c.clear();
         Ok(())
      }),
      TrialSpec::new(format!("retain_all {retains} times"), retains, move |c, _| {
         c.retain_all(batch).map(drop)
      }),
   ]
}

pub struct BenchmarkHarness {
   config: BenchConfig,
   factory: ContainerFactory,
   context: DefaultContext,
   batch: Vec<String>,
   results: ResultStore,
}

impl BenchmarkHarness {
   pub fn new(config: BenchConfig) -> Self {
      Self::with_factory(config, ContainerFactory::standard())
   }

   pub fn with_factory(config: BenchConfig, factory: ContainerFactory) -> Self {
      let context = DefaultContext::new(config.populate_size);
      Self { config, factory, context, batch: bulk_batch(), results: ResultStore::new() }
   }

   pub fn config(&self) -> &BenchConfig {
      &self.config
   }

   pub fn context(&self) -> &DefaultContext {
      &self.context
   }

   pub fn results(&self) -> &ResultStore {
      &self.results
   }

   pub fn into_results(self) -> ResultStore {
      self.results
   }

   /// Runs the task list against one implementation.
   ///
   /// A construction failure is logged and returned; whatever was recorded
   /// before it stays in the store.
   pub fn run(&mut self, descriptor: &ContainerDescriptor) -> Result<(), InstantiationError> {
      let outcome = self.run_tasks(descriptor);
      if let Err(err) = &outcome {
         error!(container = %descriptor, %err, "failed running benchmark");
      }
      reclaim::full_cycle();
      outcome
   }

   /// Runs every implementation in turn; failures are logged and skipped.
   /// Returns how many implementations completed.
   pub fn run_all(&mut self, descriptors: &[ContainerDescriptor]) -> usize {
      descriptors
         .iter()
         .filter(|descriptor| self.run(descriptor).is_ok())
         .count()
   }

   fn run_tasks(&mut self, descriptor: &ContainerDescriptor) -> Result<(), InstantiationError> {
      let started = Instant::now();
      let mut instance: Box<dyn Collection> = self.factory.create(descriptor)?;
      info!(
         "Performances of {} populated with {} element(s)",
         descriptor, self.config.populate_size
      );

      if descriptor.capabilities().is_benchmarkable() {
         let runner = TimedTrialRunner::new(&self.factory, &self.context, self.config.timeout);
         for mut spec in standard_tasks(self.config.populate_size, &self.batch) {
            let result = runner.run_trial(descriptor, &mut instance, &mut spec);
            self.results.record_trial(result);
         }
      }

      instance.clear();
      drop(instance);
      info!(
         container = %descriptor,
         "Benchmark done in {:.3}s",
         started.elapsed().as_secs_f64()
      );
      Ok(())
   }

   /// Measures the average footprint of each implementation.
   /// Returns how many implementations were measured.
   pub fn run_memory(&mut self, descriptors: &[ContainerDescriptor]) -> usize {
      let profiler = MemoryProfiler::new(&self.factory, &self.context);
      let mut measured = 0;
      for descriptor in descriptors {
         match profiler.measure(descriptor, self.config.memory_batch_size) {
            Ok(result) => {
               self.results.record_memory(result);
               measured += 1;
            }
            Err(err) => error!(container = %descriptor, %err, "failed running memory benchmark"),
         }
      }
      measured
   }
}
