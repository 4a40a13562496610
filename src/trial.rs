// Timed trials: reset, warm up, run an operation in a loop under a timeout,
// then swap the working instance for a fresh one.
//
// Cancellation is cooperative. The timer thread trips the trial's abort
// signal; the container fails every later call and bails out of long scans
// at its next poll, and the loop stops at the next iteration boundary. A
// single in-flight call is never preempted.

use crate::{
   AbortSignal, Collection, ContainerDescriptor, ContainerFactory, DefaultContext, OperationError,
};
use crossbeam::channel::{bounded, RecvTimeoutError, Sender};
use std::hint::black_box;
use std::mem;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// One step of a trial, given the working instance and the loop index.
pub type Operation<'a> =
   Box<dyn FnMut(&mut dyn Collection, usize) -> Result<(), OperationError> + 'a>;

/// What to run, how many times, and under which name to record it.
pub struct TrialSpec<'a> {
   name: String,
   loop_count: usize,
   operation: Operation<'a>,
}

impl<'a> TrialSpec<'a> {
   pub fn new<F>(name: impl Into<String>, loop_count: usize, operation: F) -> Self
   where
      F: FnMut(&mut dyn Collection, usize) -> Result<(), OperationError> + 'a,
   {
      Self { name: name.into(), loop_count, operation: Box::new(operation) }
   }

   pub fn name(&self) -> &str {
      &self.name
   }

   pub fn loop_count(&self) -> usize {
      self.loop_count
   }
}

/// Wall-clock cost of a trial, or the timeout sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elapsed {
   Measured(Duration),
   /// Holds the configured budget, not the time actually spent.
   Timeout(Duration),
}

impl Elapsed {
   pub fn duration(&self) -> Duration {
      match *self {
         Elapsed::Measured(duration) | Elapsed::Timeout(duration) => duration,
      }
   }

   pub fn as_nanos(&self) -> u64 {
      u64::try_from(self.duration().as_nanos()).unwrap_or(u64::MAX)
   }

   pub fn is_timeout(&self) -> bool {
      matches!(self, Elapsed::Timeout(_))
   }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialResult {
   pub task: String,
   pub descriptor: ContainerDescriptor,
   pub elapsed: Elapsed,
   pub completed_loops: usize,
}

/*──────────────────────────────────────────────────────────────────────────*/
/*  cancellation timer                                                      */
/*──────────────────────────────────────────────────────────────────────────*/

struct CancellationTimer {
   disarm: Sender<()>,
   worker: JoinHandle<()>,
}

impl CancellationTimer {
   fn arm(timeout: Duration, signal: AbortSignal) -> Self {
      let (disarm, armed) = bounded::<()>(1);
      let worker = thread::spawn(move || {
         // a message or a dropped sender both mean the trial finished first
         if let Err(RecvTimeoutError::Timeout) = armed.recv_timeout(timeout) {
            signal.trip();
         }
      });
      Self { disarm, worker }
   }

   fn disarm(self) {
      let Self { disarm, worker } = self;
      drop(disarm);
      let _ = worker.join();
   }
}

/*──────────────────────────────────────────────────────────────────────────*/
/*  runner                                                                  */
/*──────────────────────────────────────────────────────────────────────────*/

/// Forces lazily built internals into existence before the clock starts.
///
/// Removes the first element, looks index 0 back up when the container is
/// index-addressable, builds an iterator and takes a snapshot. An empty
/// container just skips the removal.
pub fn warm_up(instance: &mut dyn Collection) -> Result<(), OperationError> {
   let head = instance.iter().next().map(str::to_owned);
   if let Some(head) = head {
      instance.remove(&head)?;
   }
   if let Some(first) = instance.get(0) {
      black_box(instance.index_of(first)?);
   }
   black_box(instance.iter().next());
   black_box(instance.to_array()?.len());
   Ok(())
}

pub struct TimedTrialRunner<'h> {
   factory: &'h ContainerFactory,
   context: &'h DefaultContext,
   timeout: Duration,
}

impl<'h> TimedTrialRunner<'h> {
   pub fn new(
      factory: &'h ContainerFactory,
      context: &'h DefaultContext,
      timeout: Duration,
   ) -> Self {
      Self { factory, context, timeout }
   }

   pub fn timeout(&self) -> Duration {
      self.timeout
   }

   /// Runs one trial on `instance`, which is replaced by a fresh instance of
   /// `descriptor` before returning.
   pub fn run_trial(
      &self,
      descriptor: &ContainerDescriptor,
      instance: &mut Box<dyn Collection>,
      spec: &mut TrialSpec<'_>,
   ) -> TrialResult {
      let signal = AbortSignal::new();
      instance.attach(signal.clone());

      // signal is fresh, so neither step can be aborted
      if let Err(err) = self.context.populate(instance.as_mut()) {
         debug!(container = %descriptor, %err, "reset failed");
      }
      if let Err(err) = warm_up(instance.as_mut()) {
         debug!(container = %descriptor, %err, "warmup failed");
      }

      let (elapsed, completed_loops) = if spec.loop_count == 0 {
         (Elapsed::Measured(Duration::ZERO), 0)
      } else {
         self.timed_loop(instance.as_mut(), spec, &signal)
      };

      self.replace(descriptor, instance);

      match elapsed {
         Elapsed::Measured(duration) => {
            info!(task = %spec.name, container = %descriptor, "{} ns", duration.as_nanos());
         }
         Elapsed::Timeout(budget) => {
            info!(
               task = %spec.name,
               container = %descriptor,
               "timeout (>{} ns) after {} loop(s)",
               budget.as_nanos(),
               completed_loops
            );
         }
      }

      TrialResult {
         task: spec.name.clone(),
         descriptor: descriptor.clone(),
         elapsed,
         completed_loops,
      }
   }

   fn timed_loop(
      &self,
      instance: &mut dyn Collection,
      spec: &mut TrialSpec<'_>,
      signal: &AbortSignal,
   ) -> (Elapsed, usize) {
      let timer = CancellationTimer::arm(self.timeout, signal.clone());
      let start = Instant::now();
      let mut completed = 0;
      while completed < spec.loop_count && !signal.is_tripped() {
         // failures are expected fallout of an abort
         let _ = (spec.operation)(instance, completed);
         if signal.is_tripped() {
            break;
         }
         completed += 1;
      }
      let measured = start.elapsed();
      timer.disarm();

      if completed < spec.loop_count {
         (Elapsed::Timeout(self.timeout), completed)
      } else {
         (Elapsed::Measured(measured), completed)
      }
   }

   // the old instance may be half swept by an abort, so never reuse it
   fn replace(&self, descriptor: &ContainerDescriptor, instance: &mut Box<dyn Collection>) {
      match self.factory.create(descriptor) {
         Ok(fresh) => drop(mem::replace(instance, fresh)),
         Err(err) => {
            warn!(container = %descriptor, %err, "keeping the previous instance");
            instance.clear();
         }
      }
   }
}
