// Cooperative cancellation for timed trials.
//
// The timer thread never touches a container. It trips an `AbortSignal`;
// the container sees the flag at its next operation, or inside a long scan
// at the next poll, and fails with `OperationError`.

use crate::OperationError;
use std::sync::{
   atomic::{AtomicBool, Ordering},
   Arc,
};

/// Scan steps between two loads of the abort flag.
const POLL_INTERVAL: usize = 1024;

/// Shared flag between the trial thread and its cancellation timer.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
   tripped: Arc<AtomicBool>,
}

impl AbortSignal {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn trip(&self) {
      self.tripped.store(true, Ordering::Release);
   }

   #[inline]
   pub fn is_tripped(&self) -> bool {
      self.tripped.load(Ordering::Acquire)
   }
}

/*──────────────────────────────────────────────────────────────────────────*/
/*  container side                                                          */
/*──────────────────────────────────────────────────────────────────────────*/

/// The abort signal as held by a container.
///
/// Detached by default, so instances built outside a trial (memory
/// profiling) carry no extra allocation and never fail.
#[derive(Debug, Default)]
pub struct Guard {
   signal: Option<AbortSignal>,
}

impl Guard {
   pub fn attach(&mut self, signal: AbortSignal) {
      self.signal = Some(signal);
   }

   /// Fails once the attached signal has tripped.
   #[inline]
   pub fn check(&self) -> Result<(), OperationError> {
      match &self.signal {
         Some(signal) if signal.is_tripped() => Err(OperationError),
         _ => Ok(()),
      }
   }

   pub fn gate(&self) -> Gate<'_> {
      Gate { signal: self.signal.as_ref(), steps: 0 }
   }
}

/// Throttled abort check for loops over container elements.
pub struct Gate<'a> {
   signal: Option<&'a AbortSignal>,
   steps: usize,
}

impl Gate<'_> {
   #[inline]
   pub fn pass(&mut self) -> Result<(), OperationError> {
      if let Some(signal) = self.signal {
         if self.steps % POLL_INTERVAL == 0 && signal.is_tripped() {
            return Err(OperationError);
         }
      }
      self.steps += 1;
      Ok(())
   }
}

/// Gate for `retain`-style sweeps.
///
/// Once the signal trips, `visit` answers `false` for every remaining
/// element, so the sweep drops whatever it has not examined yet.
pub struct Sweep<'a> {
   gate: Gate<'a>,
   aborted: bool,
}

impl<'a> Sweep<'a> {
   pub fn new(guard: &'a Guard) -> Self {
      Self { gate: guard.gate(), aborted: false }
   }

   #[inline]
   pub fn visit(&mut self) -> bool {
      if self.aborted {
         return false;
      }
      if self.gate.pass().is_err() {
         self.aborted = true;
         return false;
      }
      true
   }

   pub fn finish(self) -> Result<(), OperationError> {
      if self.aborted {
         Err(OperationError)
      } else {
         Ok(())
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn detached_guard_never_fails() {
      let guard = Guard::default();
      assert!(guard.check().is_ok());
      let mut gate = guard.gate();
      for _ in 0..5000 {
         assert!(gate.pass().is_ok());
      }
   }

   #[test]
   fn tripped_signal_fails_check_and_gate() {
      let signal = AbortSignal::new();
      let mut guard = Guard::default();
      guard.attach(signal.clone());
      assert!(guard.check().is_ok());

      signal.trip();
      assert_eq!(guard.check(), Err(OperationError));
      assert_eq!(guard.gate().pass(), Err(OperationError));
   }

   #[test]
   fn sweep_drops_everything_after_abort() {
      let signal = AbortSignal::new();
      let mut guard = Guard::default();
      guard.attach(signal.clone());

      let mut items: Vec<u32> = (0..10).collect();
      signal.trip();
      let mut sweep = Sweep::new(&guard);
      items.retain(|_| sweep.visit());
      assert!(items.is_empty());
      assert!(sweep.finish().is_err());
   }
}
