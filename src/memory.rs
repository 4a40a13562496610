// Per-instance memory footprint.
//
// With `TrackingAllocator` installed as the global allocator the footprint
// is an exact live-heap delta around a batch of populated instances. Without
// it the profiler falls back to each container's computed structural size,
// which is approximate for hashed and tree-shaped containers.

use crate::trial::warm_up;
use crate::{
   reclaim, Collection, ContainerDescriptor, ContainerFactory, DefaultContext, InstantiationError,
};
use serde::Serialize;
use std::alloc::{GlobalAlloc, Layout, System};
use std::hint::black_box;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/*──────────────────────────────────────────────────────────────────────────*/
/*  tracking allocator                                                      */
/*──────────────────────────────────────────────────────────────────────────*/

static LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);
static ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);

/// Counting wrapper around the system allocator.
///
/// Install it in the final binary (or test crate):
///
/// ```ignore
/// #[global_allocator]
/// static GLOBAL: collections_bench::TrackingAllocator = collections_bench::TrackingAllocator;
/// ```
///
/// The counters are process-wide, so concurrent allocations from other
/// threads show up in any delta taken meanwhile.
pub struct TrackingAllocator;

unsafe impl GlobalAlloc for TrackingAllocator {
   unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
      let ptr = System.alloc(layout);
      if !ptr.is_null() {
         LIVE_BYTES.fetch_add(layout.size(), Ordering::Relaxed);
         ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
      }
      ptr
   }

   unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
      let ptr = System.alloc_zeroed(layout);
      if !ptr.is_null() {
         LIVE_BYTES.fetch_add(layout.size(), Ordering::Relaxed);
         ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
      }
      ptr
   }

   unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
      LIVE_BYTES.fetch_sub(layout.size(), Ordering::Relaxed);
      System.dealloc(ptr, layout);
   }

   unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
      let new_ptr = System.realloc(ptr, layout, new_size);
      if !new_ptr.is_null() {
         LIVE_BYTES.fetch_add(new_size, Ordering::Relaxed);
         LIVE_BYTES.fetch_sub(layout.size(), Ordering::Relaxed);
         ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
      }
      new_ptr
   }
}

impl TrackingAllocator {
   /// Bytes currently allocated through the tracking allocator.
   pub fn live_bytes() -> usize {
      LIVE_BYTES.load(Ordering::Relaxed)
   }

   /// Allocations (and reallocations) served so far.
   pub fn allocations() -> usize {
      ALLOCATIONS.load(Ordering::Relaxed)
   }

   /// True when this allocator is the process's global allocator.
   pub fn is_installed() -> bool {
      let before = Self::allocations();
      let probe = black_box(Box::new(0u64));
      let after = Self::allocations();
      drop(probe);
      after != before
   }
}

/*──────────────────────────────────────────────────────────────────────────*/
/*  profiler                                                                */
/*──────────────────────────────────────────────────────────────────────────*/

/// How a footprint was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Method {
   /// Live-heap delta from `TrackingAllocator`.
   HeapDelta,
   /// Sum of `Collection::structural_size`, approximate.
   Structural,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryResult {
   pub descriptor: ContainerDescriptor,
   pub average_bytes: u64,
   pub method: Method,
}

pub struct MemoryProfiler<'h> {
   factory: &'h ContainerFactory,
   context: &'h DefaultContext,
}

impl<'h> MemoryProfiler<'h> {
   pub fn new(factory: &'h ContainerFactory, context: &'h DefaultContext) -> Self {
      Self { factory, context }
   }

   /// Average footprint of one populated, warmed-up instance, measured over
   /// `batch_size` instances alive at the same time. A zero batch counts as
   /// one.
   pub fn measure(
      &self,
      descriptor: &ContainerDescriptor,
      batch_size: usize,
   ) -> Result<MemoryResult, InstantiationError> {
      let batch_size = batch_size.max(1);
      let (total, method) = if TrackingAllocator::is_installed() {
         (self.heap_delta(descriptor, batch_size)?, Method::HeapDelta)
      } else {
         (self.structural(descriptor, batch_size)?, Method::Structural)
      };
      let average_bytes = (total / batch_size) as u64;
      info!(container = %descriptor, ?method, "object size: {} bytes", average_bytes);
      Ok(MemoryResult { descriptor: descriptor.clone(), average_bytes, method })
   }

   fn heap_delta(
      &self,
      descriptor: &ContainerDescriptor,
      batch_size: usize,
   ) -> Result<usize, InstantiationError> {
      reclaim::full_cycle();
      // reserved up front so the holder itself is outside the delta
      let mut live = Vec::with_capacity(batch_size);
      let before = TrackingAllocator::live_bytes();
      for _ in 0..batch_size {
         live.push(self.populated(descriptor)?);
      }
      let after = TrackingAllocator::live_bytes();
      drop(live);
      Ok(after.saturating_sub(before))
   }

   fn structural(
      &self,
      descriptor: &ContainerDescriptor,
      batch_size: usize,
   ) -> Result<usize, InstantiationError> {
      let mut live = Vec::with_capacity(batch_size);
      for _ in 0..batch_size {
         live.push(self.populated(descriptor)?);
      }
      Ok(live.iter().map(|instance| instance.structural_size()).sum())
   }

   fn populated(
      &self,
      descriptor: &ContainerDescriptor,
   ) -> Result<Box<dyn Collection>, InstantiationError> {
      let mut instance = self.factory.create(descriptor)?;
      // no abort signal is attached, so neither step can fail
      let _ = self.context.populate(instance.as_mut());
      let _ = warm_up(instance.as_mut());
      Ok(instance)
   }
}
