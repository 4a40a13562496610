pub mod abort;
pub mod collections;
pub mod config;
pub mod context;
pub mod descriptor;
mod error;
pub mod factory;
pub mod harness;
pub mod memory;
pub mod reclaim;
pub mod results;
pub mod trial;

pub use abort::AbortSignal;
pub use collections::{
   ArrayDeque, ArrayList, DoublyLinkedList, HashedSet, OrderedHashSet, PriorityHeap, TreeSet,
};
pub use config::BenchConfig;
pub use context::DefaultContext;
pub use descriptor::{Capabilities, ContainerDescriptor};
pub use error::{InstantiationError, OperationError};
pub use factory::ContainerFactory;
pub use harness::BenchmarkHarness;
pub use memory::{MemoryProfiler, MemoryResult, Method, TrackingAllocator};
pub use results::ResultStore;
pub use trial::{Elapsed, TimedTrialRunner, TrialResult, TrialSpec};

/// Common interface for all benchmarked containers.
///
/// Elements are owned `String`s. Every fallible operation fails only once
/// the attached abort signal has tripped.
pub trait Collection: Send + 'static {
   fn len(&self) -> usize;

   fn is_empty(&self) -> bool {
      self.len() == 0
   }

   /// Returns `false` when a set already held `value`.
   fn add(&mut self, value: String) -> Result<bool, OperationError>;

   fn add_all(&mut self, values: &[String]) -> Result<bool, OperationError>;

   /// Removes the first occurrence of `value`.
   fn remove(&mut self, value: &str) -> Result<bool, OperationError>;

   fn contains(&self, value: &str) -> Result<bool, OperationError>;

   fn contains_all(&self, values: &[String]) -> Result<bool, OperationError> {
      for value in values {
         if !self.contains(value)? {
            return Ok(false);
         }
      }
      Ok(true)
   }

   /// Removes every element that is also in `values`.
   fn remove_all(&mut self, values: &[String]) -> Result<bool, OperationError>;

   /// Keeps only the elements that are also in `values`.
   fn retain_all(&mut self, values: &[String]) -> Result<bool, OperationError>;

   fn iter(&self) -> Box<dyn Iterator<Item = &str> + '_>;

   /// Snapshot of the elements in iteration order.
   fn to_array(&self) -> Result<Vec<&str>, OperationError>;

   fn clear(&mut self);

   /// Positional read, `None` for containers that are not index-addressable.
   fn get(&self, _index: usize) -> Option<&str> {
      None
   }

   fn index_of(&self, _value: &str) -> Result<Option<usize>, OperationError> {
      Ok(None)
   }

   /// Binds the container to a trial's abort signal.
   fn attach(&mut self, signal: AbortSignal);

   /// Computed heap footprint: header, per-element overhead, owned bytes.
   fn structural_size(&self) -> usize;
}
