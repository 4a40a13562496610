use crate::{ContainerDescriptor, Elapsed, MemoryResult, TrialResult};
use std::collections::BTreeMap;

/// Timing and memory results of one harness run.
///
/// A second result for the same key replaces the first.
#[derive(Debug, Default, Clone)]
pub struct ResultStore {
   timings: BTreeMap<String, BTreeMap<ContainerDescriptor, TrialResult>>,
   footprints: BTreeMap<ContainerDescriptor, MemoryResult>,
}

impl ResultStore {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn record_trial(&mut self, result: TrialResult) {
      self.timings
         .entry(result.task.clone())
         .or_default()
         .insert(result.descriptor.clone(), result);
   }

   pub fn record_memory(&mut self, result: MemoryResult) {
      self.footprints.insert(result.descriptor.clone(), result);
   }

   /// Task name → container → full trial result.
   pub fn trials(&self) -> &BTreeMap<String, BTreeMap<ContainerDescriptor, TrialResult>> {
      &self.timings
   }

   /// Task name → container → elapsed or timeout.
   pub fn timings(&self) -> BTreeMap<&str, BTreeMap<&ContainerDescriptor, Elapsed>> {
      self.timings
         .iter()
         .map(|(task, by_container)| {
            let elapsed = by_container
               .iter()
               .map(|(descriptor, result)| (descriptor, result.elapsed))
               .collect();
            (task.as_str(), elapsed)
         })
         .collect()
   }

   pub fn timing(&self, task: &str, descriptor: &ContainerDescriptor) -> Option<Elapsed> {
      self.timings.get(task)?.get(descriptor).map(|result| result.elapsed)
   }

   pub fn footprints(&self) -> &BTreeMap<ContainerDescriptor, MemoryResult> {
      &self.footprints
   }

   pub fn footprint(&self, descriptor: &ContainerDescriptor) -> Option<u64> {
      self.footprints.get(descriptor).map(|result| result.average_bytes)
   }

   pub fn task_names(&self) -> impl Iterator<Item = &str> {
      self.timings.keys().map(String::as_str)
   }

   pub fn is_empty(&self) -> bool {
      self.timings.is_empty() && self.footprints.is_empty()
   }
}
