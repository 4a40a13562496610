// Sorted set backed by `std::collections::BTreeSet`.

use crate::abort::{AbortSignal, Guard, Sweep};
use crate::collections::owned_bytes;
use crate::{Collection, OperationError};
use std::collections::BTreeSet;
use std::mem::size_of;

/// Keys per B-tree node in std's implementation.
const NODE_CAPACITY: usize = 11;
/// Parent pointer, parent index and length stored in every node.
const NODE_HEADER: usize = size_of::<usize>() + 2 * size_of::<u16>();

#[derive(Debug, Default)]
pub struct TreeSet {
   items: BTreeSet<String>,
   guard: Guard,
}

impl TreeSet {
   pub fn new() -> Self {
      Self::default()
   }
}

impl Collection for TreeSet {
   fn len(&self) -> usize {
      self.items.len()
   }

   fn add(&mut self, value: String) -> Result<bool, OperationError> {
      self.guard.check()?;
      Ok(self.items.insert(value))
   }

   fn add_all(&mut self, values: &[String]) -> Result<bool, OperationError> {
      self.guard.check()?;
      let mut gate = self.guard.gate();
      let mut changed = false;
      for value in values {
         gate.pass()?;
         changed |= self.items.insert(value.clone());
      }
      Ok(changed)
   }

   fn remove(&mut self, value: &str) -> Result<bool, OperationError> {
      self.guard.check()?;
      Ok(self.items.remove(value))
   }

   fn contains(&self, value: &str) -> Result<bool, OperationError> {
      self.guard.check()?;
      Ok(self.items.contains(value))
   }

   fn remove_all(&mut self, values: &[String]) -> Result<bool, OperationError> {
      self.guard.check()?;
      let mut gate = self.guard.gate();
      let mut changed = false;
      for value in values {
         gate.pass()?;
         changed |= self.items.remove(value);
      }
      Ok(changed)
   }

   fn retain_all(&mut self, values: &[String]) -> Result<bool, OperationError> {
      self.guard.check()?;
      let before = self.items.len();
      let mut sweep = Sweep::new(&self.guard);
      self.items.retain(|item| sweep.visit() && values.contains(item));
      sweep.finish()?;
      Ok(self.items.len() != before)
   }

   fn iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
      Box::new(self.items.iter().map(String::as_str))
   }

   fn to_array(&self) -> Result<Vec<&str>, OperationError> {
      self.guard.check()?;
      Ok(self.items.iter().map(String::as_str).collect())
   }

   fn clear(&mut self) {
      self.items.clear();
   }

   fn attach(&mut self, signal: AbortSignal) {
      self.guard.attach(signal);
   }

   fn structural_size(&self) -> usize {
      // approximate: leaf nodes only, assuming they are two-thirds full
      let per_node = (NODE_CAPACITY * 2 / 3).max(1);
      let nodes = self.items.len().div_ceil(per_node);
      size_of::<Self>()
         + nodes * (NODE_CAPACITY * size_of::<String>() + NODE_HEADER)
         + owned_bytes(self.items.iter())
   }
}
