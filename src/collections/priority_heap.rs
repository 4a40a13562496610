// Min-heap priority queue backed by `BinaryHeap<Reverse<String>>`.
//
// Iteration follows the heap's internal layout, so the first element
// yielded is always the smallest.

use crate::abort::{AbortSignal, Guard, Sweep};
use crate::collections::{owned_bytes, position};
use crate::{Collection, OperationError};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::mem::size_of;

#[derive(Debug, Default)]
pub struct PriorityHeap {
   items: BinaryHeap<Reverse<String>>,
   guard: Guard,
}

impl PriorityHeap {
   pub fn new() -> Self {
      Self::default()
   }

   /// Smallest element, the head of the queue.
   pub fn peek(&self) -> Option<&str> {
      self.items.peek().map(|Reverse(item)| item.as_str())
   }

   fn strings(&self) -> impl Iterator<Item = &String> {
      self.items.iter().map(|Reverse(item)| item)
   }
}

impl Collection for PriorityHeap {
   fn len(&self) -> usize {
      self.items.len()
   }

   fn add(&mut self, value: String) -> Result<bool, OperationError> {
      self.guard.check()?;
      self.items.push(Reverse(value));
      Ok(true)
   }

   fn add_all(&mut self, values: &[String]) -> Result<bool, OperationError> {
      self.guard.check()?;
      let mut gate = self.guard.gate();
      for value in values {
         gate.pass()?;
         self.items.push(Reverse(value.clone()));
      }
      Ok(!values.is_empty())
   }

   fn remove(&mut self, value: &str) -> Result<bool, OperationError> {
      self.guard.check()?;
      if position(self.strings(), value, &self.guard)?.is_none() {
         return Ok(false);
      }
      // drop exactly one match; retain rebuilds the heap
      let mut pending = true;
      self.items.retain(|Reverse(item)| {
         if pending && item == value {
            pending = false;
            return false;
         }
         true
      });
      Ok(true)
   }

   fn contains(&self, value: &str) -> Result<bool, OperationError> {
      self.guard.check()?;
      Ok(position(self.strings(), value, &self.guard)?.is_some())
   }

   fn remove_all(&mut self, values: &[String]) -> Result<bool, OperationError> {
      self.guard.check()?;
      let before = self.items.len();
      let mut sweep = Sweep::new(&self.guard);
      self.items.retain(|Reverse(item)| sweep.visit() && !values.contains(item));
      sweep.finish()?;
      Ok(self.items.len() != before)
   }

   fn retain_all(&mut self, values: &[String]) -> Result<bool, OperationError> {
      self.guard.check()?;
      let before = self.items.len();
      let mut sweep = Sweep::new(&self.guard);
      self.items.retain(|Reverse(item)| sweep.visit() && values.contains(item));
      sweep.finish()?;
      Ok(self.items.len() != before)
   }

   fn iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
      Box::new(self.strings().map(String::as_str))
   }

   fn to_array(&self) -> Result<Vec<&str>, OperationError> {
      self.guard.check()?;
      Ok(self.strings().map(String::as_str).collect())
   }

   fn clear(&mut self) {
      self.items.clear();
   }

   fn attach(&mut self, signal: AbortSignal) {
      self.guard.attach(signal);
   }

   fn structural_size(&self) -> usize {
      size_of::<Self>()
         + self.items.capacity() * size_of::<Reverse<String>>()
         + owned_bytes(self.strings())
   }
}
