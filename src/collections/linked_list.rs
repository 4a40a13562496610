// Doubly linked list backed by `std::collections::LinkedList`.
//
// Removal by value is a scan followed by split/append at the hit, which is
// the pathological O(n) case the trial timeout exists for.

use crate::abort::{AbortSignal, Guard, Sweep};
use crate::collections::{owned_bytes, position};
use crate::{Collection, OperationError};
use std::collections::LinkedList;
use std::mem::{size_of, take};

/// Per-node links: `next` and `prev`.
const LINKS: usize = 2 * size_of::<usize>();

#[derive(Debug, Default)]
pub struct DoublyLinkedList {
   items: LinkedList<String>,
   guard: Guard,
}

impl DoublyLinkedList {
   pub fn new() -> Self {
      Self::default()
   }

   fn remove_at(&mut self, index: usize) {
      let mut tail = self.items.split_off(index);
      tail.pop_front();
      self.items.append(&mut tail);
   }

   // std's list has no stable `retain`; rebuild from the kept nodes
   fn sweep(&mut self, keep: impl Fn(&String) -> bool) -> Result<bool, OperationError> {
      let before = self.items.len();
      let mut sweep = Sweep::new(&self.guard);
      self.items = take(&mut self.items)
         .into_iter()
         .filter(|item| sweep.visit() && keep(item))
         .collect();
      sweep.finish()?;
      Ok(self.items.len() != before)
   }
}

impl Collection for DoublyLinkedList {
   fn len(&self) -> usize {
      self.items.len()
   }

   fn add(&mut self, value: String) -> Result<bool, OperationError> {
      self.guard.check()?;
      self.items.push_back(value);
      Ok(true)
   }

   fn add_all(&mut self, values: &[String]) -> Result<bool, OperationError> {
      self.guard.check()?;
      let mut gate = self.guard.gate();
      for value in values {
         gate.pass()?;
         self.items.push_back(value.clone());
      }
      Ok(!values.is_empty())
   }

   fn remove(&mut self, value: &str) -> Result<bool, OperationError> {
      self.guard.check()?;
      match position(self.items.iter(), value, &self.guard)? {
         Some(index) => {
            self.remove_at(index);
            Ok(true)
         }
         None => Ok(false),
      }
   }

   fn contains(&self, value: &str) -> Result<bool, OperationError> {
      self.guard.check()?;
      Ok(position(self.items.iter(), value, &self.guard)?.is_some())
   }

   fn remove_all(&mut self, values: &[String]) -> Result<bool, OperationError> {
      self.guard.check()?;
      self.sweep(|item| !values.contains(item))
   }

   fn retain_all(&mut self, values: &[String]) -> Result<bool, OperationError> {
      self.guard.check()?;
      self.sweep(|item| values.contains(item))
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

   fn get(&self, index: usize) -> Option<&str> {
      self.items.iter().nth(index).map(String::as_str)
   }

   fn index_of(&self, value: &str) -> Result<Option<usize>, OperationError> {
      self.guard.check()?;
      position(self.items.iter(), value, &self.guard)
   }

   fn attach(&mut self, signal: AbortSignal) {
      self.guard.attach(signal);
   }

   fn structural_size(&self) -> usize {
      size_of::<Self>()
         + self.items.len() * (size_of::<String>() + LINKS)
         + owned_bytes(self.items.iter())
   }
}
