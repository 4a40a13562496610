// Hash set backed by `std::collections::HashSet`.

use crate::abort::{AbortSignal, Guard, Sweep};
use crate::collections::owned_bytes;
use crate::{Collection, OperationError};
use std::collections::HashSet;
use std::mem::size_of;

#[derive(Debug, Default)]
pub struct HashedSet {
   items: HashSet<String>,
   guard: Guard,
}

impl HashedSet {
   pub fn new() -> Self {
      Self::default()
   }
}

impl Collection for HashedSet {
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
      // one control byte per bucket next to each slot
      size_of::<Self>()
         + self.items.capacity() * (size_of::<String>() + 1)
         + owned_bytes(self.items.iter())
   }
}
