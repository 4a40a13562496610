// Dynamic-array list backed by `Vec`.

use crate::abort::{AbortSignal, Guard, Sweep};
use crate::collections::{owned_bytes, position};
use crate::{Collection, OperationError};
use std::mem::size_of;

#[derive(Debug, Default)]
pub struct ArrayList {
   items: Vec<String>,
   guard: Guard,
}

impl ArrayList {
   pub fn new() -> Self {
      Self::default()
   }
}

impl Collection for ArrayList {
   fn len(&self) -> usize {
      self.items.len()
   }

   fn add(&mut self, value: String) -> Result<bool, OperationError> {
      self.guard.check()?;
      self.items.push(value);
      Ok(true)
   }

   fn add_all(&mut self, values: &[String]) -> Result<bool, OperationError> {
      self.guard.check()?;
      self.items.extend_from_slice(values);
      Ok(!values.is_empty())
   }

   fn remove(&mut self, value: &str) -> Result<bool, OperationError> {
      self.guard.check()?;
      match position(self.items.iter(), value, &self.guard)? {
         Some(index) => {
            // shifts the tail left, O(n) like the scan before it
            self.items.remove(index);
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
      let before = self.items.len();
      let mut sweep = Sweep::new(&self.guard);
      self.items.retain(|item| sweep.visit() && !values.contains(item));
      sweep.finish()?;
      Ok(self.items.len() != before)
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

   fn get(&self, index: usize) -> Option<&str> {
      self.items.get(index).map(String::as_str)
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
         + self.items.capacity() * size_of::<String>()
         + owned_bytes(self.items.iter())
   }
}
