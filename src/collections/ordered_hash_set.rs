// Insertion-ordered hash set.
//
// A hash index maps each element to its slot in an append-only slot vector.
// Removal leaves a tombstone; the slots are compacted once tombstones
// outnumber live elements.

use crate::abort::{AbortSignal, Guard};
use crate::collections::owned_bytes;
use crate::{Collection, OperationError};
use std::collections::HashMap;
use std::mem::size_of;

/// Tombstones tolerated before compaction is considered at all.
const MIN_TOMBSTONES: usize = 32;

#[derive(Debug, Default)]
pub struct OrderedHashSet {
   index: HashMap<String, usize>,
   slots: Vec<Option<String>>,
   tombstones: usize,
   guard: Guard,
}

impl OrderedHashSet {
   pub fn new() -> Self {
      Self::default()
   }

   fn insert(&mut self, value: String) -> bool {
      if self.index.contains_key(&value) {
         return false;
      }
      self.index.insert(value.clone(), self.slots.len());
      self.slots.push(Some(value));
      true
   }

   fn discard(&mut self, value: &str) -> bool {
      match self.index.remove(value) {
         Some(slot) => {
            self.slots[slot] = None;
            self.tombstones += 1;
            self.compact();
            true
         }
         None => false,
      }
   }

   fn compact(&mut self) {
      if self.tombstones < MIN_TOMBSTONES || self.tombstones * 2 < self.slots.len() {
         return;
      }
      self.slots.retain(Option::is_some);
      for (slot, item) in self.slots.iter().enumerate() {
         if let Some(item) = item {
            if let Some(entry) = self.index.get_mut(item) {
               *entry = slot;
            }
         }
      }
      self.tombstones = 0;
   }

   fn live(&self) -> impl Iterator<Item = &String> {
      self.slots.iter().flatten()
   }
}

impl Collection for OrderedHashSet {
   fn len(&self) -> usize {
      self.index.len()
   }

   fn add(&mut self, value: String) -> Result<bool, OperationError> {
      self.guard.check()?;
      Ok(self.insert(value))
   }

   fn add_all(&mut self, values: &[String]) -> Result<bool, OperationError> {
      self.guard.check()?;
      let mut changed = false;
      for value in values {
         // `insert` needs `&mut self`, so re-check the flag directly
         self.guard.check()?;
         if !self.index.contains_key(value.as_str()) {
            changed |= self.insert(value.clone());
         }
      }
      Ok(changed)
   }

   fn remove(&mut self, value: &str) -> Result<bool, OperationError> {
      self.guard.check()?;
      Ok(self.discard(value))
   }

   fn contains(&self, value: &str) -> Result<bool, OperationError> {
      self.guard.check()?;
      Ok(self.index.contains_key(value))
   }

   fn remove_all(&mut self, values: &[String]) -> Result<bool, OperationError> {
      self.guard.check()?;
      let mut changed = false;
      for value in values {
         self.guard.check()?;
         changed |= self.discard(value);
      }
      Ok(changed)
   }

   fn retain_all(&mut self, values: &[String]) -> Result<bool, OperationError> {
      self.guard.check()?;
      let before = self.index.len();
      let mut gate = self.guard.gate();
      let mut aborted = false;
      for slot in self.slots.iter_mut() {
         let Some(item) = slot else { continue };
         if !aborted && gate.pass().is_err() {
            aborted = true;
         }
         if aborted || !values.contains(item) {
            self.index.remove(item.as_str());
            *slot = None;
            self.tombstones += 1;
         }
      }
      self.compact();
      if aborted {
         return Err(OperationError);
      }
      Ok(self.index.len() != before)
   }

   fn iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
      Box::new(self.live().map(String::as_str))
   }

   fn to_array(&self) -> Result<Vec<&str>, OperationError> {
      self.guard.check()?;
      Ok(self.live().map(String::as_str).collect())
   }

   fn clear(&mut self) {
      self.index.clear();
      self.slots.clear();
      self.tombstones = 0;
   }

   fn attach(&mut self, signal: AbortSignal) {
      self.guard.attach(signal);
   }

   fn structural_size(&self) -> usize {
      // every element is held twice: once as index key, once in its slot
      size_of::<Self>()
         + self.index.capacity() * (size_of::<(String, usize)>() + 1)
         + self.slots.capacity() * size_of::<Option<String>>()
         + owned_bytes(self.index.keys())
         + owned_bytes(self.live())
   }
}
