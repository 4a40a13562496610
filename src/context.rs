use crate::{Collection, OperationError};

/// Values in the default context cycle through `0..VALUE_CYCLE`.
const VALUE_CYCLE: usize = 100;

/// Canonical populated baseline: element `i` is `i % 100` as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultContext {
   elements: Vec<String>,
}

impl DefaultContext {
   pub fn new(populate_size: usize) -> Self {
      let elements = (0..populate_size)
         .map(|i| (i % VALUE_CYCLE).to_string())
         .collect();
      Self { elements }
   }

   pub fn len(&self) -> usize {
      self.elements.len()
   }

   pub fn is_empty(&self) -> bool {
      self.elements.is_empty()
   }

   pub fn as_slice(&self) -> &[String] {
      &self.elements
   }

   /// Clears `target` and loads the whole context into it.
   pub fn populate(&self, target: &mut dyn Collection) -> Result<(), OperationError> {
      target.clear();
      target.add_all(&self.elements)?;
      Ok(())
   }
}
