mod array_deque;
mod array_list;
mod hashed_set;
mod linked_list;
mod ordered_hash_set;
mod priority_heap;
mod tree_set;

pub use array_deque::ArrayDeque;
pub use array_list::ArrayList;
pub use hashed_set::HashedSet;
pub use linked_list::DoublyLinkedList;
pub use ordered_hash_set::OrderedHashSet;
pub use priority_heap::PriorityHeap;
pub use tree_set::TreeSet;

use crate::abort::Guard;
use crate::OperationError;

/// Linear search that gives up once the guard's signal trips.
pub(crate) fn position<'a>(
   items: impl Iterator<Item = &'a String>,
   value: &str,
   guard: &Guard,
) -> Result<Option<usize>, OperationError> {
   let mut gate = guard.gate();
   for (index, item) in items.enumerate() {
      gate.pass()?;
      if item == value {
         return Ok(Some(index));
      }
   }
   Ok(None)
}

/// Heap bytes owned by the strings themselves.
pub(crate) fn owned_bytes<'a>(items: impl Iterator<Item = &'a String>) -> usize {
   items.map(String::capacity).sum()
}
