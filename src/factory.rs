// Static registry of container constructors, keyed by descriptor name.

use crate::collections::{
   ArrayDeque, ArrayList, DoublyLinkedList, HashedSet, OrderedHashSet, PriorityHeap, TreeSet,
};
use crate::{Collection, ContainerDescriptor, InstantiationError};
use std::collections::HashMap;

/// Builds a fresh, empty instance.
pub type Constructor = fn() -> Box<dyn Collection>;

fn boxed<C: Collection + Default>() -> Box<dyn Collection> {
   Box::new(C::default())
}

#[derive(Debug, Default, Clone)]
pub struct ContainerFactory {
   constructors: HashMap<String, Constructor>,
}

impl ContainerFactory {
   /// A factory with nothing registered.
   pub fn new() -> Self {
      Self::default()
   }

   /// A factory that knows every `ContainerDescriptor::standard()` entry.
   pub fn standard() -> Self {
      let mut factory = Self::new();
      factory.register(&ContainerDescriptor::array_list(), boxed::<ArrayList>);
      factory.register(&ContainerDescriptor::linked_list(), boxed::<DoublyLinkedList>);
      factory.register(&ContainerDescriptor::hash_set(), boxed::<HashedSet>);
      factory.register(&ContainerDescriptor::ordered_hash_set(), boxed::<OrderedHashSet>);
      factory.register(&ContainerDescriptor::tree_set(), boxed::<TreeSet>);
      factory.register(&ContainerDescriptor::priority_heap(), boxed::<PriorityHeap>);
      factory.register(&ContainerDescriptor::array_deque(), boxed::<ArrayDeque>);
      factory
   }

   /// Registers (or replaces) the constructor for `descriptor`.
   pub fn register(&mut self, descriptor: &ContainerDescriptor, constructor: Constructor) {
      self.constructors.insert(descriptor.name().to_owned(), constructor);
   }

   pub fn is_registered(&self, descriptor: &ContainerDescriptor) -> bool {
      self.constructors.contains_key(descriptor.name())
   }

   pub fn create(
      &self,
      descriptor: &ContainerDescriptor,
   ) -> Result<Box<dyn Collection>, InstantiationError> {
      self.constructors
         .get(descriptor.name())
         .map(|constructor| constructor())
         .ok_or_else(|| InstantiationError::new(descriptor.name()))
   }
}
