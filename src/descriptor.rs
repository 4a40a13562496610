use std::borrow::Cow;
use std::fmt;

/// The List / Set / Queue behaviours a container exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Capabilities {
   pub list: bool,
   pub set: bool,
   pub queue: bool,
}

impl Capabilities {
   pub const NONE: Self = Self { list: false, set: false, queue: false };
   pub const LIST: Self = Self { list: true, set: false, queue: false };
   pub const SET: Self = Self { list: false, set: true, queue: false };
   pub const QUEUE: Self = Self { list: false, set: false, queue: true };

   pub const fn union(self, other: Self) -> Self {
      Self {
         list: self.list || other.list,
         set: self.set || other.set,
         queue: self.queue || other.queue,
      }
   }

   /// The timed task list only applies to lists, sets and queues.
   pub fn is_benchmarkable(&self) -> bool {
      self.list || self.set || self.queue
   }
}

/// Identifies one container implementation under test.
///
/// Ordered by name, which is also the factory's registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerDescriptor {
   name: Cow<'static, str>,
   capabilities: Capabilities,
}

impl ContainerDescriptor {
   pub fn new(name: impl Into<Cow<'static, str>>, capabilities: Capabilities) -> Self {
      Self { name: name.into(), capabilities }
   }

   pub fn name(&self) -> &str {
      &self.name
   }

   pub fn capabilities(&self) -> Capabilities {
      self.capabilities
   }

   pub fn array_list() -> Self {
      Self::new("Vec", Capabilities::LIST)
   }

   pub fn linked_list() -> Self {
      Self::new("LinkedList", Capabilities::LIST.union(Capabilities::QUEUE))
   }

   pub fn hash_set() -> Self {
      Self::new("HashSet", Capabilities::SET)
   }

   pub fn ordered_hash_set() -> Self {
      Self::new("OrderedHashSet", Capabilities::SET)
   }

   pub fn tree_set() -> Self {
      Self::new("BTreeSet", Capabilities::SET)
   }

   pub fn priority_heap() -> Self {
      Self::new("BinaryHeap", Capabilities::QUEUE)
   }

   pub fn array_deque() -> Self {
      Self::new("VecDeque", Capabilities::QUEUE)
   }

   /// The seven standard implementations, in benchmark order.
   pub fn standard() -> Vec<Self> {
      vec![
         Self::array_list(),
         Self::linked_list(),
         Self::hash_set(),
         Self::ordered_hash_set(),
         Self::tree_set(),
         Self::priority_heap(),
         Self::array_deque(),
      ]
   }

   /// Standard descriptor by name.
   pub fn find(name: &str) -> Option<Self> {
      Self::standard().into_iter().find(|descriptor| descriptor.name() == name)
   }
}

impl fmt::Display for ContainerDescriptor {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(&self.name)
   }
}
