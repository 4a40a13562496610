// collections_bench/tests/unit_test.rs

use collections_bench::collections::{
   ArrayDeque, ArrayList, DoublyLinkedList, HashedSet, OrderedHashSet, PriorityHeap, TreeSet,
};
use collections_bench::{AbortSignal, Collection, OperationError};

fn strings(values: &[&str]) -> Vec<String> {
   values.iter().map(|v| v.to_string()).collect()
}

fn boxed(c: impl Collection) -> Box<dyn Collection> {
   Box::new(c)
}

fn all_containers() -> Vec<(&'static str, Box<dyn Collection>)> {
   vec![
      ("Vec", boxed(ArrayList::new())),
      ("LinkedList", boxed(DoublyLinkedList::new())),
      ("HashSet", boxed(HashedSet::new())),
      ("OrderedHashSet", boxed(OrderedHashSet::new())),
      ("BTreeSet", boxed(TreeSet::new())),
      ("BinaryHeap", boxed(PriorityHeap::new())),
      ("VecDeque", boxed(ArrayDeque::new())),
   ]
}

fn sorted(c: &dyn Collection) -> Vec<String> {
   let mut items: Vec<String> = c.iter().map(str::to_owned).collect();
   items.sort();
   items
}

#[test]
fn test_common_operations_on_every_container() {
   for (name, mut c) in all_containers() {
      assert!(c.is_empty(), "{name}");
      assert!(c.add_all(&strings(&["b", "a", "c"])).unwrap(), "{name}");
      assert_eq!(c.len(), 3, "{name}");
      assert!(c.contains("a").unwrap(), "{name}");
      assert!(!c.contains("z").unwrap(), "{name}");
      assert!(c.contains_all(&strings(&["a", "c"])).unwrap(), "{name}");
      assert!(!c.contains_all(&strings(&["a", "z"])).unwrap(), "{name}");

      assert!(c.remove("b").unwrap(), "{name}");
      assert!(!c.remove("b").unwrap(), "{name}");
      assert_eq!(sorted(&*c), ["a", "c"], "{name}");
      assert_eq!(c.to_array().unwrap().len(), 2, "{name}");

      c.clear();
      assert!(c.is_empty(), "{name}");
      assert_eq!(c.iter().next(), None, "{name}");
   }
}

#[test]
fn test_remove_all_and_retain_all() {
   for (name, mut c) in all_containers() {
      c.add_all(&strings(&["1", "2", "3", "4", "5"])).unwrap();

      assert!(c.remove_all(&strings(&["2", "4", "9"])).unwrap(), "{name}");
      assert_eq!(sorted(&*c), ["1", "3", "5"], "{name}");
      assert!(!c.remove_all(&strings(&["9"])).unwrap(), "{name}");

      assert!(c.retain_all(&strings(&["3", "5", "7"])).unwrap(), "{name}");
      assert_eq!(sorted(&*c), ["3", "5"], "{name}");
      assert!(!c.retain_all(&strings(&["3", "5"])).unwrap(), "{name}");
   }
}

#[test]
fn test_sets_ignore_duplicates_sequences_keep_them() {
   let mut set = HashedSet::new();
   assert!(set.add("x".into()).unwrap());
   assert!(!set.add("x".into()).unwrap());
   assert_eq!(set.len(), 1);

   let mut list = ArrayList::new();
   assert!(list.add("x".into()).unwrap());
   assert!(list.add("x".into()).unwrap());
   assert_eq!(list.len(), 2);
   // only the first occurrence goes
   assert!(list.remove("x").unwrap());
   assert_eq!(list.len(), 1);
}

#[test]
fn test_ordered_hash_set_keeps_insertion_order() {
   let mut set = OrderedHashSet::new();
   set.add_all(&strings(&["q", "a", "m", "a", "z"])).unwrap();
   assert_eq!(set.iter().collect::<Vec<_>>(), ["q", "a", "m", "z"]);

   set.remove("a").unwrap();
   set.add("a".into()).unwrap();
   assert_eq!(set.to_array().unwrap(), ["q", "m", "z", "a"]);
}

#[test]
fn test_ordered_hash_set_survives_compaction() {
   let mut set = OrderedHashSet::new();
   let values: Vec<String> = (0..200).map(|i| i.to_string()).collect();
   set.add_all(&values).unwrap();
   for value in values.iter().step_by(2) {
      assert!(set.remove(value).unwrap());
   }
   assert_eq!(set.len(), 100);
   let expected: Vec<&str> = values.iter().skip(1).step_by(2).map(String::as_str).collect();
   assert_eq!(set.to_array().unwrap(), expected);
   assert!(set.contains("199").unwrap());
   assert!(set.remove("199").unwrap());
   assert!(!set.contains("199").unwrap());
}

#[test]
fn test_tree_set_iterates_sorted() {
   let mut set = TreeSet::new();
   set.add_all(&strings(&["pear", "apple", "fig"])).unwrap();
   assert_eq!(set.iter().collect::<Vec<_>>(), ["apple", "fig", "pear"]);
}

#[test]
fn test_priority_heap_is_a_min_heap() {
   let mut heap = PriorityHeap::new();
   heap.add_all(&strings(&["m", "c", "x", "a", "q"])).unwrap();
   assert_eq!(heap.peek(), Some("a"));
   assert_eq!(heap.iter().next(), Some("a"));

   assert!(heap.remove("a").unwrap());
   assert_eq!(heap.peek(), Some("c"));
   assert_eq!(heap.len(), 4);
}

#[test]
fn test_array_deque_is_fifo() {
   let mut deque = ArrayDeque::new();
   deque.add_all(&strings(&["1", "2", "3"])).unwrap();
   assert!(deque.remove("2").unwrap());
   assert_eq!(deque.pop_front().as_deref(), Some("1"));
   assert_eq!(deque.pop_front().as_deref(), Some("3"));
   assert_eq!(deque.pop_front(), None);
}

#[test]
fn test_only_lists_are_index_addressable() {
   for (name, mut c) in all_containers() {
      c.add_all(&strings(&["k", "l"])).unwrap();
      let addressable = matches!(name, "Vec" | "LinkedList");
      assert_eq!(c.get(1).is_some(), addressable, "{name}");
      if addressable {
         assert_eq!(c.get(1), Some("l"), "{name}");
         assert_eq!(c.index_of("l").unwrap(), Some(1), "{name}");
         assert_eq!(c.index_of("zz").unwrap(), None, "{name}");
      }
   }
}

#[test]
fn test_tripped_signal_invalidates_every_container() {
   for (name, mut c) in all_containers() {
      let signal = AbortSignal::new();
      c.attach(signal.clone());
      c.add_all(&strings(&["1", "2", "3"])).unwrap();

      signal.trip();
      assert_eq!(c.add("4".into()), Err(OperationError), "{name}");
      assert_eq!(c.contains("1"), Err(OperationError), "{name}");
      assert_eq!(c.remove("1"), Err(OperationError), "{name}");
      assert_eq!(c.retain_all(&strings(&["1"])), Err(OperationError), "{name}");
      assert!(c.to_array().is_err(), "{name}");

      // clear still works, so an instance can be handed a fresh signal
      c.clear();
      c.attach(AbortSignal::new());
      assert!(c.add("5".into()).unwrap(), "{name}");
   }
}

#[test]
fn test_structural_size_grows_with_contents() {
   for (name, mut c) in all_containers() {
      let empty = c.structural_size();
      let values: Vec<String> = (0..1000).map(|i| i.to_string()).collect();
      c.add_all(&values).unwrap();
      assert!(c.structural_size() > empty, "{name}");
   }
}
