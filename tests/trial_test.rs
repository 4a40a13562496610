// collections_bench/tests/trial_test.rs

use collections_bench::trial::warm_up;
use collections_bench::{
   ArrayList, Collection, ContainerDescriptor, ContainerFactory, DefaultContext, Elapsed,
   OperationError, TimedTrialRunner, TrialSpec,
};
use std::thread;
use std::time::{Duration, Instant};

fn fresh(factory: &ContainerFactory, descriptor: &ContainerDescriptor) -> Box<dyn Collection> {
   factory.create(descriptor).expect("standard container")
}

#[test]
fn test_add_trial_completes_every_loop() {
   let factory = ContainerFactory::standard();
   let context = DefaultContext::new(1000);
   let runner = TimedTrialRunner::new(&factory, &context, Duration::from_millis(5000));
   let descriptor = ContainerDescriptor::array_list();
   let mut instance = fresh(&factory, &descriptor);

   let mut spec = TrialSpec::new("add 1000 elements", 1000, |c, i| {
      c.add((i % 29).to_string()).map(drop)
   });
   let result = runner.run_trial(&descriptor, &mut instance, &mut spec);

   assert_eq!(result.task, "add 1000 elements");
   assert_eq!(result.descriptor, descriptor);
   assert_eq!(result.completed_loops, 1000);
   assert!(!result.elapsed.is_timeout());
   assert!(result.elapsed.duration() < Duration::from_millis(5000));
}

#[test]
fn test_never_returning_operation_times_out() {
   let factory = ContainerFactory::standard();
   let context = DefaultContext::new(1000);
   let runner = TimedTrialRunner::new(&factory, &context, Duration::from_millis(50));
   let descriptor = ContainerDescriptor::linked_list();
   let mut instance = fresh(&factory, &descriptor);

   // spins until the container is invalidated
   let mut spec = TrialSpec::new("spin", 10, |c, _| loop {
      c.contains("not there")?;
   });
   let started = Instant::now();
   let result = runner.run_trial(&descriptor, &mut instance, &mut spec);

   assert!(started.elapsed() < Duration::from_secs(5));
   assert_eq!(result.elapsed, Elapsed::Timeout(Duration::from_millis(50)));
   assert_eq!(result.elapsed.as_nanos(), 50_000_000);
   assert!(result.completed_loops < 10);
}

#[test]
fn test_long_scan_is_cut_off_mid_call() {
   let factory = ContainerFactory::standard();
   let context = DefaultContext::new(3_000_000);
   let timeout = Duration::from_millis(5);
   let runner = TimedTrialRunner::new(&factory, &context, timeout);
   let descriptor = ContainerDescriptor::linked_list();
   let mut instance = fresh(&factory, &descriptor);

   // a single remove walks every node looking for a value that is not there
   let mut outcome = None;
   let mut spec = TrialSpec::new("remove absent", 1, |c, _| {
      let started = Instant::now();
      let removed = c.remove("absent");
      outcome = Some((removed, started.elapsed()));
      removed.map(drop)
   });
   let result = runner.run_trial(&descriptor, &mut instance, &mut spec);
   drop(spec);

   assert_eq!(result.elapsed, Elapsed::Timeout(timeout));
   assert_eq!(result.completed_loops, 0);
   let (removed, spent) = outcome.expect("operation ran");
   assert_eq!(removed, Err(OperationError));
   assert!(spent < timeout + Duration::from_secs(1), "scan ran {spent:?}");
}

#[test]
fn test_slow_operation_returns_near_the_timeout() {
   let factory = ContainerFactory::standard();
   let context = DefaultContext::new(10);
   let timeout = Duration::from_millis(100);
   let runner = TimedTrialRunner::new(&factory, &context, timeout);
   let descriptor = ContainerDescriptor::array_deque();
   let mut instance = fresh(&factory, &descriptor);

   let mut spec = TrialSpec::new("sleepy", 1000, |_, _| {
      thread::sleep(Duration::from_millis(5));
      Ok(())
   });
   let started = Instant::now();
   let result = runner.run_trial(&descriptor, &mut instance, &mut spec);
   let wall = started.elapsed();

   assert!(result.elapsed.is_timeout());
   assert!(result.completed_loops < 1000);
   assert!(wall >= timeout);
   assert!(wall < timeout + Duration::from_secs(2), "took {wall:?}");
}

#[test]
fn test_zero_loops_is_zero_elapsed() {
   let factory = ContainerFactory::standard();
   let context = DefaultContext::new(100);
   let runner = TimedTrialRunner::new(&factory, &context, Duration::from_millis(1000));
   let descriptor = ContainerDescriptor::hash_set();
   let mut instance = fresh(&factory, &descriptor);

   let mut spec = TrialSpec::new("nothing", 0, |_, _| panic!("must not run"));
   let result = runner.run_trial(&descriptor, &mut instance, &mut spec);

   assert_eq!(result.elapsed, Elapsed::Measured(Duration::ZERO));
   assert_eq!(result.completed_loops, 0);
}

#[test]
fn test_completed_loops_never_exceed_loop_count() {
   let factory = ContainerFactory::standard();
   let context = DefaultContext::new(200);
   let runner = TimedTrialRunner::new(&factory, &context, Duration::from_millis(2000));

   for descriptor in ContainerDescriptor::standard() {
      let mut instance = fresh(&factory, &descriptor);
      for loop_count in [1, 7, 64] {
         let mut spec =
            TrialSpec::new("remove", loop_count, |c, i| c.remove(&i.to_string()).map(drop));
         let result = runner.run_trial(&descriptor, &mut instance, &mut spec);
         assert!(result.completed_loops <= loop_count, "{descriptor}");
         if result.completed_loops == loop_count {
            assert!(!result.elapsed.is_timeout(), "{descriptor}");
         }
      }
   }
}

#[test]
fn test_every_trial_starts_from_the_warmed_default_context() {
   let factory = ContainerFactory::standard();
   let context = DefaultContext::new(100);
   let runner = TimedTrialRunner::new(&factory, &context, Duration::from_millis(1000));
   let descriptor = ContainerDescriptor::array_list();
   let mut instance = fresh(&factory, &descriptor);
   instance.add("leftover".to_owned()).unwrap();

   let mut seen = Vec::new();
   let mut spec = TrialSpec::new("observe", 1, |c, _| {
      seen.push((c.len(), c.contains("leftover")?));
      Ok(())
   });
   runner.run_trial(&descriptor, &mut instance, &mut spec);
   drop(spec);

   // warmup removed exactly one element of the context
   assert_eq!(seen, [(99, false)]);
}

#[test]
fn test_instance_is_replaced_after_each_trial() {
   let factory = ContainerFactory::standard();
   let context = DefaultContext::new(50);
   let runner = TimedTrialRunner::new(&factory, &context, Duration::from_millis(1000));
   let descriptor = ContainerDescriptor::tree_set();
   let mut instance = fresh(&factory, &descriptor);

   let mut spec = TrialSpec::new("noop", 3, |_, _| Ok(()));
   runner.run_trial(&descriptor, &mut instance, &mut spec);
   assert!(instance.is_empty());
}

#[test]
fn test_failed_replacement_keeps_a_cleared_usable_instance() {
   // nothing registered, so the runner cannot build a replacement
   let factory = ContainerFactory::new();
   let context = DefaultContext::new(50);
   let runner = TimedTrialRunner::new(&factory, &context, Duration::from_millis(30));
   let descriptor = ContainerDescriptor::array_list();
   let mut instance: Box<dyn Collection> = Box::new(ArrayList::new());

   let mut spin = TrialSpec::new("spin", 5, |c, _| loop {
      c.contains("absent")?;
   });
   let first = runner.run_trial(&descriptor, &mut instance, &mut spin);
   assert!(first.elapsed.is_timeout());
   assert!(instance.is_empty());

   // the next reset re-arms the old instance with a fresh signal
   let mut add = TrialSpec::new("add", 5, |c, i| c.add(i.to_string()).map(drop));
   let second = runner.run_trial(&descriptor, &mut instance, &mut add);
   assert_eq!(second.completed_loops, 5);
   assert!(!second.elapsed.is_timeout());
}

#[test]
fn test_warm_up_drops_the_first_element() {
   let factory = ContainerFactory::standard();
   let context = DefaultContext::new(10);
   for descriptor in ContainerDescriptor::standard() {
      let mut instance = fresh(&factory, &descriptor);
      context.populate(instance.as_mut()).unwrap();
      let before = instance.len();
      let head = instance.iter().next().map(str::to_owned).unwrap();

      warm_up(instance.as_mut()).unwrap();
      assert_eq!(instance.len(), before - 1, "{descriptor}");
      assert!(!instance.contains(&head).unwrap(), "{descriptor}");
   }
}

#[test]
fn test_warm_up_tolerates_empty_containers() {
   let factory = ContainerFactory::standard();
   for descriptor in ContainerDescriptor::standard() {
      let mut instance = fresh(&factory, &descriptor);
      assert!(warm_up(instance.as_mut()).is_ok(), "{descriptor}");
      assert!(instance.is_empty(), "{descriptor}");
   }
}
