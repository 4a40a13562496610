use clap::Parser;
use collections_bench::{
   BenchConfig, BenchmarkHarness, Capabilities, ContainerDescriptor, Method, ResultStore,
   TrackingAllocator,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::info;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

/// Time and memory benchmark of interchangeable container implementations.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
   /// Elements loaded into each container before every trial
   #[arg(long, default_value_t = 100_000)]
   populate_size: usize,

   /// Per-trial budget in milliseconds
   #[arg(long, default_value_t = 15_000)]
   timeout_ms: u64,

   /// Instances kept alive at once when measuring memory
   #[arg(long, default_value_t = 100)]
   memory_batch: usize,

   /// Container to benchmark, repeatable (default: all standard ones)
   #[arg(long = "container", value_name = "NAME")]
   containers: Vec<String>,

   /// Skip the memory benchmark
   #[arg(long)]
   skip_memory: bool,

   /// Print the results as JSON instead of a table
   #[arg(long)]
   json: bool,
}

#[derive(Serialize)]
struct Timing {
   nanos: u64,
   timeout: bool,
   completed_loops: usize,
}

#[derive(Serialize)]
struct Footprint {
   bytes: u64,
   method: Method,
}

#[derive(Serialize)]
struct Report<'a> {
   populate_size: usize,
   timeout_ms: u64,
   timings: BTreeMap<&'a str, BTreeMap<&'a str, Timing>>,
   memory: BTreeMap<&'a str, Footprint>,
}

impl<'a> Report<'a> {
   fn new(args: &Args, results: &'a ResultStore) -> Self {
      let timings = results
         .trials()
         .iter()
         .map(|(task, by_container)| {
            let row = by_container
               .iter()
               .map(|(descriptor, trial)| {
                  let timing = Timing {
                     nanos: trial.elapsed.as_nanos(),
                     timeout: trial.elapsed.is_timeout(),
                     completed_loops: trial.completed_loops,
                  };
                  (descriptor.name(), timing)
               })
               .collect();
            (task.as_str(), row)
         })
         .collect();
      let memory = results
         .footprints()
         .iter()
         .map(|(descriptor, result)| {
            let footprint = Footprint { bytes: result.average_bytes, method: result.method };
            (descriptor.name(), footprint)
         })
         .collect();
      Self {
         populate_size: args.populate_size,
         timeout_ms: args.timeout_ms,
         timings,
         memory,
      }
   }

   fn print_table(&self) {
      for (task, row) in &self.timings {
         println!("{task}");
         for (name, timing) in row {
            if timing.timeout {
               println!("   {name:<16} timeout (>{} ns)", timing.nanos);
            } else {
               println!("   {name:<16} {} ns", timing.nanos);
            }
         }
      }
      if !self.memory.is_empty() {
         println!("memory per instance");
         for (name, footprint) in &self.memory {
            println!("   {name:<16} {} bytes ({:?})", footprint.bytes, footprint.method);
         }
      }
   }
}

/// Unknown names are kept so the harness reports them as failures.
fn selected(names: &[String]) -> Vec<ContainerDescriptor> {
   if names.is_empty() {
      return ContainerDescriptor::standard();
   }
   names
      .iter()
      .map(|name| {
         ContainerDescriptor::find(name)
            .unwrap_or_else(|| ContainerDescriptor::new(name.clone(), Capabilities::NONE))
      })
      .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
   tracing_subscriber::fmt()
      .with_env_filter(
         tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("collections_bench=info".parse()?),
      )
      .with_writer(std::io::stderr)
      .init();

   let args = Args::parse();
   let config = BenchConfig::new(args.populate_size, Duration::from_millis(args.timeout_ms))
      .with_memory_batch_size(args.memory_batch);
   let descriptors = selected(&args.containers);

   let mut harness = BenchmarkHarness::new(config);
   let completed = harness.run_all(&descriptors);
   info!("{completed}/{} implementation(s) benchmarked", descriptors.len());
   if !args.skip_memory {
      harness.run_memory(&descriptors);
   }

   let report = Report::new(&args, harness.results());
   if args.json {
      println!("{}", serde_json::to_string_pretty(&report)?);
   } else {
      report.print_table();
   }
   Ok(())
}
