// Heap hand-back between implementations.
//
// Dropping is already deterministic, so there is nothing to collect. What
// remains is returning freed arenas to the OS so the next implementation
// starts from a lean resident set.

use nix::sys::resource::{getrusage, UsageWho};
use tracing::debug;

#[cfg(all(target_os = "linux", target_env = "gnu"))]
fn trim_heap() -> bool {
   // SAFETY: malloc_trim only walks the allocator's own free lists
   unsafe { libc::malloc_trim(0) == 1 }
}

#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
fn trim_heap() -> bool {
   false
}

/// Peak resident set size of this process, in KiB on Linux.
pub fn peak_rss() -> Option<i64> {
   getrusage(UsageWho::RUSAGE_SELF)
      .ok()
      .map(|usage| i64::from(usage.max_rss()))
}

/// Releases free heap memory back to the OS and logs the peak RSS.
pub fn full_cycle() {
   let trimmed = trim_heap();
   debug!(trimmed, peak_rss = ?peak_rss(), "reclamation cycle");
}
