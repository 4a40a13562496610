use std::fmt;

/// Raised by a container whose abort signal has tripped.
///
/// Every operation on an invalidated container fails with this, and long
/// scans return it as soon as they notice the signal. The trial loop
/// swallows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationError;

impl fmt::Display for OperationError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "operation aborted: container was invalidated by a timeout")
   }
}

impl std::error::Error for OperationError {}

/// No constructor is registered for the requested container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantiationError {
   pub name: String,
}

impl InstantiationError {
   pub fn new(name: impl Into<String>) -> Self {
      Self { name: name.into() }
   }
}

impl fmt::Display for InstantiationError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "no constructor registered for container `{}`", self.name)
   }
}

impl std::error::Error for InstantiationError {}
