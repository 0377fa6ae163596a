//! Domain types providing compile-time safety and self-documentation
//!
//! These newtype wrappers keep raw program-counter values apart from plain
//! counters, and give the file/function/line identities used by the
//! statistics model a single definition of equality.

use serde::Serialize;
use std::fmt;

/// Program-counter value captured by the firmware sampler
///
/// Always 32 bits wide: the flight controllers are Cortex-M parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Address(pub u32);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl From<u32> for Address {
    fn from(pc: u32) -> Self {
        Address(pc)
    }
}

/// A single decoded sample from the profile log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRecord {
    pub pc: Address,
}

/// Source file, identified by its normalized path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileDefinition {
    pub filename: String,
}

impl FileDefinition {
    pub fn new(filename: impl Into<String>) -> Self {
        Self { filename: filename.into() }
    }
}

impl fmt::Display for FileDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filename)
    }
}

/// Function, identified by name and the file that defines it
///
/// Two `static` helpers with the same name in different files are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub file: FileDefinition,
}

impl fmt::Display for FunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.name)
    }
}

/// Source line within a function
///
/// Line number 0 means the symbolizer could not tell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LineDefinition {
    pub function: FunctionDefinition,
    pub line: u32,
}

impl fmt::Display for LineDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.function, self.line)
    }
}

/// Where one address landed according to the symbolizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub address: Address,
    pub function: String,
    pub file: String,
    pub line: u32,
}

impl Resolution {
    /// Line identity this resolution contributes to
    #[must_use]
    pub fn line_definition(&self) -> LineDefinition {
        LineDefinition {
            function: FunctionDefinition {
                name: self.function.clone(),
                file: FileDefinition::new(self.file.clone()),
            },
            line: self.line,
        }
    }
}
