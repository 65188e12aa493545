//! Pointer chain resolution
//!
//! A pointer is a module-relative base offset and a list of offsets.
//! When resolving, each offset EXCEPT the last is dereferenced.
//! The last offset is just added to get the final address.

use serde::{Deserialize, Serialize};

use super::MemoryReader;

/// A pointer with offset chain for resolving nested memory addresses
///
/// - Resolution starts at `module_base + base_offset`
/// - All offsets EXCEPT the last are dereferenced (follow the pointer)
/// - The last offset is just added to the current address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pointer {
    /// Offset from the main module's base address
    pub base_offset: i64,
    /// Chain of offsets to follow
    #[serde(default)]
    pub offsets: Vec<i64>,
}

impl Pointer {
    /// Create a pointer relative to the main module
    pub fn module_relative(base_offset: i64, offsets: &[i64]) -> Self {
        Self {
            base_offset,
            offsets: offsets.to_vec(),
        }
    }

    /// Resolve the pointer chain to get the final address
    ///
    /// Returns `None` when a dereference fails or lands on null, or when the
    /// address arithmetic leaves the signed 64-bit range.
    pub fn resolve(&self, reader: &dyn MemoryReader, module_base: usize, is_64_bit: bool) -> Option<usize> {
        let mut ptr = i64::try_from(module_base).ok()?.checked_add(self.base_offset)?;

        for (i, &offset) in self.offsets.iter().enumerate() {
            let address = ptr.checked_add(offset)?;

            // Not the last offset = resolve as pointer (dereference)
            if i + 1 < self.offsets.len() {
                let link = reader.read_ptr(usize::try_from(address).ok()?, is_64_bit)?;
                ptr = i64::try_from(link).ok()?;
                if ptr == 0 {
                    return None;
                }
            } else {
                ptr = address;
            }
        }

        if ptr <= 0 {
            return None;
        }
        usize::try_from(ptr).ok()
    }
}
