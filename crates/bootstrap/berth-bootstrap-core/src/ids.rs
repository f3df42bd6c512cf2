//! Identifiers and simple allocators for core entities.

use serde::{Deserialize, Serialize};

/// Identifies one click-handler registration on a page.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BindingId(pub u32);

/// Monotonic allocator for BindingId.
/// IDs are opaque externally; a page hands one out per attach.
#[derive(Default, Debug, Clone)]
pub struct IdAllocator {
    next_binding: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_binding(&mut self) -> BindingId {
        let id = BindingId(self.next_binding);
        self.next_binding = self.next_binding.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_binding(), BindingId(0));
        assert_eq!(alloc.alloc_binding(), BindingId(1));
        assert_eq!(alloc.alloc_binding(), BindingId(2));
        alloc.reset();
        assert_eq!(alloc.alloc_binding(), BindingId(0));
    }
}
