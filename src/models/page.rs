// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Paginated list results.

/// One page of a paginated list.
///
/// The backend reports the total page count in the `pages` response header.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pages: u32,
}

impl<T> Page<T> {
    /// Whether a page after `current` (1-based) exists.
    pub fn has_next(&self, current: u32) -> bool {
        current < self.pages
    }
}
