// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::ops::Range;

/// Wrapping list movement; a zero-length list leaves `current` untouched.
pub fn wrap_index(current: usize, delta: isize, count: usize) -> usize {
    if count == 0 {
        return current;
    }
    let count = count as isize;
    (current as isize + delta).rem_euclid(count) as usize
}

/// Scroll offset of a fixed-height window over a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    offset: usize,
}

impl Viewport {
    pub const fn offset(self) -> usize {
        self.offset
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Moves the window so `selected` is visible, then clamps it to the list.
    pub fn follow(&mut self, selected: usize, height: usize, total: usize) -> usize {
        let height = height.max(1);
        if selected < self.offset {
            self.offset = selected;
        } else if selected >= self.offset + height {
            self.offset = selected + 1 - height;
        }
        self.offset = self.offset.min(total.saturating_sub(height));
        self.offset
    }

    pub fn visible_range(self, height: usize, total: usize) -> Range<usize> {
        let start = self.offset.min(total);
        start..(start + height).min(total)
    }
}
