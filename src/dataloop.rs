use std::fmt;
use std::marker::PhantomData;
use std::ops::Add;
use std::ptr;

/// A node in the circular doubly linked loop
struct Node<T> {
    data: T,
    prev: *mut Node<T>,
    next: *mut Node<T>,
}

impl<T> Node<T> {
    fn new(data: T) -> Box<Self> {
        Box::new(Node {
            data,
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        })
    }
}

/// A circular doubly linked container implemented with unsafe raw pointers.
///
/// A `DataLoop` tracks a designated `start` node and the number of linked
/// nodes. There is no null terminator: in a non-empty loop every `next` and
/// `prev` pointer is valid, and following `next` from any node `len()` times
/// returns to that node. Rotation changes which node `start` designates
/// without reordering elements, so equality and rendering both begin at
/// `start` and traverse exactly `len()` nodes.
pub struct DataLoop<T> {
    start: *mut Node<T>,
    count: usize,
}

impl<T> DataLoop<T> {
    /// Creates a new empty loop
    pub fn new() -> Self {
        DataLoop {
            start: ptr::null_mut(),
            count: 0,
        }
    }

    /// Creates a loop holding a single value, linked to itself
    pub fn with_value(value: T) -> Self {
        let node = Box::into_raw(Node::new(value));

        unsafe {
            (*node).next = node;
            (*node).prev = node;
        }

        DataLoop {
            start: node,
            count: 1,
        }
    }

    /// Returns the number of elements in the loop
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the loop is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns a reference to the element at `start`
    pub fn front(&self) -> Option<&T> {
        if self.start.is_null() {
            None
        } else {
            unsafe { Some(&(*self.start).data) }
        }
    }

    /// Returns a mutable reference to the element at `start`
    pub fn front_mut(&mut self) -> Option<&mut T> {
        if self.start.is_null() {
            None
        } else {
            unsafe { Some(&mut (*self.start).data) }
        }
    }

    /// Appends a value immediately before `start`, making it the last
    /// element of the traversal that begins at `start`.
    ///
    /// Runs in O(1) by linking through `start.prev` rather than walking
    /// to the last node. Returns `&mut Self` so appends can be chained.
    pub fn push(&mut self, value: T) -> &mut Self {
        let new_node = Box::into_raw(Node::new(value));

        unsafe {
            if self.start.is_null() {
                // Empty loop: the node is its own neighbor in both directions
                (*new_node).next = new_node;
                (*new_node).prev = new_node;
                self.start = new_node;
            } else {
                let last = (*self.start).prev;
                (*new_node).prev = last;
                (*new_node).next = self.start;
                (*last).next = new_node;
                (*self.start).prev = new_node;
            }
        }

        self.count += 1;
        self
    }

    /// Rotates the loop by moving `start` forward `offset` positions,
    /// backward for a negative `offset`. Element order is never altered,
    /// only which node `start` designates.
    ///
    /// The cycle has length `len()`, so offsets are reduced modulo the
    /// length first: shifting by any multiple of `len()` is a no-op, and
    /// the walk never takes more than `len() / 2` steps in either
    /// direction. A loop with fewer than two elements is left unchanged.
    pub fn shift(&mut self, offset: isize) -> &mut Self {
        if self.count <= 1 || offset == 0 {
            return self;
        }

        let steps = offset.rem_euclid(self.count as isize) as usize;
        unsafe {
            if steps <= self.count / 2 {
                for _ in 0..steps {
                    self.start = (*self.start).next;
                }
            } else {
                for _ in 0..self.count - steps {
                    self.start = (*self.start).prev;
                }
            }
        }

        self
    }

    /// Transfers every node of `other` into this loop at the zero-based
    /// position `pos`, counted forward from `start`. The source order is
    /// preserved and `other` is left empty. Nodes are relinked rather than
    /// copied, so no allocation takes place and `T` need not be `Clone`.
    ///
    /// The walk to the insertion point wraps around the cycle, so `pos`
    /// acts modulo `len()`; a position of exactly `len()` lands back on
    /// `start` and appends at the end. `pos == 0` additionally moves
    /// `start` to the first transferred element, making the source
    /// sequence the new logical beginning.
    pub fn splice(&mut self, other: &mut DataLoop<T>, pos: usize) -> &mut Self {
        if other.is_empty() {
            return self;
        }

        if self.is_empty() {
            // Steal the whole cycle
            self.start = other.start;
            self.count = other.count;
            other.start = ptr::null_mut();
            other.count = 0;
            return self;
        }

        unsafe {
            let steps = pos % self.count;
            let mut anchor = self.start;
            for _ in 0..steps {
                anchor = (*anchor).next;
            }

            let first = other.start;
            let last = (*first).prev;
            let before = (*anchor).prev;

            (*before).next = first;
            (*first).prev = before;
            (*last).next = anchor;
            (*anchor).prev = last;

            // Position zero prepends: the transferred sequence becomes the
            // new beginning. Any other position, including one that wrapped
            // back onto `start`, leaves `start` where it was.
            if pos == 0 {
                self.start = first;
            }
        }

        self.count += other.count;
        other.start = ptr::null_mut();
        other.count = 0;
        self
    }

    /// Releases every node exactly once, leaving the loop empty.
    ///
    /// The cycle has no null terminator, so teardown is driven by the
    /// stored count rather than a sentinel check.
    pub fn clear(&mut self) {
        let mut cur = self.start;
        for _ in 0..self.count {
            unsafe {
                let next = (*cur).next;
                drop(Box::from_raw(cur));
                cur = next;
            }
        }
        self.start = ptr::null_mut();
        self.count = 0;
    }

    /// Detaches the `start` node and returns its value, advancing `start`
    /// to the following node. Backs the consuming iterator.
    fn take_front(&mut self) -> Option<T> {
        if self.start.is_null() {
            return None;
        }

        unsafe {
            let old = self.start;
            if self.count == 1 {
                self.start = ptr::null_mut();
            } else {
                let prev = (*old).prev;
                let next = (*old).next;
                (*prev).next = next;
                (*next).prev = prev;
                self.start = next;
            }

            self.count -= 1;
            let boxed_node = Box::from_raw(old);
            Some(boxed_node.data)
        }
    }
}

impl<T> Default for DataLoop<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for DataLoop<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Clone> Clone for DataLoop<T> {
    /// Deep copy: same element sequence, same relative start, entirely
    /// distinct nodes.
    fn clone(&self) -> Self {
        let mut copy = DataLoop::new();
        for value in self.iter() {
            copy.push(value.clone());
        }
        copy
    }

    /// Assignment semantics: the previous contents are released before the
    /// source sequence is copied in. The receiver and source can never be
    /// the same loop here, so there is no self-assignment hazard.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        for value in source.iter() {
            self.push(value.clone());
        }
    }
}

impl<T: PartialEq> PartialEq for DataLoop<T> {
    /// Loops are equal iff their counts match and the aligned sequences
    /// starting at each loop's own `start` match position by position.
    /// Rotating a loop can therefore make two equal loops unequal.
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for DataLoop<T> {}

impl<T: fmt::Debug> fmt::Debug for DataLoop<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for DataLoop<T> {
    /// Renders `>no values<` for an empty loop, otherwise the `len()`
    /// elements starting at `start` as `-> a <--> b <--> c <-`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(">no values<");
        }

        f.write_str("-> ")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" <--> ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str(" <-")
    }
}

impl<'a, 'b, T: Clone> Add<&'b DataLoop<T>> for &'a DataLoop<T> {
    type Output = DataLoop<T>;

    /// Concatenation: a new loop holding a deep copy of `self`'s sequence
    /// followed by a deep copy of `rhs`'s sequence. Both operands are left
    /// unmodified; either side being empty yields a copy of the other.
    fn add(self, rhs: &'b DataLoop<T>) -> DataLoop<T> {
        let mut joined = self.clone();
        joined.extend(rhs.iter().cloned());
        joined
    }
}

impl<T> Extend<T> for DataLoop<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for DataLoop<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut dl = DataLoop::new();
        dl.extend(iter);
        dl
    }
}

/// An iterator over the loop that consumes it, detaching nodes from `start`
pub struct IntoIter<T>(DataLoop<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.take_front()
    }
}

impl<T> IntoIterator for DataLoop<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

/// An iterator over the loop that borrows it, yielding exactly `len()`
/// elements starting at `start`
pub struct Iter<'a, T> {
    current: *const Node<T>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        unsafe {
            let data = &(*self.current).data;
            self.current = (*self.current).next;
            self.remaining -= 1;
            Some(data)
        }
    }
}

/// A mutable iterator over the loop that borrows it mutably
pub struct IterMut<'a, T> {
    current: *mut Node<T>,
    remaining: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        unsafe {
            let data = &mut (*self.current).data;
            self.current = (*self.current).next;
            self.remaining -= 1;
            Some(data)
        }
    }
}

impl<T> DataLoop<T> {
    /// Returns an iterator over the loop that borrows the loop
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            current: self.start,
            remaining: self.count,
            _marker: PhantomData,
        }
    }

    /// Returns a mutable iterator over the loop that borrows the loop mutably
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            current: self.start,
            remaining: self.count,
            _marker: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl<T> DataLoop<T> {
        /// Checks the doubly linked cycle against the stored count: the
        /// `next` and `prev` relations must be mutual inverses, and
        /// following `next` from `start` exactly `count` times must come
        /// back to `start`.
        fn check_cycle(&self) {
            if self.count == 0 {
                assert!(self.start.is_null());
                return;
            }

            unsafe {
                let mut cur = self.start;
                for _ in 0..self.count {
                    assert_eq!((*(*cur).next).prev, cur);
                    assert_eq!((*(*cur).prev).next, cur);
                    cur = (*cur).next;
                }
                assert_eq!(cur, self.start);
            }
        }
    }

    #[test]
    fn test_new_is_empty() {
        let dl: DataLoop<i32> = DataLoop::new();
        assert!(dl.start.is_null());
        assert_eq!(dl.len(), 0);
        dl.check_cycle();
    }

    #[test]
    fn test_with_value_self_links() {
        let dl = DataLoop::with_value(7);
        assert_eq!(dl.len(), 1);
        unsafe {
            assert_eq!((*dl.start).next, dl.start);
            assert_eq!((*dl.start).prev, dl.start);
        }
        dl.check_cycle();
    }

    #[test]
    fn test_push_keeps_cycle() {
        let mut dl = DataLoop::new();
        for i in 0..100 {
            dl.push(i);
            assert_eq!(dl.len(), i + 1);
            dl.check_cycle();
        }
    }

    #[test]
    fn test_push_links_before_start() {
        let mut dl = DataLoop::new();
        dl.push(1).push(2).push(3);

        unsafe {
            // Last pushed value sits at start.prev
            assert_eq!((*(*dl.start).prev).data, 3);
            assert_eq!((*(*dl.start).next).data, 2);
        }
    }

    #[test]
    fn test_shift_keeps_cycle() {
        let mut dl: DataLoop<i32> = (1..=10).collect();
        for offset in [0, 1, 5, 20, -1, -8, -49] {
            dl.shift(offset);
            dl.check_cycle();
            assert_eq!(dl.len(), 10);
        }
    }

    #[test]
    fn test_splice_keeps_cycle() {
        let mut dst: DataLoop<i32> = (1..=4).collect();
        let mut src: DataLoop<i32> = (10..=12).collect();

        dst.splice(&mut src, 2);
        dst.check_cycle();
        src.check_cycle();
        assert_eq!(dst.len(), 7);
        assert_eq!(src.len(), 0);
        assert!(src.start.is_null());
    }

    #[test]
    fn test_clear_resets() {
        let mut dl: DataLoop<i32> = (1..=5).collect();
        dl.clear();
        assert!(dl.start.is_null());
        assert_eq!(dl.len(), 0);
        dl.check_cycle();

        // Clearing an already empty loop is fine
        dl.clear();
        assert!(dl.is_empty());
    }

    #[test]
    fn test_take_front() {
        let mut dl: DataLoop<i32> = (1..=3).collect();

        assert_eq!(dl.take_front(), Some(1));
        dl.check_cycle();
        assert_eq!(dl.take_front(), Some(2));
        dl.check_cycle();
        assert_eq!(dl.take_front(), Some(3));
        assert_eq!(dl.take_front(), None);
        assert!(dl.start.is_null());
    }

    #[test]
    fn test_clone_uses_distinct_nodes() {
        let dl: DataLoop<i32> = (1..=5).collect();
        let copy = dl.clone();

        assert_eq!(dl, copy);
        assert_ne!(dl.start, copy.start);
        copy.check_cycle();
    }
}
