/// A `Vec` with reusable indices. Released slots form a free list threaded
/// through the vacant entries, so indices stay stable while a value lives.
#[derive(Debug)]
pub struct SlotMap<T> {
    head: u32,
    live: usize,
    entries: Vec<Result<T, u32>>,
}
impl<T> SlotMap<T> {
    pub fn new() -> Self {
        Self {
            head: u32::MAX,
            live: 0,
            entries: vec![],
        }
    }
    pub fn len(&self) -> usize {
        self.live
    }
    pub fn get(&mut self, i: usize) -> Option<&mut T> {
        self.entries.get_mut(i).and_then(|r| r.as_mut().ok())
    }
    /// The index the next `insert` will use.
    pub fn next_idx(&self) -> usize {
        if self.head == u32::MAX {
            self.entries.len()
        } else {
            self.head as usize
        }
    }
    pub fn insert(&mut self, value: T) -> usize {
        self.live += 1;
        if self.head == u32::MAX {
            self.entries.push(Ok(value));
            return self.entries.len() - 1;
        }
        let id = self.head as usize;
        match core::mem::replace(&mut self.entries[id], Ok(value)) {
            Err(next) => self.head = next,
            Ok(_) => unreachable!("free list pointed at a live slot"),
        }
        id
    }
    pub fn release(&mut self, i: usize) -> Option<T> {
        let slot = self.entries.get_mut(i)?;
        match core::mem::replace(slot, Err(self.head)) {
            Ok(v) => {
                self.head = i as u32;
                self.live -= 1;
                Some(v)
            }
            Err(next) => {
                *slot = Err(next);
                None
            }
        }
    }
}
impl<T> Default for SlotMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_released_slots() {
        let mut map = SlotMap::new();
        let a = map.insert("a");
        let b = map.insert("b");
        assert_eq!(map.next_idx(), 2);
        assert_eq!(map.release(a), Some("a"));
        assert_eq!(map.release(a), None);
        assert_eq!(map.len(), 1);

        assert_eq!(map.next_idx(), a);
        assert_eq!(map.insert("c"), a);
        assert_eq!(map.get(a), Some(&mut "c"));
        assert_eq!(map.get(b), Some(&mut "b"));
        assert_eq!(map.next_idx(), 2);
    }

    #[test]
    fn free_list_survives_several_releases() {
        let mut map = SlotMap::new();
        for i in 0..4 {
            map.insert(i);
        }
        map.release(1);
        map.release(3);
        assert_eq!(map.insert(30), 3);
        assert_eq!(map.insert(10), 1);
        assert_eq!(map.insert(4), 4);
        assert_eq!(map.len(), 5);
        assert!(map.get(7).is_none());
    }
}
