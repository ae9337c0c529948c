/// Fixed-capacity ring of values that is always full.
///
/// `start` is the physical slot of the first logical entry, `end` the slot of
/// the last one; `end == (start + capacity - 1) % capacity` at all times.
#[derive(Debug)]
pub(crate) struct Block {
  buf: Box<[usize]>,
  start: usize,
  end: usize,
}

impl Block {
  pub(crate) fn new(capacity: usize) -> Block {
    debug_assert!(capacity >= 1);
    Block {
      buf: vec![0; capacity].into_boxed_slice(),
      start: 0,
      end: capacity - 1,
    }
  }

  pub(crate) fn len(&self) -> usize {
    self.buf.len()
  }

  pub(crate) fn physical_index(&self, offset: usize) -> usize {
    (self.start + offset) % self.buf.len()
  }

  pub(crate) fn get(&self, physical: usize) -> usize {
    self.buf[physical]
  }

  pub(crate) fn put(&mut self, physical: usize, value: usize) {
    self.buf[physical] = value;
  }

  pub(crate) fn first(&self) -> usize {
    self.buf[self.start]
  }

  pub(crate) fn set_last(&mut self, value: usize) {
    self.buf[self.end] = value;
  }

  /// Closes the gap at `removed` by pulling every later slot one step back.
  /// The `end` slot is left stale; the caller must `set_last` afterwards.
  pub(crate) fn shift_toward_removed(&mut self, mut removed: usize) {
    debug_assert!(removed < self.buf.len());
    while removed != self.end {
      let next = (removed + 1) % self.buf.len();
      self.buf[removed] = self.buf[next];
      removed = next;
    }
  }

  pub(crate) fn advance_start(&mut self) {
    self.start = (self.start + 1) % self.buf.len();
  }

  pub(crate) fn advance_end(&mut self) {
    self.end = (self.end + 1) % self.buf.len();
  }

  pub(crate) fn iter(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
    (0..self.buf.len()).map(|offset| self.buf[self.physical_index(offset)])
  }
}

#[test]
fn test_block() {
  use std::collections::VecDeque;

  arbtest::arbtest(|u| {
    let capacity = u.int_in_range(1..=10)?;
    let mut block = Block::new(capacity);
    for offset in 0..capacity {
      block.put(offset, offset);
    }
    let mut block_model: VecDeque<usize> = (0..capacity).collect();
    let mut value_next = capacity;

    while !u.is_empty() {
      match *u.choose(&["remove", "donate"])? {
        "remove" => {
          let offset = u.int_in_range(0..=capacity - 1)?;
          let physical = block.physical_index(offset);
          let value = block.get(physical);
          block.shift_toward_removed(physical);
          block.set_last(value_next);

          assert_eq!(block_model.remove(offset), Some(value));
          block_model.push_back(value_next);
        }
        "donate" => {
          let value = block.first();
          block.advance_start();
          block.advance_end();
          block.set_last(value_next);

          assert_eq!(block_model.pop_front(), Some(value));
          block_model.push_back(value_next);
        }
        _ => unreachable!(),
      }
      value_next += 1;
      assert_eq!(block.len(), capacity);
      assert!(block.iter().eq(block_model.iter().copied()));
    }
    Ok(())
  });
}

#[test]
fn test_shift_wraps_around() {
  let mut block = Block::new(4);
  for offset in 0..4 {
    block.put(offset, offset + 1);
  }
  block.advance_start();
  block.advance_end();
  block.advance_start();
  block.advance_end();
  assert_eq!(block.iter().collect::<Vec<_>>(), vec![3, 4, 1, 2]);

  let physical = block.physical_index(1);
  assert_eq!(physical, 3);
  block.shift_toward_removed(physical);
  block.set_last(9);
  assert_eq!(block.iter().collect::<Vec<_>>(), vec![3, 1, 2, 9]);
}
