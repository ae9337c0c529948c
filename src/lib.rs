//! Most-recently-used queue over `1..=upper_limit`.
//!
//! `fetch(k)` returns the value at 1-based position `k` and moves it to the
//! back. Values are kept in `ceil(sqrt(n))`-sized ring blocks, so a fetch costs
//! one in-block shift plus one hand-off per later block: `O(sqrt(n))`.
mod block;
mod error;

use tracing::{debug, trace, warn};

use crate::block::Block;
pub use crate::error::{Error, Result};

#[derive(Debug)]
pub struct MruQueue {
  len: usize,
  /// Size of every block but the last, which may be shorter.
  block_capacity: usize,
  blocks: Box<[Block]>,
}

impl MruQueue {
  pub fn new(upper_limit: usize) -> Result<MruQueue> {
    if upper_limit == 0 {
      return Err(Error::InvalidArgument);
    }
    let block_capacity = ceil_sqrt(upper_limit);
    let block_count = upper_limit.div_ceil(block_capacity);

    let mut blocks = Vec::with_capacity(block_count);
    for n in 1..=upper_limit {
      let offset = (n - 1) % block_capacity;
      if offset == 0 {
        let block_index = blocks.len();
        let last_len = match upper_limit % block_capacity {
          0 => block_capacity,
          rem => rem,
        };
        let size = if block_index + 1 < block_count {
          block_capacity
        } else {
          last_len
        };
        blocks.push(Block::new(size));
      }
      // `start` is 0 on a fresh block, so the physical slot is the offset.
      if let Some(block) = blocks.last_mut() {
        block.put(offset, n);
      }
    }
    debug_assert_eq!(blocks.len(), block_count);
    debug_assert_eq!(blocks.iter().map(Block::len).sum::<usize>(), upper_limit);

    debug!(upper_limit, block_capacity, block_count, "built mru queue");
    Ok(MruQueue {
      len: upper_limit,
      block_capacity,
      blocks: blocks.into_boxed_slice(),
    })
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn block_capacity(&self) -> usize {
    self.block_capacity
  }

  pub fn block_count(&self) -> usize {
    self.blocks.len()
  }

  /// Returns the value at 1-based `index` and moves it to the back.
  ///
  /// On error the queue is left untouched.
  pub fn fetch(&mut self, index: usize) -> Result<usize> {
    if index == 0 || index > self.len {
      warn!(index, len = self.len, "fetch index out of range");
      return Err(Error::IndexOutOfRange {
        index,
        len: self.len,
      });
    }
    let block_index = (index - 1) / self.block_capacity;
    let block = &mut self.blocks[block_index];
    let removed = block.physical_index((index - 1) % self.block_capacity);
    let value = block.get(removed);
    block.shift_toward_removed(removed);

    // Each later block hands its front value to the gap at the end of the
    // previous one, so only the last block ends up with a free slot.
    let last = self.blocks.len() - 1;
    for i in block_index..last {
      let donated = self.blocks[i + 1].first();
      self.blocks[i].set_last(donated);
      self.blocks[i + 1].advance_start();
      self.blocks[i + 1].advance_end();
    }
    self.blocks[last].set_last(value);

    trace!(index, block = block_index, value, "fetched");
    Ok(value)
  }

  /// Current order, front to back.
  pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
    self.blocks.iter().flat_map(Block::iter)
  }
}

fn ceil_sqrt(n: usize) -> usize {
  let mut root = (n as f64).sqrt() as usize;
  while root * root < n {
    root += 1;
  }
  while root > 1 && (root - 1) * (root - 1) >= n {
    root -= 1;
  }
  root
}

#[cfg(test)]
fn contents(queue: &MruQueue) -> Vec<usize> {
  queue.iter().collect()
}

#[test]
fn test_queue() {
  arbtest::arbtest(|u| {
    let upper_limit = u.int_in_range(1..=50)?;
    let mut queue = MruQueue::new(upper_limit).unwrap();
    let mut queue_model: Vec<usize> = (1..=upper_limit).collect();

    while !u.is_empty() {
      let index = u.int_in_range(1..=upper_limit)?;
      let value = queue.fetch(index).unwrap();
      let value_model = queue_model.remove(index - 1);
      queue_model.push(value_model);
      assert_eq!(value, value_model);
      assert_eq!(contents(&queue), queue_model);
      assert_eq!(queue.fetch(upper_limit), Ok(value));
    }

    let mut sorted = contents(&queue);
    sorted.sort_unstable();
    assert!(sorted.into_iter().eq(1..=upper_limit));
    Ok(())
  });
}

#[test]
fn test_fresh_queue_reads_in_order() {
  for upper_limit in 1..=40 {
    for index in 1..=upper_limit {
      let mut queue = MruQueue::new(upper_limit).unwrap();
      assert_eq!(queue.fetch(index), Ok(index));
    }
  }
}

#[test]
fn test_scenario() {
  let mut queue = MruQueue::new(8).unwrap();
  assert_eq!(contents(&queue), [1, 2, 3, 4, 5, 6, 7, 8]);

  assert_eq!(queue.fetch(3), Ok(3));
  assert_eq!(contents(&queue), [1, 2, 4, 5, 6, 7, 8, 3]);
  assert_eq!(queue.fetch(5), Ok(6));
  assert_eq!(contents(&queue), [1, 2, 4, 5, 7, 8, 3, 6]);
  assert_eq!(queue.fetch(2), Ok(2));
  assert_eq!(contents(&queue), [1, 4, 5, 7, 8, 3, 6, 2]);
  assert_eq!(queue.fetch(8), Ok(2));
  assert_eq!(contents(&queue), [1, 4, 5, 7, 8, 3, 6, 2]);
}

#[test]
fn test_single_element() {
  let mut queue = MruQueue::new(1).unwrap();
  assert_eq!((queue.block_capacity(), queue.block_count()), (1, 1));
  for _ in 0..3 {
    assert_eq!(queue.fetch(1), Ok(1));
  }
  assert_eq!(contents(&queue), [1]);
}

#[test]
fn test_short_last_block() {
  for (upper_limit, block_capacity, block_count, last_len) in
    [(8, 3, 3, 2), (9, 3, 3, 3), (10, 4, 3, 2), (11, 4, 3, 3)]
  {
    let mut queue = MruQueue::new(upper_limit).unwrap();
    assert_eq!(queue.block_capacity(), block_capacity);
    assert_eq!(queue.block_count(), block_count);
    let sizes: Vec<usize> = queue.blocks.iter().map(Block::len).collect();
    assert!(sizes[..block_count - 1].iter().all(|&it| it == block_capacity));
    assert_eq!(sizes[block_count - 1], last_len);

    assert_eq!(queue.fetch(1), Ok(1));
    let mut expected: Vec<usize> = (2..=upper_limit).collect();
    expected.push(1);
    assert_eq!(contents(&queue), expected);
  }
}

#[test]
fn test_invalid_input() {
  assert_eq!(MruQueue::new(0).unwrap_err(), Error::InvalidArgument);

  let mut queue = MruQueue::new(5).unwrap();
  queue.fetch(2).unwrap();
  let before = contents(&queue);
  for index in [0, 6, usize::MAX] {
    assert_eq!(
      queue.fetch(index),
      Err(Error::IndexOutOfRange { index, len: 5 })
    );
  }
  assert_eq!(contents(&queue), before);
  assert_eq!(
    Error::IndexOutOfRange { index: 6, len: 5 }.to_string(),
    "index 6 out of range 1..=5"
  );
}

#[test]
fn test_ceil_sqrt() {
  let cases = [(1, 1), (2, 2), (4, 2), (5, 3), (8, 3), (9, 3), (10, 4), (2000, 45)];
  for (n, root) in cases {
    assert_eq!(ceil_sqrt(n), root);
  }
}
