use crate::flow::{Format, SampleBlock};
use crate::prelude::{check_format, ChainResult};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

static NEXT_LINK_ID: AtomicU64 = AtomicU64::new(1);

/// Connection between one stage's output and the next stage's input.
///
/// Clones share the same buffer, so a writer and a reader each hold a handle.
#[derive(Clone)]
pub struct Link {
    inner: Arc<LinkInner>,
}

struct LinkInner {
    id: u64,
    format: Format,
    queue: Mutex<VecDeque<SampleBlock>>,
}

impl Link {
    pub fn new(format: Format) -> Self {
        Self {
            inner: Arc::new(LinkInner {
                id: NEXT_LINK_ID.fetch_add(1, Ordering::Relaxed),
                format,
                queue: Mutex::new(VecDeque::new()),
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn format(&self) -> Format {
        self.inner.format
    }

    /// True when both handles refer to the same buffer.
    pub fn same_as(&self, other: &Link) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn push(&self, block: SampleBlock) -> ChainResult<()> {
        check_format(self.format(), block.format())?;
        if let Ok(mut queue) = self.inner.queue.lock() {
            queue.push_back(block);
        }
        Ok(())
    }

    pub fn pop(&self) -> Option<SampleBlock> {
        self.inner
            .queue
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
    }

    /// Removes and returns every queued block in arrival order.
    pub fn drain(&self) -> Vec<SampleBlock> {
        if let Ok(mut queue) = self.inner.queue.lock() {
            queue.drain(..).collect()
        } else {
            Vec::new()
        }
    }

    /// Number of queued blocks.
    pub fn pending(&self) -> usize {
        self.inner.queue.lock().map(|queue| queue.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("id", &self.inner.id)
            .field("format", &self.inner.format)
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::ChainError;

    #[test]
    fn clones_share_one_buffer() {
        let writer = Link::new(Format::Float);
        let reader = writer.clone();
        writer.push(SampleBlock::Float(vec![1.0, 2.0])).unwrap();

        assert!(reader.same_as(&writer));
        assert_eq!(reader.id(), writer.id());
        assert_eq!(reader.pop(), Some(SampleBlock::Float(vec![1.0, 2.0])));
        assert!(writer.is_empty());
    }

    #[test]
    fn distinct_links_get_distinct_ids() {
        let a = Link::new(Format::Float);
        let b = Link::new(Format::Float);
        assert_ne!(a.id(), b.id());
        assert!(!a.same_as(&b));
    }

    #[test]
    fn push_rejects_foreign_format() {
        let link = Link::new(Format::ComplexFloat);
        let err = link.push(SampleBlock::Float(vec![0.0])).unwrap_err();
        assert_eq!(
            err,
            ChainError::FormatMismatch {
                expected: Format::ComplexFloat,
                actual: Format::Float,
            }
        );
        assert_eq!(link.pending(), 0);
    }

    #[test]
    fn drain_preserves_arrival_order() {
        let link = Link::new(Format::Short);
        link.push(SampleBlock::Short(vec![1])).unwrap();
        link.push(SampleBlock::Short(vec![2, 3])).unwrap();

        let blocks = link.drain();
        assert_eq!(
            blocks,
            vec![SampleBlock::Short(vec![1]), SampleBlock::Short(vec![2, 3])]
        );
        assert!(link.is_empty());
    }
}
