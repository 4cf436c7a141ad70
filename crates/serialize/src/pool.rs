use std::{cell::RefCell, sync::Arc};

use thread_local::ThreadLocal;

use crate::{BitWriter, Registry};

/// Per-thread free lists of writer buffers.
///
/// Handing a writer back with [`recycle`](Self::recycle) keeps its
/// allocation around for the next [`writer`](Self::writer) call on the same
/// thread.
#[derive(Debug, Default)]
pub struct BufferPool {
    pool: ThreadLocal<RefCell<Vec<Vec<u8>>>>,
    registry: Option<Arc<Registry>>,
}

impl BufferPool {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self { pool: ThreadLocal::new(), registry: None }
    }

    /// Attaches a registry to every writer the pool hands out.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Returns an empty writer, reusing a recycled buffer if this thread has
    /// one.
    pub fn writer(&self) -> BitWriter {
        let cell = self.pool.get_or(|| RefCell::new(Vec::new()));
        let buffer = cell.borrow_mut().pop().unwrap_or_default();

        let writer = BitWriter::from_buffer(buffer);
        match &self.registry {
            Some(registry) => writer.with_registry(registry.clone()),
            None => writer,
        }
    }

    /// Takes back a writer's buffer. The contents are discarded; the
    /// capacity is kept.
    pub fn recycle(&self, writer: BitWriter) {
        let mut buffer = writer.into_inner();
        buffer.clear();

        let cell = self.pool.get_or(|| RefCell::new(Vec::new()));
        cell.borrow_mut().push(buffer);
    }

    /// Number of buffers waiting on the current thread.
    pub fn available(&self) -> usize {
        self.pool.get().map_or(0, |cell| cell.borrow().len())
    }
}

#[cfg(test)]
mod test {
    use super::BufferPool;

    #[test]
    fn recycled_buffer_keeps_capacity() {
        let pool = BufferPool::new();

        let mut writer = pool.writer();
        writer.encode(&[0u64; 32]).unwrap();
        assert_eq!(writer.len(), 8 + 32 * 8);
        pool.recycle(writer);

        assert_eq!(pool.available(), 1);

        let writer = pool.writer();
        assert!(writer.is_empty());
        assert!(writer.into_inner().capacity() >= 8 + 32 * 8);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn pools_are_per_thread() {
        let pool = BufferPool::new();
        pool.recycle(pool.writer());

        std::thread::scope(|scope| {
            scope.spawn(|| assert_eq!(pool.available(), 0));
        });

        assert_eq!(pool.available(), 1);
    }
}
