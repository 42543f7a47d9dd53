// ExecutionContext - caller-owned environment for feature computation
//
// Every feature function receives a context carrying the three ambient
// capabilities of the library: a logging sink, a scratch allocator for
// transient buffers, and an optional memoization cache. The context is
// constructed once by the caller and reused across many calls; the library
// never creates or destroys one on its own.

use std::cell::RefCell;
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::cache::Cache;

/// Severity levels for context logging, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    Trace = 0,
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

/// Source location attached to every log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Destination for log records routed through [`log`].
///
/// Any `Fn(LogLevel, &str, CallSite)` closure is a sink, so tests can capture
/// records without a custom type.
pub trait LogSink {
    fn log(&self, level: LogLevel, message: &str, site: CallSite);
}

impl<F> LogSink for F
where
    F: Fn(LogLevel, &str, CallSite),
{
    fn log(&self, level: LogLevel, message: &str, site: CallSite) {
        self(level, message, site)
    }
}

/// Sink forwarding context records to the `log` crate facade.
///
/// `Fatal` has no facade counterpart and maps to [`log::Level::Error`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacadeSink;

fn facade_level(level: LogLevel) -> log::Level {
    match level {
        LogLevel::Trace => log::Level::Trace,
        LogLevel::Debug => log::Level::Debug,
        LogLevel::Info => log::Level::Info,
        LogLevel::Warning => log::Level::Warn,
        LogLevel::Error | LogLevel::Fatal => log::Level::Error,
    }
}

impl LogSink for LogFacadeSink {
    fn log(&self, level: LogLevel, message: &str, site: CallSite) {
        log::logger().log(
            &log::Record::builder()
                .args(format_args!("{message}"))
                .level(facade_level(level))
                .target("sigfeat")
                .file(Some(site.file))
                .line(Some(site.line))
                .build(),
        );
    }
}

/// Allocation capability for transient f32 buffers.
///
/// Feature functions draw short-lived scratch storage (prefix sums and the
/// like) through this trait so latency-sensitive callers can substitute a
/// pooled strategy. Buffers never outlive the call that requested them.
pub trait ScratchAllocator {
    /// Hand out a zero-filled buffer of exactly `len` elements.
    fn take(&self, len: usize) -> ScratchBuffer<'_>;

    /// Return a buffer's storage after use. The default drops it.
    fn recycle(&self, buffer: Vec<f32>) {
        drop(buffer);
    }
}

/// Scratch storage handed out by a [`ScratchAllocator`].
///
/// Dereferences to `[f32]` and returns its storage to the allocator on drop.
pub struct ScratchBuffer<'a> {
    data: Vec<f32>,
    owner: &'a dyn ScratchAllocator,
}

impl<'a> ScratchBuffer<'a> {
    pub fn new(data: Vec<f32>, owner: &'a dyn ScratchAllocator) -> Self {
        Self { data, owner }
    }
}

impl Deref for ScratchBuffer<'_> {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.data
    }
}

impl DerefMut for ScratchBuffer<'_> {
    fn deref_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }
}

impl Drop for ScratchBuffer<'_> {
    fn drop(&mut self) {
        self.owner.recycle(std::mem::take(&mut self.data));
    }
}

/// Default allocator: a fresh heap buffer per request.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl ScratchAllocator for SystemAllocator {
    fn take(&self, len: usize) -> ScratchBuffer<'_> {
        ScratchBuffer::new(vec![0.0; len], self)
    }
}

static SYSTEM_ALLOCATOR: SystemAllocator = SystemAllocator;

/// Pooled allocator recycling a fixed set of pre-allocated buffers.
///
/// All pool allocations happen in [`PoolAllocator::new`]; `take` falls back to
/// a fresh heap buffer when the pool is exhausted or the request exceeds the
/// pooled buffer length. Not thread-safe, like everything else in this crate:
/// one pool per thread.
#[derive(Debug)]
pub struct PoolAllocator {
    buffers: RefCell<Vec<Vec<f32>>>,
    buffer_count: usize,
    buffer_len: usize,
}

impl PoolAllocator {
    /// Pre-allocate `buffer_count` buffers of `buffer_len` elements each.
    ///
    /// # Panics
    /// Panics if `buffer_count` or `buffer_len` is 0.
    pub fn new(buffer_count: usize, buffer_len: usize) -> Self {
        assert!(buffer_count > 0, "buffer_count must be greater than 0");
        assert!(buffer_len > 0, "buffer_len must be greater than 0");
        let buffers = (0..buffer_count)
            .map(|_| Vec::with_capacity(buffer_len))
            .collect();
        Self {
            buffers: RefCell::new(buffers),
            buffer_count,
            buffer_len,
        }
    }

    /// Number of buffers currently available in the pool.
    pub fn available(&self) -> usize {
        self.buffers.borrow().len()
    }
}

impl ScratchAllocator for PoolAllocator {
    fn take(&self, len: usize) -> ScratchBuffer<'_> {
        if len <= self.buffer_len {
            if let Some(mut buffer) = self.buffers.borrow_mut().pop() {
                buffer.clear();
                buffer.resize(len, 0.0);
                return ScratchBuffer::new(buffer, self);
            }
        }
        ScratchBuffer::new(vec![0.0; len], self)
    }

    fn recycle(&self, buffer: Vec<f32>) {
        let mut buffers = self.buffers.borrow_mut();
        if buffer.capacity() >= self.buffer_len && buffers.len() < self.buffer_count {
            buffers.push(buffer);
        }
    }
}

/// Passive bundle of logger, allocator and optional cache.
///
/// Fields are public and caller-managed, mirroring how the context is built
/// once and threaded by reference through every operation. A context holding
/// a cache must not be shared across threads; see the crate-level concurrency
/// notes.
pub struct ExecutionContext<'a> {
    pub logger: Option<&'a dyn LogSink>,
    pub log_level: LogLevel,
    pub allocator: &'a dyn ScratchAllocator,
    pub cache: Option<&'a mut Cache>,
}

impl<'a> ExecutionContext<'a> {
    /// Context with no logger, `Trace` threshold, the system allocator and no
    /// cache.
    pub fn new() -> Self {
        Self {
            logger: None,
            log_level: LogLevel::Trace,
            allocator: &SYSTEM_ALLOCATOR,
            cache: None,
        }
    }

    /// Attach a cache, consuming the context builder-style.
    pub fn with_cache(mut self, cache: &'a mut Cache) -> Self {
        self.cache = Some(cache);
        self
    }
}

impl Default for ExecutionContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExecutionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("logger", &self.logger.is_some())
            .field("log_level", &self.log_level)
            .field("cache", &self.cache.is_some())
            .finish()
    }
}

/// Route a record to the context logger, if one is attached.
///
/// Records below `ctx.log_level` are dropped.
pub fn log(ctx: &ExecutionContext<'_>, level: LogLevel, message: &str, site: CallSite) {
    if level < ctx.log_level {
        return;
    }
    if let Some(sink) = ctx.logger {
        sink.log(level, message, site);
    }
}

/// Log through a context with `format!` arguments and an implicit call site.
///
/// Formatting is skipped entirely when no logger is attached or the level is
/// below the context threshold.
#[macro_export]
macro_rules! ctx_log {
    ($ctx:expr, $level:expr, $($arg:tt)+) => {{
        let ctx = &*$ctx;
        if ctx.logger.is_some() && $level >= ctx.log_level {
            $crate::context::log(
                ctx,
                $level,
                &format!($($arg)+),
                $crate::context::CallSite {
                    file: file!(),
                    line: line!(),
                },
            );
        }
    }};
}
