// sigfeat - scalar feature descriptors for acoustic emission signals
//
// Callers supply borrowed buffers (a time-domain waveform and/or its
// precomputed one-sided spectrum) plus a sampling rate; the library returns
// f32 metrics. Derived quantities shared between features are memoized in a
// fixed-capacity cache attached to the ExecutionContext, and every feature
// is addressable by its kebab-case identifier through the algorithm
// registry.
//
// Concurrency contract: all operations are synchronous and unsynchronized.
// Feature functions are pure and may run concurrently on distinct
// ExecutionContext/Cache instances; a single cache must never be shared
// across threads without external locking.
//
// Module organization:
// - context: ExecutionContext, logging sink, scratch allocators
// - cache: per-result-type FIFO memoization storage
// - hash: cache-key construction (hash_combine, content hashing)
// - features: the feature battery (temporal + spectral)
// - registry: name-driven dynamic dispatch over the battery
// - testing: fixture records consumed by the integration suite

pub mod cache;
pub mod context;
pub mod features;
pub mod hash;
pub mod registry;
pub mod testing;

pub use cache::{cached, make_cache, Cache, CacheKey, FuncId, CACHE_CAPACITY};
pub use context::{
    log, CallSite, ExecutionContext, LogFacadeSink, LogLevel, LogSink, PoolAllocator,
    ScratchAllocator, ScratchBuffer, SystemAllocator,
};
pub use features::Input;
pub use registry::{
    identifiers, make_algorithm, Algorithm, AlgorithmInfo, ParameterDescriptor, ParameterType,
};
