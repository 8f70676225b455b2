//! Core type aliases, identity types, and constants for pokertracker.
//!
//! This crate provides the foundational types and configuration parameters
//! used throughout the pokertracker workspace.

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Chip amounts in big blinds. Fractional because the small blind posts 0.5.
pub type Chips = f64;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
///
/// Fresh IDs are uuid v7, so their lexicographic order tracks creation time.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

// ============================================================================
// ACCOUNTING PARAMETERS
// ============================================================================
/// Pot seeded by the posted blinds before any recorded action.
pub const BLINDS: Chips = 1.5;
/// Default stack behind at the start of a recorded hand.
pub const STACK: Chips = 100.0;
/// Maximum hole cards per hand.
pub const HOLE_MAX: usize = 2;
/// Maximum community cards per hand.
pub const BOARD_MAX: usize = 5;

// ============================================================================
// SYNC QUEUE PARAMETERS
// ============================================================================
/// Delivery attempts before a queue item is terminally failed.
pub const MAX_RETRIES: u32 = 3;
/// Queue items claimed per worker cycle.
pub const CLAIM_BATCH: usize = 10;
/// Seconds between worker polls of the queue.
pub const POLL_SECS: u64 = 30;
/// Seconds a claim may sit in processing before it is presumed dead.
pub const LIVENESS_SECS: u64 = 300;
/// Seconds allowed per delivery attempt before it counts as retryable.
pub const ATTEMPT_SECS: u64 = 20;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Global interrupt flag for graceful shutdown coordination.
#[cfg(feature = "server")]
static INTERRUPTED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if graceful shutdown was requested.
#[cfg(feature = "server")]
pub fn interrupted() -> bool {
    INTERRUPTED.load(std::sync::atomic::Ordering::Relaxed)
}
/// No-op interrupt check when server feature disabled.
#[cfg(not(feature = "server"))]
pub fn interrupted() -> bool {
    false
}

/// Register Ctrl+C handler for graceful termination.
/// The first signal raises the interrupt flag so in-flight batches finish;
/// the second exits immediately.
#[cfg(feature = "server")]
pub fn trap() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.expect("install signal handler");
        log::warn!("interrupt received, finishing current batch");
        INTERRUPTED.store(true, std::sync::atomic::Ordering::Relaxed);
        tokio::signal::ctrl_c().await.expect("install signal handler");
        log::warn!("second interrupt, exiting immediately");
        std::process::exit(0);
    });
}
