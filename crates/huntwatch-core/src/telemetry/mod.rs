//! The reader facade: one attached process, one snapshot cache.
//!
//! `TelemetryReader` is the only entry point consumers need. It owns the
//! process handle and the cache behind a single lock, so concurrent callers
//! inside the cache window share one decode pass and never see a partially
//! built snapshot.
//!
//! ## Example
//!
//! ```ignore
//! use huntwatch_core::offset::builtin_offsets;
//! use huntwatch_core::telemetry::{ReaderConfig, TelemetryReader};
//!
//! let config = ReaderConfig::builder()
//!     .cache_window(Duration::from_millis(250))
//!     .build();
//! let reader = TelemetryReader::with_config(builtin_offsets(), config);
//!
//! if reader.connect() {
//!     let weapon = reader.get_weapon();
//!     println!("{:?}", weapon.value);
//! }
//! ```
//!
//! Reconnection is left to the caller: once the game exits every getter
//! returns a disconnected sentinel until `connect()` succeeds again.

mod decode;

pub use decode::decode_snapshot;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::game::{
    AbnormalityState, DamageEntry, EquipmentInfo, MonsterEntry, PlayerInfo, SkillEntry,
    WeaponInfo, ZoneInfo,
};
use crate::memory::layout::timing;
use crate::memory::{
    DEFAULT_PROCESS_NAME, ProcessInfo, ProcessMemory, ProcessProvider, SystemProcessProvider,
};
use crate::offset::OffsetTable;
use crate::snapshot::{Reading, Snapshot, SnapshotCache};

/// Configuration for the telemetry reader
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Executable name to attach to
    pub process_name: String,
    /// How long a cached snapshot is served before re-decoding
    pub cache_window: Duration,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            cache_window: Duration::from_millis(timing::CACHE_WINDOW_MS),
        }
    }
}

impl ReaderConfig {
    /// Create a new configuration builder
    pub fn builder() -> ReaderConfigBuilder {
        ReaderConfigBuilder::default()
    }
}

/// Builder for ReaderConfig
#[derive(Debug, Clone, Default)]
pub struct ReaderConfigBuilder {
    process_name: Option<String>,
    cache_window: Option<Duration>,
}

impl ReaderConfigBuilder {
    /// Set the target executable name
    pub fn process_name<S: Into<String>>(mut self, name: S) -> Self {
        self.process_name = Some(name.into());
        self
    }

    /// Set the snapshot cache window
    pub fn cache_window(mut self, window: Duration) -> Self {
        self.cache_window = Some(window);
        self
    }

    /// Build the configuration
    pub fn build(self) -> ReaderConfig {
        let default = ReaderConfig::default();
        ReaderConfig {
            process_name: self.process_name.unwrap_or(default.process_name),
            cache_window: self.cache_window.unwrap_or(default.cache_window),
        }
    }
}

/// Counters describing how the reader has been used
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReaderStats {
    /// Full decode passes against process memory
    pub decode_passes: u64,
    /// Snapshot requests served from the cache
    pub cache_hits: u64,
    /// Requests answered with the disconnected sentinel
    pub disconnected_reads: u64,
}

#[derive(Debug, Default)]
struct StatCounters {
    decode_passes: AtomicU64,
    cache_hits: AtomicU64,
    disconnected_reads: AtomicU64,
}

impl StatCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn load(&self) -> ReaderStats {
        ReaderStats {
            decode_passes: self.decode_passes.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            disconnected_reads: self.disconnected_reads.load(Ordering::Relaxed),
        }
    }
}

/// Connection state reported to consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReaderStatus {
    pub connected: bool,
    pub process: Option<ProcessInfo>,
    pub offsets_version: String,
    /// Age of the cached snapshot in milliseconds, absent when nothing is cached
    pub cache_age_ms: Option<u64>,
}

struct ReaderState<H> {
    process: Option<H>,
    cache: SnapshotCache,
}

impl<H: ProcessMemory> ReaderState<H> {
    /// Probe the attached process, dropping it if it has exited.
    fn check_alive(&mut self) -> bool {
        match &self.process {
            None => false,
            Some(process) if process.is_alive() => true,
            Some(process) => {
                info!(
                    "Game process exited ({} pid {})",
                    process.info().name,
                    process.info().pid
                );
                self.process = None;
                self.cache.invalidate();
                false
            }
        }
    }
}

/// Read-only telemetry facade over one game process
pub struct TelemetryReader<P: ProcessProvider = SystemProcessProvider> {
    provider: P,
    offsets: OffsetTable,
    config: ReaderConfig,
    state: Mutex<ReaderState<P::Process>>,
    stats: StatCounters,
}

impl TelemetryReader<SystemProcessProvider> {
    /// Create a reader for the real game process with default configuration
    pub fn new(offsets: OffsetTable) -> Self {
        Self::with_config(offsets, ReaderConfig::default())
    }

    /// Create a reader for the real game process with custom configuration
    pub fn with_config(offsets: OffsetTable, config: ReaderConfig) -> Self {
        Self::with_provider(SystemProcessProvider, offsets, config)
    }
}

impl<P: ProcessProvider> TelemetryReader<P> {
    /// Create a reader attaching through `provider`
    pub fn with_provider(provider: P, offsets: OffsetTable, config: ReaderConfig) -> Self {
        debug!(
            "Reader for {} using offsets {} (cache window {:?})",
            config.process_name, offsets.version, config.cache_window
        );
        Self {
            provider,
            offsets,
            config,
            state: Mutex::new(ReaderState {
                process: None,
                cache: SnapshotCache::new(),
            }),
            stats: StatCounters::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ReaderState<P::Process>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach to the game process, replacing any previous attachment.
    ///
    /// Returns false when the game is not running; that is not an error.
    pub fn connect(&self) -> bool {
        let mut state = self.lock();
        state.process = None;
        state.cache.invalidate();

        match self.provider.attach(&self.config.process_name) {
            Ok(process) => {
                let info = process.info();
                info!(
                    "Attached to {} (pid {}, base {:#x})",
                    info.name, info.pid, info.base_address
                );
                state.process = Some(process);
                true
            }
            Err(Error::ProcessNotFound(name)) => {
                debug!("{} is not running", name);
                false
            }
            Err(e) => {
                warn!("Failed to attach to {}: {}", self.config.process_name, e);
                false
            }
        }
    }

    /// Release the process handle. Safe to call when already disconnected.
    pub fn disconnect(&self) {
        let mut state = self.lock();
        if let Some(process) = state.process.take() {
            info!("Detached from {} (pid {})", process.info().name, process.info().pid);
        }
        state.cache.invalidate();
    }

    /// Probe the process rather than trusting the last known state.
    pub fn is_connected(&self) -> bool {
        self.lock().check_alive()
    }

    pub fn status(&self) -> ReaderStatus {
        let mut state = self.lock();
        let connected = state.check_alive();
        ReaderStatus {
            connected,
            process: state.process.as_ref().map(|p| p.info().clone()),
            offsets_version: self.offsets.version.clone(),
            cache_age_ms: state
                .cache
                .age()
                .map(|age| u64::try_from(age.as_millis()).unwrap_or(u64::MAX)),
        }
    }

    pub fn stats(&self) -> ReaderStats {
        self.stats.load()
    }

    /// Drop the cached snapshot without disconnecting.
    pub fn invalidate(&self) {
        self.lock().cache.invalidate();
    }

    pub fn offsets(&self) -> &OffsetTable {
        &self.offsets
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    fn snapshot(&self, max_age: Duration) -> Arc<Snapshot> {
        let mut state = self.lock();
        if !state.check_alive() {
            StatCounters::bump(&self.stats.disconnected_reads);
            return Arc::new(Snapshot::disconnected());
        }

        let ReaderState { process, cache } = &mut *state;
        let Some(process) = process.as_ref() else {
            return Arc::new(Snapshot::disconnected());
        };

        let mut decoded = false;
        let snapshot = cache.get(max_age, || {
            decoded = true;
            StatCounters::bump(&self.stats.decode_passes);
            decode_snapshot(process, &self.offsets)
        });

        if decoded {
            debug!(
                "Decoded snapshot: {} monsters, {} skills, {} buffs",
                snapshot.monsters.len(),
                snapshot.skills.len(),
                snapshot.abnormalities.len()
            );
        } else {
            StatCounters::bump(&self.stats.cache_hits);
        }
        snapshot
    }

    /// Snapshot no older than the configured cache window
    pub fn get_full_snapshot(&self) -> Arc<Snapshot> {
        self.snapshot(self.config.cache_window)
    }

    /// Snapshot decoded now, bypassing the cache
    pub fn get_fresh_snapshot(&self) -> Arc<Snapshot> {
        self.snapshot(Duration::ZERO)
    }

    fn project<T>(&self, project: impl FnOnce(&Snapshot) -> T) -> Reading<T> {
        Reading::from_snapshot(&self.get_full_snapshot(), project)
    }

    pub fn get_player(&self) -> Reading<PlayerInfo> {
        self.project(|s| s.player.clone())
    }

    pub fn get_weapon(&self) -> Reading<Option<WeaponInfo>> {
        self.project(|s| s.weapon.clone())
    }

    pub fn get_equipment(&self) -> Reading<EquipmentInfo> {
        self.project(|s| s.equipment)
    }

    pub fn get_monsters(&self) -> Reading<Vec<MonsterEntry>> {
        self.project(|s| s.monsters.clone())
    }

    pub fn get_skills(&self) -> Reading<Vec<SkillEntry>> {
        self.project(|s| s.skills.clone())
    }

    pub fn get_damage(&self) -> Reading<Vec<DamageEntry>> {
        self.project(|s| s.damage.clone())
    }

    pub fn get_abnormalities(&self) -> Reading<Vec<AbnormalityState>> {
        self.project(|s| s.abnormalities.clone())
    }

    pub fn get_zone(&self) -> Reading<ZoneInfo> {
        self.project(|s| s.zone)
    }

    /// Resolve one chain and read `size` bytes at the result.
    #[cfg(feature = "debug-tools")]
    pub fn probe_chain(
        &self,
        id: crate::offset::ChainId,
        size: usize,
    ) -> crate::Result<crate::debug::ChainProbe> {
        let mut state = self.lock();
        if !state.check_alive() {
            return Err(Error::ProcessNotFound(self.config.process_name.clone()));
        }
        let Some(process) = state.process.as_ref() else {
            return Err(Error::ProcessNotFound(self.config.process_name.clone()));
        };
        crate::debug::ChainProbe::capture(process, &self.offsets, id, size)
    }
}
