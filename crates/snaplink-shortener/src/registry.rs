use crate::error::{Result, ShortenerError};
use crate::state::RegistryState;
use crate::stats::{StatsQuery, StatsSummary};
use jiff::{SignedDuration, Timestamp};
use snaplink_core::validate::check_url;
use snaplink_core::{
    Category, ClickEvent, Clock, CreateRequest, Level, NoopTelemetry, RecordId, RecordStore, ShortCode,
    SystemClock, Telemetry, UrlRecord,
};
use snaplink_generator::{allocate, AllocatorSettings, Generator, RandomGenerator};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, trace, warn};
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct RegistrySettings {
    /// Used when a request carries no validity or a non-positive one.
    #[builder(default = 30)]
    pub default_validity_minutes: u32,
    #[builder(default = 5)]
    pub max_batch_size: usize,
    #[builder(default)]
    pub allocator: AllocatorSettings,
    /// Stack label attached to every telemetry event.
    #[builder(default = String::from("backend"), setter(into))]
    pub stack: String,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Owner of every [`UrlRecord`] and of the short code uniqueness invariant.
///
/// A registry is created once with [`Registry::builder`], which rehydrates
/// it from the store, and then shared behind an `Arc`. Every successful
/// mutation is flushed to the store before the write lock is released.
pub struct Registry {
    state: RwLock<RegistryState>,
    store: Arc<dyn RecordStore>,
    generator: Arc<dyn Generator<Output = ShortCode>>,
    clock: Arc<dyn Clock>,
    telemetry: Arc<dyn Telemetry>,
    settings: RegistrySettings,
}

pub struct RegistryBuilder {
    store: Arc<dyn RecordStore>,
    generator: Option<Arc<dyn Generator<Output = ShortCode>>>,
    clock: Arc<dyn Clock>,
    telemetry: Arc<dyn Telemetry>,
    settings: RegistrySettings,
}

impl RegistryBuilder {
    /// Replaces the random allocator's candidate source.
    pub fn generator(mut self, generator: impl Generator<Output = ShortCode>) -> Self {
        self.generator = Some(Arc::new(generator));
        self
    }

    pub fn clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn settings(mut self, settings: RegistrySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Loads the persisted records and hands out the registry.
    ///
    /// A store that fails to load yields an empty registry.
    pub async fn open(self) -> Registry {
        let generator = self.generator.unwrap_or_else(|| {
            Arc::new(RandomGenerator::from_settings(&self.settings.allocator))
        });

        let registry = Registry {
            state: RwLock::new(RegistryState::new()),
            store: self.store,
            generator,
            clock: self.clock,
            telemetry: self.telemetry,
            settings: self.settings,
        };
        registry.rehydrate().await;
        registry
    }
}

impl Registry {
    pub fn builder(store: Arc<dyn RecordStore>) -> RegistryBuilder {
        RegistryBuilder {
            store,
            generator: None,
            clock: Arc::new(SystemClock),
            telemetry: Arc::new(NoopTelemetry),
            settings: RegistrySettings::default(),
        }
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub fn telemetry(&self) -> Arc<dyn Telemetry> {
        self.telemetry.clone()
    }

    /// Creates one record per request, or none at all.
    ///
    /// Requests are checked in order against the stored codes and the codes
    /// reserved by earlier requests of the same batch. The first failing
    /// request aborts the batch with [`ShortenerError::Batch`] carrying its
    /// index.
    pub async fn create(&self, requests: Vec<CreateRequest>) -> Result<Vec<UrlRecord>> {
        let max = self.settings.max_batch_size;
        if requests.is_empty() || requests.len() > max {
            return Err(ShortenerError::BatchSize {
                got: requests.len(),
                max,
            });
        }

        self.emit(
            Level::Info,
            Category::Service,
            &format!("Creating {} short URLs", requests.len()),
        );

        let mut state = self.state.write().await;
        let now = self.clock.now();
        let mut reserved = HashSet::with_capacity(requests.len());
        let mut created = Vec::with_capacity(requests.len());

        for (index, request) in requests.iter().enumerate() {
            trace!(index, url = %request.original_url, "processing create request");
            let record = self
                .build_record(&state, &reserved, request, now)
                .map_err(|e| e.in_batch(index));

            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!(index, error = %e, "rejecting batch");
                    self.emit(
                        Level::Error,
                        Category::Service,
                        &format!("Failed to create short URLs: {e}"),
                    );
                    return Err(e);
                }
            };
            reserved.insert(record.short_code.clone());
            created.push(record);
        }

        state.apply_create(created.clone())?;
        for record in &created {
            info!(code = %record.short_code, url = %record.original_url, "created short url");
            self.emit(
                Level::Info,
                Category::Service,
                &format!(
                    "Created short URL: {} -> {}",
                    record.short_code, record.original_url
                ),
            );
        }

        self.persist(&state).await;
        Ok(created)
    }

    /// Returns a copy of the record with `code`, expired or not.
    pub async fn find_by_code(&self, code: &str) -> Option<UrlRecord> {
        self.state.read().await.find_by_code(code).cloned()
    }

    pub async fn find_by_id(&self, id: &RecordId) -> Option<UrlRecord> {
        self.state.read().await.find_by_id(id).cloned()
    }

    /// Stores a record previously read from this registry with new clicks
    /// appended.
    ///
    /// Fails with [`ShortenerError::Conflict`] when the stored record gained
    /// clicks the caller has not seen.
    pub async fn update(&self, record: UrlRecord) -> Result<()> {
        let mut state = self.state.write().await;
        let code = record.short_code.clone();

        if let Err(e) = state.apply_update(record) {
            debug!(code = %code, error = %e, "rejected record update");
            return Err(e);
        }

        trace!(code = %code, "updated record");
        self.persist(&state).await;
        Ok(())
    }

    /// Appends one click to the record with `id`, stamped with the current
    /// time, and returns the stored record.
    ///
    /// The read, the expiry check and the append happen under one write lock,
    /// so concurrent clicks are never lost and a click never lands after
    /// `expires_at`. An expired record fails with [`ShortenerError::Expired`]
    /// and is left untouched.
    pub async fn record_click(
        &self,
        id: &RecordId,
        source: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<UrlRecord> {
        let mut state = self.state.write().await;
        let event = ClickEvent {
            timestamp: self.clock.now(),
            source: source.into(),
            location: location.into(),
        };

        let clicked = match state.apply_click(id, event) {
            Ok(record) => record.clone(),
            Err(e) => {
                debug!(id = %id, error = %e, "rejected click");
                return Err(e);
            }
        };

        trace!(code = %clicked.short_code, clicks = clicked.click_count, "recorded click");
        self.persist(&state).await;
        Ok(clicked)
    }

    /// Lists records matching `query.filter`, ordered by `query.sort`.
    pub async fn list(&self, query: StatsQuery) -> Vec<UrlRecord> {
        let now = self.clock.now();
        let mut records: Vec<UrlRecord> = self
            .state
            .read()
            .await
            .records()
            .iter()
            .filter(|r| query.filter.matches(r, now))
            .cloned()
            .collect();
        query.sort.apply(&mut records);
        records
    }

    pub async fn summary(&self) -> StatsSummary {
        let now = self.clock.now();
        StatsSummary::collect(self.state.read().await.records(), now)
    }

    /// All records in creation order.
    pub async fn records(&self) -> Vec<UrlRecord> {
        self.state.read().await.records().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.is_empty()
    }

    fn build_record(
        &self,
        state: &RegistryState,
        reserved: &HashSet<ShortCode>,
        request: &CreateRequest,
        now: Timestamp,
    ) -> Result<UrlRecord> {
        let original_url = request.original_url.trim();
        check_url(original_url).map_err(|reason| ShortenerError::InvalidUrl(reason.to_string()))?;

        let validity_minutes = self.validity_of(request)?;
        let short_code = self.short_code_for(state, reserved, request)?;

        let expires_at = now
            .checked_add(SignedDuration::from_mins(i64::from(validity_minutes)))
            .map_err(|e| ShortenerError::InvalidValidity(e.to_string()))?;

        Ok(UrlRecord {
            id: RecordId::new(),
            original_url: original_url.to_string(),
            short_code,
            created_at: now,
            expires_at,
            validity_minutes,
            click_count: 0,
            clicks: Vec::new(),
        })
    }

    fn validity_of(&self, request: &CreateRequest) -> Result<u32> {
        match request.validity_minutes {
            Some(minutes) if minutes > 0 => u32::try_from(minutes).map_err(|_| {
                ShortenerError::InvalidValidity(format!("{minutes} minutes is out of range"))
            }),
            _ => Ok(self.settings.default_validity_minutes),
        }
    }

    fn short_code_for(
        &self,
        state: &RegistryState,
        reserved: &HashSet<ShortCode>,
        request: &CreateRequest,
    ) -> Result<ShortCode> {
        let is_taken = |code: &ShortCode| state.contains_code(code.as_str()) || reserved.contains(code);

        match request.custom_code() {
            Some(custom) => {
                let code = ShortCode::new(custom)?;
                if is_taken(&code) {
                    return Err(ShortenerError::ShortCodeTaken(code.to_string()));
                }
                Ok(code)
            }
            None => {
                let code = allocate(
                    self.generator.as_ref(),
                    self.settings.allocator.max_attempts,
                    is_taken,
                )?;
                self.emit(
                    Level::Debug,
                    Category::Utils,
                    &format!("Generated shortcode: {code}"),
                );
                Ok(code)
            }
        }
    }

    async fn rehydrate(&self) {
        let mut state = self.state.write().await;
        match self.store.load().await {
            Ok(records) => {
                let report = state.apply_load(records);
                info!(
                    loaded = report.loaded,
                    dropped = report.dropped_duplicates,
                    repaired = report.repaired_counters,
                    "rehydrated registry"
                );
                self.emit(
                    Level::Info,
                    Category::State,
                    &format!("Loaded {} URLs from storage", report.loaded),
                );
            }
            Err(e) => {
                error!(error = %e, "failed to load persisted records, starting empty");
                self.emit(
                    Level::Error,
                    Category::State,
                    "Failed to load URLs from storage",
                );
            }
        }
    }

    async fn persist(&self, state: &RegistryState) {
        match self.store.save(state.records()).await {
            Ok(()) => {
                debug!(records = state.len(), "saved records");
                self.emit(Level::Debug, Category::State, "URLs saved to storage");
            }
            Err(e) => {
                error!(error = %e, "failed to save records");
                self.emit(
                    Level::Error,
                    Category::Storage,
                    &format!("Failed to save URLs to storage: {e}"),
                );
            }
        }
    }

    fn emit(&self, level: Level, category: Category, message: &str) {
        self.telemetry
            .emit(&self.settings.stack, level, category, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use snaplink_core::{ManualClock, StorageError};
    use snaplink_generator::SeqGenerator;
    use snaplink_storage::InMemoryStore;

    fn start() -> Timestamp {
        "2024-03-01T12:00:00Z".parse().unwrap()
    }

    async fn registry(store: Arc<InMemoryStore>, clock: ManualClock) -> Registry {
        Registry::builder(store)
            .generator(SeqGenerator::with_prefix("sl"))
            .clock(clock)
            .open()
            .await
    }

    fn req(url: &str) -> CreateRequest {
        CreateRequest::new(url)
    }

    #[derive(Default)]
    struct Recorded(Mutex<Vec<(Level, Category, String)>>);

    impl Telemetry for Recorded {
        fn emit(&self, _stack: &str, level: Level, category: Category, message: &str) {
            self.0.lock().push((level, category, message.to_string()));
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl RecordStore for BrokenStore {
        async fn load(&self) -> snaplink_core::store::Result<Vec<UrlRecord>> {
            Err(StorageError::Unavailable("disk on fire".into()))
        }

        async fn save(&self, _records: &[UrlRecord]) -> snaplink_core::store::Result<()> {
            Err(StorageError::Unavailable("disk on fire".into()))
        }
    }

    #[tokio::test]
    async fn create_assigns_distinct_codes_and_exact_expiry() {
        let registry = registry(Arc::new(InMemoryStore::new()), ManualClock::new(start())).await;

        let created = registry
            .create(vec![
                req("https://example.com/a").with_validity(1),
                req("https://example.com/b").with_validity(45),
                req("https://example.com/c"),
            ])
            .await
            .unwrap();

        let codes: HashSet<_> = created.iter().map(|r| r.short_code.clone()).collect();
        assert_eq!(codes.len(), 3);
        for record in &created {
            assert_eq!(record.created_at, start());
            assert_eq!(
                record.expires_at,
                record.created_at + SignedDuration::from_mins(record.validity_minutes as i64)
            );
            assert_eq!(record.click_count, 0);
            assert!(record.clicks.is_empty());
        }
        assert_eq!(created[2].validity_minutes, 30);
    }

    #[tokio::test]
    async fn non_positive_validity_falls_back_to_default() {
        let registry = registry(Arc::new(InMemoryStore::new()), ManualClock::new(start())).await;

        let created = registry
            .create(vec![
                req("https://example.com/zero").with_validity(0),
                req("https://example.com/neg").with_validity(-5),
            ])
            .await
            .unwrap();

        assert!(created.iter().all(|r| r.validity_minutes == 30));
    }

    #[tokio::test]
    async fn oversized_validity_is_rejected() {
        let registry = registry(Arc::new(InMemoryStore::new()), ManualClock::new(start())).await;

        let err = registry
            .create(vec![req("https://example.com").with_validity(i64::MAX)])
            .await
            .unwrap_err();

        assert!(matches!(err.kind(), ShortenerError::InvalidValidity(_)));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn invalid_url_creates_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let registry = registry(store.clone(), ManualClock::new(start())).await;

        let err = registry.create(vec![req("not-a-url")]).await.unwrap_err();

        assert_eq!(err.batch_index(), Some(0));
        assert!(matches!(err.kind(), ShortenerError::InvalidUrl(_)));
        assert!(registry.is_empty().await);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn malformed_custom_codes_are_rejected() {
        let registry = registry(Arc::new(InMemoryStore::new()), ManualClock::new(start())).await;

        for code in ["ab", "has space", "dash-ed", "toolongtoolongtoolong1", "émoji"] {
            let err = registry
                .create(vec![req("https://x.com").with_custom_code(code)])
                .await
                .unwrap_err();
            assert!(
                matches!(err.kind(), ShortenerError::InvalidShortCode(_)),
                "{code} should be rejected, got {err}"
            );
        }
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn blank_custom_code_counts_as_absent() {
        let registry = registry(Arc::new(InMemoryStore::new()), ManualClock::new(start())).await;

        let created = registry
            .create(vec![req("https://x.com").with_custom_code("   ")])
            .await
            .unwrap();

        assert_eq!(created[0].short_code.as_str(), "sl000000");
    }

    #[tokio::test]
    async fn custom_code_is_trimmed() {
        let registry = registry(Arc::new(InMemoryStore::new()), ManualClock::new(start())).await;

        let created = registry
            .create(vec![req("https://x.com").with_custom_code("  promo1 ")])
            .await
            .unwrap();

        assert_eq!(created[0].short_code.as_str(), "promo1");
    }

    #[tokio::test]
    async fn taken_custom_code_is_rejected() {
        let registry = registry(Arc::new(InMemoryStore::new()), ManualClock::new(start())).await;

        registry
            .create(vec![req("https://x.com").with_custom_code("promo1")])
            .await
            .unwrap();
        let err = registry
            .create(vec![req("https://y.com").with_custom_code("promo1")])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), &ShortenerError::ShortCodeTaken("promo1".into()));
        assert_eq!(registry.len().await, 1);
        assert_eq!(
            registry.find_by_code("promo1").await.unwrap().original_url,
            "https://x.com"
        );
    }

    #[tokio::test]
    async fn expired_codes_stay_reserved() {
        let clock = ManualClock::new(start());
        let registry = registry(Arc::new(InMemoryStore::new()), clock.clone()).await;

        registry
            .create(vec![req("https://x.com").with_custom_code("promo1").with_validity(1)])
            .await
            .unwrap();
        clock.advance(SignedDuration::from_hours(1));

        let err = registry
            .create(vec![req("https://y.com").with_custom_code("promo1")])
            .await
            .unwrap_err();

        assert!(matches!(err.kind(), ShortenerError::ShortCodeTaken(_)));
    }

    #[tokio::test]
    async fn batch_is_all_or_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let registry = registry(store.clone(), ManualClock::new(start())).await;

        let err = registry
            .create(vec![
                req("https://example.com/ok"),
                req("https://example.com/dup").with_custom_code("twin01"),
                req("https://example.com/dup2").with_custom_code("twin01"),
            ])
            .await
            .unwrap_err();

        assert_eq!(err.batch_index(), Some(2));
        assert!(matches!(err.kind(), ShortenerError::ShortCodeTaken(_)));
        assert!(registry.is_empty().await);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn generated_codes_skip_codes_reserved_in_batch() {
        let registry = registry(Arc::new(InMemoryStore::new()), ManualClock::new(start())).await;

        let created = registry
            .create(vec![
                req("https://example.com/custom").with_custom_code("sl000000"),
                req("https://example.com/generated"),
            ])
            .await
            .unwrap();

        assert_eq!(created[0].short_code.as_str(), "sl000000");
        assert_eq!(created[1].short_code.as_str(), "sl000001");
    }

    #[tokio::test]
    async fn batch_size_is_bounded() {
        let registry = registry(Arc::new(InMemoryStore::new()), ManualClock::new(start())).await;

        let err = registry.create(vec![]).await.unwrap_err();
        assert_eq!(err, ShortenerError::BatchSize { got: 0, max: 5 });

        let six = (0..6).map(|i| req(&format!("https://example.com/{i}"))).collect();
        let err = registry.create(six).await.unwrap_err();
        assert_eq!(err, ShortenerError::BatchSize { got: 6, max: 5 });
    }

    #[tokio::test]
    async fn exhausted_allocator_fails_the_batch() {
        struct Stuck;

        impl Generator for Stuck {
            type Output = ShortCode;

            fn generate(&self) -> ShortCode {
                ShortCode::new_unchecked("stuck1")
            }
        }

        let registry = Registry::builder(Arc::new(InMemoryStore::new()))
            .generator(Stuck)
            .clock(ManualClock::new(start()))
            .open()
            .await;

        registry.create(vec![req("https://a.com")]).await.unwrap();
        let err = registry.create(vec![req("https://b.com")]).await.unwrap_err();

        assert_eq!(
            err.kind(),
            &ShortenerError::CodeGenerationExhausted { attempts: 10 }
        );
    }

    #[tokio::test]
    async fn lookup_is_idempotent() {
        let registry = registry(Arc::new(InMemoryStore::new()), ManualClock::new(start())).await;
        registry
            .create(vec![req("https://x.com").with_custom_code("look01")])
            .await
            .unwrap();

        let first = registry.find_by_code("look01").await;
        let second = registry.find_by_code("look01").await;

        assert!(first.is_some());
        assert_eq!(first, second);
        assert!(registry.find_by_code("absent").await.is_none());
    }

    #[tokio::test]
    async fn every_mutation_is_flushed() {
        let store = Arc::new(InMemoryStore::new());
        let clock = ManualClock::new(start());
        let registry = registry(store.clone(), clock.clone()).await;

        let created = registry.create(vec![req("https://x.com")]).await.unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.snapshot(), created);

        let clicked = created[0].with_click(snaplink_core::ClickEvent {
            timestamp: clock.now(),
            source: "direct".into(),
            location: "Tokyo, JP".into(),
        });
        registry.update(clicked.clone()).await.unwrap();

        assert_eq!(store.save_count(), 2);
        assert_eq!(store.snapshot(), vec![clicked]);
    }

    #[tokio::test]
    async fn clicks_are_stamped_and_flushed() {
        let store = Arc::new(InMemoryStore::new());
        let clock = ManualClock::new(start());
        let registry = registry(store.clone(), clock.clone()).await;
        let created = registry.create(vec![req("https://x.com")]).await.unwrap();

        clock.advance(SignedDuration::from_secs(20));
        let clicked = registry
            .record_click(&created[0].id, "direct", "Tokyo, JP")
            .await
            .unwrap();

        assert_eq!(clicked.click_count, 1);
        assert_eq!(clicked.clicks[0].timestamp, clock.now());
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.snapshot(), vec![clicked]);
    }

    #[tokio::test]
    async fn click_on_expired_record_changes_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let clock = ManualClock::new(start());
        let registry = registry(store.clone(), clock.clone()).await;
        let created = registry
            .create(vec![req("https://x.com").with_validity(1)])
            .await
            .unwrap();

        clock.advance(SignedDuration::from_secs(61));
        let err = registry
            .record_click(&created[0].id, "direct", "Tokyo, JP")
            .await
            .unwrap_err();

        assert!(matches!(err, ShortenerError::Expired { expires_at, .. } if expires_at == created[0].expires_at));
        assert_eq!(store.save_count(), 1);
        assert_eq!(registry.records().await, created);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_clicks_are_never_lost() {
        let registry = Arc::new(
            registry(Arc::new(InMemoryStore::new()), ManualClock::new(start())).await,
        );
        let created = registry.create(vec![req("https://x.com")]).await.unwrap();
        let id = created[0].id;

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry.record_click(&id, "direct", "unknown").await.unwrap().click_count
                })
            })
            .collect();
        let mut counts = Vec::new();
        for handle in handles {
            counts.push(handle.await.unwrap());
        }

        counts.sort_unstable();
        assert_eq!(counts, (1..=64).collect::<Vec<u64>>());
        assert_eq!(registry.find_by_id(&id).await.unwrap().click_count, 64);
    }

    #[tokio::test]
    async fn rehydrates_from_store() {
        let first = Arc::new(InMemoryStore::new());
        let clock = ManualClock::new(start());
        let registry = registry(first.clone(), clock.clone()).await;
        registry
            .create(vec![
                req("https://x.com").with_custom_code("keep01"),
                req("https://y.com"),
            ])
            .await
            .unwrap();

        let reopened = Registry::builder(Arc::new(InMemoryStore::with_records(first.snapshot())))
            .clock(clock)
            .open()
            .await;

        assert_eq!(reopened.records().await, registry.records().await);
    }

    #[tokio::test]
    async fn failing_store_never_fails_operations() {
        let telemetry = Arc::new(Recorded::default());
        let registry = Registry::builder(Arc::new(BrokenStore))
            .clock(ManualClock::new(start()))
            .telemetry(telemetry.clone())
            .open()
            .await;

        assert!(registry.is_empty().await);
        let created = registry.create(vec![req("https://x.com")]).await.unwrap();
        assert_eq!(
            registry.find_by_code(created[0].short_code.as_str()).await,
            Some(created[0].clone())
        );

        let events = telemetry.0.lock();
        assert!(events
            .iter()
            .any(|(level, category, _)| *level == Level::Error && *category == Category::State));
        assert!(events
            .iter()
            .any(|(level, category, _)| *level == Level::Error && *category == Category::Storage));
    }

    #[tokio::test]
    async fn emits_telemetry_messages() {
        let telemetry = Arc::new(Recorded::default());
        let registry = Registry::builder(Arc::new(InMemoryStore::new()))
            .clock(ManualClock::new(start()))
            .telemetry(telemetry.clone())
            .open()
            .await;

        registry
            .create(vec![req("https://x.com").with_custom_code("hello1")])
            .await
            .unwrap();

        let messages: Vec<String> = telemetry.0.lock().iter().map(|e| e.2.clone()).collect();
        assert!(messages.contains(&"Loaded 0 URLs from storage".to_string()));
        assert!(messages.contains(&"Creating 1 short URLs".to_string()));
        assert!(messages.contains(&"Created short URL: hello1 -> https://x.com".to_string()));
    }

    #[tokio::test]
    async fn concurrent_creates_never_share_codes() {
        let registry = Arc::new(
            Registry::builder(Arc::new(InMemoryStore::new()))
                .clock(ManualClock::new(start()))
                .open()
                .await,
        );

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry
                        .create(vec![
                            req(&format!("https://example.com/{i}/a")),
                            req(&format!("https://example.com/{i}/b")),
                        ])
                        .await
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        let records = registry.records().await;
        let codes: HashSet<_> = records.iter().map(|r| r.short_code.clone()).collect();
        assert_eq!(records.len(), 40);
        assert_eq!(codes.len(), 40);
    }
}
