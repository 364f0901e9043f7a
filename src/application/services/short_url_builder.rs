//! Short URL construction and unique key allocation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use url::form_urlencoded;

use crate::config::Config;
use crate::domain::entities::{NewShortUrl, ShortUrlRecord, TrackingOverrides};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::ShortenerError;
use crate::utils::key_generator::KeyGenerator;

/// Accumulated builder state before creation.
///
/// Never persisted directly; [`ShortUrlBuilder::create`] resolves it into
/// a [`NewShortUrl`]. `secure` and the tracking dimensions stay tri-state
/// until resolution so explicit caller overrides remain distinguishable
/// from process defaults.
#[derive(Debug, Clone, PartialEq)]
struct PendingConfiguration {
    destination_url: Option<String>,
    key: Option<String>,
    activate_at: Option<DateTime<Utc>>,
    deactivate_at: Option<DateTime<Utc>>,
    redirect_status: u16,
    secure: Option<bool>,
    single_use: bool,
    tracking: TrackingOverrides,
}

impl Default for PendingConfiguration {
    fn default() -> Self {
        Self {
            destination_url: None,
            key: None,
            activate_at: None,
            deactivate_at: None,
            redirect_status: 301,
            secure: None,
            single_use: false,
            tracking: TrackingOverrides::default(),
        }
    }
}

/// Fluent builder for short URL records.
///
/// Accumulates a pending configuration through step-validated setters,
/// then [`Self::create`] allocates a globally unique key and persists the
/// record. A single instance is safe to reuse across unrelated creations:
/// state is reset automatically after every successful create.
///
/// The builder itself is a single-owner accumulator and is not meant for
/// concurrent mutation. The allocation loop, however, is correct under
/// arbitrary concurrent `create` calls across independent builder
/// instances sharing one storage engine: the only synchronization it
/// relies on is the engine's uniqueness constraint on the key column.
///
/// # Examples
///
/// ```ignore
/// let mut builder = ShortUrlBuilder::new(config, repository, RandomKeyGenerator)?;
/// let record = builder
///     .destination("https://example.com/docs")?
///     .single_use(true)
///     .create()
///     .await?;
/// ```
pub struct ShortUrlBuilder<R: ShortUrlRepository, G: KeyGenerator> {
    repository: Arc<R>,
    key_generator: G,
    config: Config,
    pending: PendingConfiguration,
}

impl<R: ShortUrlRepository, G: KeyGenerator> ShortUrlBuilder<R, G> {
    /// Creates a builder after validating the process configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::InvalidEnvironment`] if the configuration
    /// is invalid; no builder instance exists in that case.
    pub fn new(config: Config, repository: Arc<R>, key_generator: G) -> Result<Self, ShortenerError> {
        config
            .validate()
            .map_err(ShortenerError::InvalidEnvironment)?;

        Ok(Self {
            repository,
            key_generator,
            config,
            pending: PendingConfiguration::default(),
        })
    }

    /// Sets the activation time.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::InvalidTemporalValue`] if `at` is in the
    /// past; state is unchanged on error.
    pub fn activate_at(&mut self, at: DateTime<Utc>) -> Result<&mut Self, ShortenerError> {
        if at < Utc::now() {
            return Err(ShortenerError::past_time("activation", at));
        }

        self.pending.activate_at = Some(at);
        Ok(self)
    }

    /// Sets the deactivation time.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::InvalidTemporalValue`] if `at` is in the
    /// past or precedes an already-set activation time; state is unchanged
    /// on error.
    pub fn deactivate_at(&mut self, at: DateTime<Utc>) -> Result<&mut Self, ShortenerError> {
        if at < Utc::now() {
            return Err(ShortenerError::past_time("deactivation", at));
        }
        if let Some(start) = self.pending.activate_at
            && at < start
        {
            return Err(ShortenerError::inverted_window(start, at));
        }

        self.pending.deactivate_at = Some(at);
        Ok(self)
    }

    /// Sets the destination URL, stored verbatim.
    ///
    /// Scheme rewriting for enforced https happens at creation time, not
    /// here.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::InvalidDestination`] unless the URL
    /// starts with `http://` or `https://`; state is unchanged on error.
    pub fn destination(&mut self, url: impl Into<String>) -> Result<&mut Self, ShortenerError> {
        let url = url.into();

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ShortenerError::InvalidDestination { url });
        }

        self.pending.destination_url = Some(url);
        Ok(self)
    }

    /// Sets the redirect status code.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::InvalidRedirectCode`] outside `300..=399`;
    /// the previously stored code (default 301) is retained on error.
    pub fn redirect_status(&mut self, code: u16) -> Result<&mut Self, ShortenerError> {
        if !(300..=399).contains(&code) {
            return Err(ShortenerError::InvalidRedirectCode { code });
        }

        self.pending.redirect_status = code;
        Ok(self)
    }

    /// Sets an explicit key, URL-escaped, bypassing auto-generation.
    ///
    /// The key is still subject to the uniqueness protocol: if it is
    /// already taken at creation time, a generated key is used instead.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::InvalidKey`] if the key is empty.
    pub fn key(&mut self, key: &str) -> Result<&mut Self, ShortenerError> {
        let escaped: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();

        if escaped.is_empty() {
            return Err(ShortenerError::InvalidKey);
        }

        self.pending.key = Some(escaped);
        Ok(self)
    }

    /// Overrides the https-enforcement default for this record.
    pub fn secure(&mut self, secure: bool) -> &mut Self {
        self.pending.secure = Some(secure);
        self
    }

    /// Marks the record as valid for a single visit.
    pub fn single_use(&mut self, single_use: bool) -> &mut Self {
        self.pending.single_use = single_use;
        self
    }

    /// Overrides the visit-tracking default for this record.
    pub fn track_visits(&mut self, track: bool) -> &mut Self {
        self.pending.tracking.visits = Some(track);
        self
    }

    /// Overrides the IP-address-tracking default for this record.
    pub fn track_ip_address(&mut self, track: bool) -> &mut Self {
        self.pending.tracking.ip_address = Some(track);
        self
    }

    /// Overrides the OS-tracking default for this record.
    pub fn track_os(&mut self, track: bool) -> &mut Self {
        self.pending.tracking.os = Some(track);
        self
    }

    /// Overrides the OS-version-tracking default for this record.
    pub fn track_os_version(&mut self, track: bool) -> &mut Self {
        self.pending.tracking.os_version = Some(track);
        self
    }

    /// Overrides the browser-tracking default for this record.
    pub fn track_browser(&mut self, track: bool) -> &mut Self {
        self.pending.tracking.browser = Some(track);
        self
    }

    /// Overrides the browser-version-tracking default for this record.
    pub fn track_browser_version(&mut self, track: bool) -> &mut Self {
        self.pending.tracking.browser_version = Some(track);
        self
    }

    /// Overrides the referer-tracking default for this record.
    pub fn track_referer(&mut self, track: bool) -> &mut Self {
        self.pending.tracking.referer = Some(track);
        self
    }

    /// Overrides the device-type-tracking default for this record.
    pub fn track_device_type(&mut self, track: bool) -> &mut Self {
        self.pending.tracking.device_type = Some(track);
        self
    }

    /// Clears all accumulated state back to construction defaults.
    ///
    /// Idempotent. Called automatically after every successful
    /// [`Self::create`] so one builder instance can be reused for
    /// unrelated configurations without leaking stale options.
    pub fn reset(&mut self) -> &mut Self {
        self.pending = PendingConfiguration::default();
        self
    }

    /// Resolves the pending configuration and persists a record under a
    /// guaranteed-unique key.
    ///
    /// Tri-state options still unset take their process defaults; with a
    /// resolved `secure` of true the destination's `http://` scheme is
    /// rewritten to `https://`. The key (explicit or generated) is then
    /// allocated by an unbounded generate-insert-retry loop: a
    /// [`crate::error::StoreError::DuplicateKey`] conflict draws a fresh generated key
    /// and retries, while any other storage failure aborts immediately.
    /// Correctness under concurrent callers rests solely on the storage
    /// engine's atomic uniqueness constraint; the `exists` pre-check is a
    /// cheap filter, not a guarantee.
    ///
    /// On success the builder state is reset for reuse and the persisted
    /// record is returned.
    ///
    /// # Errors
    ///
    /// - [`ShortenerError::MissingDestination`] if no destination URL was
    ///   set; storage is not touched.
    /// - [`ShortenerError::Storage`] for any propagated non-duplicate
    ///   storage failure.
    pub async fn create(&mut self) -> Result<ShortUrlRecord, ShortenerError> {
        let destination_url = self
            .pending
            .destination_url
            .clone()
            .ok_or(ShortenerError::MissingDestination)?;

        let secure = self.pending.secure.unwrap_or(self.config.enforce_https);
        let destination_url = if secure {
            rewrite_to_https(destination_url)
        } else {
            destination_url
        };

        let tracking = self
            .pending
            .tracking
            .resolve(&self.config.tracking_defaults);

        let mut key = match self.pending.key.clone() {
            Some(explicit) => explicit,
            None => self.key_generator.generate(),
        };

        loop {
            // Stale-tolerant pre-filter; the insert below is authoritative.
            if self
                .repository
                .exists(&key)
                .await
                .map_err(ShortenerError::Storage)?
            {
                tracing::debug!(%key, "candidate key already taken, drawing a new one");
                key = self.key_generator.generate();
                continue;
            }

            let new_short_url = NewShortUrl {
                key: key.clone(),
                destination_url: destination_url.clone(),
                public_url: compose_public_url(&self.config.base_url, &key),
                redirect_status: self.pending.redirect_status,
                single_use: self.pending.single_use,
                activate_at: self.pending.activate_at,
                deactivate_at: self.pending.deactivate_at,
                tracking,
            };

            match self.repository.insert(new_short_url).await {
                Ok(record) => {
                    tracing::info!(key = %record.key, "short url created");
                    self.reset();
                    return Ok(record);
                }
                Err(e) if e.is_duplicate_key() => {
                    tracing::debug!(%key, "lost key allocation race, retrying");
                    key = self.key_generator.generate();
                }
                Err(e) => return Err(ShortenerError::Storage(e)),
            }
        }
    }
}

/// Rewrites an `http://` scheme to `https://`. Idempotent.
fn rewrite_to_https(url: String) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url,
    }
}

/// Composes the public-facing short link from the base URL and key.
fn compose_public_url(base_url: &str, key: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), key)
}
