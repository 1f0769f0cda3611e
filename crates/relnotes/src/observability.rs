//! Observability setup: structured JSON-lines logging.
//!
//! Never writes to stdout: that is where the converted XML goes. Records go
//! to a daily-rolling file, or to stderr when no log location is writable.

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::field::{Field, Visit};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

const ENV_LOG_PATH: &str = "RELNOTES_LOG_PATH";
const ENV_LOG_DIR: &str = "RELNOTES_LOG_DIR";
const DEFAULT_LOG_DIR_UNIX: &str = "/var/log";
const LOG_FILE_SUFFIX: &str = ".jsonl";

/// Configuration for observability setup.
#[derive(Clone, Debug)]
pub struct ObservabilityConfig {
    /// Name written into every record and used for the log file name.
    pub service: String,
    /// `log_dir` from the config file, if set.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Use the package name as service and the given config log directory.
    pub fn for_package(log_dir: Option<PathBuf>) -> Self {
        Self {
            service: env!("CARGO_PKG_NAME").to_string(),
            log_dir,
        }
    }
}

/// Keeps the background log writer alive; drop it last.
pub struct ObservabilityGuard {
    _log_guard: WorkerGuard,
}

/// Install the global subscriber.
///
/// # Errors
///
/// Currently infallible: an unwritable log location degrades to stderr.
pub fn init_observability(
    cfg: &ObservabilityConfig,
    env_filter: EnvFilter,
) -> Result<ObservabilityGuard> {
    let (writer, guard) = match LogTarget::resolve(&cfg.service, cfg.log_dir.as_deref()) {
        Ok(target) => {
            let appender = tracing_appender::rolling::daily(&target.dir, &target.file_name);
            tracing_appender::non_blocking(appender)
        }
        Err(err) => {
            eprintln!("Warning: {err:#}. Falling back to stderr logging.");
            tracing_appender::non_blocking(std::io::stderr())
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(JsonLines::new(writer, &cfg.service))
        .init();

    tracing::debug!("observability initialized");
    Ok(ObservabilityGuard { _log_guard: guard })
}

/// Build an `EnvFilter` based on CLI flags and environment.
///
/// Priority: quiet flag > verbose flag > RUST_LOG env > default_level
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    match (quiet, verbose) {
        (true, _) => EnvFilter::new("error"),
        (false, 1) => EnvFilter::new("debug"),
        (false, 2..) => EnvFilter::new("trace"),
        (false, 0) => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
        }
    }
}

// ============================================================================
// JSON Lines Layer
// ============================================================================

/// Writes one JSON object per event, merged with the fields of enclosing spans.
struct JsonLines {
    writer: NonBlocking,
    service: String,
}

impl JsonLines {
    fn new(writer: NonBlocking, service: &str) -> Self {
        Self {
            writer,
            service: service.to_string(),
        }
    }
}

/// Fields recorded on a span, stored in its extensions.
struct SpanFields(Map<String, Value>);

impl<S> tracing_subscriber::Layer<S> for JsonLines
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        ctx: LayerContext<'_, S>,
    ) {
        let Some(span) = ctx.span(id) else { return };
        let mut fields = FieldMap::default();
        attrs.record(&mut fields);
        span.extensions_mut().insert(SpanFields(fields.0));
    }

    fn on_record(
        &self,
        id: &tracing::span::Id,
        values: &tracing::span::Record<'_>,
        ctx: LayerContext<'_, S>,
    ) {
        let Some(span) = ctx.span(id) else { return };
        let mut fields = FieldMap::default();
        values.record(&mut fields);
        let mut extensions = span.extensions_mut();
        match extensions.get_mut::<SpanFields>() {
            Some(SpanFields(existing)) => existing.extend(fields.0),
            None => extensions.insert(SpanFields(fields.0)),
        }
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: LayerContext<'_, S>) {
        let metadata = event.metadata();
        let mut record = Map::new();
        record.insert("timestamp".into(), Value::String(format_timestamp()));
        record.insert(
            "level".into(),
            Value::String(metadata.level().as_str().to_lowercase()),
        );
        record.insert("service".into(), Value::String(self.service.clone()));
        record.insert("target".into(), Value::String(metadata.target().into()));

        for span in ctx.event_scope(event).into_iter().flat_map(|s| s.from_root()) {
            if let Some(SpanFields(fields)) = span.extensions().get::<SpanFields>() {
                record.extend(fields.clone());
            }
        }

        let mut fields = FieldMap::default();
        event.record(&mut fields);
        record.extend(fields.0);

        let mut line = Value::Object(record).to_string();
        line.push('\n');
        let _ = self.writer.make_writer().write_all(line.as_bytes());
    }
}

#[derive(Default)]
struct FieldMap(Map<String, Value>);

impl FieldMap {
    fn put(&mut self, field: &Field, value: Value) {
        self.0.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldMap {
    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::Bool(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let Some(number) = serde_json::Number::from_f64(value) {
            self.put(field, Value::Number(number));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.into());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, value.to_string().into());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, format!("{value:?}").into());
    }
}

fn format_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ============================================================================
// Log Target Resolution
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
struct LogTarget {
    dir: PathBuf,
    file_name: String,
}

impl LogTarget {
    /// Resolve from the environment, then the config, then platform defaults.
    fn resolve(service: &str, config_dir: Option<&Path>) -> Result<Self> {
        Self::resolve_with(
            service,
            std::env::var_os(ENV_LOG_PATH).map(PathBuf::from),
            std::env::var_os(ENV_LOG_DIR).map(PathBuf::from),
            config_dir.map(Path::to_path_buf),
        )
    }

    fn resolve_with(
        service: &str,
        path_override: Option<PathBuf>,
        dir_override: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(path) = path_override {
            return Self::from_path(&path);
        }
        if let Some(dir) = dir_override.or(config_dir) {
            return Self::in_dir(dir, service);
        }

        let mut candidates = Vec::new();
        if cfg!(unix) {
            candidates.push(PathBuf::from(DEFAULT_LOG_DIR_UNIX));
        }
        if let Some(dir) = relnotes_core::config::user_data_local_dir() {
            candidates.push(dir.into_std_path_buf().join("logs"));
        }
        if let Ok(dir) = std::env::current_dir() {
            candidates.push(dir);
        }

        candidates
            .into_iter()
            .find_map(|dir| Self::in_dir(dir, service).ok())
            .ok_or_else(|| anyhow!("no writable log directory found"))
    }

    fn in_dir(dir: PathBuf, service: &str) -> Result<Self> {
        let target = Self {
            dir,
            file_name: format!("{service}{LOG_FILE_SUFFIX}"),
        };
        target.ensure_writable()?;
        Ok(target)
    }

    fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow!("{ENV_LOG_PATH} must end in a UTF-8 file name"))?;
        let target = Self {
            dir: path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
            file_name: file_name.to_string(),
        };
        target.ensure_writable()?;
        Ok(target)
    }

    fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    fn ensure_writable(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create log directory {}", self.dir.display()))?;
        let path = self.path();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
