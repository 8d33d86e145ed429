use std::env;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_f32(profile: &str, key: &str, default: f32) -> f32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub ollama: OllamaConfig,
    pub fetch: FetchConfig,
    pub billing: BillingConfig,
}

/// Providers the generation client knows how to build.
pub const KNOWN_PROVIDERS: &[&str] = &["gemini", "openai", "anthropic", "claude", "ollama"];

impl Config {
    /// Build config for a named profile (empty string = default).
    /// Call `load_dotenv()` first. When a profile is set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            ollama: OllamaConfig::from_env_profiled(p),
            fetch: FetchConfig::from_env_profiled(p),
            billing: BillingConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Reject values that would only fail later, at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !KNOWN_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(ConfigError::UnknownProvider(self.llm.provider.clone()));
        }
        if !(0.0..=1.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                key: "LLM_TEMPERATURE",
                reason: format!("{} is outside [0, 1]", self.llm.temperature),
            });
        }
        if !(0.0..=1.0).contains(&self.llm.top_p) {
            return Err(ConfigError::InvalidValue {
                key: "LLM_TOP_P",
                reason: format!("{} is outside [0, 1]", self.llm.top_p),
            });
        }
        if self.llm.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                key: "LLM_MAX_TOKENS",
                reason: "must be positive".into(),
            });
        }
        if self.server.max_upload_mb == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MAX_UPLOAD_MB",
                reason: "must be positive".into(),
            });
        }
        if self.fetch.max_mb == 0 {
            return Err(ConfigError::InvalidValue {
                key: "FETCH_MAX_MB",
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:   {}:{}, cors={}, max_upload={}MB", self.server.host, self.server.port, self.server.cors_origin, self.server.max_upload_mb);
        tracing::info!("  llm:      provider={}, model={}, configured={}", self.llm.provider, self.llm.model_for(&self.ollama), self.llm.is_configured());
        tracing::info!("  llm:      temperature={}, max_tokens={}, top_p={}", self.llm.temperature, self.llm.max_tokens, self.llm.top_p);
        tracing::info!("  fetch:    timeout={}s, max_download={}MB", self.fetch.timeout_secs, self.fetch.max_mb);
        tracing::info!("  billing:  configured={}", self.billing.is_configured());
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub max_upload_mb: u32,
    /// Used for billing redirect URLs when a request carries no `Origin`.
    pub public_origin: String,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_u16(p, "PORT", 5000),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
            max_upload_mb: profiled_env_u32(p, "MAX_UPLOAD_MB", 25),
            public_origin: profiled_env_or(p, "PUBLIC_ORIGIN", "http://localhost:8080"),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb as usize * 1024 * 1024
    }
}

// ── LLM (Gemini / OpenAI / Anthropic) ─────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "gemini", "openai", "anthropic", "ollama"
    pub provider: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    /// Client-wide request timeout. Unset means the transport default.
    pub timeout_secs: Option<u64>,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "gemini").to_lowercase(),
            gemini_api_key: profiled_env_opt(p, "GEMINI_API_KEY"),
            gemini_model: profiled_env_or(p, "GEMINI_MODEL", "gemini-1.5-flash"),
            gemini_base_url: profiled_env_or(
                p,
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4o-mini"),
            openai_base_url: profiled_env_or(p, "OPENAI_BASE_URL", "https://api.openai.com"),
            anthropic_api_key: profiled_env_opt(p, "ANTHROPIC_API_KEY"),
            anthropic_model: profiled_env_or(p, "ANTHROPIC_MODEL", "claude-3-5-haiku-latest"),
            anthropic_base_url: profiled_env_or(p, "ANTHROPIC_BASE_URL", "https://api.anthropic.com"),
            temperature: profiled_env_f32(p, "LLM_TEMPERATURE", 0.2),
            max_tokens: profiled_env_u32(p, "LLM_MAX_TOKENS", 2000),
            top_p: profiled_env_f32(p, "LLM_TOP_P", 0.95),
            timeout_secs: profiled_env_opt(p, "LLM_TIMEOUT_SECS").and_then(|v| v.parse().ok()),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "gemini" => self.gemini_api_key.is_some(),
            "openai" => self.openai_api_key.is_some(),
            "anthropic" | "claude" => self.anthropic_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }

    /// Model name the active provider will be asked for.
    pub fn model_for<'a>(&'a self, ollama: &'a OllamaConfig) -> &'a str {
        match self.provider.as_str() {
            "gemini" => &self.gemini_model,
            "openai" => &self.openai_model,
            "anthropic" | "claude" => &self.anthropic_model,
            "ollama" => &ollama.model,
            _ => "(unknown)",
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
}

impl OllamaConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "OLLAMA_URL", "http://localhost:11434"),
            model: profiled_env_or(p, "OLLAMA_MODEL", "llama3.2"),
        }
    }
}

// ── URL fetching ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    /// Largest remote body a URL fetch will read.
    pub max_mb: u32,
}

impl FetchConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            timeout_secs: profiled_env_u32(p, "FETCH_TIMEOUT_SECS", 30) as u64,
            max_mb: profiled_env_u32(p, "FETCH_MAX_MB", 25),
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_mb as usize * 1024 * 1024
    }
}

// ── Billing (Stripe) ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    pub stripe_secret_key: Option<String>,
    pub lite_price_id: Option<String>,
    pub pro_price_id: Option<String>,
    pub api_base: String,
}

impl BillingConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            stripe_secret_key: profiled_env_opt(p, "STRIPE_SECRET_KEY"),
            lite_price_id: profiled_env_opt(p, "STRIPE_LITE_PRICE_ID"),
            pro_price_id: profiled_env_opt(p, "STRIPE_PRO_PRICE_ID"),
            api_base: profiled_env_or(p, "STRIPE_API_BASE", "https://api.stripe.com"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.stripe_secret_key.is_some()
    }
}
