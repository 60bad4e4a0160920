// src/config.rs

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};

use crate::dashboard::IntentPolicy;
use crate::models::{Locale, OperatingMode, SiteId};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub default_site: SiteId,
    pub mode_override: Option<OperatingMode>, // None = follow the site
    pub locale: Locale,
    pub latency_scale: f64,                   // 0 disables simulated delays
    pub activity_refresh: Duration,
    pub apply_stagger: Duration,
    pub intent_policy: IntentPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            default_site: "ulm".into(),
            mode_override: None,
            locale: Locale::De,
            latency_scale: 1.0,
            activity_refresh: Duration::from_millis(3000),
            apply_stagger: Duration::from_millis(600),
            intent_policy: IntentPolicy::Lenient,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Config::default();
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let latency_scale: f64 = parse_or(var("RAMP_LATENCY_SCALE"), "RAMP_LATENCY_SCALE", d.latency_scale)?;
        if !latency_scale.is_finite() || latency_scale < 0.0 {
            bail!("RAMP_LATENCY_SCALE must be a non-negative number, got {latency_scale}");
        }

        let refresh_ms: u64 = parse_or(var("RAMP_ACTIVITY_REFRESH_MS"), "RAMP_ACTIVITY_REFRESH_MS", 3000)?;
        if refresh_ms == 0 {
            bail!("RAMP_ACTIVITY_REFRESH_MS must be greater than zero");
        }

        Ok(Config {
            port: parse_or(var("PORT"), "PORT", d.port)?,
            default_site: var("RAMP_DEFAULT_SITE").unwrap_or(d.default_site),
            mode_override: var("RAMP_MODE").map(|v| parse_mode(&v)).transpose()?,
            locale: var("RAMP_LOCALE").map(|v| parse_locale(&v)).transpose()?.unwrap_or(d.locale),
            latency_scale,
            activity_refresh: Duration::from_millis(refresh_ms),
            apply_stagger: Duration::from_millis(parse_or(var("RAMP_APPLY_STAGGER_MS"), "RAMP_APPLY_STAGGER_MS", 600)?),
            intent_policy: if parse_or(var("RAMP_STRICT_INTENTS"), "RAMP_STRICT_INTENTS", false)? {
                IntentPolicy::Strict
            } else {
                IntentPolicy::Lenient
            },
        })
    }
}

fn parse_or<T>(raw: Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) => v.parse().with_context(|| format!("invalid {name}: '{v}'")),
        None => Ok(default),
    }
}

fn parse_mode(raw: &str) -> anyhow::Result<OperatingMode> {
    match raw.to_ascii_lowercase().as_str() {
        "integrated" => Ok(OperatingMode::Integrated),
        "standalone" => Ok(OperatingMode::Standalone),
        other => Err(anyhow!("invalid RAMP_MODE '{other}' (expected integrated|standalone)")),
    }
}

fn parse_locale(raw: &str) -> anyhow::Result<Locale> {
    match raw.to_ascii_lowercase().as_str() {
        "de" => Ok(Locale::De),
        "en" => Ok(Locale::En),
        other => Err(anyhow!("invalid RAMP_LOCALE '{other}' (expected de|en)")),
    }
}
