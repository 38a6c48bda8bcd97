use std::str::FromStr;

use anyhow::{Context, Result};

use crate::seeding::SeedingCriterion;

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
    pub pool_size: u32,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "event_admission.db".to_string(),
            pool_size: 8,
            busy_timeout_ms: 5_000,
        }
    }
}

/// How many waitlisted registrants a single vacancy check may promote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionPolicy {
    /// One promotion per freed slot.
    Single,
    /// Keep promoting until capacity is reached or the waitlist is empty.
    Fill,
}

impl FromStr for PromotionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(PromotionPolicy::Single),
            "fill" => Ok(PromotionPolicy::Fill),
            other => anyhow::bail!("Unknown promotion policy '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdmissionSettings {
    pub promotion_policy: PromotionPolicy,
    /// How long a request waits for another request on the same event.
    pub lock_timeout_ms: u64,
}

impl Default for AdmissionSettings {
    fn default() -> Self {
        Self {
            promotion_policy: PromotionPolicy::Fill,
            lock_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeedingSettings {
    pub default_criteria: Vec<SeedingCriterion>,
}

impl Default for SeedingSettings {
    fn default() -> Self {
        Self {
            default_criteria: vec![
                SeedingCriterion::Wins,
                SeedingCriterion::PointDifferential,
                SeedingCriterion::PointsFor,
            ],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub admission: AdmissionSettings,
    pub seeding: SeedingSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by whichever environment variables are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(path) = lookup("DATABASE_PATH") {
            config.database.path = path;
        }
        if let Some(size) = lookup("DATABASE_POOL_SIZE") {
            config.database.pool_size = size
                .parse()
                .with_context(|| format!("Invalid DATABASE_POOL_SIZE '{}'", size))?;
        }
        if let Some(timeout) = lookup("DATABASE_BUSY_TIMEOUT_MS") {
            config.database.busy_timeout_ms = timeout
                .parse()
                .with_context(|| format!("Invalid DATABASE_BUSY_TIMEOUT_MS '{}'", timeout))?;
        }
        if let Some(policy) = lookup("PROMOTION_POLICY") {
            config.admission.promotion_policy = policy.parse()?;
        }
        if let Some(timeout) = lookup("ADMISSION_LOCK_TIMEOUT_MS") {
            config.admission.lock_timeout_ms = timeout
                .parse()
                .with_context(|| format!("Invalid ADMISSION_LOCK_TIMEOUT_MS '{}'", timeout))?;
        }
        if let Some(criteria) = lookup("SEEDING_CRITERIA") {
            config.seeding.default_criteria = crate::seeding::parse_criteria_list(&criteria)
                .context("Invalid SEEDING_CRITERIA")?;
        }

        Ok(config)
    }
}
