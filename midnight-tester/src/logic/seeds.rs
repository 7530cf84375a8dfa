use anyhow::{Result, bail};
use serde::Serialize;
use std::collections::HashSet;

/// Seed used when no token resolves to one.
pub const DEFAULT_SEED: u64 = 1337;

/// Where a seed came from; random seeds are reported so a run can be replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedSource {
    Numeric,
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedInfo {
    pub seed: u64,
    pub source: SeedSource,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self {
            seed,
            source: SeedSource::Numeric,
        }
    }

    #[must_use]
    pub fn random() -> Self {
        Self {
            seed: rand::random(),
            source: SeedSource::Random,
        }
    }
}

/// Resolve CLI seed tokens into concrete seeds.
///
/// Supports literal integers (negative values use their magnitude) and the
/// keyword `random`, which draws a fresh seed each time it appears.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending: Vec<SeedInfo> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if token.eq_ignore_ascii_case("random") {
            pending.push(SeedInfo::random());
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            pending.push(SeedInfo::from_numeric(value.unsigned_abs()));
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            pending.push(SeedInfo::from_numeric(value));
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    let mut seen = HashSet::new();
    pending.retain(|info| seen.insert(info.seed));

    if pending.is_empty() {
        pending.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }

    Ok(pending)
}
