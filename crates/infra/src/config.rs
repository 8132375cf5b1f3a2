//! Engine configuration.
//!
//! Defaults match a fresh install; `from_env` lets a deployment override them
//! with `SHOPLIST_*` environment variables.

use std::str::FromStr;

/// Name of the catch-all aisle created for non-shop locations.
pub const DEFAULT_AISLE_NAME: &str = "No Aisle";

/// Rank given to default aisles so they sort after hand-ranked siblings.
pub const DEFAULT_AISLE_RANK: i32 = 1000;

/// Name of the home location created at first run.
pub const HOME_NAME: &str = "Home";

/// Which siblings make room when an item is moved onto an occupied rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftWindow {
    /// Every sibling at or after the target rank moves down by one.
    #[default]
    AllSuccessors,
    /// Only the contiguous run of occupied ranks starting at the target moves
    /// down by one; siblings after the first gap keep their rank.
    Collisions,
}

impl FromStr for ShiftWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "all_successors" => Ok(Self::AllSuccessors),
            "collisions" => Ok(Self::Collisions),
            other => Err(format!("unknown rank shift window '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub default_aisle_name: String,
    pub default_aisle_rank: i32,
    pub home_name: String,
    pub shift_window: ShiftWindow,
    /// Also file a product added to a shop aisle under the same-named home aisle.
    pub mirror_shop_aisles_to_home: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_aisle_name: DEFAULT_AISLE_NAME.to_string(),
            default_aisle_rank: DEFAULT_AISLE_RANK,
            home_name: HOME_NAME.to_string(),
            shift_window: ShiftWindow::default(),
            mirror_shop_aisles_to_home: true,
        }
    }
}

impl EngineConfig {
    /// Read overrides from the process environment.
    ///
    /// Unparseable values are logged and replaced with the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            default_aisle_name: lookup("SHOPLIST_DEFAULT_AISLE_NAME")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.default_aisle_name),
            default_aisle_rank: parsed(&lookup, "SHOPLIST_DEFAULT_AISLE_RANK", defaults.default_aisle_rank),
            home_name: lookup("SHOPLIST_HOME_NAME")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.home_name),
            shift_window: parsed(&lookup, "SHOPLIST_RANK_SHIFT", defaults.shift_window),
            mirror_shop_aisles_to_home: parsed(
                &lookup,
                "SHOPLIST_MIRROR_TO_HOME",
                defaults.mirror_shop_aisles_to_home,
            ),
        }
    }
}

fn parsed<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: core::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!("{key}={raw:?} is invalid ({e}); using default");
            default
        }),
    }
}
