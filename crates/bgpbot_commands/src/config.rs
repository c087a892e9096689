//! Per-command cache sizing.

use crate::CommandKind;
use bgpbot_cache::CacheConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ONE_MINUTE: Duration = Duration::from_secs(60);
const FIVE_MINUTES: Duration = Duration::from_secs(5 * 60);
const ONE_HOUR: Duration = Duration::from_secs(60 * 60);

/// Capacity and TTL for every command cache.
///
/// Each field may be omitted from configuration files, in which case the
/// default for that command is used.
///
/// ```toml
/// [cache.route]
/// capacity = 20
/// ttl_secs = 60
///
/// [cache.invalids_bulk]
/// capacity = 1
/// ttl_secs = 3600
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheTable {
    /// `route` results
    #[serde(default = "default_route")]
    pub route: CacheConfig,
    /// `origin` results
    #[serde(default = "default_origin")]
    pub origin: CacheConfig,
    /// `aspath` results
    #[serde(default = "default_aspath")]
    pub aspath: CacheConfig,
    /// `roa` results
    #[serde(default = "default_roa")]
    pub roa: CacheConfig,
    /// `asname` results
    #[serde(default = "default_asname")]
    pub asname: CacheConfig,
    /// Per-AS `invalids` results
    #[serde(default = "default_invalids")]
    pub invalids: CacheConfig,
    /// The bulk invalids table the per-AS results are filtered from
    #[serde(default = "default_invalids_bulk")]
    pub invalids_bulk: CacheConfig,
    /// `vrps` results
    #[serde(default = "default_vrps")]
    pub vrps: CacheConfig,
    /// `sourced` results
    #[serde(default = "default_sourced")]
    pub sourced: CacheConfig,
    /// `totals` result
    #[serde(default = "default_totals")]
    pub totals: CacheConfig,
    /// `geoip` results
    #[serde(default = "default_geoip")]
    pub geoip: CacheConfig,
}

fn default_route() -> CacheConfig {
    CacheConfig::new(20, ONE_MINUTE)
}

fn default_origin() -> CacheConfig {
    CacheConfig::new(20, ONE_MINUTE)
}

fn default_aspath() -> CacheConfig {
    CacheConfig::new(20, ONE_MINUTE)
}

fn default_roa() -> CacheConfig {
    CacheConfig::new(20, FIVE_MINUTES)
}

fn default_asname() -> CacheConfig {
    CacheConfig::new(50, ONE_HOUR)
}

fn default_invalids() -> CacheConfig {
    CacheConfig::new(20, FIVE_MINUTES)
}

fn default_invalids_bulk() -> CacheConfig {
    CacheConfig::new(1, ONE_HOUR)
}

fn default_vrps() -> CacheConfig {
    CacheConfig::new(20, FIVE_MINUTES)
}

fn default_sourced() -> CacheConfig {
    CacheConfig::new(20, ONE_MINUTE)
}

fn default_totals() -> CacheConfig {
    CacheConfig::new(1, FIVE_MINUTES)
}

fn default_geoip() -> CacheConfig {
    CacheConfig::new(50, ONE_HOUR)
}

impl CacheTable {
    /// Cache configuration for a command's results.
    pub fn for_command(&self, kind: CommandKind) -> CacheConfig {
        match kind {
            CommandKind::Route => self.route,
            CommandKind::Origin => self.origin,
            CommandKind::AsPath => self.aspath,
            CommandKind::Roa => self.roa,
            CommandKind::AsName => self.asname,
            CommandKind::Invalids => self.invalids,
            CommandKind::Vrps => self.vrps,
            CommandKind::Sourced => self.sourced,
            CommandKind::Totals => self.totals,
            CommandKind::GeoIp => self.geoip,
        }
    }

    /// Same configuration for every cache. Mostly useful in tests.
    pub fn uniform(config: CacheConfig) -> Self {
        Self {
            route: config,
            origin: config,
            aspath: config,
            roa: config,
            asname: config,
            invalids: config,
            invalids_bulk: config,
            vrps: config,
            sourced: config,
            totals: config,
            geoip: config,
        }
    }
}

impl Default for CacheTable {
    fn default() -> Self {
        Self {
            route: default_route(),
            origin: default_origin(),
            aspath: default_aspath(),
            roa: default_roa(),
            asname: default_asname(),
            invalids: default_invalids(),
            invalids_bulk: default_invalids_bulk(),
            vrps: default_vrps(),
            sourced: default_sourced(),
            totals: default_totals(),
            geoip: default_geoip(),
        }
    }
}
