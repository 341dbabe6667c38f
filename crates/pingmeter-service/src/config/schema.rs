use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use pingmeter_core::error::{MetricsError, Result};
use pingmeter_core::DEFAULT_BUCKETS;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default)]
    pub exposition: ExpositionSection,

    #[serde(default)]
    pub sampler: SamplerSection,

    #[serde(default)]
    pub histogram: HistogramSection,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            exposition: ExpositionSection::default(),
            sampler: SamplerSection::default(),
            histogram: HistogramSection::default(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetricsError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.exposition.validate()?;
        self.sampler.validate()?;
        self.histogram.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpositionSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for ExpositionSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            path: default_path(),
        }
    }
}

impl ExpositionSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.path.starts_with('/') || self.path == "/" {
            return Err(MetricsError::Config(
                "exposition.path must start with '/' and name a route".into(),
            ));
        }
        // Served as one literal route: no captures, wildcards or brace syntax.
        if self.path.contains(|c: char| matches!(c, ':' | '*' | '{' | '}')) {
            return Err(MetricsError::Config(format!(
                "exposition.path {:?} must be a literal path",
                self.path
            )));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| MetricsError::Config(format!("exposition.host {:?}: {e}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    9090
}
fn default_path() -> String {
    "/metrics".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplerSection {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for SamplerSection {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

impl SamplerSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=3_600_000).contains(&self.interval_ms) {
            return Err(MetricsError::Config(
                "sampler.interval_ms must be between 100 and 3600000".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_interval_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistogramSection {
    /// Latency bucket upper bounds in seconds.
    #[serde(default = "default_buckets")]
    pub buckets: Vec<f64>,
}

impl Default for HistogramSection {
    fn default() -> Self {
        Self {
            buckets: default_buckets(),
        }
    }
}

impl HistogramSection {
    /// Same rule as the registry: a trailing `+Inf` is allowed and implied anyway.
    pub fn validate(&self) -> Result<()> {
        let bounds = match self.buckets.split_last() {
            Some((last, rest)) if *last == f64::INFINITY => rest,
            _ => &self.buckets[..],
        };
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(MetricsError::Config(
                "histogram.buckets must be finite numbers".into(),
            ));
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MetricsError::Config(
                "histogram.buckets must be strictly increasing".into(),
            ));
        }
        Ok(())
    }
}

fn default_buckets() -> Vec<f64> {
    DEFAULT_BUCKETS.to_vec()
}
