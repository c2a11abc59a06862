//! Video playback policy for embedded display players
//!
//! Low-power signage players run out of memory quickly when a page buffers
//! whole videos. These helpers decide how aggressively a player should
//! preload, when to pause buffering, and how to retry failed loads.

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// HTML `preload` attribute values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreloadStrategy {
    None,
    Metadata,
    Auto,
}

/// Tunables for video loading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoOptimizationConfig {
    pub max_retries: u32,
    /// Base delay before the first retry; doubles on every attempt
    pub retry_delay_ms: u64,
    /// Heap usage ratio above which memory is considered high
    pub memory_threshold: f64,
    pub preload_strategy: PreloadStrategy,
    pub enable_memory_monitoring: bool,
    pub enable_progressive_loading: bool,
}

impl Default for VideoOptimizationConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 2000,
            memory_threshold: 0.8,
            preload_strategy: PreloadStrategy::Metadata,
            enable_memory_monitoring: true,
            enable_progressive_loading: true,
        }
    }
}

/// What the player reports about itself
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceProfile {
    #[serde(default)]
    pub user_agent: String,
    pub hardware_concurrency: Option<u32>,
}

impl DeviceProfile {
    /// BrightSign-style players, or anything with four cores or fewer
    pub fn is_embedded(&self) -> bool {
        let user_agent = self.user_agent.to_lowercase();
        user_agent.contains("brightsign")
            || user_agent.contains("embedded")
            || self.hardware_concurrency.is_some_and(|cores| cores <= 4)
    }
}

/// Heap usage as reported by the player
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MemoryReading {
    pub used_bytes: u64,
    pub limit_bytes: u64,
}

/// Interpreted memory reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub used_mb: f64,
    pub limit_mb: f64,
    pub percentage: f64,
    pub is_high: bool,
}

/// Buffered range of the current video, in seconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BufferState {
    pub buffered_end: f64,
    pub current_time: f64,
    pub duration: f64,
}

/// What a player should do with its `preload` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "preload", rename_all = "lowercase")]
pub enum BufferAdvice {
    /// Enough buffered; stop loading to save memory
    Pause,
    /// Buffer is low; load again with the given strategy
    Resume(PreloadStrategy),
    Keep,
}

/// Policy decisions for one configuration
#[derive(Debug, Clone, Default)]
pub struct VideoPolicy {
    config: VideoOptimizationConfig,
}

impl VideoPolicy {
    pub fn new(config: VideoOptimizationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VideoOptimizationConfig {
        &self.config
    }

    pub fn optimal_preload(&self, device: &DeviceProfile) -> PreloadStrategy {
        if device.is_embedded() {
            PreloadStrategy::Metadata
        } else {
            self.config.preload_strategy
        }
    }

    /// Delay before retry `attempt` (1-based)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.config.retry_delay_ms.saturating_mul(factor))
    }

    /// Delays a player waits before each of its `max_retries` reload attempts
    pub fn retry_delays(&self) -> Vec<Duration> {
        (1..=self.config.max_retries)
            .map(|attempt| self.backoff_delay(attempt))
            .collect()
    }

    pub fn memory_usage(&self, reading: MemoryReading) -> Option<MemoryUsage> {
        if reading.limit_bytes == 0 {
            return None;
        }

        let used_mb = reading.used_bytes as f64 / 1024.0 / 1024.0;
        let limit_mb = reading.limit_bytes as f64 / 1024.0 / 1024.0;
        let percentage = used_mb / limit_mb;

        Some(MemoryUsage {
            used_mb,
            limit_mb,
            percentage,
            is_high: percentage > self.config.memory_threshold,
        })
    }

    pub fn buffer_advice(&self, device: &DeviceProfile, buffer: BufferState) -> BufferAdvice {
        if !self.config.enable_progressive_loading {
            return BufferAdvice::Keep;
        }

        let remaining = buffer.duration - buffer.current_time;
        let ahead = buffer.buffered_end - buffer.current_time;

        if ahead > 30.0 || ahead > remaining * 0.5 {
            BufferAdvice::Pause
        } else if ahead < 10.0 {
            BufferAdvice::Resume(self.optimal_preload(device))
        } else {
            BufferAdvice::Keep
        }
    }

    pub fn recommendations(&self, device: &DeviceProfile, memory_usage: f64) -> Vec<&'static str> {
        let mut recommendations = Vec::new();

        if device.is_embedded() {
            recommendations.push("Use H.264 codec with baseline profile");
            recommendations.push("Keep video bitrate under 2 Mbps");
            recommendations.push("Use 1080p or lower resolution");
            recommendations.push("Prefer MP4 container format");
        }

        if memory_usage > 0.7 {
            recommendations.push("Consider reducing video quality");
            recommendations.push("Enable progressive loading");
            recommendations.push("Monitor memory usage closely");
        }

        recommendations
    }
}
