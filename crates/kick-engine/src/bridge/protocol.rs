//! Frame buffer layout shared with the host page.
//! Must stay in sync with the host's reader.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 8 floats]
//! [Instances: max_instances × 12 floats]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities are written into the header every frame.
//! The host reads them to compute offsets dynamically.

use crate::api::game::GameConfig;
use crate::api::types::{GameEvent, Viewport};
use crate::renderer::instance::RenderInstance;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 8;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_MAX_INSTANCES: usize = 1;
pub const HEADER_INSTANCE_COUNT: usize = 2;
pub const HEADER_MAX_EVENTS: usize = 3;
pub const HEADER_EVENT_COUNT: usize = 4;
pub const HEADER_WORLD_WIDTH: usize = 5;
pub const HEADER_WORLD_HEIGHT: usize = 6;
pub const HEADER_PIXEL_RATIO: usize = 7;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per render instance (wire format).
pub const INSTANCE_FLOATS: usize = RenderInstance::FLOATS;

/// Floats per game event: kind, a, b, c (wire format).
pub const EVENT_FLOATS: usize = GameEvent::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    /// Maximum render instances.
    pub max_instances: usize,
    /// Maximum game events per frame.
    pub max_events: usize,

    /// Size of instance data section in floats.
    pub instance_data_floats: usize,
    /// Size of event data section in floats.
    pub event_data_floats: usize,

    /// Offset (in floats) where instance data begins.
    pub instance_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_instances: usize, max_events: usize) -> Self {
        let instance_data_floats = max_instances * INSTANCE_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let instance_data_offset = HEADER_FLOATS;
        let event_data_offset = instance_data_offset + instance_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_instances,
            max_events,
            instance_data_floats,
            event_data_floats,
            instance_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_instances, config.max_events)
    }

    /// Fill a header for the current frame. Counts are clamped to capacity.
    pub fn write_header(
        &self,
        header: &mut [f32; HEADER_FLOATS],
        instance_count: usize,
        event_count: usize,
        viewport: &Viewport,
    ) {
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_MAX_INSTANCES] = self.max_instances as f32;
        header[HEADER_INSTANCE_COUNT] = instance_count.min(self.max_instances) as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_EVENT_COUNT] = event_count.min(self.max_events) as f32;
        header[HEADER_WORLD_WIDTH] = viewport.width;
        header[HEADER_WORLD_HEIGHT] = viewport.height;
        header[HEADER_PIXEL_RATIO] = viewport.pixel_ratio;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_default_config_matches_expected_sizes() {
        let layout = ProtocolLayout::from_config(&GameConfig::default());

        assert_eq!(layout.max_instances, 64);
        assert_eq!(layout.max_events, 32);
        assert_eq!(layout.instance_data_floats, 64 * 12);
        assert_eq!(layout.event_data_floats, 32 * 4);
        assert_eq!(layout.buffer_total_floats, HEADER_FLOATS + 64 * 12 + 32 * 4);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(100, 20);

        assert_eq!(layout.instance_data_offset, HEADER_FLOATS);
        assert_eq!(layout.event_data_offset, layout.instance_data_offset + layout.instance_data_floats);
        assert_eq!(layout.buffer_total_floats, layout.event_data_offset + layout.event_data_floats);
    }

    #[test]
    fn header_clamps_counts_and_carries_viewport() {
        let layout = ProtocolLayout::new(4, 2);
        let mut header = [0.0; HEADER_FLOATS];
        layout.write_header(&mut header, 9, 1, &Viewport::new(390.0, 844.0, 3.0));

        assert_eq!(header[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(header[HEADER_INSTANCE_COUNT], 4.0);
        assert_eq!(header[HEADER_EVENT_COUNT], 1.0);
        assert_eq!(header[HEADER_WORLD_WIDTH], 390.0);
        assert_eq!(header[HEADER_WORLD_HEIGHT], 844.0);
        assert_eq!(header[HEADER_PIXEL_RATIO], 3.0);
    }
}
