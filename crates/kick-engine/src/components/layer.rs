/// Render layer: controls draw order for entities.
///
/// Layers are drawn back-to-front. The ball sits above the goal so it
/// visibly passes in front of the posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum RenderLayer {
    Background = 0,
    #[default]
    Structures = 1,
    Ball = 2,
}

impl RenderLayer {
    pub const COUNT: usize = 3;

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Background),
            1 => Some(Self::Structures),
            2 => Some(Self::Ball),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_back_to_front() {
        assert!(RenderLayer::Background < RenderLayer::Structures);
        assert!(RenderLayer::Structures < RenderLayer::Ball);
    }

    #[test]
    fn u8_conversion() {
        for v in 0..RenderLayer::COUNT as u8 {
            assert_eq!(RenderLayer::from_u8(v).map(RenderLayer::as_u8), Some(v));
        }
        assert_eq!(RenderLayer::from_u8(3), None);
    }
}
