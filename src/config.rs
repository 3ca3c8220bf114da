use kurbo::Vec2;

/// Size of one terminal cell in page pixels. Braille dots come out square
/// (4x4 px) with this ratio.
pub const CELL_PX: Vec2 = Vec2::new(8.0, 16.0);

/// Configuration for the animated page
#[derive(Clone)]
pub struct PageConfig {
    pub time_step: f32,
    pub seed: Option<u64>,
    pub message: Option<String>,
    pub mute: bool,
}

/// Configuration for printing a single tree
#[derive(Clone)]
pub struct PrintConfig {
    pub seed: Option<u64>,
    pub json: bool,
    pub width: Option<u16>,
    pub height: Option<u16>,
}

/// Use the given seed, or derive one from the clock
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0) // Fallback seed for misconfigured system clocks
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_seed_wins() {
        assert_eq!(resolve_seed(Some(7)), 7);
    }
}
