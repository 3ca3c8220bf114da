use std::time::Duration;

pub const AUTO_ADVANCE: Duration = Duration::from_secs(5);

pub const DEFAULT_QUOTES: [&str; 5] = [
    "Every love story is beautiful, but ours is my favorite.",
    "You are my today and all of my tomorrows.",
    "In all the world, there is no heart for me like yours.",
    "I love you more than yesterday, less than tomorrow.",
    "Where there is love there is life.",
];

/// Rotating quote with manual and timed navigation
pub struct Carousel {
    quotes: Vec<String>,
    current: usize,
    since_advance: Duration,
}

impl Carousel {
    pub fn new(quotes: Vec<String>) -> Self {
        Self {
            quotes,
            current: 0,
            since_advance: Duration::ZERO,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.quotes.get(self.current).map(String::as_str)
    }

    #[cfg(test)]
    pub fn index(&self) -> usize {
        self.current
    }

    pub fn next(&mut self) {
        if !self.quotes.is_empty() {
            self.current = (self.current + 1) % self.quotes.len();
        }
    }

    pub fn prev(&mut self) {
        let n = self.quotes.len();
        if n > 0 {
            self.current = (self.current + n - 1) % n;
        }
    }

    /// Timer runs on its own schedule; manual navigation does not reset it.
    pub fn tick(&mut self, elapsed: Duration) {
        self.since_advance += elapsed;
        while self.since_advance >= AUTO_ADVANCE {
            self.since_advance -= AUTO_ADVANCE;
            self.next();
        }
    }
}

/// Screen placement of the quote line: `‹  text  ›`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteLine {
    pub row: u16,
    pub prev_col: u16,
    pub text_col: u16,
    pub text: String,
    pub next_col: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowHit {
    Prev,
    Next,
}

impl QuoteLine {
    /// Center `quote` on `row`, truncating to fit between the arrows.
    pub fn layout(quote: &str, width: u16, row: u16) -> Option<Self> {
        // arrow + two spaces on each side
        let room = (width as usize).checked_sub(6)?;
        if room == 0 {
            return None;
        }
        let text: String = quote.chars().take(room).collect();
        let len = text.chars().count();
        let start = (width as usize - (len + 6)) / 2;
        Some(Self {
            row,
            prev_col: start as u16,
            text_col: (start + 3) as u16,
            text,
            next_col: (start + len + 5) as u16,
        })
    }

    pub fn hit(&self, col: u16, row: u16) -> Option<ArrowHit> {
        if row != self.row {
            return None;
        }
        if col.abs_diff(self.prev_col) <= 1 {
            Some(ArrowHit::Prev)
        } else if col.abs_diff(self.next_col) <= 1 {
            Some(ArrowHit::Next)
        } else {
            None
        }
    }
}
