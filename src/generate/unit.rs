/// Kind of one independently retried generation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// A set of three poem lines produced from a single prompt.
    PoemLines,
    /// One prediction sentence.
    Prediction,
}

/// The four prediction units, each anchored to a distinct profile fact.
/// `ALL` is the fixed generation (and output) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionSlot {
    TopTheme,
    Archetype,
    TopPhrase,
    SecondTheme,
}

impl PredictionSlot {
    pub const ALL: [Self; 4] = [
        Self::TopTheme,
        Self::Archetype,
        Self::TopPhrase,
        Self::SecondTheme,
    ];
}

/// Normalized backend output for one attempt.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub text: String,
    pub attempt: u32,
    pub kind: UnitKind,
}

impl Candidate {
    pub fn new(kind: UnitKind, attempt: u32, text: String) -> Self {
        Self {
            text,
            attempt,
            kind,
        }
    }

    /// Truncated text for diagnostic logs.
    #[must_use]
    pub fn preview(&self) -> String {
        const MAX_CHARS: usize = 80;
        if self.text.chars().count() <= MAX_CHARS {
            self.text.clone()
        } else {
            let head: String = self.text.chars().take(MAX_CHARS).collect();
            format!("{head}...")
        }
    }
}
