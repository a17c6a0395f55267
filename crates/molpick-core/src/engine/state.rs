/// Where a [`GreedySelector`](super::selector::GreedySelector) is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorPhase {
    /// Nothing selected yet; the next step commits the seed.
    Seeding,
    /// The seed is in the library; each step commits the current minimum.
    Selecting,
    /// The library has reached its target size.
    Done,
}

impl SelectorPhase {
    pub fn is_done(self) -> bool {
        self == SelectorPhase::Done
    }
}

impl std::fmt::Display for SelectorPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SelectorPhase::Seeding => "seeding",
            SelectorPhase::Selecting => "selecting",
            SelectorPhase::Done => "done",
        };
        f.write_str(name)
    }
}
