/// How increments on the shared counter are protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumIter)]
pub enum Regime {
    /// Plain read then write with nothing stopping two workers interleaving.
    #[strum(serialize = "unsynchronized")]
    Unsynchronized,
    #[strum(serialize = "mutex")]
    Mutex,
    #[strum(serialize = "atomic")]
    Atomic,
}

impl Regime {
    /// Whether every increment is guaranteed to land.
    pub fn is_exact(self) -> bool {
        !matches!(self, Regime::Unsynchronized)
    }
}
