use std::fmt;

/// Where a [`ClassEmitter`](crate::ClassEmitter) is in its call sequence.
///
/// Header and implementation are emitted in that order:
/// `NotStarted → HeaderOpen → HeaderDone → ImplOpen → Done`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EmitPhase {
    #[default]
    NotStarted,
    HeaderOpen,
    HeaderDone,
    ImplOpen,
    Done,
}

/// An emitter call that is subject to phase ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    BeginHeader,
    DefineNoDefaultInit,
    EndHeader,
    BeginImplementation,
    EndImplementation,
}

impl EmitPhase {
    /// The phase reached by performing `op` from `self`, or `None` when the
    /// call is out of order.
    pub fn advance(self, op: Operation) -> Option<EmitPhase> {
        use EmitPhase::*;
        use Operation::*;

        match (self, op) {
            (NotStarted, BeginHeader) => Some(HeaderOpen),
            (HeaderOpen, DefineNoDefaultInit) => Some(HeaderOpen),
            (HeaderOpen, EndHeader) => Some(HeaderDone),
            (HeaderDone, BeginImplementation) => Some(ImplOpen),
            (ImplOpen, EndImplementation) => Some(Done),
            _ => None,
        }
    }

    pub fn is_done(self) -> bool {
        self == EmitPhase::Done
    }
}

impl fmt::Display for EmitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
