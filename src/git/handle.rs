//! Ownership of a blame computation.

/// A completed computation, either owned by the holder or borrowed from
/// whoever created it. Only an owned computation is ever released.
#[derive(Debug)]
pub enum Computation<'a, H> {
    Owned(H),
    Borrowed(&'a H),
}

impl<'a, H> Computation<'a, H> {
    pub fn get(&self) -> &H {
        match self {
            Computation::Owned(handle) => handle,
            Computation::Borrowed(handle) => handle,
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Computation::Owned(_))
    }

    /// Hands an owned handle to `release`. Returns whether anything was
    /// released.
    pub fn release<F>(self, release: F) -> bool
    where
        F: FnOnce(H),
    {
        match self {
            Computation::Owned(handle) => {
                release(handle);
                true
            }
            Computation::Borrowed(_) => false,
        }
    }
}
