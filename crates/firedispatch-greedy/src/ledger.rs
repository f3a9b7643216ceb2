use firedispatch_core::HelicopterBase;

/// Remaining airframes per base for one dispatch run. Counts only go down.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationLedger {
    remaining: Vec<u32>,
}

impl AllocationLedger {
    pub fn new(bases: &[HelicopterBase]) -> Self {
        Self {
            remaining: bases.iter().map(|b| b.helicopters).collect(),
        }
    }

    pub fn available(&self, base: usize) -> u32 {
        self.remaining.get(base).copied().unwrap_or(0)
    }

    pub fn total_available(&self, bases: impl IntoIterator<Item = usize>) -> u32 {
        bases.into_iter().map(|b| self.available(b)).sum()
    }

    /// Takes up to `wanted` airframes from `base`, returns how many were taken.
    pub fn take(&mut self, base: usize, wanted: u32) -> u32 {
        match self.remaining.get_mut(base) {
            Some(left) => {
                let taken = wanted.min(*left);
                *left -= taken;
                taken
            }
            None => 0,
        }
    }
}
