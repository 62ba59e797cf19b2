//! Turning command-line choices into an ordered list of jurisdictions
//!
//! Ranges follow the canonical list, which is sorted by full name, so
//! `--range AL AR` covers Alabama, Alaska, Arizona and Arkansas.

use crate::targets::jurisdiction::{find, Jurisdiction};
use crate::SelectionError;

/// Which jurisdictions a run should cover
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Exactly these codes, in the order given
    Explicit(Vec<String>),

    /// Every jurisdiction from `from` to `to`, both inclusive, in list order
    Range { from: String, to: String },

    /// The whole list
    All,
}

impl Selection {
    /// Resolves the selection against an ordered jurisdiction list
    ///
    /// Duplicate codes in an explicit list are dropped after their first
    /// occurrence.
    pub fn resolve(&self, list: &[Jurisdiction]) -> Result<Vec<Jurisdiction>, SelectionError> {
        let selected: Vec<Jurisdiction> = match self {
            Self::All => list.to_vec(),

            Self::Explicit(codes) => {
                let mut out: Vec<Jurisdiction> = Vec::with_capacity(codes.len());
                for code in codes {
                    let (_, jurisdiction) = find(list, code)
                        .ok_or_else(|| SelectionError::UnknownJurisdiction(code.clone()))?;
                    if !out.contains(jurisdiction) {
                        out.push(*jurisdiction);
                    }
                }
                out
            }

            Self::Range { from, to } => {
                let (start, _) = find(list, from)
                    .ok_or_else(|| SelectionError::UnknownJurisdiction(from.clone()))?;
                let (end, _) = find(list, to)
                    .ok_or_else(|| SelectionError::UnknownJurisdiction(to.clone()))?;
                if start > end {
                    return Err(SelectionError::InvertedRange {
                        from: from.clone(),
                        to: to.clone(),
                    });
                }
                list[start..=end].to_vec()
            }
        };

        if selected.is_empty() {
            return Err(SelectionError::Empty);
        }
        Ok(selected)
    }
}
