//! Weighted scoring of a validation report.
//!
//! Six fixed criteria, each scored 0 to 10 and weighted so the weights sum
//! to 10. The total is the sum of weighted scores and maps to a letter grade.

mod criteria;
mod scorer;

pub use criteria::{Criterion, CriterionInfo, CRITERIA};
pub use scorer::{LetterGrade, Score, Scorer, Subscore};
