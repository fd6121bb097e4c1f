//! Built-in validation rules.
//!
//! Rules are grouped by what they check:
//! - presence: `required`, `nullable`, `optional`
//! - size: `min`, `max`, `size`
//! - format: `numeric`, `integer`, `boolean`, `email`, `currency`, `dateTime`
//! - membership: `in`, `inStrict`
//! - exclusion: `exclude`
//! - conditional: `excludeIf`, `excludeUnless`, `nullableIf`, `nullableUnless`,
//!   `optionalIf`, `optionalUnless`

/// Implements [`RuleId`](fieldrules_core::RuleId) for a rule type.
macro_rules! rule_id {
    ($rule:ty, $id:literal) => {
        impl fieldrules_core::RuleId for $rule {
            const ID: &'static str = $id;
        }
    };
}

pub(crate) use rule_id;

mod conditional;
mod exclude;
mod format;
mod membership;
mod presence;
mod size;

pub use conditional::*;
pub use exclude::*;
pub use format::*;
pub use membership::*;
pub use presence::*;
pub use size::*;
