//! Control-flow commands returned by rules.

/// A signal a rule hands back to the validator instead of a pass/fail outcome.
///
/// Commands are consumed by the validator as soon as they are returned and
/// end the processing of the current field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Drop the field from the validated values and stop running its rules.
    ExcludeValue,
    /// Keep the current value as validated and stop running its rules.
    SkipValidationRules,
}

impl Command {
    /// Returns the command name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::ExcludeValue => "exclude_value",
            Command::SkipValidationRules => "skip_validation_rules",
        }
    }
}
