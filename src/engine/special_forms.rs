//! Names of the builtins that receive their operands unevaluated.

pub const IF: &str = "if";
pub const VAR: &str = "var";
pub const DEF: &str = "def";

/// Builtins that decide themselves which operands to evaluate.
pub const SPECIAL_FORMS: &[&str] = &[IF, VAR, DEF];

/// Checks if a given name is a special form.
///
/// # Arguments
/// * `name` - The name to check.
///
/// # Returns
/// `true` if the name is a special form, `false` otherwise.
pub fn is_special_form(name: &str) -> bool {
    SPECIAL_FORMS.contains(&name)
}
