/// Hours with one decimal, the precision used across the screens.
#[must_use]
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.1}")
}
