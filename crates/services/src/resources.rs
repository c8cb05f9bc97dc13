//! Display strings handed to the view layer.

/// Identifies a display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextTemplate {
    /// `right`, `required`
    ProgressAnswers,
    /// `required`
    RequiredScore,
    /// `right`
    ScoreAnswers,
    /// `percent`
    RequiredPercentage,
    /// `percent`
    ScorePercentage,
}

/// Formats a template with positional arguments into a display string.
pub trait TextResources: Send + Sync {
    fn format(&self, template: TextTemplate, args: &[u32]) -> String;
}

/// Built-in English strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishResources;

impl TextResources for EnglishResources {
    fn format(&self, template: TextTemplate, args: &[u32]) -> String {
        let arg = |idx: usize| args.get(idx).copied().unwrap_or_default();
        match template {
            TextTemplate::ProgressAnswers => {
                format!("Right answers: {} (min {})", arg(0), arg(1))
            }
            TextTemplate::RequiredScore => format!("Required right answers: {}", arg(0)),
            TextTemplate::ScoreAnswers => format!("Your right answers: {}", arg(0)),
            TextTemplate::RequiredPercentage => {
                format!("Required share of right answers: {}%", arg(0))
            }
            TextTemplate::ScorePercentage => format!("Your share of right answers: {}%", arg(0)),
        }
    }
}
