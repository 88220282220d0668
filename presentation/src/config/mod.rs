//! Presentation-level configuration
//!
//! Resolves how a run is displayed from the CLI flags and the
//! `[output]` config section.

use council_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// How the finished report is rendered
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress indicators while the run is in flight
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// Merge CLI and file settings. CLI flags win.
    ///
    /// Progress is hidden with `--quiet` and in `events` mode, where stdout
    /// carries the event lines.
    pub fn resolve(
        cli_format: Option<OutputFormat>,
        file_format: Option<OutputFormat>,
        color: bool,
        quiet: bool,
    ) -> Self {
        let format = cli_format.or(file_format).unwrap_or_default();
        Self {
            format,
            color,
            show_progress: !quiet && format != OutputFormat::Events,
        }
    }

    pub fn streams_events(&self) -> bool {
        self.format == OutputFormat::Events
    }

    /// Turn terminal colors off process-wide when disabled.
    pub fn apply_color(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_format_wins() {
        let config = OutputConfig::resolve(
            Some(OutputFormat::Json),
            Some(OutputFormat::Full),
            true,
            false,
        );
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.show_progress);
    }

    #[test]
    fn test_file_format_then_default() {
        let config = OutputConfig::resolve(None, Some(OutputFormat::Full), false, false);
        assert_eq!(config.format, OutputFormat::Full);
        assert!(!config.color);

        let config = OutputConfig::resolve(None, None, true, false);
        assert_eq!(config, OutputConfig::default());
    }

    #[test]
    fn test_progress_hidden_when_quiet_or_streaming() {
        assert!(!OutputConfig::resolve(None, None, true, true).show_progress);

        let events = OutputConfig::resolve(Some(OutputFormat::Events), None, true, false);
        assert!(events.streams_events());
        assert!(!events.show_progress);
    }
}
