//! Terminal styling helpers.
//!
//! ANSI escape codes, a palette that collapses to empty strings when colour
//! is unwanted, and a couple of number formatters shared by the renderers.

use std::time::Duration;

/// Raw ANSI escape sequences.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";

    /// Bold reverse green badge for the start of a route.
    pub const TAG_START: &str = "\x1b[1;7;32m";
    /// Bold reverse magenta badge for the destination.
    pub const TAG_GOAL: &str = "\x1b[1;7;35m";
    /// Bold reverse cyan badge for indoor segments.
    pub const TAG_INDOOR: &str = "\x1b[1;7;36m";
    /// Bold reverse yellow badge for outdoor segments.
    pub const TAG_OUTDOOR: &str = "\x1b[1;7;33m";
    /// Bold reverse blue badge for tunnel segments.
    pub const TAG_TUNNEL: &str = "\x1b[1;7;34m";

    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    pub const GRAY: &str = "\x1b[90m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const ORANGE: &str = "\x1b[38;5;208m";
    pub const RED: &str = "\x1b[31m";
}

/// Resolved colour codes, or empty strings when colour is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_start: &'static str,
    pub tag_goal: &'static str,
    pub tag_indoor: &'static str,
    pub tag_outdoor: &'static str,
    pub tag_tunnel: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub green: &'static str,
    pub orange: &'static str,
    pub red: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_start: colors::TAG_START,
            tag_goal: colors::TAG_GOAL,
            tag_indoor: colors::TAG_INDOOR,
            tag_outdoor: colors::TAG_OUTDOOR,
            tag_tunnel: colors::TAG_TUNNEL,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            green: colors::GREEN,
            orange: colors::ORANGE,
            red: colors::RED,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_start: "",
            tag_goal: "",
            tag_indoor: "",
            tag_outdoor: "",
            tag_tunnel: "",
            white_bold: "",
            gray: "",
            cyan: "",
            green: "",
            orange: "",
            red: "",
        }
    }

    /// `colored()` when [`supports_color`] says so, `plain()` otherwise.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Badge colour for a segment kind (`indoor`, `outdoor`, `tunnel`).
    #[must_use]
    pub fn segment_tag(&self, kind: &str) -> &'static str {
        match kind {
            "outdoor" => self.tag_outdoor,
            "tunnel" => self.tag_tunnel,
            _ => self.tag_indoor,
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Whether ANSI colours should be emitted.
///
/// Honours `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Whether the locale advertises UTF-8 (`LANG` or `LC_ALL`).
#[must_use]
pub fn supports_unicode() -> bool {
    ["LANG", "LC_ALL"].iter().any(|key| {
        std::env::var(key)
            .map(|value| value.to_uppercase().contains("UTF"))
            .unwrap_or(false)
    })
}

/// Human-friendly distance: metres below one kilometre, kilometres above.
///
/// ```
/// # use campusnav_cli::terminal::format_distance;
/// assert_eq!(format_distance(30.0), "30.0 m");
/// assert_eq!(format_distance(1250.0), "1.25 km");
/// ```
#[must_use]
pub fn format_distance(metres: f64) -> String {
    if metres < 1000.0 {
        format!("{metres:.1} m")
    } else {
        format!("{:.2} km", metres / 1000.0)
    }
}

/// Minutes and seconds, e.g. `3 min 20 s`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64().round() as u64;
    match (secs / 60, secs % 60) {
        (0, s) => format!("{s} s"),
        (m, 0) => format!("{m} min"),
        (m, s) => format!("{m} min {s} s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    /// Environment variables are process-global; serialize tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let saved: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var_os(k))).collect();
        for (key, value) in vars {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
        let result = f();
        for (key, value) in saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
        result
    }

    #[test]
    fn distances_switch_to_kilometres() {
        assert_eq!(format_distance(0.0), "0.0 m");
        assert_eq!(format_distance(999.94), "999.9 m");
        assert_eq!(format_distance(1000.0), "1.00 km");
        assert_eq!(format_distance(12_346.0), "12.35 km");
    }

    #[test]
    fn durations_round_to_seconds() {
        assert_eq!(format_duration(Duration::from_secs(45)), "45 s");
        assert_eq!(format_duration(Duration::from_secs(120)), "2 min");
        assert_eq!(format_duration(Duration::from_millis(200_400)), "3 min 20 s");
    }

    #[test]
    fn plain_palette_is_empty() {
        let p = ColorPalette::plain();
        assert!(p.reset.is_empty());
        assert!(p.segment_tag("tunnel").is_empty());
        let c = ColorPalette::colored();
        assert_eq!(c.segment_tag("tunnel"), colors::TAG_TUNNEL);
        assert_eq!(c.segment_tag("indoor"), colors::TAG_INDOOR);
    }

    #[test]
    fn no_color_disables_colors() {
        with_env_vars(&[("NO_COLOR", Some("1")), ("TERM", None)], || {
            assert!(!supports_color());
        });
    }

    #[test]
    fn dumb_terminal_disables_colors() {
        with_env_vars(&[("NO_COLOR", None), ("TERM", Some("dumb"))], || {
            assert!(!supports_color());
        });
    }

    #[test]
    fn regular_terminal_supports_colors() {
        with_env_vars(&[("NO_COLOR", None), ("TERM", Some("xterm-256color"))], || {
            assert!(supports_color());
        });
    }

    #[test]
    fn utf8_locale_enables_unicode() {
        with_env_vars(&[("LANG", None), ("LC_ALL", Some("C.UTF-8"))], || {
            assert!(supports_unicode());
        });
        with_env_vars(&[("LANG", Some("C")), ("LC_ALL", None)], || {
            assert!(!supports_unicode());
        });
    }
}
