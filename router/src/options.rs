use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterOptions {
    /// Where the session starts. Falls back to the platform's location, then
    /// to [`crate::DEFAULT_LOCATION`].
    pub initial_location: Option<String>,
    /// How long the scroll-to-top animation takes, in milliseconds.
    pub scroll_speed_ms: u64,
    /// Restore scroll on every resolved navigation, not just fresh pages.
    pub scroll_always: bool,
    pub scroll_disabled: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            initial_location: None,
            scroll_speed_ms: 500,
            scroll_always: false,
            scroll_disabled: false,
        }
    }
}

impl RouterOptions {
    #[must_use]
    pub fn with_initial_location(mut self, location: impl Into<String>) -> Self {
        self.initial_location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_scroll_speed_ms(mut self, speed: u64) -> Self {
        self.scroll_speed_ms = speed;
        self
    }

    #[must_use]
    pub fn with_scroll_always(mut self, always: bool) -> Self {
        self.scroll_always = always;
        self
    }

    #[must_use]
    pub fn with_scroll_disabled(mut self, disabled: bool) -> Self {
        self.scroll_disabled = disabled;
        self
    }

    pub fn scroll_duration_secs(&self) -> f64 {
        self.scroll_speed_ms as f64 / 1_000.0
    }
}

#[cfg(test)]
mod test {
    use super::RouterOptions;

    #[test]
    fn defaults() {
        let options = RouterOptions::default();
        assert_eq!(options.scroll_speed_ms, 500);
        assert!(!options.scroll_always);
        assert!(!options.scroll_disabled);
        assert_eq!(options.scroll_duration_secs(), 0.5);
    }

    #[test]
    fn partial_deserialize() {
        let json = r#"{ "scroll_always": true, "initial_location": "http://localhost/home" }"#;
        let options: RouterOptions = serde_json::from_str(json).unwrap();
        assert_eq!(
            options,
            RouterOptions::default()
                .with_scroll_always(true)
                .with_initial_location("http://localhost/home")
        );
    }
}
