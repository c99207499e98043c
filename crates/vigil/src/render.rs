//! Widget context for the rendering collaborator.
//!
//! Produces the resolved site key, field names, and markup fragments
//! the calling application embeds into its pages. Composing them into
//! full pages stays on the caller's side.

use janus_common::constants::RECAPTCHA_JS_URL;
use janus_common::{JanusError, RecaptchaMode};

use crate::config::RecaptchaConfig;

/// Everything the rendering side needs for the chosen mode.
#[derive(Debug, Clone)]
pub struct WidgetContext {
    mode: RecaptchaMode,
    site_key_v3: String,
    site_key_v2: String,
    field: String,
    class_v2: String,
}

impl WidgetContext {
    /// Errors when neither site key is configured. When only the v2
    /// key is present, the mode is forced to v2 regardless of the
    /// decision.
    pub fn new(config: &RecaptchaConfig, mode: RecaptchaMode) -> Result<Self, JanusError> {
        if config.site_key_v3.is_empty() && config.site_key_v2.is_empty() {
            return Err(JanusError::Config(
                "reCAPTCHA site key is not set".to_string(),
            ));
        }

        let mode = if config.site_key_v3.is_empty() {
            RecaptchaMode::V2
        } else {
            mode
        };

        Ok(Self {
            mode,
            site_key_v3: config.site_key_v3.clone(),
            site_key_v2: config.site_key_v2.clone(),
            field: config.field.clone(),
            class_v2: config.class_v2.clone(),
        })
    }

    pub fn mode(&self) -> RecaptchaMode {
        self.mode
    }

    /// The resolved public key for the chosen mode
    pub fn site_key(&self) -> &str {
        match self.mode {
            RecaptchaMode::V2 => &self.site_key_v2,
            RecaptchaMode::V3 => &self.site_key_v3,
        }
    }

    /// Hidden input the v3 script writes its token into; empty under v2
    pub fn hidden_field(&self) -> String {
        match self.mode {
            RecaptchaMode::V2 => String::new(),
            RecaptchaMode::V3 => format!(
                r#"<input type="hidden" name="{field}" id="{field}" value=""/>"#,
                field = self.field
            ),
        }
    }

    /// v2 checkbox widget; `attr` carries extra attributes such as
    /// `data-theme="dark" data-size="compact"`. Empty under v3.
    pub fn checkbox(&self, attr: &str) -> String {
        match self.mode {
            RecaptchaMode::V3 => String::new(),
            RecaptchaMode::V2 => format!(
                r#"<div class="{}" data-sitekey="{}" {}></div>"#,
                self.class_v2, self.site_key_v2, attr
            ),
        }
    }

    /// Script URL to load: v3 loads with `?render=` so the API is
    /// primed for `grecaptcha.execute`
    pub fn script_src(&self) -> String {
        match self.mode {
            RecaptchaMode::V2 => RECAPTCHA_JS_URL.to_string(),
            RecaptchaMode::V3 => format!("{}?render={}", RECAPTCHA_JS_URL, self.site_key_v3),
        }
    }

    /// Inline script that executes v3 and posts the token into the
    /// hidden field; `None` under v2
    pub fn script_block(&self) -> Option<String> {
        match self.mode {
            RecaptchaMode::V2 => None,
            RecaptchaMode::V3 => Some(format!(
                r#"
grecaptcha.ready(function () {{
  grecaptcha.execute('{key}', {{action: 'submit'}}).then(function(token) {{
    const recaptchaResponse = document.getElementById('{field}');
    recaptchaResponse.value = token;
  }});
}});
"#,
                key = self.site_key_v3,
                field = self.field
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RecaptchaConfig {
        RecaptchaConfig {
            site_key_v3: "site-v3".to_string(),
            site_key_v2: "site-v2".to_string(),
            ..RecaptchaConfig::default()
        }
    }

    #[test]
    fn test_no_site_keys_is_fatal() {
        let result = WidgetContext::new(&RecaptchaConfig::default(), RecaptchaMode::V3);
        assert!(matches!(result, Err(JanusError::Config(_))));
    }

    #[test]
    fn test_v3_context() {
        let ctx = WidgetContext::new(&config(), RecaptchaMode::V3).unwrap();

        assert_eq!(ctx.site_key(), "site-v3");
        assert_eq!(
            ctx.hidden_field(),
            r#"<input type="hidden" name="recaptchaToken" id="recaptchaToken" value=""/>"#
        );
        assert_eq!(ctx.checkbox(""), "");
        assert_eq!(
            ctx.script_src(),
            "https://www.google.com/recaptcha/api.js?render=site-v3"
        );

        let block = ctx.script_block().unwrap();
        assert!(block.contains("grecaptcha.execute('site-v3'"));
        assert!(block.contains("getElementById('recaptchaToken')"));
    }

    #[test]
    fn test_v2_context() {
        let ctx = WidgetContext::new(&config(), RecaptchaMode::V2).unwrap();

        assert_eq!(ctx.site_key(), "site-v2");
        assert_eq!(ctx.hidden_field(), "");
        assert_eq!(
            ctx.checkbox(r#"data-theme="dark""#),
            r#"<div class="g-recaptcha" data-sitekey="site-v2" data-theme="dark"></div>"#
        );
        assert_eq!(ctx.script_src(), "https://www.google.com/recaptcha/api.js");
        assert!(ctx.script_block().is_none());
    }

    #[test]
    fn test_v2_only_keys_force_v2() {
        let config = RecaptchaConfig {
            site_key_v2: "site-v2".to_string(),
            ..RecaptchaConfig::default()
        };

        let ctx = WidgetContext::new(&config, RecaptchaMode::V3).unwrap();
        assert_eq!(ctx.mode(), RecaptchaMode::V2);
        assert_eq!(ctx.site_key(), "site-v2");
    }
}
