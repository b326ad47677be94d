use serde::{Deserialize, Serialize};
use tracing::{Level, debug, instrument, warn};

// behavior configuration
//
// every selector, class name, threshold and delay the controllers use.  the defaults describe the
// markup the site ships with; a page may override any subset of them through a JSON block, see
// BehaviorConfig::from_json
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub menu: MenuConfig,
    pub form: FormConfig,
    pub scroll: ScrollConfig,
    pub shadow: ShadowConfig,
    pub fade: FadeConfig,
    pub nav: NavConfig,
    pub inputs: InputConfig,
    pub ripple: RippleConfig,
    pub lazy: LazyConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct MenuConfig {
    pub toggle_id: String,
    pub panel_id: String,
    pub link_selector: String,
    pub open_class: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        MenuConfig {
            toggle_id: String::from("mobileMenuToggle"),
            panel_id: String::from("navMenu"),
            link_selector: String::from("a"),
            open_class: String::from("active"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct FormConfig {
    pub form_id: String,
    pub message_id: String,
    pub message_class: String,
    pub clear_delay_ms: u32,
}

impl Default for FormConfig {
    fn default() -> Self {
        FormConfig {
            form_id: String::from("contactForm"),
            message_id: String::from("formMessage"),
            message_class: String::from("form-message"),
            clear_delay_ms: 5000,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub anchor_selector: String,
    pub navbar_selector: String,
    pub margin: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        ScrollConfig {
            anchor_selector: String::from(r##"a[href^="#"]"##),
            navbar_selector: String::from(".navbar"),
            margin: 20.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ShadowConfig {
    pub navbar_selector: String,
    pub threshold: f64,
    pub raised: String,
    pub resting: String,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        ShadowConfig {
            navbar_selector: String::from(".navbar"),
            threshold: 10.0,
            raised: String::from("0 4px 20px rgba(0, 0, 0, 0.15)"),
            resting: String::from("0 2px 10px rgba(0, 0, 0, 0.1)"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct FadeConfig {
    pub selector: String,
    pub threshold: f64,
    pub root_margin: String,
    pub hidden_transform: String,
    pub visible_transform: String,
    pub transition: String,
}

impl Default for FadeConfig {
    fn default() -> Self {
        FadeConfig {
            selector: String::from(
                ".category-card, .product-card, .feature-card, .value-card, .service-card, .market-card, .info-card",
            ),
            threshold: 0.1,
            root_margin: String::from("0px 0px -50px 0px"),
            hidden_transform: String::from("translateY(30px)"),
            visible_transform: String::from("translateY(0)"),
            transition: String::from("opacity 0.6s ease, transform 0.6s ease"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct NavConfig {
    pub link_selector: String,
    pub index_page: String,
    pub active_class: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        NavConfig {
            link_selector: String::from(".nav-menu a"),
            index_page: String::from("index.html"),
            active_class: String::from("active"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub selector: String,
    pub focused_class: String,
    pub filled_class: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            selector: String::from("input, textarea, select"),
            focused_class: String::from("focused"),
            filled_class: String::from("filled"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct RippleConfig {
    pub button_selector: String,
    pub class: String,
    pub lifetime_ms: u32,
    pub style_id: String,
}

impl Default for RippleConfig {
    fn default() -> Self {
        RippleConfig {
            button_selector: String::from(".btn"),
            class: String::from("ripple"),
            lifetime_ms: 600,
            style_id: String::from("ripple-styles"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct LazyConfig {
    pub selector: String,
    pub source_attribute: String,
}

impl Default for LazyConfig {
    fn default() -> Self {
        LazyConfig {
            selector: String::from("img[data-src]"),
            source_attribute: String::from("data-src"),
        }
    }
}

impl BehaviorConfig {
    // fields missing from the document keep their defaults, so a page only has to spell out
    // what it changes
    pub fn from_json(doc: &str) -> anyhow::Result<Self> {
        let config: BehaviorConfig = serde_json::from_str(doc)?;
        Ok(config)
    }

    #[instrument(level=Level::DEBUG, skip(doc))]
    pub fn from_optional_json(doc: Option<&str>) -> Self {
        let Some(doc) = doc.map(str::trim).filter(|doc| !doc.is_empty()) else {
            debug!("no behavior config block, using defaults");
            return BehaviorConfig::default();
        };

        match BehaviorConfig::from_json(doc) {
            Ok(config) => {
                debug!("parsed behavior config block");
                config
            }
            Err(err) => {
                warn!("failed to parse behavior config block, using defaults: {err}");
                BehaviorConfig::default()
            }
        }
    }
}
