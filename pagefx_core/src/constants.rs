// Scroll thresholds (logical px)
pub const HEADER_SCROLL_THRESHOLD: f32 = 100.0;
pub const NAV_PROBE_OFFSET: f32 = 100.0;
pub const SCROLL_TOP_THRESHOLD: f32 = 300.0;

// Responsive breakpoint
pub const MOBILE_BREAKPOINT: f32 = 768.0;

// Rate limiting
pub const RESIZE_THROTTLE_MS: u64 = 250;

// Reveal observer
pub const REVEAL_THRESHOLD: f32 = 0.1;
pub const REVEAL_BOTTOM_MARGIN: f32 = 50.0;
pub const STAGGER_STEP_MS: u64 = 100;

// Simulated submission round trip
pub const SUBMIT_DELAY_MS: u64 = 2000;
pub const BANNER_FADE_IN_MS: u64 = 100;
pub const BANNER_HOLD_MS: u64 = 5000;
pub const BANNER_FADE_OUT_MS: u64 = 300;

// Character counter
pub const COUNTER_WARN_BELOW: usize = 20;
pub const PHONE_MAX_DIGITS: usize = 11;

// Bound element ids and classes
pub const TOGGLE_ID: &str = "hamburger";
pub const MENU_ID: &str = "navMenu";
pub const NAV_LINK_CLASS: &str = "nav-link";
pub const HEADER_CLASS: &str = "header";

// State classes the engine projects
pub const ACTIVE_CLASS: &str = "active";
pub const MENU_OPEN_CLASS: &str = "menu-open";
pub const SCROLLED_CLASS: &str = "scrolled";
pub const ANIMATE_CLASS: &str = "animate";
pub const LAZY_CLASS: &str = "lazy";
pub const ERROR_CLASS: &str = "error";

// Classes for elements the engine creates
pub const FIELD_ERROR_CLASS: &str = "field-error";
pub const SUCCESS_BANNER_CLASS: &str = "success-message";
pub const CHAR_COUNTER_CLASS: &str = "char-counter";
pub const SCROLL_TOP_CLASS: &str = "scroll-to-top";

// Reveal registration and grid staggering
pub const GRID_CONTAINER_CLASS: &str = "grid-container";
pub const GRID_ITEM_CLASSES: [&str; 4] = ["grid-item", "about-item", "service-card", "feature-item"];
pub const REVEAL_TARGET_CLASSES: [&str; 4] = [
    "about-item",
    "service-card",
    "feature-item",
    "company-info-grid",
];

// User-facing strings (the page ships in Japanese)
pub const MSG_REQUIRED: &str = "必須項目です";
pub const MSG_EMAIL: &str = "有効なメールアドレスを入力してください";
pub const MSG_PHONE: &str = "有効な電話番号を入力してください";
pub const MSG_SUBMITTING: &str = "送信中...";
pub const MSG_SUCCESS: &str = "お問い合わせありがとうございます。担当者よりご連絡いたします。";

// Inline style values
pub const ERROR_COLOR: &str = "#DC2626";
pub const COUNTER_COLOR: &str = "#6B7280";
pub const SCROLL_TOP_LABEL: &str = "↑";
