use gloo_console::log;

pub fn welcome() {
    log!(
        "%cRSK Industries",
        "color: #1a4d6e; font-size: 24px; font-weight: bold;"
    );
    log!(
        "%cWholesale Marketing & Distribution",
        "color: #2d8659; font-size: 14px;"
    );
    log!(
        "%cThank you for visiting our website!",
        "color: #424242; font-size: 12px;"
    );
}
