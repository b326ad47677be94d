use tracing::{Level, error};

mod banner;
mod dom;
mod listen;
mod site;
mod timer;
mod watch;

fn main() {
    dioxus_logger::init(Level::DEBUG).expect("failed to init logger");

    if let Err(err) = site::init_site() {
        error!("failed to attach site behavior: {err}");
    }
}
